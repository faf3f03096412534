//! machineqr command line entrypoint

use clap::Parser;
use machineqr::output::render_generated;
use machineqr::{MachineQrConfig, MachineRecord, QrGenerator, Result, logging};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "machineqr",
    version,
    about = "Generate the QR code for a recycling machine point record"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to machineqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the output PNG path (defaults to qr-code.png in the working directory)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the result as formatted JSON instead of the confirmation line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MachineQrConfig::load(cli.config.as_deref())?;

    if let Some(path) = cli.output {
        config.output.path = path;
    }

    logging::init(&config.logging)?;
    match &config.source {
        Some(path) => info!("Using configuration file: {}", path.display()),
        None => debug!("No machineqr.toml / machineqr.yaml found, using defaults"),
    }
    info!(settings = ?config.qr, path = %config.output.path.display(), "Generating QR code");

    let generator = QrGenerator::from_config(&config);
    let generated = generator.generate(&MachineRecord::default(), &config.output.path)?;
    let rendered = render_generated(&generated);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        println!("{}", rendered.human);
    }

    Ok(())
}
