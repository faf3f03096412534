//! Generate QR codes for a couple of machines
//!
//! Usage: cargo run --example generate_record

use machineqr::output::render_generated;
use machineqr::{ErrorCorrection, MachineRecord, QrGenerator, QrSettings};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let generator = QrGenerator::default();

    let generated = generator.generate(&MachineRecord::default(), "qr-code.png")?;
    println!("{}", render_generated(&generated).human);

    // Sturdier code for a machine mounted outdoors
    let outdoor = QrGenerator::new(QrSettings {
        error_correction: ErrorCorrection::High,
        ..QrSettings::default()
    });
    let record = MachineRecord::new("Bottle return, parking lot", 250);
    let generated = outdoor.generate(&record, "qr-code-outdoor.png")?;

    println!("{}", render_generated(&generated).human);
    println!("  Version: {}", generated.symbol.version);

    Ok(())
}
