use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const OVERRIDE_KEYS: [&str; 10] = [
    "MACHINEQR_QR_VERSION",
    "MACHINEQR_QR_ERROR_CORRECTION",
    "MACHINEQR_QR_BOX_SIZE",
    "MACHINEQR_QR_BORDER",
    "MACHINEQR_QR_FIT",
    "MACHINEQR_OUTPUT",
    "MACHINEQR_LOG_LEVEL",
    "MACHINEQR_LOG_FILE",
    "MACHINEQR_LOG_COLOR",
    "MACHINEQR_LOG_ROTATION",
];

/// Command running the binary in `dir` with no inherited overrides or XDG config.
fn machineqr(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_machineqr"));
    command.current_dir(dir).env("XDG_CONFIG_HOME", dir.join("xdg"));
    for key in OVERRIDE_KEYS {
        command.env_remove(key);
    }
    command
}

fn run(command: &mut Command) -> Output {
    let output = command.output().expect("run machineqr");
    assert!(
        output.status.success(),
        "machineqr failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

#[test]
fn no_flags_writes_qr_code_png_and_one_line() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = run(&mut machineqr(dir.path()));

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "QR code generated and saved as qr-code.png\n"
    );
    let written = fs::metadata(dir.path().join("qr-code.png")).expect("qr-code.png");
    assert!(written.len() > 0);
}

#[test]
fn cli_output_wins_over_env_and_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("machineqr.toml"),
        "[output]\npath = \"a.png\"\n",
    )
    .expect("write config");

    run(machineqr(dir.path())
        .env("MACHINEQR_OUTPUT", "b.png")
        .args(["--output", "c.png"]));

    assert!(dir.path().join("c.png").exists());
    assert!(!dir.path().join("b.png").exists());
    assert!(!dir.path().join("a.png").exists());
    assert!(!dir.path().join("qr-code.png").exists());
}

#[test]
fn env_output_wins_over_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("machineqr.toml"),
        "[output]\npath = \"a.png\"\n",
    )
    .expect("write config");

    run(machineqr(dir.path()).env("MACHINEQR_OUTPUT", "b.png"));

    assert!(dir.path().join("b.png").exists());
    assert!(!dir.path().join("a.png").exists());
}

#[test]
fn discovered_file_sets_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("machineqr.toml"),
        "[output]\npath = \"a.png\"\n",
    )
    .expect("write config");

    let output = run(&mut machineqr(dir.path()));

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "QR code generated and saved as a.png\n"
    );
    assert!(dir.path().join("a.png").exists());
}

#[test]
fn invalid_version_exits_with_error() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = machineqr(dir.path())
        .env("MACHINEQR_QR_VERSION", "0")
        .output()
        .expect("run machineqr");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
    assert!(!dir.path().join("qr-code.png").exists());
}
