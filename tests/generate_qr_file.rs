use std::fs;
use std::path::Path;

use machineqr::output::DEFAULT_OUTPUT_FILE;
use machineqr::{MachineRecord, QrGenerator, QrSettings};

/// Decode the single QR code in a PNG, returning (version, raw ecc bits, text).
fn decode_png(path: &Path) -> (usize, u16, String) {
    let image = image::open(path).expect("open png").to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(image);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (meta, content) = grids[0].decode().expect("decode grid");
    (meta.version.0, meta.ecc_level, content)
}

#[test]
fn default_record_round_trips_through_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_OUTPUT_FILE);

    let generated = QrGenerator::default()
        .generate(&MachineRecord::default(), &path)
        .expect("generate");

    assert!(fs::metadata(&path).expect("metadata").len() > 0);
    assert_eq!(generated.path, path);

    let (version, ecc_level, text) = decode_png(&path);
    let record = MachineRecord::from_payload(&text).expect("parse payload");
    assert_eq!(record.machine_name, "Machine 1");
    assert_eq!(record.points, 100);

    assert_eq!(version, 3);
    assert_eq!(version as i16, generated.symbol.version);
    // Format bits 0b01 mark the low error correction level
    assert_eq!(ecc_level, 1);
}

#[test]
fn image_geometry_follows_box_size_and_border() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_OUTPUT_FILE);

    let generated = QrGenerator::default()
        .generate(&MachineRecord::default(), &path)
        .expect("generate");

    let image = image::open(&path).expect("open png").to_luma8();
    let side = (17 + 4 * 3 + 2 * 4) * 10;
    assert_eq!(image.dimensions(), (side, side));
    assert_eq!(generated.symbol.image_width, side);
    assert_eq!(generated.symbol.box_size, 10);
    assert_eq!(generated.symbol.border, 4);

    // Whole quiet zone row is white, first symbol row starts black
    assert!((0..side).all(|x| image.get_pixel(x, 0).0 == [255]));
    assert_eq!(image.get_pixel(40, 40).0, [0]);
}

#[test]
fn rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_OUTPUT_FILE);
    fs::write(&path, b"not a png").expect("seed stale file");

    let generator = QrGenerator::default();
    generator
        .generate(&MachineRecord::default(), &path)
        .expect("first run");
    let first = fs::read(&path).expect("read first");

    generator
        .generate(&MachineRecord::default(), &path)
        .expect("second run");
    let second = fs::read(&path).expect("read second");

    assert!(first.starts_with(b"\x89PNG"));
    assert_eq!(first, second);
}

#[test]
fn long_payload_upgrades_version_instead_of_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("long.png");
    let record = MachineRecord::new("Sorting line, hall B, north entrance ".repeat(4), 2500);

    let generated = QrGenerator::new(QrSettings::default())
        .generate(&record, &path)
        .expect("generate");
    assert!(generated.symbol.version > 3);

    let (version, _, text) = decode_png(&path);
    assert_eq!(version as i16, generated.symbol.version);
    assert_eq!(MachineRecord::from_payload(&text).expect("parse"), record);
}
