//! CLI integration tests using the pre-built binary.
//!
//! None of these open a window: only the headless subcommands are exercised.

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::str::contains;
use std::path::Path;
use tempfile::tempdir;

const SONORA: Rgba<u8> = Rgba([0x80, 0, 0, 0xff]);
const JALISCO: Rgba<u8> = Rgba([0xe9, 0x4f, 0x37, 0xff]);

fn write_mexico(dir: &Path) {
    let mut reference = RgbaImage::from_pixel(6, 3, SONORA);
    for y in 0..3 {
        for x in 3..6 {
            reference.put_pixel(x, y, JALISCO);
        }
    }
    reference.save(dir.join("mexico-colored.png")).unwrap();
    RgbaImage::from_pixel(6, 3, Rgba([0, 0, 0, 0xff]))
        .save(dir.join("mexico-black-white.png"))
        .unwrap();
}

fn mapquiz() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mapquiz"))
}

#[test]
fn test_cli_help() {
    mapquiz().arg("--help").assert().success();
}

#[test]
fn test_cli_version() {
    mapquiz().arg("--version").assert().success();
}

#[test]
fn test_cli_regions_dump() {
    mapquiz()
        .args(["regions", "mexico"])
        .assert()
        .success()
        .stdout(contains("Jalisco"))
        .stdout(contains("Rgb24"));
}

#[test]
fn test_cli_regions_unknown_country() {
    mapquiz().args(["regions", "atlantis"]).assert().failure();
}

#[test]
fn test_cli_check() {
    let dir = tempdir().unwrap();
    write_mexico(dir.path());

    mapquiz()
        .arg("--assets")
        .arg(dir.path())
        .args(["--country", "mexico", "check"])
        .assert()
        .success()
        .stdout(contains("Mexico: 32 regions, 6x3, 2/32"));
}

#[test]
fn test_cli_check_missing_assets() {
    let dir = tempdir().unwrap();

    mapquiz()
        .arg("--assets")
        .arg(dir.path())
        .args(["--country", "japan", "check"])
        .assert()
        .failure()
        .stderr(contains("japan-colored.png"));
}

#[test]
fn test_cli_reveal_writes_image() {
    let dir = tempdir().unwrap();
    write_mexico(dir.path());
    let out = dir.path().join("sonora.png");

    mapquiz()
        .arg("--assets")
        .arg(dir.path())
        .args(["reveal", "mexico", "--region", "Sonora", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Painted 1 regions"));

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (6, 3));
    assert_ne!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0xff]));
    assert_eq!(*img.get_pixel(5, 2), Rgba([0, 0, 0, 0xff]));
}

#[test]
fn test_cli_reveal_needs_targets() {
    let dir = tempdir().unwrap();
    write_mexico(dir.path());

    mapquiz()
        .arg("--assets")
        .arg(dir.path())
        .args(["reveal", "mexico"])
        .assert()
        .failure()
        .stderr(contains("nothing to reveal"));
}
