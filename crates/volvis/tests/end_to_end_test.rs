//! End-to-end runs of the command-line pipeline against files on disk.

use std::path::{Path, PathBuf};

use clap::Parser;
use volvis::cli::{run, Cli};
use volvis::{LoadError, UVec3, VolumeError, VolvisError, VoxelVolume};

const SIZE: u32 = 16;
const HEADER: usize = 4;

/// Fresh directory under the system temp dir, unique per test and process.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("volvis-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A solid ball of density 200 and radius 5 centred in a 16^3 volume.
fn ball_volume() -> VoxelVolume {
    VoxelVolume::from_fn(UVec3::splat(SIZE), |x, y, z| {
        let d = UVec3::new(x, y, z).as_ivec3() - glam::IVec3::splat(8);
        if d.length_squared() <= 25 {
            200
        } else {
            0
        }
    })
    .unwrap()
}

fn write_raw(dir: &Path, volume: &VoxelVolume) -> PathBuf {
    let path = dir.join("ball.raw");
    let mut bytes = vec![0xEE; HEADER];
    bytes.extend_from_slice(volume.data());
    std::fs::write(&path, bytes).unwrap();
    path
}

fn cli(input: &Path, output_dir: &Path, extra: &[&str]) -> Cli {
    let size = SIZE.to_string();
    let header = HEADER.to_string();
    let mut args = vec![
        "volvis",
        size.as_str(),
        size.as_str(),
        size.as_str(),
        header.as_str(),
        "100",
        "1",
        "--input",
        input.to_str().unwrap(),
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--resolution",
        "16",
        "--zoom",
        "1",
    ];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).unwrap()
}

fn read_gray(path: &Path) -> image::GrayImage {
    image::open(path).unwrap().to_luma8()
}

#[test]
fn renders_and_writes_both_projections() {
    let dir = scratch_dir("e2e");
    let input = write_raw(&dir, &ball_volume());

    let failures = run(&cli(&input, &dir, &["--format", "png", "--colormap", "viridis"])).unwrap();
    assert_eq!(failures, 0);

    let iso = read_gray(&dir.join("iso.png"));
    let contour = read_gray(&dir.join("contour.png"));
    assert_eq!(iso.dimensions(), (16, 16));
    assert!(iso.get_pixel(8, 8)[0] > 0);
    assert_eq!(iso.get_pixel(0, 0)[0], 0);
    assert!(contour.get_pixel(8, 8)[0] > 0);
    assert_eq!(contour.get_pixel(0, 0)[0], 0);

    assert!(dir.join("iso_viridis.png").exists());
    assert!(dir.join("contour_viridis.png").exists());

    // Fixed names plus one timestamped copy of each image.
    let stamped = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok()?.file_name().into_string().ok())
        .filter(|name| {
            name.strip_prefix("iso")
                .and_then(|rest| rest.strip_suffix(".png"))
                .is_some_and(|stamp| stamp.len() == 17 && stamp.bytes().all(|b| b.is_ascii_digit()))
        })
        .count();
    assert_eq!(stamped, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_failures_do_not_abort_the_run() {
    let dir = scratch_dir("unsupported-format");
    let input = write_raw(&dir, &ball_volume());

    // Two names per projection, none of which can be encoded.
    let failures = run(&cli(&input, &dir, &["--format", "raw"])).unwrap();
    assert_eq!(failures, 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_input_aborts() {
    let dir = scratch_dir("missing-input");
    let result = run(&cli(&dir.join("absent.raw"), &dir, &[]));
    assert!(matches!(result, Err(VolvisError::Load(LoadError::Io { .. }))));
    assert!(!dir.join("iso.tiff").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_input_aborts() {
    let dir = scratch_dir("truncated-input");
    let input = dir.join("short.raw");
    std::fs::write(&input, vec![0u8; 100]).unwrap();

    let result = run(&cli(&input, &dir, &[]));
    assert!(matches!(
        result,
        Err(VolvisError::Load(LoadError::Truncated { actual: 100, .. }))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_color_map_is_rejected() {
    let dir = scratch_dir("unknown-colormap");
    let input = write_raw(&dir, &ball_volume());
    let result = run(&cli(&input, &dir, &["--colormap", "plasma-ish"]));
    assert!(matches!(
        result,
        Err(VolvisError::Volume(VolumeError::InvalidOption(_)))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
