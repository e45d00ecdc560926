//! Command-line interface of the `volvis` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use volvis_core::{Axis, HitPolicy, RenderOptions, UVec3, VolumeError};
use volvis_render::{CancelToken, ColorMapRegistry, FileImageWriter};

use crate::error::{Result, VolvisError};
use crate::loader::{RawLayout, RawVolumeLoader};
use crate::output::OutputPlan;
use crate::pipeline::Pipeline;

/// Render isosurface and contour projections of a raw 8-bit volume.
#[derive(Parser, Debug, Clone)]
#[command(name = "volvis", version, about)]
pub struct Cli {
    /// Samples along X
    pub width: u32,

    /// Samples along Y
    pub height: u32,

    /// Samples along Z
    pub depth: u32,

    /// Bytes to skip before the first sample
    pub header_size: usize,

    /// Density threshold of the surface
    pub isovalue: u8,

    /// Depth axis: 0 = X, 1 = Y, 2 = Z
    #[arg(value_parser = clap::value_parser!(u8).range(0..=2))]
    pub axis: u8,

    /// Viewing direction flag (logged only)
    #[arg(action = ArgAction::Set, default_value_t = false)]
    pub direction: bool,

    /// Raw volume file
    #[arg(long, default_value = "./bighead_den256X256X225B62H.raw")]
    pub input: PathBuf,

    /// Directory for the rendered images
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image file extension (tiff, png, jpg, bmp)
    #[arg(long, default_value = "tiff")]
    pub format: String,

    /// JSON render options; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output image edge length in pixels
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Pixels per voxel
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Read slices with the fixed 256-byte row stride
    #[arg(long)]
    pub legacy_stride: bool,

    /// Shade the front surface instead of the deepest hit
    #[arg(long)]
    pub first_hit: bool,

    /// Also write colour-mapped copies with this map
    #[arg(long, value_name = "NAME")]
    pub colormap: Option<String>,

    /// Worker threads for rendering
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

impl Cli {
    /// Declared volume dimensions.
    pub fn dims(&self) -> UVec3 {
        UVec3::new(self.width, self.height, self.depth)
    }

    /// Raw byte layout selected by the flags.
    pub fn layout(&self) -> RawLayout {
        if self.legacy_stride {
            RawLayout::Legacy256
        } else {
            RawLayout::Packed
        }
    }

    /// Render options from `--config` with flag overrides applied.
    pub fn render_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.config {
            Some(path) => RenderOptions::from_json_file(path)?,
            None => RenderOptions::default(),
        };
        if let Some(resolution) = self.resolution {
            options.resolution = resolution;
        }
        if let Some(zoom) = self.zoom {
            options.zoom = zoom;
        }
        if self.first_hit {
            options.hit_policy = HitPolicy::FirstHit;
        }
        if self.threads.is_some() {
            options.threads = self.threads;
        }
        options.validate()?;
        Ok(options)
    }
}

/// Runs one load, swap, render and write pass.
///
/// Returns the number of image files that failed to write.
pub fn run(cli: &Cli) -> Result<usize> {
    let options = cli.render_options()?;
    let axis = Axis::try_from(cli.axis)?;

    let color_map = match &cli.colormap {
        Some(name) => {
            let registry = ColorMapRegistry::new();
            let map = registry.get(name).cloned().ok_or_else(|| {
                VolvisError::Volume(VolumeError::InvalidOption(format!(
                    "unknown color map {name:?}, expected one of {:?}",
                    registry.names()
                )))
            })?;
            Some(map)
        }
        None => None,
    };

    log::info!(
        "volume {} with {}-byte header, isovalue {}, depth axis {axis:?}, direction {}",
        cli.dims(),
        cli.header_size,
        cli.isovalue,
        cli.direction
    );

    let volume = RawVolumeLoader::new(cli.dims(), cli.header_size)
        .with_layout(cli.layout())
        .load(&cli.input)?;
    let pipeline = Pipeline::new(volume, options)?;
    pipeline.swap_axis(axis)?;

    let mut plan = OutputPlan::new(&cli.output_dir, cli.format.as_str());
    if let Some(map) = color_map {
        plan = plan.with_color_map(map);
    }

    let cancel = CancelToken::new();
    let writer = FileImageWriter::new();
    let mut failures = 0;

    let iso = pipeline.render_isosurface(cli.isovalue, &cancel)?;
    failures += plan.write(&writer, "iso", &iso.image).failed.len();

    let contour = pipeline.render_contour(cli.isovalue, &cancel)?;
    failures += plan.write(&writer, "contour", &contour.image).failed.len();

    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("volvis").chain(args.iter().copied()))
    }

    #[test]
    fn test_positional_arguments() {
        let cli = parse(&["256", "256", "225", "62", "80", "2", "true"]).unwrap();
        assert_eq!(cli.dims(), UVec3::new(256, 256, 225));
        assert_eq!(cli.header_size, 62);
        assert_eq!(cli.isovalue, 80);
        assert_eq!(cli.axis, 2);
        assert!(cli.direction);
        assert_eq!(cli.layout(), RawLayout::Packed);
        assert_eq!(cli.format, "tiff");
    }

    #[test]
    fn test_direction_defaults_to_false() {
        let cli = parse(&["4", "4", "4", "0", "80", "0"]).unwrap();
        assert!(!cli.direction);
    }

    #[test]
    fn test_out_of_range_arguments_rejected() {
        assert!(parse(&["4", "4", "4", "0", "80", "3"]).is_err());
        assert!(parse(&["4", "4", "4", "0", "300", "0"]).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "4",
            "4",
            "4",
            "0",
            "80",
            "1",
            "--resolution",
            "64",
            "--zoom",
            "2.5",
            "--first-hit",
            "--threads",
            "2",
            "--legacy-stride",
        ])
        .unwrap();
        let options = cli.render_options().unwrap();
        assert_eq!(options.resolution, 64);
        assert!((options.zoom - 2.5).abs() < f64::EPSILON);
        assert_eq!(options.hit_policy, HitPolicy::FirstHit);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.block_size, RenderOptions::default().block_size);
        assert_eq!(cli.layout(), RawLayout::Legacy256);
    }

    #[test]
    fn test_invalid_flag_values_rejected() {
        let cli = parse(&["4", "4", "4", "0", "80", "1", "--zoom", "0"]).unwrap();
        assert!(cli.render_options().is_err());
    }
}
