//! Output file naming and best-effort writing.

use std::path::{Path, PathBuf};

use volvis_render::{ColorImage, ColorMap, ImageSink, ImageWriteError, ProjectionImage};

/// Timestamp format appended to the per-run copies of each image.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Result of writing one projection.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ImageWriteError)>,
}

impl WriteReport {
    /// True when every file was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Where and under which names projections are written.
///
/// Each projection `name` is written as `<name>.<ext>` (overwritten every
/// run) and `<name><suffix>.<ext>`. With a colour map, RGB copies named
/// `<name>_<map>.<ext>` and `<name>_<map><suffix>.<ext>` are added.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    dir: PathBuf,
    extension: String,
    suffix: String,
    color_map: Option<ColorMap>,
}

impl OutputPlan {
    /// Creates a plan with a suffix taken from the local clock.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let suffix = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self {
            dir: dir.into(),
            extension: extension.into(),
            suffix,
            color_map: None,
        }
    }

    /// Replaces the per-run suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Also writes colour-mapped copies.
    #[must_use]
    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = Some(color_map);
        self
    }

    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the per-run suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Fixed and suffixed paths for the stem `name`.
    pub fn paths(&self, name: &str) -> [PathBuf; 2] {
        [
            self.dir.join(format!("{name}.{}", self.extension)),
            self.dir.join(format!("{name}{}.{}", self.suffix, self.extension)),
        ]
    }

    /// Writes `image` under every name the plan gives `name`.
    ///
    /// Failures are logged and collected; remaining files are still written.
    pub fn write(&self, sink: &dyn ImageSink, name: &str, image: &ProjectionImage) -> WriteReport {
        let mut report = WriteReport::default();
        for path in self.paths(name) {
            record(&mut report, path, |p| sink.write_gray(p, image));
        }

        if let Some(color_map) = &self.color_map {
            let colored = ColorImage::from_projection(image, color_map);
            for path in self.paths(&format!("{name}_{}", color_map.name)) {
                record(&mut report, path, |p| sink.write_rgb(p, &colored));
            }
        }
        report
    }
}

fn record(
    report: &mut WriteReport,
    path: PathBuf,
    write: impl FnOnce(&Path) -> Result<(), ImageWriteError>,
) {
    match write(&path) {
        Ok(()) => {
            log::info!("wrote {}", path.display());
            report.written.push(path);
        }
        Err(err) => {
            log::error!("failed to write {}: {err}", path.display());
            report.failed.push((path, err));
        }
    }
}
