//! Image output and terminal progress.

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lumen_renderer::{ImageBuffer, Progress};

/// Write the rendered image; the format follows the file extension.
pub fn save_image(image: ImageBuffer, path: &Path) -> Result<()> {
    let (width, height) = (image.width, image.height);
    let rgb = image
        .into_rgb_image()
        .with_context(|| format!("Image buffer does not match {}x{}", width, height))?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    rgb.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}

/// Progress sink drawing a terminal bar.
pub struct BarProgress {
    bar: ProgressBar,
}

/// The bar counts tenths of a percent.
const BAR_STEPS: u64 = 1000;

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(BAR_STEPS);
        match ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% ({eta})") {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(err) => log::debug!("Falling back to the default progress style: {}", err),
        }
        Self { bar }
    }

    /// Hidden bar, for quiet runs and tests.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn update(&self, percent: f64) {
        let steps = (percent.clamp(0.0, 100.0) * BAR_STEPS as f64 / 100.0).round() as u64;
        self.bar.set_position(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_percent() {
        let progress = BarProgress::hidden();
        progress.update(12.34);
        assert_eq!(progress.position(), 123);
        progress.update(100.0);
        assert_eq!(progress.position(), BAR_STEPS);
    }

    #[test]
    fn test_save_png() {
        let dir = std::env::temp_dir().join(format!("lumen-output-{}", std::process::id()));
        let path = dir.join("nested").join("tiny.png");

        let mut image = ImageBuffer::new(2, 1);
        image.data.copy_from_slice(&[255, 0, 0, 0, 0, 255]);
        save_image(image, &path).unwrap();

        let read = image::open(&path).unwrap().to_rgb8();
        assert_eq!(read.dimensions(), (2, 1));
        assert_eq!(read.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(read.get_pixel(1, 0).0, [0, 0, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
