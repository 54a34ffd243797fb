//! Post-download image validation by file size and resolution.

use crate::config::QualityThreshold;
use std::path::Path;

/// Measured properties of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMeasure {
    /// Size in kilobytes (1 KB = 1000 bytes), rounded to the nearest integer
    /// with halves going to the even neighbour.
    pub kilobytes: u64,
    /// Width times height, in millions of pixels.
    pub megapixels: f64,
}

impl ImageMeasure {
    pub fn new(byte_len: u64, width: u32, height: u32) -> Self {
        Self {
            kilobytes: kilobytes_half_even(byte_len),
            megapixels: (width as f64 * height as f64) / 1_000_000.0,
        }
    }
}

fn kilobytes_half_even(byte_len: u64) -> u64 {
    let (whole, rest) = (byte_len / 1000, byte_len % 1000);
    if rest > 500 || (rest == 500 && whole % 2 == 1) {
        whole + 1
    } else {
        whole
    }
}

/// Decides whether a downloaded image is worth keeping.
#[derive(Debug, Clone)]
pub struct QualityGate {
    min_size_kb: u64,
    min_megapixels: f64,
}

impl QualityGate {
    pub fn new(threshold: &QualityThreshold) -> Self {
        Self {
            min_size_kb: threshold.min_size_kb,
            min_megapixels: threshold.min_megapixels,
        }
    }

    /// Reads the image header and file size.
    ///
    /// Only the header is decoded, so this is cheap even for large files.
    pub fn inspect(path: &Path) -> Result<ImageMeasure, image::ImageError> {
        let byte_len = std::fs::metadata(path)?.len();
        let (width, height) = image::ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(ImageMeasure::new(byte_len, width, height))
    }

    /// `true` when both thresholds are met. Values equal to a threshold pass.
    pub fn accepts(&self, measure: &ImageMeasure) -> bool {
        measure.kilobytes >= self.min_size_kb && measure.megapixels >= self.min_megapixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> QualityGate {
        QualityGate::new(&QualityThreshold::default())
    }

    #[test]
    fn test_exact_thresholds_are_kept() {
        // 5000 bytes, 1000x500 px = 0.5 MP
        let measure = ImageMeasure::new(5000, 1000, 500);
        assert_eq!(measure.kilobytes, 5);
        assert_eq!(measure.megapixels, 0.5);
        assert!(gate().accepts(&measure));
    }

    #[test]
    fn test_one_kilobyte_below_is_rejected() {
        let measure = ImageMeasure::new(4000, 1000, 500);
        assert!(!gate().accepts(&measure));
    }

    #[test]
    fn test_half_kilobytes_round_to_even() {
        assert_eq!(ImageMeasure::new(4500, 1000, 500).kilobytes, 4);
        assert_eq!(ImageMeasure::new(5500, 1000, 500).kilobytes, 6);
        assert_eq!(ImageMeasure::new(4501, 1000, 500).kilobytes, 5);
        assert_eq!(ImageMeasure::new(499, 1, 1).kilobytes, 0);
        assert!(!gate().accepts(&ImageMeasure::new(4500, 1000, 500)));
        assert!(gate().accepts(&ImageMeasure::new(4501, 1000, 500)));
    }

    #[test]
    fn test_below_megapixels_is_rejected() {
        // 1000x499 px is just under 0.5 MP
        let measure = ImageMeasure::new(50_000, 1000, 499);
        assert!(!gate().accepts(&measure));
    }

    #[test]
    fn test_inspect_reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(40, 25).save(&path).unwrap();

        let measure = QualityGate::inspect(&path).unwrap();
        assert_eq!(measure.megapixels, 0.001);
        assert!(!gate().accepts(&measure));
    }

    #[test]
    fn test_inspect_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, b"<html>not an image</html>").unwrap();
        assert!(QualityGate::inspect(&path).is_err());
    }
}
