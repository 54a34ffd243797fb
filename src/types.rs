//! Data structures shared across the pipeline.

use std::path::{Path, PathBuf};

/// A single image link produced by a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Direct link to the image.
    pub url: String,
    /// Whether the feed marked the item as restricted (NSFW).
    pub restricted: bool,
}

impl Candidate {
    /// Creates an unrestricted candidate.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            restricted: false,
        }
    }

    /// The final path segment of the URL, used as file and archive member name.
    pub fn basename(&self) -> &str {
        url_basename(&self.url)
    }

    /// Joins the basename onto `dir`.
    pub fn destination(&self, dir: &Path) -> PathBuf {
        dir.join(self.basename())
    }
}

/// Returns the text after the last `/` of a URL.
pub fn url_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Outcome of a single candidate in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// Fetched and kept.
    Downloaded,
    /// The destination already existed; nothing was fetched.
    PreExisting,
    /// A valid image below the size or resolution threshold. The file was deleted.
    TooSmall {
        /// Measured size in kilobytes.
        kilobytes: u64,
        /// Measured resolution in megapixels.
        megapixels: f64,
    },
    /// Network, protocol or write failure while fetching.
    TransferFailed,
    /// The fetched bytes could not be inspected as an image. The file was deleted.
    Undecodable,
}

impl DownloadOutcome {
    /// Whether this outcome left a new image on disk.
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Downloaded)
    }
}

/// Run-level counters reported at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Number of candidates handed to the batch.
    pub requested: usize,
    /// Newly downloaded images that passed the quality gate.
    pub succeeded: usize,
    /// Candidates skipped because their destination already existed.
    pub pre_existing: usize,
    /// Candidates that failed transfer, decoding or the quality gate.
    pub failed: usize,
}

impl RunCounters {
    /// Folds one outcome into the counters.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.succeeded += 1,
            DownloadOutcome::PreExisting => self.pre_existing += 1,
            _ => self.failed += 1,
        }
    }
}

/// Compression applied to new archive members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveCompression {
    /// Plain storage.
    #[default]
    Stored,
    /// Higher-ratio LZMA-family compression (xz).
    Xz,
}

impl From<ArchiveCompression> for zip::CompressionMethod {
    fn from(value: ArchiveCompression) -> Self {
        match value {
            ArchiveCompression::Stored => zip::CompressionMethod::Stored,
            ArchiveCompression::Xz => zip::CompressionMethod::Xz,
        }
    }
}

/// Result of folding a directory into an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Members written in this call.
    pub added: usize,
    /// Files skipped because the archive already had a member with that name.
    pub skipped_duplicates: usize,
    /// Files that could not be read or written.
    pub failed: usize,
}
