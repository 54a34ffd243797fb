//! Riddle - image downloader for subreddit feeds
//!
//! This library lists the hot posts of subreddits, downloads the linked images
//! and keeps only those that pass a size and resolution check. Results go to a
//! plain folder or are folded into a zip archive that grows across runs.
//!
//! # Features
//!
//! - **Idempotent Re-runs**: Files already on disk or in the archive are skipped
//! - **Quality Gate**: Minimum file size and megapixel thresholds
//! - **Failure Isolation**: One broken link never aborts a batch
//! - **Appendable Archives**: New images are added to an existing zip file
//! - **Progress Tracking**: Single-line progress bar per batch
//!
//! # Example
//!
//! ```no_run
//! use riddle::{Candidate, ImageDownloader, Settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let downloader = ImageDownloader::from_settings(&settings)?;
//! let candidates = vec![Candidate::new("https://i.redd.it/example.jpg")];
//!
//! let counters = downloader.download_all(&candidates, "pics".as_ref()).await?;
//! println!("{} new images", counters.succeeded);
//! # Ok(())
//! # }
//! ```

mod archive;
mod batch;
mod config;
mod dedup;
mod download;
mod error;
mod feed;
mod filter;
mod orchestrator;
mod progress;
mod quality;
mod types;

pub use archive::compress_folder;
pub use config::{Credentials, QualityThreshold, Settings, DEFAULT_USER_AGENT};
pub use dedup::{archive_member_names, filter_against_archive};
pub use download::{build_client, ImageDownloader};
pub use error::RiddleError;
pub use feed::{FeedSource, RedditFeed, REDDIT_API_URL, REDDIT_AUTH_URL};
pub use filter::ExtensionFilter;
pub use orchestrator::{run_feed, select_candidates, Destination, FeedReport, RunOptions};
pub use progress::{format_percent, ProgressReporter};
pub use quality::{ImageMeasure, QualityGate};
pub use types::{
    url_basename, ArchiveCompression, ArchiveSummary, Candidate, DownloadOutcome, RunCounters,
};
