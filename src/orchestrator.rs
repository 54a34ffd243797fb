//! Main orchestration logic for downloading feeds.

use crate::archive::compress_folder;
use crate::dedup::filter_against_archive;
use crate::download::ImageDownloader;
use crate::error::RiddleError;
use crate::feed::FeedSource;
use crate::filter::ExtensionFilter;
use crate::types::{url_basename, ArchiveCompression, ArchiveSummary, Candidate, RunCounters};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Per-invocation options shared by every feed of a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Maximum number of items listed per feed (`None` = as many as possible).
    pub count: Option<usize>,
    /// Output folder or archive stem; defaults to the feed name.
    pub output: Option<String>,
    /// Collect into `<output>.zip` instead of a plain folder.
    pub zip: bool,
    /// Keep items the feed marks as restricted.
    pub nsfw: bool,
    /// Compression for new archive members.
    pub compression: ArchiveCompression,
}

/// What happened for one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedReport {
    pub feed: String,
    /// Candidates left after restricted, extension and archive filtering.
    pub candidates: usize,
    pub counters: RunCounters,
    /// Set in zip mode.
    pub archive: Option<ArchiveSummary>,
}

/// Where the images of one feed end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Images stored directly in a folder.
    Folder(PathBuf),
    /// Images downloaded to `cache`, then folded into `archive`.
    Archive { cache: PathBuf, archive: PathBuf },
}

impl Destination {
    /// Resolves the destination for `feed` under `options`.
    ///
    /// In zip mode the transient cache is `.cache-<name>` next to the archive,
    /// where `<name>` is the last path segment of the output.
    pub fn resolve(feed: &str, options: &RunOptions) -> Self {
        let output = options.output.as_deref().unwrap_or(feed);
        if !options.zip {
            return Destination::Folder(PathBuf::from(output));
        }
        let output_path = Path::new(output);
        let cache_name = format!(".cache-{}", url_basename(output));
        let cache = match output_path.parent() {
            Some(parent) => parent.join(cache_name),
            None => PathBuf::from(cache_name),
        };
        Destination::Archive {
            cache,
            archive: PathBuf::from(format!("{}.zip", output)),
        }
    }
}

/// Applies the restricted-content and extension filters, in feed order.
pub fn select_candidates(
    candidates: Vec<Candidate>,
    filter: &ExtensionFilter,
    nsfw: bool,
) -> Vec<Candidate> {
    let allowed: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| nsfw || !c.restricted)
        .collect();
    filter.retain(allowed)
}

/// Lists, filters, downloads and optionally archives one feed.
///
/// # Arguments
///
/// * `source` - Feed to list from
/// * `downloader` - Downloader carrying the HTTP client and quality gate
/// * `filter` - Extension allow-list
/// * `feed` - Feed name
/// * `options` - Output and filtering options
///
/// # Returns
///
/// A report of the run. Errors are only returned for the steps around the
/// batch: reading an existing archive, creating the target folder, or
/// writing the archive. Individual image failures are counted instead.
///
/// # Example
///
/// ```no_run
/// use riddle::{run_feed, ExtensionFilter, ImageDownloader, RedditFeed, RunOptions, Settings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::load("config.yaml".as_ref())?;
/// let downloader = ImageDownloader::from_settings(&settings)?;
/// let feed = RedditFeed::new(reqwest::Client::new(), settings.require_credentials()?.clone());
/// let filter = ExtensionFilter::new(settings.threshold().extensions);
/// run_feed(&feed, &downloader, &filter, "EarthPorn", &RunOptions::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_feed<F: FeedSource>(
    source: &F,
    downloader: &ImageDownloader,
    filter: &ExtensionFilter,
    feed: &str,
    options: &RunOptions,
) -> Result<FeedReport, RiddleError> {
    let listed = source.list_hot(feed, options.count).await;
    let listed_count = listed.len();
    let mut candidates = select_candidates(listed, filter, options.nsfw);
    info!(
        "{} of {} listed items are image candidates",
        candidates.len(),
        listed_count
    );

    match Destination::resolve(feed, options) {
        Destination::Folder(dir) => {
            let counters = downloader.download_all(&candidates, &dir).await?;
            Ok(FeedReport {
                feed: feed.to_string(),
                candidates: candidates.len(),
                counters,
                archive: None,
            })
        }
        Destination::Archive { cache, archive } => {
            candidates = filter_against_archive(candidates, &archive)?;
            let counters = downloader.download_all(&candidates, &cache).await?;

            let summary = match compress_folder(&cache, &archive, options.compression) {
                Ok(summary) => summary,
                Err(e) => {
                    error!(
                        "Archiving failed, downloads kept in {}: {}",
                        cache.display(),
                        e
                    );
                    return Err(e);
                }
            };
            tokio::fs::remove_dir_all(&cache).await?;

            Ok(FeedReport {
                feed: feed.to_string(),
                candidates: candidates.len(),
                counters,
                archive: Some(summary),
            })
        }
    }
}
