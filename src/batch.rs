//! Sequential batch downloads into a target directory.

use crate::download::ImageDownloader;
use crate::error::RiddleError;
use crate::progress::ProgressReporter;
use crate::types::{Candidate, DownloadOutcome, RunCounters};
use std::path::Path;
use tracing::{debug, info};

impl ImageDownloader {
    /// Downloads every candidate into `target_dir`, drawing a progress bar.
    ///
    /// See [`ImageDownloader::download_all_with`].
    pub async fn download_all(
        &self,
        candidates: &[Candidate],
        target_dir: &Path,
    ) -> Result<RunCounters, RiddleError> {
        let progress = ProgressReporter::new(candidates.len() as u64);
        self.download_all_with(candidates, target_dir, &progress)
            .await
    }

    /// Downloads every candidate into `target_dir`, one at a time and in order.
    ///
    /// Candidates whose destination already exists are counted as pre-existing
    /// and not fetched again, which makes re-runs cheap. A failing item never
    /// stops the batch; the progress bar advances once per candidate whatever
    /// the outcome.
    ///
    /// # Returns
    ///
    /// The run counters, or an error if `target_dir` cannot be created.
    pub async fn download_all_with(
        &self,
        candidates: &[Candidate],
        target_dir: &Path,
        progress: &ProgressReporter,
    ) -> Result<RunCounters, RiddleError> {
        info!(
            "[~] Downloading {} images to {}",
            candidates.len(),
            target_dir.display()
        );
        tokio::fs::create_dir_all(target_dir).await?;

        let mut counters = RunCounters {
            requested: candidates.len(),
            ..RunCounters::default()
        };

        for candidate in candidates {
            let filename = candidate.destination(target_dir);
            let outcome = if tokio::fs::try_exists(&filename).await.unwrap_or(false) {
                debug!("Skipping {}: already exists", filename.display());
                DownloadOutcome::PreExisting
            } else {
                self.fetch(&candidate.url, &filename, Some(progress)).await
            };
            counters.record(&outcome);
            progress.tick();
        }

        info!(
            "[+] Successfully downloaded {} out of {} images to {} ({} already existed)",
            counters.succeeded,
            counters.requested,
            target_dir.display(),
            counters.pre_existing
        );
        Ok(counters)
    }
}
