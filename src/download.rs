//! Single image download with post-download quality checks.

use crate::config::{QualityThreshold, Settings};
use crate::error::RiddleError;
use crate::progress::ProgressReporter;
use crate::quality::QualityGate;
use crate::types::DownloadOutcome;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

/// Fetches images one at a time and keeps only those passing the quality gate.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: reqwest::Client,
    gate: QualityGate,
}

impl ImageDownloader {
    pub fn new(client: reqwest::Client, threshold: &QualityThreshold) -> Self {
        Self {
            client,
            gate: QualityGate::new(threshold),
        }
    }

    /// Builds the HTTP client from the configured user agent and timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, RiddleError> {
        let client = build_client(settings)?;
        Ok(Self::new(client, &settings.threshold()))
    }

    /// Streams the body of `url` into `filename`, truncating any existing file.
    ///
    /// # Returns
    ///
    /// The number of bytes written, or the first transfer or write error.
    async fn transfer(&self, url: &str, filename: &Path) -> Result<u64, RiddleError> {
        let mut file = BufWriter::new(tokio::fs::File::create(filename).await?);
        let response = self.client.get(url).send().await?.error_for_status()?;

        let mut byte_stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(piece) = byte_stream.next().await {
            let chunk = piece?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    /// Downloads `url` to `filename` and applies the quality gate.
    ///
    /// Never fails: every error is logged and mapped to a [`DownloadOutcome`].
    /// Whatever the failure, no partial or rejected file is left behind.
    ///
    /// # Arguments
    ///
    /// * `url` - The image URL
    /// * `filename` - Destination path
    /// * `progress` - Bar to suspend while printing diagnostics
    pub async fn fetch(
        &self,
        url: &str,
        filename: &Path,
        progress: Option<&ProgressReporter>,
    ) -> DownloadOutcome {
        match self.transfer(url, filename).await {
            Ok(bytes) => debug!("Fetched {} ({} bytes)", url, bytes),
            Err(e) => {
                report(progress, || warn!("[-] Transfer error for {}: {}", url, e));
                let _ = tokio::fs::remove_file(filename).await;
                return DownloadOutcome::TransferFailed;
            }
        }

        let path = filename.to_path_buf();
        let inspected = tokio::task::spawn_blocking(move || QualityGate::inspect(&path)).await;
        let measure = match inspected {
            Ok(Ok(measure)) => measure,
            Ok(Err(e)) => {
                report(progress, || {
                    warn!("[-] Removed {}: not a readable image: {}", filename.display(), e)
                });
                let _ = tokio::fs::remove_file(filename).await;
                return DownloadOutcome::Undecodable;
            }
            Err(e) => {
                report(progress, || {
                    warn!("[-] Inspection of {} failed: {}", filename.display(), e)
                });
                let _ = tokio::fs::remove_file(filename).await;
                return DownloadOutcome::Undecodable;
            }
        };

        if !self.gate.accepts(&measure) {
            let _ = tokio::fs::remove_file(filename).await;
            report(progress, || {
                warn!(
                    "[-] Removed {}: Too small ({} kb, {} MP)",
                    filename.display(),
                    measure.kilobytes,
                    measure.megapixels
                )
            });
            return DownloadOutcome::TooSmall {
                kilobytes: measure.kilobytes,
                megapixels: measure.megapixels,
            };
        }

        DownloadOutcome::Downloaded
    }
}

/// Creates an HTTP client with the configured user agent and timeout.
pub fn build_client(settings: &Settings) -> Result<reqwest::Client, RiddleError> {
    Ok(reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.request_timeout()?)
        .build()?)
}

fn report(progress: Option<&ProgressReporter>, f: impl FnOnce()) {
    match progress {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}
