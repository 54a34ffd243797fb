//! Extension-based image candidate filtering.

use crate::types::Candidate;
use std::collections::BTreeSet;

/// Keeps URLs whose extension is in an allow-list.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new(extensions: BTreeSet<String>) -> Self {
        Self { extensions }
    }

    /// Returns the text after the last `.` of `url`.
    ///
    /// A URL without a `.` yields the whole string.
    pub fn extension(url: &str) -> &str {
        url.rsplit('.').next().unwrap_or(url)
    }

    /// Case-sensitive membership test of the URL's extension.
    pub fn matches(&self, url: &str) -> bool {
        self.extensions.contains(Self::extension(url))
    }

    /// Drops candidates whose extension is not allowed. Order is preserved.
    pub fn retain(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.retain(|c| self.matches(&c.url));
        candidates
    }
}
