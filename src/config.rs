//! Configuration file loading.
//!
//! Settings are read once at startup from a YAML file and turned into plain
//! values that are passed down explicitly. Absent keys fall back to defaults.

use crate::error::RiddleError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default user agent sent to the feed API and image hosts.
pub const DEFAULT_USER_AGENT: &str = concat!("linux:riddle:", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API credentials for the feed provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Contents of `config.yaml`.
///
/// # Example
///
/// ```
/// use riddle::Settings;
///
/// let settings = Settings::from_yaml_str("min-size: 10\nimage-extensions: [png]").unwrap();
/// assert_eq!(settings.min_size, 10);
/// assert_eq!(settings.min_mp, 0.5);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Allowed file extensions, compared case-sensitively.
    pub image_extensions: Vec<String>,
    /// Minimum file size in kilobytes.
    pub min_size: u64,
    /// Minimum resolution in megapixels.
    pub min_mp: f64,
    /// Feed API credentials.
    pub credentials: Option<Credentials>,
    /// User agent for every HTTP request.
    pub user_agent: String,
    /// Per-request timeout as a humantime string, e.g. `"30s"` or `"2m"`.
    pub request_timeout: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            min_size: 5,
            min_mp: 0.5,
            credentials: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl Settings {
    /// Parses settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, RiddleError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reads and parses the configuration file.
    ///
    /// A missing or malformed file is an error: nothing is downloaded with a
    /// configuration the user did not intend.
    pub fn load(path: &Path) -> Result<Self, RiddleError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RiddleError::Config(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings = Self::from_yaml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        debug!("{:?}", settings.threshold());
        Ok(settings)
    }

    /// Returns the credentials or a configuration error naming what is missing.
    pub fn require_credentials(&self) -> Result<&Credentials, RiddleError> {
        match &self.credentials {
            Some(c) if !c.client_id.is_empty() && !c.client_secret.is_empty() => Ok(c),
            Some(_) => Err(RiddleError::Config(
                "credentials.client_id and credentials.client_secret must not be empty"
                    .to_string(),
            )),
            None => Err(RiddleError::Config(
                "missing `credentials` section with client_id and client_secret".to_string(),
            )),
        }
    }

    /// Parsed request timeout, or the default when unset.
    pub fn request_timeout(&self) -> Result<Duration, RiddleError> {
        match &self.request_timeout {
            Some(raw) => humantime::parse_duration(raw).map_err(|e| {
                RiddleError::Config(format!("invalid request-timeout {:?}: {}", raw, e))
            }),
            None => Ok(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// The quality thresholds derived from these settings.
    pub fn threshold(&self) -> QualityThreshold {
        QualityThreshold {
            extensions: self.image_extensions.iter().cloned().collect(),
            min_size_kb: self.min_size,
            min_megapixels: self.min_mp,
        }
    }
}

/// Size, resolution and extension requirements for kept images.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityThreshold {
    pub extensions: BTreeSet<String>,
    pub min_size_kb: u64,
    pub min_megapixels: f64,
}

impl Default for QualityThreshold {
    fn default() -> Self {
        Settings::default().threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_keys_absent() {
        let settings = Settings::from_yaml_str(
            "credentials:\n  client_id: abc\n  client_secret: def\n",
        )
        .unwrap();
        let threshold = settings.threshold();
        assert_eq!(threshold.min_size_kb, 5);
        assert_eq!(threshold.min_megapixels, 0.5);
        assert!(threshold.extensions.contains("jpeg"));
        assert_eq!(settings.require_credentials().unwrap().client_id, "abc");
        assert_eq!(settings.request_timeout().unwrap(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_yaml_str(
            "image-extensions: [gif]\nmin-size: 20\nmin-mp: 1.5\nrequest-timeout: 2m\n",
        )
        .unwrap();
        let threshold = settings.threshold();
        assert_eq!(threshold.extensions.len(), 1);
        assert!(threshold.extensions.contains("gif"));
        assert_eq!(threshold.min_size_kb, 20);
        assert_eq!(threshold.min_megapixels, 1.5);
        assert_eq!(
            settings.request_timeout().unwrap(),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_empty_document_is_default() {
        let settings = Settings::from_yaml_str("  \n").unwrap();
        assert_eq!(settings.min_size, 5);
        assert!(settings.credentials.is_none());
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let settings = Settings::default();
        assert!(matches!(
            settings.require_credentials(),
            Err(RiddleError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(matches!(
            Settings::from_yaml_str("min-size: [unclosed"),
            Err(RiddleError::YamlError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(RiddleError::Config(_))));
    }
}
