//! Runtime settings and per-call time budgets.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables (see [`crate::cli`]).

use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_RESPONSE_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_PROCESSING_TIMEOUT_SECS: f64 = 3.0;
pub const DEFAULT_MAX_URLS: usize = 10;
pub const DEFAULT_CHARGED_DICT: &str = "charged_dict";
pub const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));

/// Wall-clock budgets for the two bounded stages of article processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Bounds the whole fetch: connect, status, and body.
    pub response: Duration,
    /// Bounds text normalization.
    pub processing: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            response: Duration::from_secs_f64(DEFAULT_RESPONSE_TIMEOUT_SECS),
            processing: Duration::from_secs_f64(DEFAULT_PROCESSING_TIMEOUT_SECS),
        }
    }
}

/// Process-wide settings.
///
/// # YAML
///
/// ```yaml
/// response_timeout_secs: 10
/// processing_timeout_secs: 3
/// max_urls: 10
/// charged_dict: ./charged_dict
/// lemma_dict: ./lemmas.txt
/// bind: 0.0.0.0:8080
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Fetch budget per article, in seconds.
    pub response_timeout_secs: f64,
    /// Normalization budget per article, in seconds.
    pub processing_timeout_secs: f64,
    /// Most URLs accepted in one HTTP request.
    pub max_urls: usize,
    /// Directory of charged-word lists (`*.txt`).
    pub charged_dict: PathBuf,
    /// `form lemma` dictionary replacing the bundled Russian analyzer.
    pub lemma_dict: Option<PathBuf>,
    /// Listen address of `serve`.
    pub bind: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            processing_timeout_secs: DEFAULT_PROCESSING_TIMEOUT_SECS,
            max_urls: DEFAULT_MAX_URLS,
            charged_dict: PathBuf::from(DEFAULT_CHARGED_DICT),
            lemma_dict: None,
            bind: DEFAULT_BIND,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a YAML settings file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = Self::from_yaml(&text, path)?;
        info!("Loaded settings file");
        Ok(settings)
    }

    /// Reject budgets and limits that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_secs("response_timeout_secs", self.response_timeout_secs)?;
        check_secs("processing_timeout_secs", self.processing_timeout_secs)?;
        if self.max_urls == 0 {
            return Err(ConfigError::Invalid {
                key: "max_urls",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            response: Duration::from_secs_f64(self.response_timeout_secs),
            processing: Duration::from_secs_f64(self.processing_timeout_secs),
        }
    }
}

/// Accept only values [`Duration::from_secs_f64`] can represent as a
/// non-zero duration.
fn check_secs(key: &'static str, secs: f64) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(()),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a positive number of seconds, got {secs}"),
        }),
    }
}
