//! Configuration types for drive-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for [`DriveFetcher`](crate::DriveFetcher)
///
/// Every field has a default matching the legacy automation script, so
/// `Config::default()` works for the original use case (key file in the
/// working directory, archive extracted to `unzipped_invoices`). All fields
/// are serde-(de)serializable with per-field defaults, so partial JSON/TOML
/// configs fill in the rest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the service-account JSON key file (default: "service_account.json")
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// OAuth scope requested for the session (default: full Drive scope)
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Directory downloaded files are written to (default: ".")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Directory archive contents are extracted to (default: "unzipped_invoices")
    #[serde(default = "default_extract_dir")]
    pub extract_dir: PathBuf,

    /// Media download chunk size in bytes (default: 8 MiB)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Follow `nextPageToken` across every listing page (default: true)
    ///
    /// Set to false to consult only the first page, reproducing the legacy
    /// single-page behavior.
    #[serde(default = "default_true")]
    pub follow_pagination: bool,

    /// Base URL of the Drive API (default: "https://www.googleapis.com")
    ///
    /// Override to point the client at a proxy or a test server.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            scope: default_scope(),
            download_dir: default_download_dir(),
            extract_dir: default_extract_dir(),
            chunk_size: default_chunk_size(),
            follow_pagination: true,
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Validate the configuration, returning a [`Error::Config`] describing
    /// the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "credentials_path must not be empty".to_string(),
                key: Some("credentials_path".to_string()),
            });
        }

        if self.scope.is_empty() {
            return Err(Error::Config {
                message: "scope must not be empty".to_string(),
                key: Some("scope".to_string()),
            });
        }

        if self.chunk_size == 0 {
            return Err(Error::Config {
                message: "chunk_size must be greater than zero".to_string(),
                key: Some("chunk_size".to_string()),
            });
        }

        if url::Url::parse(&self.api_base).is_err() {
            return Err(Error::Config {
                message: format!("api_base is not a valid URL: {}", self.api_base),
                key: Some("api_base".to_string()),
            });
        }

        Ok(())
    }
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("service_account.json")
}

fn default_scope() -> String {
    "https://www.googleapis.com/auth/drive".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extract_dir() -> PathBuf {
    PathBuf::from("unzipped_invoices")
}

fn default_chunk_size() -> u64 {
    8 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    "https://www.googleapis.com".to_string()
}
