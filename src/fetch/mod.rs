//! Retrieval of canonical license text.
//!
//! A descriptor's `url` is resolved by scheme:
//! - `http`/`https`: fetched with a blocking reqwest client
//! - `data:`: decoded in place (percent-encoded or `;base64`)
//! - `file:`: read from the local filesystem
//! - anything else: a path relative to the catalog it came from (a directory
//!   on disk, or the embedded data directory for the bundled catalog)

mod data_url;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use url::Url;

use crate::catalog::BUNDLED_DATA;

pub use data_url::decode_data_url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can turn a descriptor's source location into text.
pub trait LicenseSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// Failure to retrieve canonical text. Never retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-success status
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// Connection, TLS, timeout or body read failure
    Transport { url: String, message: String },

    /// Malformed `data:` URL
    InvalidDataUrl { reason: String },

    /// Local file could not be read
    Io { path: PathBuf, message: String },

    /// Relative path with no matching file in the embedded data
    NotBundled { path: String },

    /// Body is not valid UTF-8
    NotUtf8 { location: String },

    /// Scheme we do not know how to fetch
    UnsupportedScheme { scheme: String },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, reason, .. } => {
                write!(f, "Failed to download license: {} {}", status, reason)
            }
            Self::Transport { url, message } => {
                write!(f, "Failed to download license from {}: {}", url, message)
            }
            Self::InvalidDataUrl { reason } => write!(f, "Invalid data URL: {}", reason),
            Self::Io { path, message } => {
                write!(f, "Failed to read license text {}: {}", path.display(), message)
            }
            Self::NotBundled { path } => {
                write!(f, "License text '{}' is not bundled with this build", path)
            }
            Self::NotUtf8 { location } => {
                write!(f, "License text at {} is not valid UTF-8", location)
            }
            Self::UnsupportedScheme { scheme } => {
                write!(f, "Unsupported license URL scheme: {}", scheme)
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Explicit fetch settings, built once from the CLI and handed to the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("nicelicense/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where relative source locations are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalRoot {
    /// Directory containing the catalog file
    Directory(PathBuf),
    /// The data directory embedded in the binary
    Bundled,
}

/// Default [`LicenseSource`]: one HTTP client per fetcher, plus local and
/// inline sources.
pub struct SourceFetcher {
    client: reqwest::blocking::Client,
    root: LocalRoot,
}

impl SourceFetcher {
    pub fn new(config: &FetchConfig, root: LocalRoot) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, root })
    }

    fn fetch_http(&self, url: &str) -> Result<String, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let bytes = response.bytes().map_err(transport)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::NotUtf8 {
            location: url.to_string(),
        })
    }

    fn fetch_relative(&self, location: &str) -> Result<String, FetchError> {
        match &self.root {
            LocalRoot::Directory(dir) => read_local(&dir.join(location)),
            LocalRoot::Bundled => {
                let file = BUNDLED_DATA
                    .get_file(location.trim_start_matches("./"))
                    .ok_or_else(|| FetchError::NotBundled {
                        path: location.to_string(),
                    })?;
                file.contents_utf8()
                    .map(str::to_string)
                    .ok_or_else(|| FetchError::NotUtf8 {
                        location: location.to_string(),
                    })
            }
        }
    }
}

impl LicenseSource for SourceFetcher {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        if location.starts_with("data:") {
            return decode_data_url(location);
        }

        match Url::parse(location) {
            // Single-letter schemes are Windows drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => match url.scheme() {
                "http" | "https" => {
                    debug!("Fetching {}", location);
                    self.fetch_http(location)
                }
                "file" => {
                    let path = url.to_file_path().map_err(|_| FetchError::Io {
                        path: PathBuf::from(location),
                        message: "not a local file URL".to_string(),
                    })?;
                    read_local(&path)
                }
                other => Err(FetchError::UnsupportedScheme {
                    scheme: other.to_string(),
                }),
            },
            _ => self.fetch_relative(location),
        }
    }
}

fn read_local(path: &Path) -> Result<String, FetchError> {
    let bytes = fs::read(path).map_err(|e| FetchError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|_| FetchError::NotUtf8 {
        location: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fetcher(root: LocalRoot) -> SourceFetcher {
        SourceFetcher::new(&FetchConfig::default(), root).unwrap()
    }

    #[test]
    fn test_fetch_data_url() {
        let source = fetcher(LocalRoot::Bundled);
        let text = source.fetch("data:text/plain,MIT%20License%0A").unwrap();
        assert_eq!(text, "MIT License\n");
    }

    #[test]
    fn test_fetch_relative_to_catalog_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("MIT.txt"), "MIT License").unwrap();

        let source = fetcher(LocalRoot::Directory(dir.path().to_path_buf()));
        assert_eq!(source.fetch("MIT.txt").unwrap(), "MIT License");
    }

    #[test]
    fn test_fetch_file_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ISC.txt");
        fs::write(&path, "ISC License").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let source = fetcher(LocalRoot::Bundled);
        assert_eq!(source.fetch(url.as_str()).unwrap(), "ISC License");
    }

    #[test]
    fn test_fetch_missing_local_file() {
        let dir = tempdir().unwrap();
        let source = fetcher(LocalRoot::Directory(dir.path().to_path_buf()));
        assert!(matches!(
            source.fetch("missing.txt"),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn test_fetch_bundled_text() {
        let source = fetcher(LocalRoot::Bundled);
        let text = source.fetch("licenses/MIT.txt").unwrap();
        assert!(text.starts_with("MIT License"));
    }

    #[test]
    fn test_fetch_unknown_bundled_text() {
        let source = fetcher(LocalRoot::Bundled);
        assert_eq!(
            source.fetch("licenses/NOPE.txt"),
            Err(FetchError::NotBundled {
                path: "licenses/NOPE.txt".to_string()
            })
        );
    }

    #[test]
    fn test_fetch_unsupported_scheme() {
        let source = fetcher(LocalRoot::Bundled);
        assert_eq!(
            source.fetch("ftp://example.com/MIT.txt"),
            Err(FetchError::UnsupportedScheme {
                scheme: "ftp".to_string()
            })
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to download license: 404 Not Found");
    }
}
