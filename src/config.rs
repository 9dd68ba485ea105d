//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::constants::{server, status};
use crate::error::{Error, Result};
use crate::types::Status;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Origin of the attendance server (scheme, host, port)
    pub base_url: Url,
    /// Per-request timeout for HTTP calls
    pub request_timeout: Duration,
    /// Status tags offered by the day editor, `none` first
    pub status_choices: Vec<Status>,
    /// File that `tracing` output is written to
    pub log_path: Option<PathBuf>,
    /// Settings ignored while loading, reported once logging is set up
    pub warnings: Vec<String>,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            base_url: default_base_url(),
            request_timeout: Duration::from_secs(server::DEFAULT_TIMEOUT_SECS),
            status_choices: parse_status_choices(&status::DEFAULT_CHOICES.join(",")),
            log_path: default_log_path(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = env::var("ATTENDANCE_URL") {
            config.base_url = Url::parse(url.trim()).map_err(|e| {
                Error::config(
                    format!("ATTENDANCE_URL '{url}' is not a valid URL: {e}"),
                    "Use a full origin such as http://127.0.0.1:5000",
                )
            })?;
        }

        if let Ok(secs) = env::var("ATTENDANCE_TIMEOUT_SECS") {
            config.set_timeout(&secs);
        }

        if let Ok(choices) = env::var("ATTENDANCE_STATUSES") {
            config.status_choices = parse_status_choices(&choices);
        }

        if let Ok(path) = env::var("ATTENDANCE_LOG") {
            config.log_path = Some(PathBuf::from(shellexpand::tilde(&path).to_string()));
        }

        Ok(config)
    }

    /// Apply a timeout in whole seconds, recording a warning if `raw` is not positive.
    pub fn set_timeout(&mut self, raw: &str) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => self.request_timeout = Duration::from_secs(secs),
            _ => self.warnings.push(format!("Ignoring invalid ATTENDANCE_TIMEOUT_SECS '{raw}'")),
        }
    }

    /// Resolve an API path such as `/api/calendar` against the server origin.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::config(format!("Cannot build URL for {path}: {e}"), "Check ATTENDANCE_URL"))
    }
}

/// Parse a comma separated list of status tags.
///
/// Blank and duplicate tags are skipped and `none` is always the first choice.
pub fn parse_status_choices(raw: &str) -> Vec<Status> {
    let mut choices = vec![Status::none()];
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let tag = Status::new(tag.to_lowercase());
        if !choices.contains(&tag) {
            choices.push(tag);
        }
    }
    choices
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(server::DEFAULT_BASE_URL).expect("valid default server URL")
}

fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("attendance-tui").join("attendance-tui.log"))
}
