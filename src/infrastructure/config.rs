use crate::application::builders::request_builder::DEFAULT_REQUEST_TIMEOUT;
use std::env;
use std::time::Duration;

pub const LOG_ENV_VAR: &str = "MYNC_LOG";
const DEFAULT_LOG_FILTER: &str = "warn,mync::timing=info";

/// Runtime settings that are not exposed as `http` flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deadline for the whole request, stamped when the request is built.
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_redirects: 10,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads the defaults, letting `MYNC_LOG` replace the log filter.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        config
    }
}
