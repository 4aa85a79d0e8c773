use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `http` command, from argument parsing through to
/// writing the response.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("you have to specify the remote server")]
    NoServerSpecified,

    #[error("invalid HTTP method: '{0}'")]
    InvalidMethod(String),

    #[error("invalid HTTP usage: {0}")]
    InvalidUsage(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{method} \"{url}\": {reason}")]
    Transport {
        method: String,
        url: String,
        reason: String,
    },

    #[error("redirect to '{location}' blocked: no redirects allowed")]
    RedirectBlocked { location: String },

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl CommandError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CommandError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Errors caused by the invocation itself rather than by the network or
    /// the filesystem. The dispatcher prints the usage text after these.
    pub fn wants_usage(&self) -> bool {
        matches!(
            self,
            CommandError::NoServerSpecified | CommandError::InvalidMethod(_)
        )
    }
}
