//! mync: a small command-line HTTP client.
//!
//! `mync http [options] <server>` sends a GET, POST or HEAD request, with an
//! optional JSON or multipart body, custom headers and basic auth, can repeat
//! it several times and writes the response body to stdout or a file.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::errors::CommandError;
pub use infrastructure::config::Config;
pub use presentation::cli::handle_http;
pub use presentation::dispatcher::handle_command;
