use colored::Colorize;
use mync::infrastructure::{config::Config, logging};
use mync::presentation::dispatcher;

/// mync: a command-line HTTP client
///
/// Sends a single GET, POST or HEAD request (optionally repeated), with JSON or
/// multipart bodies, custom headers, basic auth and redirect control, and
/// writes the response body to stdout or a file.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::from_env();
    logging::init(&config.log_filter);

    let args = dispatcher::args_lossy(std::env::args_os().skip(1));
    let mut stdout = std::io::stdout();

    if let Err(err) = dispatcher::handle_command(&mut stdout, &args, &config).await {
        eprintln!("{} {}", "error:".red(), err);
        std::process::exit(1);
    }
}
