use crate::application::body_encoder::BodyEncoder;
use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpRequestService;
use crate::application::validator::ArgsValidator;
use crate::domain::entities::{ArgumentModel, ExecutionConfig};
use crate::domain::errors::CommandError;
use crate::domain::value_objects::{BasicAuth, KeyValue};
use crate::infrastructure::client_factory::{ClientFactory, ClientOptions};
use crate::infrastructure::config::Config;
use crate::infrastructure::output::ResponseRouter;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use clap::error::ErrorKind;
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

/// Options of the `http` command
#[derive(Parser, Debug)]
#[command(
    name = "http",
    about = "http: A HTTP client.",
    override_usage = "http <options> server",
    disable_version_flag = true
)]
pub struct HttpArgs {
    #[arg(long, default_value = "GET", help = "HTTP method")]
    pub verb: String,

    #[arg(long, default_value = "", hide_default_value = true, help = "output file name")]
    pub output: String,

    #[arg(long, default_value = "", hide_default_value = true, help = "POST body")]
    pub body: String,

    #[arg(long = "body-file", default_value = "", hide_default_value = true, help = "POST body in file")]
    pub body_file: String,

    #[arg(long, default_value = "", hide_default_value = true, help = "POST multipart form file upload")]
    pub upload: String,

    #[arg(long = "form-data", value_name = "key=value", help = "POST multipart form data (key=value)")]
    pub form_data: Vec<KeyValue>,

    #[arg(long = "header", value_name = "key=value", help = "custom header (key=value)")]
    pub headers: Vec<KeyValue>,

    #[arg(long = "basicauth", value_name = "user:pass", help = "to use basic auth in form user:pass")]
    pub basic_auth: Option<BasicAuth>,

    #[arg(long = "disable-redirect", help = "GET disable redirect")]
    pub disable_redirect: bool,

    #[arg(long, help = "enable request duration logging")]
    pub report: bool,

    #[arg(
        long = "max-idle-conns",
        default_value_t = 1,
        allow_negative_numbers = true,
        help = "maximum number of idle connections"
    )]
    pub max_idle_conns: i64,

    #[arg(
        long = "num-requests",
        default_value_t = 1,
        allow_negative_numbers = true,
        help = "number of requests"
    )]
    pub num_requests: i64,

    #[arg(value_name = "server")]
    pub servers: Vec<String>,
}

impl HttpArgs {
    /// Converts parsed flags into the argument model. Later `key=value`
    /// occurrences overwrite earlier ones.
    pub fn into_model(self, explicitly_set: HashSet<String>) -> Result<ArgumentModel, CommandError> {
        let [url] = <[String; 1]>::try_from(self.servers)
            .map_err(|_| CommandError::NoServerSpecified)?;

        Ok(ArgumentModel {
            verb: self.verb,
            url,
            body: self.body,
            body_file: self.body_file,
            form_fields: self.form_data.into_iter().map(|kv| (kv.key, kv.value)).collect(),
            upload_file: self.upload,
            headers: self.headers.into_iter().map(|kv| (kv.key, kv.value)).collect(),
            basic_auth: self.basic_auth,
            disable_redirect: self.disable_redirect,
            output: self.output,
            max_idle_connections: self.max_idle_conns,
            retry_count: self.num_requests,
            report_timing: self.report,
            explicitly_set,
        })
    }
}

/// Result of parsing the `http` command line.
#[derive(Debug)]
pub enum ParsedCommand {
    Help,
    Run(ArgumentModel),
}

/// Parses `http` arguments, accepting single-dash long flags (`-verb POST`).
pub fn parse_args(args: &[String]) -> Result<ParsedCommand, CommandError> {
    let argv = std::iter::once("http".to_string()).chain(normalize_flags(args));

    let matches = match HttpArgs::command().try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => return Ok(ParsedCommand::Help),
        Err(err) => return Err(usage_error(&err)),
    };

    let explicitly_set = explicitly_set(&matches);
    let parsed = HttpArgs::from_arg_matches(&matches).map_err(|e| usage_error(&e))?;
    debug!(?explicitly_set, "parsed http flags");

    parsed.into_model(explicitly_set).map(ParsedCommand::Run)
}

/// Rendered usage text of the `http` command.
pub fn usage() -> String {
    HttpArgs::command().render_help().to_string()
}

/// Rewrites `-name`/`-name=value` into `--name`/`--name=value` for known
/// flags. Everything after a bare `--` is left untouched.
fn normalize_flags(args: &[String]) -> Vec<String> {
    let mut known: HashSet<String> = HttpArgs::command()
        .get_arguments()
        .filter_map(|arg| arg.get_long().map(str::to_owned))
        .collect();
    known.insert("help".to_string());

    let mut normalized = Vec::with_capacity(args.len());
    let mut passthrough = false;
    for arg in args {
        if passthrough || arg == "--" {
            passthrough = true;
            normalized.push(arg.clone());
            continue;
        }

        let rewritten = arg
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .filter(|rest| {
                let name = rest.split('=').next().unwrap_or_default();
                known.contains(name)
            })
            .map(|rest| format!("--{}", rest));
        normalized.push(rewritten.unwrap_or_else(|| arg.clone()));
    }
    normalized
}

fn explicitly_set(matches: &ArgMatches) -> HashSet<String> {
    HttpArgs::command()
        .get_arguments()
        .filter_map(|arg| {
            let long = arg.get_long()?;
            let from_cli = matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine);
            from_cli.then(|| long.to_string())
        })
        .collect()
}

fn usage_error(err: &clap::Error) -> CommandError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    CommandError::InvalidUsage(first_line.trim_start_matches("error: ").to_string())
}

/// The `http` command: parse, validate, build, send, route.
pub struct HttpCommand {
    config: Config,
}

impl HttpCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run<W: Write + ?Sized>(&self, writer: &mut W, args: &[String]) -> Result<(), CommandError> {
        let model = match parse_args(args)? {
            ParsedCommand::Help => {
                return writeln!(writer, "{}", usage())
                    .map_err(|e| CommandError::io("write", "<stdout>", e));
            }
            ParsedCommand::Run(model) => model,
        };

        ArgsValidator::validate(&model)?;
        let cfg = ExecutionConfig::try_from(model)?;

        let encoded = BodyEncoder::encode(cfg.method, &cfg.body)?;
        let request = RequestBuilder::new()
            .method(cfg.method)
            .url(cfg.url.clone())
            .body(encoded)
            .headers(&cfg.headers)
            .basic_auth(cfg.basic_auth.clone())
            .timeout(self.config.request_timeout)
            .build()?;

        let options = ClientOptions::new(
            cfg.disable_redirect,
            self.config.max_redirects,
            cfg.max_idle_connections,
        )
        .report_timing(cfg.report_timing);
        let request_service = HttpRequestService::new(ClientFactory::make_client(&options));

        let response = request_service.execute(&request, cfg.retry_count).await?;
        ResponseRouter::route(response, &cfg.output, writer)?;

        Ok(())
    }
}

/// Runs the `http` command with the given configuration.
pub async fn handle_http<W: Write + ?Sized>(
    writer: &mut W,
    args: &[String],
    config: &Config,
) -> Result<(), CommandError> {
    HttpCommand::new(config.clone()).run(writer, args).await
}
