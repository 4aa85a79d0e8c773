use crate::domain::errors::CommandError;
use crate::domain::value_objects::{BasicAuth, Url};
use bytes::Bytes;
use hyper::header::HeaderMap;
use hyper::StatusCode;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::time::Instant;

/// HTTP method enum for simplicity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(CommandError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's options exactly as they were given on the command line.
///
/// Built once per invocation and only read afterwards; `explicitly_set`
/// records which flags came from the command line rather than their defaults.
#[derive(Debug, Clone)]
pub struct ArgumentModel {
    pub verb: String,
    pub url: String,
    pub body: String,
    pub body_file: String,
    pub form_fields: BTreeMap<String, String>,
    pub upload_file: String,
    pub headers: BTreeMap<String, String>,
    pub basic_auth: Option<BasicAuth>,
    pub disable_redirect: bool,
    pub output: String,
    pub max_idle_connections: i64,
    pub retry_count: i64,
    pub report_timing: bool,
    pub explicitly_set: HashSet<String>,
}

impl ArgumentModel {
    pub fn was_set(&self, flag: &str) -> bool {
        self.explicitly_set.contains(flag)
    }
}

impl Default for ArgumentModel {
    fn default() -> Self {
        Self {
            verb: "GET".to_string(),
            url: String::new(),
            body: String::new(),
            body_file: String::new(),
            form_fields: BTreeMap::new(),
            upload_file: String::new(),
            headers: BTreeMap::new(),
            basic_auth: None,
            disable_redirect: false,
            output: String::new(),
            max_idle_connections: 1,
            retry_count: 1,
            report_timing: false,
            explicitly_set: HashSet::new(),
        }
    }
}

/// Where a POST body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Inline(String),
    File(PathBuf),
    Multipart {
        fields: BTreeMap<String, String>,
        upload: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    Follow { max_redirects: usize },
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Immutable configuration derived from a validated `ArgumentModel`.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    pub method: Method,
    pub url: Url,
    pub body: BodySource,
    pub headers: BTreeMap<String, String>,
    pub basic_auth: Option<BasicAuth>,
    pub disable_redirect: bool,
    pub output: OutputTarget,
    pub max_idle_connections: usize,
    pub retry_count: usize,
    pub report_timing: bool,
}

impl TryFrom<ArgumentModel> for ExecutionConfig {
    type Error = CommandError;

    fn try_from(model: ArgumentModel) -> Result<Self, Self::Error> {
        let method = Method::from_str(&model.verb)?;
        let url = Url::new(&model.url)?;

        let body = if !model.form_fields.is_empty() || !model.upload_file.is_empty() {
            BodySource::Multipart {
                fields: model.form_fields,
                upload: non_empty_path(&model.upload_file),
            }
        } else if let Some(path) = non_empty_path(&model.body_file) {
            BodySource::File(path)
        } else {
            BodySource::Inline(model.body)
        };

        let output = match non_empty_path(&model.output) {
            Some(path) => OutputTarget::File(path),
            None => OutputTarget::Stdout,
        };

        let max_idle_connections = usize::try_from(model.max_idle_connections)
            .map_err(|_| CommandError::InvalidUsage("max-idle-conns out of range".into()))?;
        let retry_count = usize::try_from(model.retry_count)
            .map_err(|_| CommandError::InvalidUsage("num-requests out of range".into()))?;

        Ok(ExecutionConfig {
            method,
            url,
            body,
            headers: model.headers,
            basic_auth: model.basic_auth,
            disable_redirect: model.disable_redirect,
            output,
            max_idle_connections,
            retry_count,
            report_timing: model.report_timing,
        })
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    (!raw.is_empty()).then(|| PathBuf::from(raw))
}

/// Represents an outbound HTTP request.
///
/// The body is held as `Bytes`, so the same request can be sent again on a
/// later attempt with its full body.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub deadline: Instant,
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}
