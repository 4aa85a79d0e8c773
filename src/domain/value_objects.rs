use crate::domain::errors::CommandError;
use hyper::http::Uri;
use std::fmt;
use std::str::FromStr;

/// Represents a validated absolute `http`/`https` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(CommandError::InvalidUrl)` - If the URL does not parse or is not http(s)
    pub fn new(url: &str) -> Result<Self, CommandError> {
        let uri = url
            .parse::<Uri>()
            .map_err(|_| CommandError::InvalidUrl(url.to_string()))?;

        match uri.scheme_str() {
            Some("http") | Some("https") if uri.host().is_some() => Ok(Url(uri)),
            _ => Err(CommandError::InvalidUrl(url.to_string())),
        }
    }

    /// Resolves a `Location` header value against this URL.
    pub fn join(&self, location: &str) -> Result<Self, CommandError> {
        let base = url::Url::parse(&self.as_str())
            .map_err(|_| CommandError::InvalidUrl(self.as_str()))?;
        let next = base
            .join(location)
            .map_err(|_| CommandError::InvalidUrl(location.to_string()))?;
        Url::new(next.as_str())
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host()
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Basic-auth credentials given as a single `user:password` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl FromStr for BasicAuth {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(':').collect();
        match tokens.as_slice() {
            [user, password] => Ok(BasicAuth {
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => Err(CommandError::InvalidUsage(format!(
                "basic auth must be given as user:pass, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.password)
    }
}

/// A repeatable `key=value` flag value (form fields, headers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl FromStr for KeyValue {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split('=').collect();
        match tokens.as_slice() {
            [key, value] => Ok(KeyValue {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => Err(CommandError::InvalidUsage(format!(
                "expected key=value, got '{}'",
                s
            ))),
        }
    }
}
