use crate::application::body_encoder::EncodedBody;
use crate::domain::entities::{Method, Request};
use crate::domain::errors::CommandError;
use crate::domain::value_objects::{BasicAuth, Url};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    content_type: Option<String>,
    body: Bytes,
    headers: BTreeMap<String, String>,
    basic_auth: Option<BasicAuth>,
    timeout: Duration,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            url: None,
            content_type: None,
            body: Bytes::new(),
            headers: BTreeMap::new(),
            basic_auth: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn body(mut self, encoded: EncodedBody) -> Self {
        self.content_type = Some(encoded.content_type);
        self.body = encoded.content;
        self
    }

    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.basic_auth = auth;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Assembles the request. Custom headers are applied after
    /// `Content-Type` and replace it when they name it; the deadline is
    /// stamped here.
    pub fn build(self) -> Result<Request, CommandError> {
        let method = self
            .method
            .ok_or_else(|| CommandError::InvalidUsage("method is required".into()))?;
        let url = self.url.ok_or(CommandError::NoServerSpecified)?;

        let mut headers = HeaderMap::new();
        if let Some(content_type) = &self.content_type {
            headers.insert(CONTENT_TYPE, header_value(content_type)?);
        }

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                CommandError::InvalidUsage(format!("invalid header name '{}'", name))
            })?;
            headers.insert(name, header_value(value)?);
        }

        if let Some(auth) = self.basic_auth.filter(|auth| !auth.user.is_empty()) {
            let token = STANDARD.encode(format!("{}:{}", auth.user, auth.password));
            headers.insert(AUTHORIZATION, header_value(&format!("Basic {}", token))?);
        }

        Ok(Request {
            method,
            url,
            headers,
            body: self.body,
            deadline: Instant::now() + self.timeout,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, CommandError> {
    HeaderValue::from_str(raw)
        .map_err(|_| CommandError::InvalidUsage(format!("invalid header value '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(content_type: &str, body: &'static str) -> EncodedBody {
        EncodedBody {
            content_type: content_type.to_string(),
            content: Bytes::from_static(body.as_bytes()),
        }
    }

    fn base() -> RequestBuilder {
        RequestBuilder::new()
            .method(Method::Post)
            .url(Url::new("http://localhost:8080/").unwrap())
    }

    #[test]
    fn sets_content_type_from_encoded_body() {
        let request = base()
            .body(encoded("application/json", "{}"))
            .build()
            .unwrap();
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body, Bytes::from_static(b"{}"));
    }

    #[test]
    fn custom_headers_override_content_type() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/csv".to_string());
        headers.insert("X-Trace".to_string(), "abc".to_string());

        let request = base()
            .body(encoded("application/json", "a,b"))
            .headers(&headers)
            .build()
            .unwrap();
        assert_eq!(request.headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(request.headers[CONTENT_TYPE], "text/csv");
        assert_eq!(request.headers["x-trace"], "abc");
    }

    #[test]
    fn basic_auth_is_encoded() {
        let request = base()
            .basic_auth(Some("alice:secret".parse().unwrap()))
            .build()
            .unwrap();
        assert_eq!(request.headers[AUTHORIZATION], "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn basic_auth_without_user_is_skipped() {
        let request = base()
            .basic_auth(Some(":secret".parse().unwrap()))
            .build()
            .unwrap();
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        assert!(matches!(
            base().headers(&headers).build(),
            Err(CommandError::InvalidUsage(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_is_stamped_at_build_time() {
        let before = Instant::now();
        let request = base().timeout(Duration::from_secs(60)).build().unwrap();
        assert_eq!(request.deadline - before, Duration::from_secs(60));
    }

    #[test]
    fn missing_url_means_no_server() {
        assert!(matches!(
            RequestBuilder::new().method(Method::Get).build(),
            Err(CommandError::NoServerSpecified)
        ));
    }
}
