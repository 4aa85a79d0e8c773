use crate::application::services::HttpClient;
use crate::domain::entities::{Method as DomainMethod, RedirectPolicy, Request, Response};
use crate::domain::errors::CommandError;
use crate::infrastructure::redirect;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request as HyperRequest};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use tracing::debug;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Infrastructure implementation of HttpClient using Hyper.
///
/// Each `send` is one attempt: the round trip, any redirect hops and reading
/// the body, all bounded by the request's deadline.
pub struct HyperHttpClient {
    client: HttpsClient,
    redirect_policy: RedirectPolicy,
}

impl HyperHttpClient {
    pub fn new(redirect_policy: RedirectPolicy, max_idle_connections: usize) -> Self {
        let connector = HttpsConnector::new();
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(max_idle_connections)
            .build::<_, Full<Bytes>>(connector);
        Self {
            client,
            redirect_policy,
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response, CommandError> {
        let method = request.method.to_string();
        let url = request.url.as_str();

        match tokio::time::timeout_at(request.deadline, self.round_trip(request)).await {
            Ok(result) => result,
            Err(_) => Err(CommandError::Transport {
                method,
                url,
                reason: "deadline exceeded".to_string(),
            }),
        }
    }
}

impl HyperHttpClient {
    async fn round_trip(&self, request: Request) -> Result<Response, CommandError> {
        let mut current = request;
        let mut hops = 0;

        loop {
            let hyper_request = RequestAdapter::to_hyper_request(&current)?;
            let hyper_response = self.execute_http_request(&current, hyper_request).await?;
            let status = hyper_response.status();

            let location = redirect::redirect_location(hyper_response.headers())
                .filter(|_| redirect::is_redirect_status(status))
                .map(str::to_owned);

            let Some(location) = location else {
                return ResponseAdapter::to_domain_response(&current, hyper_response).await;
            };

            match self.redirect_policy {
                RedirectPolicy::Blocked => {
                    return Err(CommandError::RedirectBlocked { location });
                }
                RedirectPolicy::Follow { max_redirects } => {
                    if hops >= max_redirects {
                        return Err(transport_error(
                            &current,
                            format!("stopped after {} redirects", max_redirects),
                        ));
                    }
                    let next_url = current.url.join(&location)?;
                    debug!(%status, from = %current.url, to = %next_url, "following redirect");
                    current = redirect::follow(&current, status, next_url);
                    hops += 1;
                }
            }
        }
    }

    async fn execute_http_request(
        &self,
        request: &Request,
        hyper_request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<hyper::body::Incoming>, CommandError> {
        self.client
            .request(hyper_request)
            .await
            .map_err(|e| transport_error(request, error_chain(&e)))
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(
        domain_request: &Request,
    ) -> Result<HyperRequest<Full<Bytes>>, CommandError> {
        let method = MethodAdapter::to_hyper_method(domain_request.method)?;

        let mut builder = HyperRequest::builder()
            .method(method)
            .uri(domain_request.url.0.clone());

        if let Some(headers) = builder.headers_mut() {
            headers.extend(domain_request.headers.clone());
        }

        builder
            .body(Full::new(domain_request.body.clone()))
            .map_err(|e| {
                transport_error(domain_request, format!("failed to build request: {}", e))
            })
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        request: &Request,
        hyper_response: hyper::Response<hyper::body::Incoming>,
    ) -> Result<Response, CommandError> {
        let (parts, body) = hyper_response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| {
                let reason = format!("failed to read response body: {}", error_chain(&e));
                transport_error(request, reason)
            })?
            .to_bytes();

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods.
///
/// Only the verbs the validator lets through are sendable.
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Result<Method, CommandError> {
        match domain_method {
            DomainMethod::Get => Ok(Method::GET),
            DomainMethod::Post => Ok(Method::POST),
            DomainMethod::Head => Ok(Method::HEAD),
            other => Err(CommandError::UnsupportedMethod(other.to_string())),
        }
    }
}

fn transport_error(request: &Request, reason: String) -> CommandError {
    CommandError::Transport {
        method: request.method.to_string(),
        url: request.url.as_str(),
        reason,
    }
}

/// Joins an error with its sources, e.g. `client error (Connect): tcp connect error: Connection refused`.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
