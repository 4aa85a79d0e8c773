use crate::domain::entities::{Method, Request};
use crate::domain::value_objects::Url;
use bytes::Bytes;
use http::StatusCode;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, LOCATION};

pub fn is_redirect_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

pub fn redirect_location(headers: &HeaderMap) -> Option<&str> {
    headers.get(LOCATION).and_then(|value| value.to_str().ok())
}

/// Builds the request for the next hop.
///
/// 301/302/303 become a bodiless GET (HEAD stays HEAD); 307/308 replay the
/// method and body. Credentials are dropped when the origin changes.
pub fn follow(current: &Request, status: StatusCode, next_url: Url) -> Request {
    let mut headers = current.headers.clone();
    let (method, body) = match status {
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => {
            (current.method, current.body.clone())
        }
        _ => {
            headers.remove(CONTENT_TYPE);
            headers.remove(CONTENT_LENGTH);
            let method = if current.method == Method::Head {
                Method::Head
            } else {
                Method::Get
            };
            (method, Bytes::new())
        }
    };

    if !same_origin(&current.url, &next_url) {
        headers.remove(AUTHORIZATION);
    }

    Request {
        method,
        url: next_url,
        headers,
        body,
        deadline: current.deadline,
    }
}

/// Scheme, host and port all match, with default ports filled in.
fn same_origin(a: &Url, b: &Url) -> bool {
    let origin = |url: &Url| {
        let scheme = url.0.scheme_str().map(str::to_ascii_lowercase);
        let port = url.0.port_u16().or(match scheme.as_deref() {
            Some("https") => Some(443),
            Some("http") => Some(80),
            _ => None,
        });
        let host = url.host().map(str::to_ascii_lowercase);
        (scheme, host, port)
    };
    origin(a) == origin(b)
}
