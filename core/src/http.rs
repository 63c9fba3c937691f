//! HTTP transport types and the request normalizer.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and turns `HttpResponse` values into a `NormalizedResponse`, whose
//! body is parsed JSON or raw text depending on the declared content type.
//! The network round-trip itself goes through the `Transport` trait, which
//! the host implements; the core never opens a socket.
//!
//! All fields use owned types (`String`, `Vec`) so values can be handed to
//! any host without lifetime concerns.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Content type sent with every request and recognized on responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    /// GET and HEAD requests never carry a body.
    pub fn allows_body(self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `build_request` (directly or through `SocialClient::build_*`).
/// `body` is always `None` for GET and HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data, filled in by the host after
/// executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response payload after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared a JSON content type.
    Json(Value),
    /// Any other (or missing) content type; the payload verbatim.
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{value}"),
            ResponseBody::Text(text) => f.write_str(text),
        }
    }
}

/// The `{status, body}` shape every caller branches on.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl NormalizedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes an `HttpRequest` on behalf of the core.
///
/// Implementations must return non-2xx responses as data. Only failures to
/// obtain a response at all (DNS, refused connection, malformed response)
/// are reported as `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Build a request with the JSON content-type header set. A body passed
/// with GET or HEAD is dropped.
pub fn build_request(url: &str, method: HttpMethod, body: Option<String>) -> HttpRequest {
    let body = if method.allows_body() { body } else { None };
    HttpRequest {
        method,
        url: url.to_string(),
        headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
        body,
    }
}

/// Turn a raw response into a `NormalizedResponse`.
///
/// A `Content-Type` containing `application/json` means the body is parsed
/// as JSON; malformed JSON is an `ApiError::Parse`. Every other content
/// type, including none at all, yields the body as text.
pub fn normalize_response(response: HttpResponse) -> Result<NormalizedResponse, ApiError> {
    let is_json = response
        .header("content-type")
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_CONTENT_TYPE));

    let body = if is_json {
        let value = serde_json::from_str(&response.body).map_err(|e| {
            warn!(status = response.status, error = %e, "response declared JSON but did not parse");
            ApiError::Parse(e.to_string())
        })?;
        ResponseBody::Json(value)
    } else {
        ResponseBody::Text(response.body)
    };

    Ok(NormalizedResponse {
        status: response.status,
        body,
    })
}

/// Issue a request through `transport` and normalize the response.
pub fn normalize<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    method: HttpMethod,
    body: Option<String>,
) -> Result<NormalizedResponse, ApiError> {
    let request = build_request(url, method, body);
    send(transport, &request)
}

/// Execute an already-built request and normalize the response.
pub fn send<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
) -> Result<NormalizedResponse, ApiError> {
    debug!(method = %request.method, url = %request.url, "sending request");
    let response = transport.execute(request)?;
    debug!(status = response.status, "received response");
    normalize_response(response)
}
