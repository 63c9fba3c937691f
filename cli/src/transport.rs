//! Blocking HTTP transport backed by ureq.
//!
//! Status codes are never turned into errors here; the core decides what a
//! 4xx or 5xx means. Only failures to get a response at all become
//! `ApiError::Transport`.

use social_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tracing::debug;
use ureq::{Agent, Body, RequestBuilder};

pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn transport_error(err: ureq::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Copy every header carried by the core request onto the ureq builder.
fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = req.url.as_str();
        let headers = req.headers.as_slice();
        let body = req.body.as_deref();

        let result = match (req.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Head, _) => with_headers(self.agent.head(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(b)) => {
                with_headers(self.agent.delete(url).force_send_body(), headers).send(b.as_bytes())
            }
            (HttpMethod::Post, Some(b)) => with_headers(self.agent.post(url), headers).send(b.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(b)) => with_headers(self.agent.put(url), headers).send(b.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let response = result.map_err(transport_error)?;
        into_core_response(response)
    }
}

fn into_core_response(mut response: ureq::http::Response<Body>) -> Result<HttpResponse, ApiError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = response.body_mut().read_to_string().map_err(transport_error)?;
    debug!(status, bytes = body.len(), "response read");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
