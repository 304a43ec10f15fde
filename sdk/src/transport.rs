//! Blocking HTTP execution behind a trait, so tests can script responses.

use qualtive_core::{
    HttpMethod, HttpRequest, HttpResponse, TransportError, TransportOutcome, REQUEST_TIMEOUT,
};

use crate::cancel::CancellationToken;

/// Performs one HTTP exchange.
///
/// Non-2xx statuses are responses, not errors: only failures that produced no
/// response at all map to [`TransportError`]. Calls block; the client runs
/// them on tokio's blocking pool.
///
/// A transport must not send `request` once `cancel` is cancelled and answers
/// [`TransportError::Cancelled`] instead.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> TransportOutcome;
}

/// Default transport backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> TransportOutcome {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(&request.url)
                } else {
                    self.agent.put(&request.url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body.unwrap_or_default();
                builder.send(&body[..])
            }
        };

        let mut response = result.map_err(|err| TransportError::Connection(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_request_is_never_sent() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/feedback/questions/rust/".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = UreqTransport::new().execute(request, &cancel);
        assert_eq!(outcome.unwrap_err(), TransportError::Cancelled);
    }
}
