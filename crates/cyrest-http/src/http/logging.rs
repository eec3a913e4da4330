//! Hooks that observe every request and response the dispatcher handles.

use super::request::{HttpRequest, RequestBody};
use super::response::HttpResponse;
use log::{debug, info};

pub trait HttpLogger: Send + Sync {
    fn log_request(&self, request: &HttpRequest);
    fn log_response(&self, response: &dyn HttpResponse);
}

/// Writes a one-line summary of each call at `info`, and the parameters,
/// bodies and headers at `debug` when `include_content` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHttpLogger {
    pub include_content: bool,
}

impl LogHttpLogger {
    pub fn new(include_content: bool) -> Self {
        Self { include_content }
    }
}

impl HttpLogger for LogHttpLogger {
    fn log_request(&self, request: &HttpRequest) {
        info!("-> {} {}", request.verb, request.url);
        if !self.include_content {
            return;
        }
        if let Some(params) = &request.params {
            debug!("   params: {}", params.to_query_string());
        }
        match &request.body {
            Some(RequestBody::Json(value)) => debug!("   json: {value}"),
            Some(RequestBody::Raw(bytes)) => {
                debug!("   data: {}", String::from_utf8_lossy(bytes));
            }
            None => {}
        }
        if !request.headers.is_empty() {
            debug!("   headers: {:?}", request.headers);
        }
    }

    fn log_response(&self, response: &dyn HttpResponse) {
        info!("<- {} {}", response.status(), response.reason());
        if self.include_content && !response.text().is_empty() {
            debug!("   text: {}", response.text());
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpLogger;

impl HttpLogger for NoopHttpLogger {
    fn log_request(&self, _request: &HttpRequest) {}
    fn log_response(&self, _response: &dyn HttpResponse) {}
}
