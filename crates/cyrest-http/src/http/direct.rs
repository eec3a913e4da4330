use super::error::CyError;
use super::request::{HttpRequest, RequestBody, Transport};
use super::response::{DirectResponse, HttpResponse};
use async_trait::async_trait;
use log::trace;

/// Sends requests straight to the command service.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: reqwest::Client,
}

impl DirectTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn send(&self, request: &HttpRequest) -> Result<DirectResponse, CyError> {
        trace!("{} {} (direct)", request.verb, request.url);

        let mut builder = self
            .client
            .request(request.verb.to_method(), &request.url);
        if let Some(params) = &request.params {
            builder = builder.query(params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Raw(bytes)) => builder.body(bytes.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            CyError::from_transport_error(e, &format!("{} {}", request.verb, request.url))
        })?;
        DirectResponse::from_reqwest(&request.url, response).await
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<Box<dyn HttpResponse>, CyError> {
        Ok(Box::new(self.send(request).await?))
    }
}
