//! Request dispatcher: compiles commands, routes requests by connectivity
//! mode, and turns replies into values or structured errors.

use super::config::ClientConfig;
use super::connectivity::{
    Connectivity, ConnectivityMode, EnvironmentProbe, FixedEnvironment, ReachabilityProbe,
};
use super::direct::DirectTransport;
use super::error::CyError;
use super::logging::{HttpLogger, LogHttpLogger};
use super::relay::RelayBridge;
use super::request::{HttpRequest, Transport, Verb};
use super::response::{HttpResponse, Payload};
use async_trait::async_trait;
use cyrest::{Parameters, command_to_get_query, command_to_post_query};
use log::error;
use serde_json::Value;
use std::sync::Arc;

/// Client for one command service.
///
/// Clones share the connectivity mode, so a mode resolved (or reset) through
/// one clone applies to all of them.
#[derive(Clone)]
pub struct CyRestClient {
    config: ClientConfig,
    direct: DirectTransport,
    relay: RelayBridge,
    connectivity: Arc<Connectivity>,
    environment: Arc<dyn EnvironmentProbe>,
    logger: Arc<dyn HttpLogger>,
}

impl CyRestClient {
    /// A client that assumes a non-interactive environment, i.e. always
    /// talks to the service directly until told otherwise.
    pub fn new(config: ClientConfig) -> Result<Self, CyError> {
        let http = config
            .build_http_client()
            .map_err(|e| CyError::from_transport_error(e, "build HTTP client"))?;

        Ok(Self {
            direct: DirectTransport::new(http.clone()),
            relay: RelayBridge::new(http, config.relay_url.clone(), config.channel),
            connectivity: Arc::new(Connectivity::new()),
            environment: Arc::new(FixedEnvironment(false)),
            logger: Arc::new(LogHttpLogger::new(config.log_content)),
            config,
        })
    }

    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentProbe>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn HttpLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn relay(&self) -> &RelayBridge {
        &self.relay
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub async fn resolve_connectivity(&self) -> ConnectivityMode {
        let probe = ServiceProbe {
            base_url: self.config.base_url.clone(),
            direct: self.direct.clone(),
            relay: self.relay.clone(),
        };
        self.connectivity
            .resolve(self.environment.as_ref(), &probe)
            .await
    }

    pub fn reset_connectivity(&self) {
        self.connectivity.reset();
    }

    /// `<base_url>/<operation>`, each path segment of `operation` percent-encoded.
    pub fn build_url(&self, operation: &str) -> String {
        let operation = operation.trim_start_matches('/');
        if operation.is_empty() {
            return self.config.base_url.clone();
        }
        let segments: Vec<String> = operation
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.config.base_url, segments.join("/"))
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Send `request` on the resolved route. The reply is returned whatever
    /// its status; both halves go through the logging hook.
    #[tracing::instrument(level = "debug", skip(self, request), fields(verb = %request.verb, url = %request.url))]
    pub async fn execute(&self, request: &HttpRequest) -> Result<Box<dyn HttpResponse>, CyError> {
        self.logger.log_request(request);

        let response = match self.resolve_connectivity().await {
            ConnectivityMode::Relayed => self.relay.execute(request).await,
            ConnectivityMode::Unreachable => Err(CyError::Unreachable {
                url: request.url.clone(),
            }),
            ConnectivityMode::Direct | ConnectivityMode::Unknown => {
                self.direct.execute(request).await
            }
        }
        .inspect_err(|e| error!("{} {} failed: {e}", request.verb, request.url))?;

        self.logger.log_response(response.as_ref());
        Ok(response)
    }

    /// Send `request` and normalize the reply.
    ///
    /// A non-2xx reply becomes [`CyError::Service`]. A 2xx reply that is not
    /// JSON is an error when `require_json` is set, and raw text otherwise.
    pub async fn request(&self, request: HttpRequest, require_json: bool) -> Result<Payload, CyError> {
        let response = self.execute(&request).await?;
        if !response.is_success() {
            return Err(service_error(&request, response.as_ref()));
        }

        match response.payload() {
            Payload::Text(text) if require_json => {
                let reason = response
                    .json()
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                Err(CyError::InvalidJson {
                    url: request.url,
                    reason,
                    text,
                })
            }
            payload => Ok(payload),
        }
    }

    // =========================================================================
    // REST ENDPOINTS
    // =========================================================================

    pub async fn cyrest_get(
        &self,
        operation: &str,
        params: Option<Parameters>,
        require_json: bool,
    ) -> Result<Payload, CyError> {
        let request = HttpRequest::get(self.build_url(operation)).with_params(params);
        self.request(request, require_json).await
    }

    pub async fn cyrest_post(
        &self,
        operation: &str,
        params: Option<Parameters>,
        body: Option<Value>,
        require_json: bool,
    ) -> Result<Payload, CyError> {
        let request = self.rest_request(Verb::Post, operation, params, body);
        self.request(request, require_json).await
    }

    pub async fn cyrest_put(
        &self,
        operation: &str,
        params: Option<Parameters>,
        body: Option<Value>,
        require_json: bool,
    ) -> Result<Payload, CyError> {
        let request = self.rest_request(Verb::Put, operation, params, body);
        self.request(request, require_json).await
    }

    pub async fn cyrest_delete(
        &self,
        operation: &str,
        params: Option<Parameters>,
        require_json: bool,
    ) -> Result<Payload, CyError> {
        let request = self.rest_request(Verb::Delete, operation, params, None);
        self.request(request, require_json).await
    }

    fn rest_request(
        &self,
        verb: Verb,
        operation: &str,
        params: Option<Parameters>,
        body: Option<Value>,
    ) -> HttpRequest {
        let request = HttpRequest::new(verb, self.build_url(operation)).with_params(params);
        match body {
            Some(body) => request.with_json(body),
            None => request,
        }
    }

    // =========================================================================
    // COMMAND ENDPOINTS
    // =========================================================================

    /// Run a command through the JSON command endpoint and return its `data`.
    pub async fn commands_post(&self, cmd: &str) -> Result<Value, CyError> {
        let query = command_to_post_query(&self.config.base_url, cmd)?;
        let request = HttpRequest::from_post_query(query);
        let response = self.execute(&request).await?;

        let envelope = response.json().ok();
        if let Some(message) = envelope.as_ref().and_then(first_error_message) {
            let err = CyError::CommandFailed {
                url: request.url.clone(),
                message,
            };
            error!("{} {} failed: {err}", request.verb, request.url);
            return Err(err);
        }
        if !response.is_success() {
            return Err(service_error(&request, response.as_ref()));
        }

        match envelope {
            Some(mut envelope) => Ok(envelope
                .get_mut("data")
                .map(Value::take)
                .unwrap_or(Value::Null)),
            None => Err(CyError::InvalidJson {
                url: request.url,
                reason: "command reply is not a JSON envelope".to_string(),
                text: response.text().to_string(),
            }),
        }
    }

    /// Run a command through the plain-text endpoint; one entry per reply
    /// line, without the trailing `Finished` marker.
    pub async fn commands_get(&self, cmd: &str) -> Result<Vec<String>, CyError> {
        let text = self.command_text(cmd).await?;
        Ok(reply_lines(&text)
            .filter(|line| *line != "Finished")
            .map(str::to_string)
            .collect())
    }

    /// List the commands (or a command's arguments) below `cmd`, without the
    /// header line of the reply.
    pub async fn commands_help(&self, cmd: &str) -> Result<Vec<String>, CyError> {
        let cmd = cmd.trim();
        let cmd = if cmd == "help" || cmd.starts_with("help ") {
            cmd.to_string()
        } else {
            format!("help {cmd}").trim_end().to_string()
        };

        let text = self.command_text(&cmd).await?;
        Ok(reply_lines(&text).skip(1).map(str::to_string).collect())
    }

    async fn command_text(&self, cmd: &str) -> Result<String, CyError> {
        let request = HttpRequest::from(command_to_get_query(&self.config.base_url, cmd)?);
        let response = self.execute(&request).await?;
        if !response.is_success() {
            return Err(service_error(&request, response.as_ref()));
        }
        Ok(response.text().to_string())
    }
}

fn service_error(request: &HttpRequest, response: &dyn HttpResponse) -> CyError {
    let body = (!response.text().is_empty()).then(|| response.payload());
    let err = CyError::Service {
        verb: request.verb,
        url: request.url.clone(),
        status: response.status(),
        reason: response.reason().to_string(),
        body,
    };
    error!("{err}");
    err
}

fn first_error_message(envelope: &Value) -> Option<String> {
    let first = envelope.get("errors")?.as_array()?.first()?;
    let message = match first.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => first.to_string(),
    };
    Some(message)
}

fn reply_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Probes the service root, first directly and then through the relay.
struct ServiceProbe {
    base_url: String,
    direct: DirectTransport,
    relay: RelayBridge,
}

impl ServiceProbe {
    fn request(&self) -> HttpRequest {
        HttpRequest::get(&self.base_url).with_header("Content-Type", "application/json")
    }
}

#[async_trait]
impl ReachabilityProbe for ServiceProbe {
    async fn direct_reachable(&self) -> bool {
        matches!(self.direct.send(&self.request()).await, Ok(response) if response.status() == 200)
    }

    async fn relay_reachable(&self) -> bool {
        self.relay.send(&self.request()).await.is_ok()
    }
}
