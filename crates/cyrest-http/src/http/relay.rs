//! Store-and-forward relay for command services that are not directly reachable.
//!
//! A request is queued on the relay under a channel id, and the reply is polled
//! from the same channel. The relay and whoever executes the queued request on
//! the far side share nothing but the channel number: there is no request id,
//! so a channel carries at most one in-flight request. Driving one channel from
//! several callers at once is unsupported; give each caller its own channel.

use super::error::{CyError, RelayError};
use super::request::{HttpRequest, RequestBody, Transport, Verb};
use super::response::{HttpResponse, RelayedResponse};
use async_trait::async_trait;
use chardetng::EncodingDetector;
use cyrest::Parameters;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reply status meaning the far side could not reach the command service.
pub const UNREACHABLE_STATUS: u16 = 0;

/// Transport-agnostic snapshot of one request, as queued on the relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayEnvelope {
    pub command: Verb,
    pub url: String,
    pub params: Option<Parameters>,
    pub data: Option<Value>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl RelayEnvelope {
    pub fn from_request(request: &HttpRequest) -> Self {
        let data = request.body.as_ref().map(|body| match body {
            RequestBody::Json(value) => value.clone(),
            RequestBody::Raw(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        });
        let headers = (!request.headers.is_empty()).then(|| request.headers.clone());

        Self {
            command: request.verb,
            url: request.url.clone(),
            params: request.params.clone(),
            data,
            headers,
        }
    }
}

/// The command service's reply, as dequeued from the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayReply {
    pub status: u16,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RelayBridge {
    client: reqwest::Client,
    relay_url: String,
    channel: u32,
}

impl RelayBridge {
    pub fn new(client: reqwest::Client, relay_url: impl Into<String>, channel: u32) -> Self {
        Self {
            client,
            relay_url: relay_url.into().trim_end_matches('/').to_string(),
            channel,
        }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn enqueue_url(&self) -> String {
        format!("{}/queue_request?channel={}", self.relay_url, self.channel)
    }

    pub fn dequeue_url(&self) -> String {
        format!("{}/dequeue_reply?channel={}", self.relay_url, self.channel)
    }

    /// Queue `request` on the relay and wait for its reply.
    ///
    /// The dequeue poll has no deadline of its own; bound it with the client
    /// timeout or an outer `tokio::time::timeout`.
    #[tracing::instrument(level = "debug", skip(self, request), fields(verb = %request.verb, url = %request.url, channel = self.channel))]
    pub async fn send(&self, request: &HttpRequest) -> Result<RelayedResponse, CyError> {
        let envelope = RelayEnvelope::from_request(request);

        let response = self
            .client
            .post(self.enqueue_url())
            .json(&envelope)
            .send()
            .await
            .map_err(|e| CyError::from_transport_error(e, "relay enqueue"))?;
        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let text = read_error_body(response).await;
            return Err(RelayError::Enqueue { status, text }.into());
        }

        let response = self
            .client
            .get(self.dequeue_url())
            .send()
            .await
            .map_err(|e| CyError::from_transport_error(e, "relay dequeue"))?;
        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let text = read_error_body(response).await;
            return Err(RelayError::Dequeue { status, text }.into());
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| CyError::from_transport_error(e, "relay dequeue body"))?;
        let reply = decode_reply(&content)?;
        debug!("relay channel {} replied {}", self.channel, reply.status);

        reply_to_response(&request.url, self.channel, reply)
    }
}

#[async_trait]
impl Transport for RelayBridge {
    async fn execute(&self, request: &HttpRequest) -> Result<Box<dyn HttpResponse>, CyError> {
        Ok(Box::new(self.send(request).await?))
    }
}

async fn read_error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

pub(crate) fn reply_to_response(
    url: &str,
    channel: u32,
    reply: RelayReply,
) -> Result<RelayedResponse, CyError> {
    if reply.status == UNREACHABLE_STATUS {
        return Err(CyError::Unreachable {
            url: url.to_string(),
        });
    }
    Ok(RelayedResponse::from_reply(url, channel, reply))
}

/// Decode a dequeued reply body.
///
/// The relay's transport has been seen to lose or mangle the tail of a
/// message, so only the leading JSON value is parsed and padding or garbage
/// after it is ignored. The valid UTF-8 prefix is tried first; the encoding is
/// guessed from the bytes only when that prefix holds no reply.
pub fn decode_reply(content: &[u8]) -> Result<RelayReply, RelayError> {
    if let Some(reply) = parse_leading_reply(utf8_prefix(content)) {
        return Ok(reply);
    }

    let detected = detect_encoding(content);
    let mut candidates: Vec<&'static Encoding> = vec![detected];
    if detected != UTF_8 {
        candidates.push(UTF_8);
    }

    for encoding in candidates {
        let (text, _, had_errors) = encoding.decode(content);
        if had_errors {
            debug!("relay reply had malformed {} sequences", encoding.name());
        }
        if let Some(reply) = parse_leading_reply(&text) {
            return Ok(reply);
        }
    }

    warn!("undecipherable relay reply ({} bytes)", content.len());
    Err(RelayError::Undecipherable {
        payload: String::from_utf8_lossy(content).into_owned(),
    })
}

fn utf8_prefix(content: &[u8]) -> &str {
    match std::str::from_utf8(content) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&content[..e.valid_up_to()]).unwrap_or_default(),
    }
}

fn detect_encoding(content: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(content, true);
    detector.guess(None, true)
}

fn parse_leading_reply(text: &str) -> Option<RelayReply> {
    let text = text.trim_start_matches('\u{feff}');
    serde_json::Deserializer::from_str(text)
        .into_iter::<RelayReply>()
        .next()?
        .ok()
}
