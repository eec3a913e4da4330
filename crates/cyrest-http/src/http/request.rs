use super::error::CyError;
use super::response::HttpResponse;
use async_trait::async_trait;
use cyrest::{GetQuery, Parameters, PostQuery};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    pub fn to_method(self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized by the transport, sent as `application/json`.
    Json(Value),
    /// Pre-encoded bytes, e.g. a compiled command body.
    Raw(Vec<u8>),
}

/// One request to the command service, independent of how it travels.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub verb: Verb,
    pub url: String,
    pub params: Option<Parameters>,
    pub body: Option<RequestBody>,
    pub headers: BTreeMap<String, String>,
}

impl HttpRequest {
    pub fn new(verb: Verb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            params: None,
            body: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Verb::Get, url)
    }

    pub fn with_params(mut self, params: Option<Parameters>) -> Self {
        self.params = params;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_raw_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Raw(body));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Compiled POST command: raw JSON body, JSON content negotiation both ways.
    pub fn from_post_query(query: PostQuery) -> Self {
        Self::new(Verb::Post, query.url)
            .with_raw_body(query.body)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
    }
}

impl From<GetQuery> for HttpRequest {
    fn from(query: GetQuery) -> Self {
        Self::get(query.url).with_params(query.params)
    }
}

/// A path by which a request reaches the command service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<Box<dyn HttpResponse>, CyError>;
}
