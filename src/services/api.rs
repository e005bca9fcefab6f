//! HTTP client for the table metadata backend
//!
//! Every request carries JSON headers. Any non-2xx status is a uniform
//! failure, whatever the body says.

use crate::model::{SampleRow, TableInfo};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, DNS, refused connection, timeout
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    /// A response arrived with a status outside the success range
    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("request worker stopped before replying")]
    WorkerPanicked,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Path of a backend resource, kept as raw segments until the URL is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    /// `/tables`
    pub fn tables() -> Self {
        Self {
            segments: vec!["tables".to_string()],
        }
    }

    /// `/tables/{table}`
    pub fn table(table_name: &str) -> Self {
        let mut endpoint = Self::tables();
        endpoint.segments.push(table_name.to_string());
        endpoint
    }

    /// `/tables/{table}/sample`
    pub fn sample(table_name: &str) -> Self {
        let mut endpoint = Self::table(table_name);
        endpoint.segments.push("sample".to_string());
        endpoint
    }

    /// `/tables/{table}/{attribute}`
    pub fn attribute(table_name: &str, attribute_name: &str) -> Self {
        let mut endpoint = Self::table(table_name);
        endpoint.segments.push(attribute_name.to_string());
        endpoint
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Per-call options merged over the defaults
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    /// Extra headers. `Content-Type` is always `application/json`.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl CallOptions {
    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Default::default()
        }
    }
}

/// The four backend operations the UI needs
pub trait TableApi: Send + Sync {
    fn list_tables(&self) -> Result<Vec<String>, ApiError>;
    fn table_info(&self, table_name: &str) -> Result<TableInfo, ApiError>;
    fn sample_rows(&self, table_name: &str) -> Result<Vec<SampleRow>, ApiError>;
    fn set_attribute_memo(
        &self,
        table_name: &str,
        attribute_name: &str,
        description: &str,
    ) -> Result<(), ApiError>;
}

/// Blocking HTTP client bound to one base URL
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    /// Build a client. `timeout` of `None` keeps the transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Transport)?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint against the base URL, percent-encoding each segment
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(endpoint.segments());
        }
        Ok(url)
    }

    /// Issue a request and decode the response body as JSON
    ///
    /// An empty success body decodes to `Value::Null`.
    pub fn call(&self, endpoint: &Endpoint, options: CallOptions) -> Result<Value, ApiError> {
        let body = self.send(endpoint, &options)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn send(&self, endpoint: &Endpoint, options: &CallOptions) -> Result<String, ApiError> {
        let url = self.url_for(endpoint)?;
        debug!(method = %options.method, %url, "sending request");

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(build_headers(&options.headers)?);
        if let Some(ref body) = options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().map_err(ApiError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response.text().map_err(ApiError::Transport)
    }
}

impl TableApi for ApiClient {
    fn list_tables(&self) -> Result<Vec<String>, ApiError> {
        let value = self.call(&Endpoint::tables(), CallOptions::default())?;
        Ok(serde_json::from_value(value)?)
    }

    fn table_info(&self, table_name: &str) -> Result<TableInfo, ApiError> {
        let value = self.call(&Endpoint::table(table_name), CallOptions::default())?;
        Ok(serde_json::from_value(value)?)
    }

    fn sample_rows(&self, table_name: &str) -> Result<Vec<SampleRow>, ApiError> {
        let value = self.call(&Endpoint::sample(table_name), CallOptions::default())?;
        Ok(serde_json::from_value(value)?)
    }

    fn set_attribute_memo(
        &self,
        table_name: &str,
        attribute_name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let endpoint = Endpoint::attribute(table_name, attribute_name);
        // Response body is not used
        self.send(&endpoint, &CallOptions::put(json!({ "description": description })))?;
        Ok(())
    }
}

/// Parse and check a base URL (must be http or https)
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ApiError::InvalidUrl(format!(
            "{}: expected an http or https URL",
            raw
        ))),
    }
}

fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        if name == CONTENT_TYPE {
            continue;
        }
        let value =
            HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
