//! Executes plain-data requests over the network.
//!
//! # Design
//! `Transport` is the seam between the I/O-free `CarsClient` and whatever
//! actually speaks HTTP. `ReqwestTransport` is the production implementation;
//! tests and hosts with their own HTTP stack supply their own.
//!
//! Timeouts and the per-host concurrency cap are transport configuration,
//! not per-call controls. reqwest only bounds idle connections, so in-flight
//! requests are capped with one semaphore per host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs a single HTTP round-trip.
///
/// Implementations report only network-level failures as errors; any status
/// code, including 4xx and 5xx, comes back as an `HttpResponse`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// `Transport` backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_per_host: usize,
    /// One semaphore per `host:port`, created on first use and never evicted.
    /// The client only talks to its two configured endpoints, so the map
    /// stays at that size.
    host_limits: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .default_headers(header_map(&config.default_headers)?)
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self::with_client(client, config.max_connections_per_host))
    }

    /// Reuse an existing client, e.g. to share its connection pool.
    pub fn with_client(client: reqwest::Client, max_per_host: usize) -> Self {
        Self {
            client,
            max_per_host: max_per_host.max(1),
            host_limits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn host_limit(&self, url: &reqwest::Url) -> Arc<Semaphore> {
        let host = format!(
            "{}:{}",
            url.host_str().unwrap_or_default(),
            url.port_or_known_default().unwrap_or_default()
        );
        let mut limits = self
            .host_limits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        limits
            .entry(host)
            .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_host)))
            .clone()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::Request(format!("{}: {e}", request.url)))?;
        let _permit = self
            .host_limit(&url)
            .acquire_owned()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let mut builder = self.client.request(method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(bytes.to_vec())
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Request(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Request(format!("header {name}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}
