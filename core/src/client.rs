//! Stateless HTTP request builder and response parser for the cars API.
//!
//! # Design
//! `CarsClient` holds only the two endpoint strings and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip, keeping this layer
//! deterministic and free of I/O.
//!
//! Every operation is strict-200: any other status, including 201 and 204,
//! is reported as `ResponseStatusCode`. For reads the status is checked
//! before the body, so an error page is never mistaken for bad JSON.

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::CarError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Brand, Car};

const SUCCESS_STATUS: u16 = 200;

/// Synchronous, stateless client for the cars API and the brand catalog.
///
/// Endpoint strings are validated when a request is built, so a bad URL
/// surfaces as `CarError::Url` from the operation that uses it.
#[derive(Debug, Clone)]
pub struct CarsClient {
    base_path: String,
    brands_url: String,
}

impl CarsClient {
    pub fn new(base_path: &str, brands_url: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            brands_url: brands_url.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_path, &config.brands_url)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn brands_url(&self) -> &str {
        &self.brands_url
    }

    pub fn build_list_cars(&self) -> Result<HttpRequest, CarError> {
        let url = parse_endpoint(&self.base_path)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_list_brands(&self) -> Result<HttpRequest, CarError> {
        let url = parse_endpoint(&self.brands_url)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// `POST {basePath}`. Any id already on `car` is sent as-is; the server
    /// assigns its own.
    pub fn build_create_car(&self, car: &Car) -> Result<HttpRequest, CarError> {
        let body = encode(car)?;
        let url = parse_endpoint(&self.base_path)?;
        Ok(json_request(HttpMethod::Post, url, body))
    }

    /// `PUT {basePath}/{id}`. Fails with `MissingId` before touching the URL
    /// if the car was never persisted.
    pub fn build_update_car(&self, car: &Car) -> Result<HttpRequest, CarError> {
        let url = self.car_url(car)?;
        let body = encode(car)?;
        Ok(json_request(HttpMethod::Put, url, body))
    }

    /// `DELETE {basePath}/{id}`, carrying the car as its body.
    pub fn build_delete_car(&self, car: &Car) -> Result<HttpRequest, CarError> {
        let url = self.car_url(car)?;
        let body = encode(car)?;
        Ok(json_request(HttpMethod::Delete, url, body))
    }

    pub fn parse_list_cars(&self, response: HttpResponse) -> Result<Vec<Car>, CarError> {
        decode_list(response)
    }

    pub fn parse_list_brands(&self, response: HttpResponse) -> Result<Vec<Brand>, CarError> {
        decode_list(response)
    }

    pub fn parse_create_car(&self, response: HttpResponse) -> Result<(), CarError> {
        check_status(&response)
    }

    pub fn parse_update_car(&self, response: HttpResponse) -> Result<(), CarError> {
        check_status(&response)
    }

    pub fn parse_delete_car(&self, response: HttpResponse) -> Result<(), CarError> {
        check_status(&response)
    }

    /// `{basePath}/{id}` with `id` percent-encoded as a single segment.
    fn car_url(&self, car: &Car) -> Result<Url, CarError> {
        let id = car.persisted_id().ok_or(CarError::MissingId)?;
        let mut url = parse_endpoint(&self.base_path)?;
        url.path_segments_mut()
            .map_err(|()| CarError::Url(format!("{} cannot take a path segment", self.base_path)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, CarError> {
    let url = Url::parse(endpoint).map_err(|e| CarError::Url(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CarError::Url(format!("{endpoint}: unsupported scheme {other}"))),
    }
}

fn encode(car: &Car) -> Result<String, CarError> {
    serde_json::to_string(car).map_err(|e| CarError::Serialization(e.to_string()))
}

fn json_request(method: HttpMethod, url: Url, body: String) -> HttpRequest {
    HttpRequest {
        method,
        url: url.into(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    }
}

/// Status first, then presence of a body, then shape.
fn decode_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, CarError> {
    check_status(&response)?;
    let body = response
        .body
        .filter(|body| !body.is_empty())
        .ok_or(CarError::NoData)?;
    serde_json::from_slice(&body).map_err(|e| CarError::InvalidJson(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), CarError> {
    if response.status == SUCCESS_STATUS {
        Ok(())
    } else {
        Err(CarError::ResponseStatusCode(response.status))
    }
}
