//! Async cars API: one interface, one implementation.
//!
//! # Design
//! Presentation code depends on `CarsApi` only. `RestCarsApi` composes the
//! I/O-free `CarsClient` with an injected `Transport`: build, execute once,
//! parse. There are no retries and no state between calls, so each future
//! resolves to exactly one outcome.

use async_trait::async_trait;

use crate::client::CarsClient;
use crate::config::ClientConfig;
use crate::error::{CarError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Brand, Car};

#[async_trait]
pub trait CarsApi: Send + Sync {
    /// All cars, in server order. An empty list is a success.
    async fn list_cars(&self) -> Result<Vec<Car>, CarError>;

    async fn list_brands(&self) -> Result<Vec<Brand>, CarError>;

    /// Succeeds only on HTTP 200.
    async fn create(&self, car: &Car) -> Result<(), CarError>;

    /// Requires `car.id`; succeeds only on HTTP 200.
    async fn update(&self, car: &Car) -> Result<(), CarError>;

    /// Requires `car.id`; succeeds only on HTTP 200.
    async fn delete(&self, car: &Car) -> Result<(), CarError>;
}

/// `CarsApi` over HTTP.
#[derive(Debug, Clone)]
pub struct RestCarsApi<T> {
    client: CarsClient,
    transport: T,
}

impl<T: Transport> RestCarsApi<T> {
    pub fn new(client: CarsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CarsClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CarError> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, "sending request");
        let response = self.transport.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "transport failed");
            CarError::from(e)
        })?;
        tracing::debug!(%method, %url, status = response.status, "response received");
        Ok(response)
    }
}

impl RestCarsApi<ReqwestTransport> {
    /// Client and reqwest transport both built from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(
            CarsClient::from_config(config),
            ReqwestTransport::new(config)?,
        ))
    }
}

#[async_trait]
impl<T: Transport> CarsApi for RestCarsApi<T> {
    async fn list_cars(&self) -> Result<Vec<Car>, CarError> {
        let result = async {
            let request = self.client.build_list_cars()?;
            let response = self.send(request).await?;
            self.client.parse_list_cars(response)
        }
        .await;
        log_outcome("list_cars", result)
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, CarError> {
        let result = async {
            let request = self.client.build_list_brands()?;
            let response = self.send(request).await?;
            self.client.parse_list_brands(response)
        }
        .await;
        log_outcome("list_brands", result)
    }

    async fn create(&self, car: &Car) -> Result<(), CarError> {
        let result = async {
            let request = self.client.build_create_car(car)?;
            let response = self.send(request).await?;
            self.client.parse_create_car(response)
        }
        .await;
        log_outcome("create", result)
    }

    async fn update(&self, car: &Car) -> Result<(), CarError> {
        let result = async {
            let request = self.client.build_update_car(car)?;
            let response = self.send(request).await?;
            self.client.parse_update_car(response)
        }
        .await;
        log_outcome("update", result)
    }

    async fn delete(&self, car: &Car) -> Result<(), CarError> {
        let result = async {
            let request = self.client.build_delete_car(car)?;
            let response = self.send(request).await?;
            self.client.parse_delete_car(response)
        }
        .await;
        log_outcome("delete", result)
    }
}

fn log_outcome<R>(operation: &'static str, result: Result<R, CarError>) -> Result<R, CarError> {
    if let Err(err) = &result {
        tracing::warn!(operation, kind = err.kind(), error = %err, "cars operation failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned outcomes and records every request it was handed.
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn replying(outcomes: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request")
        }
    }

    fn api(outcomes: Vec<Result<HttpResponse, TransportError>>) -> RestCarsApi<ScriptedTransport> {
        RestCarsApi::new(
            CarsClient::new("http://cars.test/cars", "http://fipe.test/marcas.json"),
            ScriptedTransport::replying(outcomes),
        )
    }

    fn ok(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(status, Some(body.to_string())))
    }

    fn saved(id: &str) -> Car {
        Car {
            id: Some(id.to_string()),
            ..Car::new("Fusca", "VW")
        }
    }

    #[tokio::test]
    async fn list_cars_decodes_response() {
        let api = api(vec![ok(200, r#"[{"_id":"1","name":"Fusca","brand":"VW"}]"#)]);
        let cars = api.list_cars().await.unwrap();
        assert_eq!(cars, vec![saved("1")]);

        let seen = api.transport.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "http://cars.test/cars");
    }

    #[tokio::test]
    async fn list_cars_maps_failures() {
        let api = api(vec![
            Err(TransportError::Timeout),
            Ok(HttpResponse::new(200, None)),
            ok(200, "<html>"),
            ok(500, "[]"),
        ]);
        assert_eq!(
            api.list_cars().await.unwrap_err(),
            CarError::TaskError(TransportError::Timeout)
        );
        assert_eq!(api.list_cars().await.unwrap_err(), CarError::NoData);
        assert!(matches!(api.list_cars().await.unwrap_err(), CarError::InvalidJson(_)));
        assert_eq!(api.list_cars().await.unwrap_err(), CarError::ResponseStatusCode(500));
    }

    #[tokio::test]
    async fn list_brands_hits_catalog() {
        let api = api(vec![ok(200, r#"[{"id":21,"fipe_name":"Fiat"}]"#)]);
        let brands = api.list_brands().await.unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].name, "Fiat");
        assert_eq!(api.transport.seen()[0].url, "http://fipe.test/marcas.json");
    }

    #[tokio::test]
    async fn create_rejects_201() {
        let api = api(vec![ok(201, r#"{"_id":"9","name":"Gol","brand":"VW"}"#)]);
        let err = api.create(&Car::new("Gol", "VW")).await.unwrap_err();
        assert_eq!(err, CarError::ResponseStatusCode(201));
        assert_eq!(api.transport.seen()[0].method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn writes_succeed_on_200() {
        let api = api(vec![ok(200, "{}"), ok(200, "{}"), ok(200, "")]);
        api.create(&Car::new("Gol", "VW")).await.unwrap();
        api.update(&saved("1")).await.unwrap();
        api.delete(&saved("1")).await.unwrap();

        let methods: Vec<_> = api.transport.seen().iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete]);
    }

    #[tokio::test]
    async fn update_without_id_sends_nothing() {
        let api = api(Vec::new());
        assert_eq!(
            api.update(&Car::new("Gol", "VW")).await.unwrap_err(),
            CarError::MissingId
        );
        assert_eq!(
            api.delete(&Car::new("Gol", "VW")).await.unwrap_err(),
            CarError::MissingId
        );
        assert!(api.transport.seen().is_empty());
    }

    #[tokio::test]
    async fn delete_transport_error_is_failure() {
        let api = api(vec![Err(TransportError::Connect("refused".to_string()))]);
        let err = api.delete(&saved("1")).await.unwrap_err();
        assert!(matches!(err, CarError::TaskError(TransportError::Connect(_))));
    }

    #[tokio::test]
    async fn bad_endpoint_sends_nothing() {
        let api = RestCarsApi::new(
            CarsClient::new("not a url", "http://fipe.test/marcas.json"),
            ScriptedTransport::default(),
        );
        assert!(matches!(api.list_cars().await.unwrap_err(), CarError::Url(_)));
        assert!(api.transport.seen().is_empty());
    }
}
