//! API client core for the Carangas cars service and the FIPE brand catalog.
//!
//! # Overview
//! Two layers:
//! - `CarsClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern). Native
//!   hosts drive it directly through the FFI crate.
//! - `CarsApi` is the async interface presentation code depends on.
//!   `RestCarsApi` implements it by pairing `CarsClient` with an injected
//!   `Transport`, by default `ReqwestTransport`.
//!
//! # Design
//! - Every failure maps to exactly one `CarError` variant; nothing panics or
//!   escapes past the client boundary.
//! - Success is strictly HTTP 200 for every operation.
//! - No global session: clients are constructed from a `ClientConfig` and
//!   passed around explicitly.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod list;
pub mod transport;
pub mod types;

pub use api::{CarsApi, RestCarsApi};
pub use client::CarsClient;
pub use config::ClientConfig;
pub use error::{CarError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::CarList;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Brand, Car, FuelType};
