//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `CarsClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network;
//! whoever executes the round-trip (a `Transport`, the C host, a test) sits
//! in between.
//!
//! All fields use owned types so values cross the FFI boundary and
//! `.await` points without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already validated by the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// `body` holds the payload exactly as received. It is `None` when the
/// response carried no payload; transports map an empty payload to `None` as
/// well. Bytes that are not UTF-8 are left for the JSON decoder to reject.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// A response with the given status and text body and no headers.
    pub fn new(status: u16, body: Option<String>) -> Self {
        Self::from_bytes(status, body.map(String::into_bytes))
    }

    /// A response with the given status and raw body and no headers.
    pub fn from_bytes(status: u16, body: Option<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }
}
