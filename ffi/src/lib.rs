//! C-ABI wrapper around `carangas-core`.
//!
//! # Overview
//! Exposes the cars and brands operations through `extern "C"` functions so
//! a native mobile host can build requests, execute them with its own HTTP
//! stack, and parse the responses without linking to an async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiCarsResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `carangas_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use carangas_core::{CarError, CarsClient, HttpRequest, HttpResponse};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CarsClient` for the given cars collection and brand
/// catalog endpoints.
///
/// Returns null if either argument is null or if an internal panic occurs.
/// Endpoints are validated when a request is built. The caller must free the
/// returned pointer with `carangas_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_client_new(
    base_path: *const c_char,
    brands_url: *const c_char,
) -> *mut FfiCarsClient {
    catch_unwind(|| {
        if base_path.is_null() || brands_url.is_null() {
            return std::ptr::null_mut();
        }
        let base_path = unsafe { read_str(base_path) };
        let brands_url = unsafe { read_str(brands_url) };
        let client = CarsClient::new(&base_path, &brands_url);
        Box::into_raw(Box::new(FfiCarsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `carangas_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_client_free(client: *mut FfiCarsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Run a builder under `catch_unwind` and report why it returned null.
///
/// `error` may be null. Otherwise it receives `Ok` alongside a request, or
/// the reason there is none: `NullArg`, `Panic`, or the `CarError` kind.
fn build_with(
    client: *const FfiCarsClient,
    error: *mut FfiErrorCode,
    build: impl FnOnce(&CarsClient) -> Result<HttpRequest, FfiErrorCode> + std::panic::UnwindSafe,
) -> *mut FfiHttpRequest {
    let built = catch_unwind(|| {
        if client.is_null() {
            return Err(FfiErrorCode::NullArg);
        }
        let client = unsafe { &*client };
        build(&client.inner).map(FfiHttpRequest::from_core)
    });
    let (request, code) = match built {
        Ok(Ok(request)) => (request, FfiErrorCode::Ok),
        Ok(Err(code)) => (std::ptr::null_mut(), code),
        Err(_) => (std::ptr::null_mut(), FfiErrorCode::Panic),
    };
    if !error.is_null() {
        unsafe { error.write(code) };
    }
    request
}

fn error_code(err: CarError) -> FfiErrorCode {
    FfiErrorCode::from(&err)
}

/// Build a `GET {basePath}` request.
///
/// Returns null if `client` is null or the endpoint is not a valid URL; the
/// reason is written to `error` when it is non-null. The caller must free
/// the returned pointer with `carangas_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_build_list_cars(
    client: *const FfiCarsClient,
    error: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    build_with(client, error, |c: &CarsClient| {
        c.build_list_cars().map_err(error_code)
    })
}

/// Build a `GET {brandsUrl}` request.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_build_list_brands(
    client: *const FfiCarsClient,
    error: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    build_with(client, error, |c: &CarsClient| {
        c.build_list_brands().map_err(error_code)
    })
}

/// Shared body of the three write builders.
fn build_write(
    client: *const FfiCarsClient,
    car: *const FfiCar,
    error: *mut FfiErrorCode,
    build: fn(&CarsClient, &carangas_core::Car) -> Result<HttpRequest, CarError>,
) -> *mut FfiHttpRequest {
    build_with(client, error, move |c: &CarsClient| {
        if car.is_null() {
            return Err(FfiErrorCode::NullArg);
        }
        let car = unsafe { (*car).to_core() }.ok_or(FfiErrorCode::NullArg)?;
        build(c, &car).map_err(error_code)
    })
}

/// Build a `POST {basePath}` request carrying `car` as JSON.
///
/// Returns null with `NullArg` if `client` or `car` is null, or if
/// `car.name` or `car.brand` is null.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_build_create_car(
    client: *const FfiCarsClient,
    car: *const FfiCar,
    error: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    build_write(client, car, error, CarsClient::build_create_car)
}

/// Build a `PUT {basePath}/{id}` request.
///
/// Returns null under the same conditions as `carangas_build_create_car`,
/// and with `MissingId` when `car.id` is null or empty.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_build_update_car(
    client: *const FfiCarsClient,
    car: *const FfiCar,
    error: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    build_write(client, car, error, CarsClient::build_update_car)
}

/// Build a `DELETE {basePath}/{id}` request. Requires `car.id`.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_build_delete_car(
    client: *const FfiCarsClient,
    car: *const FfiCar,
    error: *mut FfiErrorCode,
) -> *mut FfiHttpRequest {
    build_write(client, car, error, CarsClient::build_delete_car)
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body maps
/// to `None`; the bytes are copied without UTF-8 repair.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { read_bytes(resp.body) };
    HttpResponse::from_bytes(resp.status, body)
}

/// Null checks, conversion and panic capture shared by every parser.
fn parse_with(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
    operation: &str,
    parse: impl FnOnce(&CarsClient, HttpResponse) -> *mut FfiCarsResult + std::panic::UnwindSafe,
) -> *mut FfiCarsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCarsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCarsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        parse(&client.inner, ffi_response_to_core(resp))
    })
    .unwrap_or_else(|_| FfiCarsResult::panic(&format!("panic in carangas_parse_{operation}")))
}

fn write_result(result: Result<(), CarError>) -> *mut FfiCarsResult {
    match result {
        Ok(()) => FfiCarsResult::ok_empty(),
        Err(e) => FfiCarsResult::from_error(e),
    }
}

/// Parse the response to a list-cars request.
///
/// Returns a result with `data_tag = CarList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_parse_list_cars(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCarsResult {
    parse_with(client, response, "list_cars", |c, resp| match c.parse_list_cars(resp) {
        Ok(cars) => FfiCarsResult::ok_car_list(cars),
        Err(e) => FfiCarsResult::from_error(e),
    })
}

/// Parse the response to a list-brands request.
///
/// Returns a result with `data_tag = BrandList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_parse_list_brands(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCarsResult {
    parse_with(client, response, "list_brands", |c, resp| match c.parse_list_brands(resp) {
        Ok(brands) => FfiCarsResult::ok_brand_list(brands),
        Err(e) => FfiCarsResult::from_error(e),
    })
}

/// Parse the response to a create request. Only status 200 is a success.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_parse_create_car(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCarsResult {
    parse_with(client, response, "create_car", |c, resp| write_result(c.parse_create_car(resp)))
}

/// Parse the response to an update request. Only status 200 is a success.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_parse_update_car(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCarsResult {
    parse_with(client, response, "update_car", |c, resp| write_result(c.parse_update_car(resp)))
}

/// Parse the response to a delete request. Only status 200 is a success.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_parse_delete_car(
    client: *const FfiCarsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCarsResult {
    parse_with(client, response, "delete_car", |c, resp| write_result(c.parse_delete_car(resp)))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `carangas_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
            for h in slice_from_raw(req.headers, req.headers_len).iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiCarsResult` returned by any `carangas_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_free_result(result: *mut FfiCarsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::CarList => {
                let list = unsafe { Box::from_raw(result.data.cast::<FfiCarList>()) };
                for car in unsafe { slice_from_raw(list.items, list.len) }.iter() {
                    unsafe { car.free_fields() };
                }
            }
            FfiDataTag::BrandList => {
                let list = unsafe { Box::from_raw(result.data.cast::<FfiBrandList>()) };
                for brand in unsafe { slice_from_raw(list.items, list.len) }.iter() {
                    unsafe { brand.free_fields() };
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn carangas_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
