//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices handed out as pointer plus
//! length, and tagged enums with explicit discriminants. Optional numeric
//! fields travel as a `has_*` flag next to the value. Conversion functions
//! live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use carangas_core::{Brand, Car, CarError, CarsClient, HttpMethod, HttpRequest};

/// Opaque handle to a `CarsClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCarsClient {
    pub(crate) inner: CarsClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `carangas_build_*` functions. The C caller executes the request
/// and passes the response back through `carangas_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// Null when the request has no body.
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = slice_into_raw(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `carangas_parse_*` function. A null `body`
/// means the response carried no data. The body bytes are passed on as
/// received, so a payload that is not UTF-8 fails to decode as JSON. The FFI
/// layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A car exposed to C, used both as build input and in parse results.
///
/// `id` is null for a car the server has not assigned an id to.
#[repr(C)]
pub struct FfiCar {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub brand: *mut c_char,
    pub has_gas_type: bool,
    pub gas_type: i32,
    pub has_price: bool,
    pub price: f64,
}

impl FfiCar {
    fn from_core(car: Car) -> Self {
        FfiCar {
            id: car.id.map_or(std::ptr::null_mut(), c_string),
            name: c_string(car.name),
            brand: c_string(car.brand),
            has_gas_type: car.gas_type.is_some(),
            gas_type: car.gas_type.unwrap_or_default(),
            has_price: car.price.is_some(),
            price: car.price.unwrap_or_default(),
        }
    }

    /// Read a caller-owned `FfiCar`. Returns `None` if `name` or `brand` is
    /// null.
    ///
    /// # Safety
    /// Every non-null string pointer must point to a valid NUL-terminated
    /// C string.
    pub(crate) unsafe fn to_core(&self) -> Option<Car> {
        if self.name.is_null() || self.brand.is_null() {
            return None;
        }
        Some(Car {
            id: read_optional(self.id),
            name: read_str(self.name),
            brand: read_str(self.brand),
            gas_type: self.has_gas_type.then_some(self.gas_type),
            price: self.has_price.then_some(self.price),
        })
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) unsafe fn free_fields(&self) {
        free_c_string(self.id);
        free_c_string(self.name);
        free_c_string(self.brand);
    }
}

/// A list of cars exposed to C.
#[repr(C)]
pub struct FfiCarList {
    pub items: *mut FfiCar,
    pub len: u32,
}

/// A catalog brand exposed to C. `key` is null when the catalog omits it.
#[repr(C)]
pub struct FfiBrand {
    pub id: u64,
    pub name: *mut c_char,
    pub key: *mut c_char,
}

impl FfiBrand {
    fn from_core(brand: Brand) -> Self {
        FfiBrand {
            id: brand.id,
            name: c_string(brand.name),
            key: brand.key.map_or(std::ptr::null_mut(), c_string),
        }
    }

    pub(crate) unsafe fn free_fields(&self) {
        free_c_string(self.name);
        free_c_string(self.key);
    }
}

/// A list of brands exposed to C.
#[repr(C)]
pub struct FfiBrandList {
    pub items: *mut FfiBrand,
    pub len: u32,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCarsResult` and through the `error` out
/// parameter of the builders. One per `CarError` variant plus the boundary's
/// own failures.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Url = 1,
    TaskError = 2,
    NoResponse = 3,
    NoData = 4,
    ResponseStatusCode = 5,
    InvalidJson = 6,
    MissingId = 7,
    Serialization = 8,
    Panic = 9,
    NullArg = 10,
}

impl From<&CarError> for FfiErrorCode {
    fn from(err: &CarError) -> Self {
        match err {
            CarError::Url(_) => FfiErrorCode::Url,
            CarError::TaskError(_) => FfiErrorCode::TaskError,
            CarError::NoResponse => FfiErrorCode::NoResponse,
            CarError::NoData => FfiErrorCode::NoData,
            CarError::ResponseStatusCode(_) => FfiErrorCode::ResponseStatusCode,
            CarError::InvalidJson(_) => FfiErrorCode::InvalidJson,
            CarError::MissingId => FfiErrorCode::MissingId,
            CarError::Serialization(_) => FfiErrorCode::Serialization,
        }
    }
}

/// Tag that tells `carangas_free_result` what `FfiCarsResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    CarList = 1,
    BrandList = 2,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`); writes carry no
/// payload. On failure `error_code` names the `CarError` kind,
/// `error_message` is a human-readable C string, `http_status` holds the
/// observed status for `ResponseStatusCode`, and `data` is null.
#[repr(C)]
pub struct FfiCarsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiCarsResult {
    pub(crate) fn ok_car_list(cars: Vec<Car>) -> *mut Self {
        let (items, len) = slice_into_raw(cars.into_iter().map(FfiCar::from_core).collect());
        let list = Box::new(FfiCarList { items, len });
        Self::ok(FfiDataTag::CarList, Box::into_raw(list).cast())
    }

    pub(crate) fn ok_brand_list(brands: Vec<Brand>) -> *mut Self {
        let (items, len) = slice_into_raw(brands.into_iter().map(FfiBrand::from_core).collect());
        let list = Box::new(FfiBrandList { items, len });
        Self::ok(FfiDataTag::BrandList, Box::into_raw(list).cast())
    }

    /// Build a success result with no data payload (create, update, delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiCarsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    /// Build an error result from a `CarError`.
    pub(crate) fn from_error(err: CarError) -> *mut Self {
        let http_status = match err {
            CarError::ResponseStatusCode(status) => status,
            _ => 0,
        };
        Self::failure(FfiErrorCode::from(&err), http_status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiCarsResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hand a string to C. Interior NULs cannot occur in URLs or serde_json
/// output; anything else that has one becomes the empty string.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Read a caller-owned C string, replacing invalid UTF-8.
///
/// # Safety
/// `s` must be non-null and NUL-terminated.
pub(crate) unsafe fn read_str(s: *const c_char) -> String {
    CStr::from_ptr(s).to_string_lossy().into_owned()
}

pub(crate) unsafe fn read_optional(s: *const c_char) -> Option<String> {
    if s.is_null() {
        None
    } else {
        Some(read_str(s))
    }
}

/// Copy a caller-owned C string byte for byte. Null maps to `None`.
///
/// # Safety
/// `s` must be null or NUL-terminated.
pub(crate) unsafe fn read_bytes(s: *const c_char) -> Option<Vec<u8>> {
    if s.is_null() {
        None
    } else {
        Some(CStr::from_ptr(s).to_bytes().to_vec())
    }
}

/// Leak `items` as a boxed slice. An empty list is handed out as null.
pub(crate) fn slice_into_raw<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    (Box::into_raw(items.into_boxed_slice()).cast(), len)
}

/// Reclaim a slice leaked by `slice_into_raw`.
pub(crate) unsafe fn slice_from_raw<T>(items: *mut T, len: u32) -> Box<[T]> {
    if items.is_null() || len == 0 {
        return Box::new([]);
    }
    Box::from_raw(std::ptr::slice_from_raw_parts_mut(items, len as usize))
}
