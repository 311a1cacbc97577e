//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer plus length instead of
//! `Vec`, and enums with explicit discriminants. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use nanoman_core::{DispatchError, Exchange, HeaderMap, StatusClass};

/// Opaque handle to a `Dispatcher`. C callers receive a pointer to this and
/// pass it back into `nanoman_send`.
pub struct FfiDispatcher {
    pub(crate) inner: nanoman_core::Dispatcher,
}

/// Heap-allocate `s` as a C string. Interior NUL bytes are dropped.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    let cleaned = if s.contains('\0') {
        s.replace('\0', "")
    } else {
        s.to_string()
    };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// A single header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An owned array of headers.
#[repr(C)]
pub struct FfiHeaderList {
    pub items: *mut FfiHeader,
    pub len: u32,
}

/// Move `headers` into a heap array. Returns `(null, 0)` when empty.
pub(crate) fn headers_into_raw(headers: HeaderMap) -> (*mut FfiHeader, u32) {
    if headers.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let items: Vec<FfiHeader> = headers
        .into_iter()
        .map(|(k, v)| FfiHeader {
            key: to_c_string(&k),
            value: to_c_string(&v),
        })
        .collect();
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Free an array produced by `headers_into_raw`, including every string.
/// `items` and `len` must come from `headers_into_raw`.
pub(crate) fn free_headers(items: *mut FfiHeader, len: u32) {
    if items.is_null() || len == 0 {
        return;
    }
    let slice = std::ptr::slice_from_raw_parts_mut(items, len as usize);
    let headers = unsafe { Box::from_raw(slice) };
    for h in headers.iter() {
        if !h.key.is_null() {
            drop(unsafe { CString::from_raw(h.key) });
        }
        if !h.value.is_null() {
            drop(unsafe { CString::from_raw(h.value) });
        }
    }
}

impl FfiHeaderList {
    pub(crate) fn from_core(headers: HeaderMap) -> *mut Self {
        let (items, len) = headers_into_raw(headers);
        Box::into_raw(Box::new(FfiHeaderList { items, len }))
    }
}

// ---------------------------------------------------------------------------
// Send result
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiSendResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    InvalidJson = 2,
    Timeout = 3,
    Connection = 4,
    Transport = 5,
    Panic = 6,
    NullArg = 7,
}

/// Status-line colour bucket.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatusClass {
    Success = 0,
    Warning = 1,
    Danger = 2,
}

impl From<StatusClass> for FfiStatusClass {
    fn from(c: StatusClass) -> Self {
        match c {
            StatusClass::Success => FfiStatusClass::Success,
            StatusClass::Warning => FfiStatusClass::Warning,
            StatusClass::Danger => FfiStatusClass::Danger,
        }
    }
}

/// Result envelope for `nanoman_send`.
///
/// On success `error_code` is `Ok`, `error_message` is null and the response
/// fields are filled in. On failure `error_code` describes the category,
/// `error_message` is the display text and every response pointer is null.
#[repr(C)]
pub struct FfiSendResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub status: u16,
    pub status_class: FfiStatusClass,
    pub reason: *mut c_char,
    pub elapsed_seconds: f64,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub is_json: bool,
}

impl FfiSendResult {
    fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiSendResult {
            error_code,
            error_message: to_c_string(msg),
            status: 0,
            status_class: FfiStatusClass::Danger,
            reason: std::ptr::null_mut(),
            elapsed_seconds: 0.0,
            headers: std::ptr::null_mut(),
            headers_len: 0,
            body: std::ptr::null_mut(),
            is_json: false,
        }))
    }

    /// Build a success result from a completed exchange.
    pub(crate) fn ok(exchange: Exchange) -> *mut Self {
        let status_class = exchange.status_class().into();
        let elapsed_seconds = exchange.elapsed_seconds();
        let (headers, headers_len) = headers_into_raw(exchange.headers);
        Box::into_raw(Box::new(FfiSendResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            status: exchange.status,
            status_class,
            reason: to_c_string(&exchange.reason),
            elapsed_seconds,
            headers,
            headers_len,
            body: to_c_string(&exchange.body),
            is_json: exchange.is_json,
        }))
    }

    /// Build an error result from a `DispatchError`.
    pub(crate) fn from_error(err: DispatchError) -> *mut Self {
        let code = match &err {
            DispatchError::InvalidUrl => FfiErrorCode::InvalidUrl,
            DispatchError::InvalidJson(_) => FfiErrorCode::InvalidJson,
            DispatchError::Timeout(_) => FfiErrorCode::Timeout,
            DispatchError::Connection(_) => FfiErrorCode::Connection,
            DispatchError::Transport(_) => FfiErrorCode::Transport,
        };
        Self::failure(code, &err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }
}
