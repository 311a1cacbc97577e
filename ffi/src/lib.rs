//! C-ABI wrapper around `nanoman-core`.
//!
//! # Overview
//! Exposes the URL check, JSON pretty printer, header parser and dispatcher
//! through `extern "C"` functions so a desktop shell written in any language
//! with a C FFI can drive the request engine.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `nanoman_send` blocks for at most the timeout; the caller runs it off its
//!   UI thread. One `FfiDispatcher` may be shared by concurrent callers.
//! - A single `FfiSendResult` envelope conveys success payloads and errors.
//! - The C caller owns all returned pointers and must call the matching
//!   `nanoman_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use nanoman_core::{Dispatcher, DispatcherConfig, Request, UrlPolicy};

use types::*;

/// Borrow a C string as `&str`. Null or non-UTF-8 input yields `None`.
fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Return true if `url` may be dispatched. Null or non-UTF-8 input is unsafe.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_is_safe_url(url: *const c_char) -> bool {
    catch_unwind(|| borrow_str(url).is_some_and(nanoman_core::is_safe)).unwrap_or(false)
}

/// Pretty-print `text` if it is JSON; otherwise return a copy unchanged.
///
/// Returns null if `text` is null. Free with `nanoman_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_pretty_print(text: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        if text.is_null() {
            return std::ptr::null_mut();
        }
        let raw = unsafe { CStr::from_ptr(text) };
        match raw.to_str() {
            Ok(s) => to_c_string(&nanoman_core::pretty_print(s)),
            Err(_) => raw.to_owned().into_raw(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse `Key: Value` lines. Null input yields an empty list.
///
/// Free with `nanoman_free_header_list`.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_parse_headers(text: *const c_char) -> *mut FfiHeaderList {
    catch_unwind(|| FfiHeaderList::from_core(nanoman_core::parse_headers_opt(borrow_str(text))))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Dispatcher lifecycle
// ---------------------------------------------------------------------------

/// Create a dispatcher. A zero `default_timeout_secs` keeps the built-in
/// default of 10 seconds.
///
/// Free with `nanoman_dispatcher_free`.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_dispatcher_new(
    default_timeout_secs: u64,
    strict_urls: bool,
) -> *mut FfiDispatcher {
    catch_unwind(|| {
        let mut config = DispatcherConfig::default();
        if default_timeout_secs > 0 {
            config.default_timeout_secs = default_timeout_secs;
        }
        if strict_urls {
            config.url_policy = UrlPolicy::Strict;
        }
        Box::into_raw(Box::new(FfiDispatcher {
            inner: Dispatcher::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a dispatcher configured from `NANOMAN_*` environment variables.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_dispatcher_from_env() -> *mut FfiDispatcher {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiDispatcher {
            inner: Dispatcher::new(DispatcherConfig::from_env()),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a dispatcher. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_dispatcher_free(dispatcher: *mut FfiDispatcher) {
    if !dispatcher.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(dispatcher) });
        });
    }
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

/// Validate and send one request, blocking for at most the timeout.
///
/// `body` and `headers` may be null. `headers` is `Key: Value` text, one per
/// line. `timeout_secs` of zero uses the dispatcher default. A null `url` is
/// reported as an invalid URL.
///
/// Free with `nanoman_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_send(
    dispatcher: *const FfiDispatcher,
    method: *const c_char,
    url: *const c_char,
    body: *const c_char,
    headers: *const c_char,
    timeout_secs: u64,
) -> *mut FfiSendResult {
    catch_unwind(|| {
        if dispatcher.is_null() {
            return FfiSendResult::null_arg("dispatcher");
        }
        let Some(method) = borrow_str(method) else {
            return FfiSendResult::null_arg("method");
        };
        let dispatcher = unsafe { &*dispatcher };

        let mut request = Request::new(method, borrow_str(url).unwrap_or_default())
            .headers(nanoman_core::parse_headers_opt(borrow_str(headers)));
        if let Some(body) = borrow_str(body) {
            request = request.body(body);
        }
        if timeout_secs > 0 {
            request = request.timeout_secs(timeout_secs);
        }

        match dispatcher.inner.send(&request) {
            Ok(exchange) => FfiSendResult::ok(exchange),
            Err(e) => FfiSendResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiSendResult::panic("panic in nanoman_send"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiSendResult` returned by `nanoman_send`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_free_result(result: *mut FfiSendResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        for s in [result.error_message, result.reason, result.body] {
            if !s.is_null() {
                drop(unsafe { CString::from_raw(s) });
            }
        }
        free_headers(result.headers, result.headers_len);
    });
}

/// Free an `FfiHeaderList`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_free_header_list(list: *mut FfiHeaderList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        free_headers(list.items, list.len);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn nanoman_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn read(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn header_pairs(items: *const FfiHeader, len: u32) -> Vec<(String, String)> {
        if items.is_null() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(items, len as usize) }
            .iter()
            .map(|h| (read(h.key), read(h.value)))
            .collect()
    }

    #[test]
    fn safe_url_checks() {
        let ok = CString::new("https://api.example.com/v1/data").unwrap();
        let bad = CString::new("javascript:alert(1)").unwrap();
        assert!(nanoman_is_safe_url(ok.as_ptr()));
        assert!(!nanoman_is_safe_url(bad.as_ptr()));
        assert!(!nanoman_is_safe_url(std::ptr::null()));
    }

    #[test]
    fn pretty_print_json() {
        let text = CString::new(r#"{"name":"Nano","version":1}"#).unwrap();
        let out = nanoman_pretty_print(text.as_ptr());
        let pretty = read(out);
        assert!(pretty.contains("\n    \"name\": \"Nano\""));
        nanoman_free_string(out);
    }

    #[test]
    fn pretty_print_passthrough_and_null() {
        let text = CString::new("not json").unwrap();
        let out = nanoman_pretty_print(text.as_ptr());
        assert_eq!(read(out), "not json");
        nanoman_free_string(out);

        assert!(nanoman_pretty_print(std::ptr::null()).is_null());
    }

    #[test]
    fn parse_headers_two_entries() {
        let text = CString::new("Content-Type: application/json\nAuthorization: Bearer t1").unwrap();
        let list = nanoman_parse_headers(text.as_ptr());
        let l = unsafe { &*list };
        assert_eq!(
            header_pairs(l.items, l.len),
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer t1".to_string()),
            ]
        );
        nanoman_free_header_list(list);
    }

    #[test]
    fn parse_headers_null_is_empty() {
        let list = nanoman_parse_headers(std::ptr::null());
        let l = unsafe { &*list };
        assert_eq!(l.len, 0);
        assert!(l.items.is_null());
        nanoman_free_header_list(list);
    }

    #[test]
    fn dispatcher_new_and_free() {
        let dispatcher = nanoman_dispatcher_new(0, false);
        assert!(!dispatcher.is_null());
        let d = unsafe { &*dispatcher };
        assert_eq!(d.inner.config().default_timeout_secs, 10);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn dispatcher_from_env_and_free() {
        let dispatcher = nanoman_dispatcher_from_env();
        assert!(!dispatcher.is_null());
        let d = unsafe { &*dispatcher };
        assert!(d.inner.config().default_timeout_secs > 0);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn dispatcher_strict_policy() {
        let dispatcher = nanoman_dispatcher_new(5, true);
        let d = unsafe { &*dispatcher };
        assert_eq!(d.inner.config().url_policy, UrlPolicy::Strict);
        assert_eq!(d.inner.config().default_timeout_secs, 5);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn send_null_dispatcher_returns_null_arg() {
        let method = CString::new("GET").unwrap();
        let url = CString::new("https://example.com").unwrap();
        let result = nanoman_send(
            std::ptr::null(),
            method.as_ptr(),
            url.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            0,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(read(r.error_message), "null argument: dispatcher");
        nanoman_free_result(result);
    }

    #[test]
    fn send_rejects_unsafe_url() {
        let dispatcher = nanoman_dispatcher_new(0, false);
        let method = CString::new("GET").unwrap();
        let url = CString::new("file:///etc/passwd").unwrap();
        let result = nanoman_send(
            dispatcher,
            method.as_ptr(),
            url.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            0,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidUrl);
        assert!(r.body.is_null());
        assert!(read(r.error_message).starts_with("Invalid or unsafe URL"));
        nanoman_free_result(result);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn send_null_url_is_invalid_url() {
        let dispatcher = nanoman_dispatcher_new(0, false);
        let method = CString::new("GET").unwrap();
        let result = nanoman_send(
            dispatcher,
            method.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            std::ptr::null(),
            0,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidUrl);
        nanoman_free_result(result);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn send_rejects_bad_json_body() {
        let dispatcher = nanoman_dispatcher_new(0, false);
        let method = CString::new("POST").unwrap();
        let url = CString::new("https://valid.example/api").unwrap();
        let body = CString::new("{bad json").unwrap();
        let result = nanoman_send(
            dispatcher,
            method.as_ptr(),
            url.as_ptr(),
            body.as_ptr(),
            std::ptr::null(),
            0,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::InvalidJson);
        assert!(read(r.error_message).starts_with("Invalid JSON in request body:"));
        nanoman_free_result(result);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn send_against_mock_server() {
        let addr = mock_server::spawn();
        let dispatcher = nanoman_dispatcher_new(0, false);
        let method = CString::new("get").unwrap();
        let url = CString::new(format!("http://{addr}/anything")).unwrap();
        let body = CString::new(r#"{"q":"rust"}"#).unwrap();
        let headers = CString::new("X-Trace: abc").unwrap();
        let result = nanoman_send(
            dispatcher,
            method.as_ptr(),
            url.as_ptr(),
            body.as_ptr(),
            headers.as_ptr(),
            5,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.status, 200);
        assert_eq!(r.status_class, FfiStatusClass::Success);
        assert_eq!(read(r.reason), "OK");
        assert!(r.is_json);
        assert!(r.elapsed_seconds >= 0.0);

        let echo: serde_json::Value = serde_json::from_str(&read(r.body)).unwrap();
        assert_eq!(echo["method"], "GET");
        assert_eq!(echo["headers"]["x-trace"], "abc");
        assert_eq!(echo["json"]["q"], "rust");

        let response_headers = header_pairs(r.headers, r.headers_len);
        assert!(response_headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case("content-type") && v.contains("application/json")));

        nanoman_free_result(result);
        nanoman_dispatcher_free(dispatcher);
    }

    #[test]
    fn free_null_is_safe() {
        nanoman_free_result(std::ptr::null_mut());
        nanoman_free_header_list(std::ptr::null_mut());
        nanoman_free_string(std::ptr::null_mut());
        nanoman_dispatcher_free(std::ptr::null_mut());
    }
}
