//! Conversion between native C strings and Rust text
//!
//! A null pointer is "absent" and maps to `None`, never to an empty string.

use std::ffi::CStr;
use std::os::raw::c_char;

use widestring::{WideCStr, WideStr};

use crate::hid::ffi::wchar_t;

/// Code units in the buffer handed to the string query entry points.
pub const STRING_BUFFER_LEN: usize = 128;

/// Copy a NUL-terminated narrow string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn narrow_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// Copy a NUL-terminated `wchar_t` string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated wide string.
pub unsafe fn wide_to_string(ptr: *const wchar_t) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(WideCStr::from_ptr_str(ptr).to_string_lossy())
}

/// Text held in a string query buffer, up to the first NUL.
///
/// A buffer without a terminator was filled to capacity and is taken whole;
/// such a result may be truncated.
pub fn wide_buffer_to_string(buf: &[wchar_t]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    WideStr::from_slice(&buf[..end]).to_string_lossy()
}

/// Zero-filled buffer for a string query.
pub fn string_buffer() -> Vec<wchar_t> {
    vec![0; STRING_BUFFER_LEN]
}
