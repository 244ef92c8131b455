//! Mirror of the hidapi C ABI
//!
//! Field order and widths must match `hidapi.h` exactly. Newer hidapi
//! releases append `bus_type` after `next`; we never read past `next`, so
//! older and newer layouts are both compatible.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_uchar, c_ushort};

use widestring::WideChar;

/// Platform `wchar_t` as used by hidapi for every descriptor string.
pub type wchar_t = WideChar;

/// One node of the list returned by `hid_enumerate`.
#[repr(C)]
#[derive(Debug)]
pub struct hid_device_info {
    pub path: *mut c_char,
    pub vendor_id: c_ushort,
    pub product_id: c_ushort,
    pub serial_number: *mut wchar_t,
    pub release_number: c_ushort,
    pub manufacturer_string: *mut wchar_t,
    pub product_string: *mut wchar_t,
    pub usage_page: c_ushort,
    pub usage: c_ushort,
    pub interface_number: c_int,
    pub next: *mut hid_device_info,
}

/// Returned by `hid_version`, present from hidapi 0.10.
#[repr(C)]
#[derive(Debug)]
pub struct hid_api_version {
    pub major: c_int,
    pub minor: c_int,
    pub patch: c_int,
}

/// Opaque device session owned by the native library.
#[repr(C)]
pub struct hid_device {
    _private: [u8; 0],
}

pub type HidInit = unsafe extern "C" fn() -> c_int;
pub type HidExit = unsafe extern "C" fn() -> c_int;
pub type HidEnumerate = unsafe extern "C" fn(c_ushort, c_ushort) -> *mut hid_device_info;
pub type HidFreeEnumeration = unsafe extern "C" fn(*mut hid_device_info);
pub type HidOpenPath = unsafe extern "C" fn(*const c_char) -> *mut hid_device;
pub type HidClose = unsafe extern "C" fn(*mut hid_device);
pub type HidWrite = unsafe extern "C" fn(*mut hid_device, *const c_uchar, usize) -> c_int;
pub type HidRead = unsafe extern "C" fn(*mut hid_device, *mut c_uchar, usize) -> c_int;
pub type HidReadTimeout =
    unsafe extern "C" fn(*mut hid_device, *mut c_uchar, usize, c_int) -> c_int;
pub type HidSetNonblocking = unsafe extern "C" fn(*mut hid_device, c_int) -> c_int;
pub type HidSendFeatureReport =
    unsafe extern "C" fn(*mut hid_device, *const c_uchar, usize) -> c_int;
pub type HidGetFeatureReport = unsafe extern "C" fn(*mut hid_device, *mut c_uchar, usize) -> c_int;
pub type HidGetString = unsafe extern "C" fn(*mut hid_device, *mut wchar_t, usize) -> c_int;
pub type HidGetIndexedString =
    unsafe extern "C" fn(*mut hid_device, c_int, *mut wchar_t, usize) -> c_int;
pub type HidError = unsafe extern "C" fn(*mut hid_device) -> *const wchar_t;
pub type HidVersion = unsafe extern "C" fn() -> *const hid_api_version;
