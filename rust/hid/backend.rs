//! Seam between the object model and the native hidapi entry points

use std::ffi::CStr;
use std::ptr::NonNull;

use crate::hid::ffi::{hid_device, hid_device_info, wchar_t};

/// An open native device session.
///
/// Not `Clone`: exactly one owner may close it.
#[derive(Debug)]
pub struct RawDevice(NonNull<hid_device>);

// hidapi handles may move between threads; concurrent use is not allowed,
// hence no `Sync`.
unsafe impl Send for RawDevice {}

impl RawDevice {
    /// Wrap a pointer returned by `hid_open_path`, `None` for null.
    ///
    /// # Safety
    /// `ptr` must be null or a live handle that nothing else will close.
    pub unsafe fn from_ptr(ptr: *mut hid_device) -> Option<Self> {
        NonNull::new(ptr).map(RawDevice)
    }

    pub fn as_ptr(&self) -> *mut hid_device {
        self.0.as_ptr()
    }
}

/// One method per hidapi entry point.
///
/// Return codes follow hidapi: negative means failure.
///
/// # Safety
/// `enumerate` must return null or a well-formed, null-terminated list whose
/// strings stay valid until the list is passed to `free_enumeration`. Pointers
/// returned by `error` must be null or a NUL-terminated wide string valid
/// until the next call on the same device.
pub unsafe trait HidBackend: Send + Sync {
    fn init(&self) -> i32;

    fn exit(&self) -> i32;

    fn enumerate(&self, vendor_id: u16, product_id: u16) -> *mut hid_device_info;

    /// # Safety
    /// `devs` must come from `enumerate` on this backend and not be freed yet.
    unsafe fn free_enumeration(&self, devs: *mut hid_device_info);

    fn open_path(&self, path: &CStr) -> Option<RawDevice>;

    fn close(&self, dev: RawDevice);

    fn write(&self, dev: &RawDevice, data: &[u8]) -> i32;

    fn read(&self, dev: &RawDevice, buf: &mut [u8]) -> i32;

    fn read_timeout(&self, dev: &RawDevice, buf: &mut [u8], milliseconds: i32) -> i32;

    fn set_nonblocking(&self, dev: &RawDevice, nonblock: bool) -> i32;

    fn send_feature_report(&self, dev: &RawDevice, data: &[u8]) -> i32;

    fn get_feature_report(&self, dev: &RawDevice, buf: &mut [u8]) -> i32;

    fn get_manufacturer_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32;

    fn get_product_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32;

    fn get_serial_number_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32;

    fn get_indexed_string(&self, dev: &RawDevice, index: i32, buf: &mut [wchar_t]) -> i32;

    /// Last error for `dev`, or the library-global error when `None`.
    ///
    /// hidapi before 0.10 has no library-global error and dereferences the
    /// device pointer; implementations return null for `None` there.
    fn error(&self, dev: Option<&RawDevice>) -> *const wchar_t;
}
