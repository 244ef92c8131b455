//! Dynamic loading of the native hidapi library
//!
//! The library is located once per process. Both the loaded library and a
//! load failure are cached, so every caller sees the same outcome.

use std::env;
use std::ffi::{CStr, OsString};
use std::path::PathBuf;
use std::sync::Arc;

use lazy_static::lazy_static;
use libloading::Library;
use tracing::{debug, info};

use crate::hid::backend::{HidBackend, RawDevice};
use crate::hid::ffi::{self, hid_device, hid_device_info, wchar_t};
use crate::hid::{HidError, Result};

/// Environment variable naming a library file to try before the defaults.
pub const LIBRARY_ENV: &str = "EASYHID_LIBRARY";

lazy_static! {
    static ref NATIVE: Result<Arc<NativeLibrary>> = NativeLibrary::load();
}

/// Process-wide handle to the loaded hidapi library.
pub fn native() -> Result<Arc<dyn HidBackend>> {
    match &*NATIVE {
        Ok(lib) => Ok(lib.clone() as Arc<dyn HidBackend>),
        Err(err) => Err(err.clone()),
    }
}

/// Release hidapi's static data. Later calls re-initialise it on demand.
pub fn exit() -> Result<()> {
    let lib = native()?;
    match lib.exit() {
        0 => Ok(()),
        code => Err(HidError::Init(code)),
    }
}

/// Library names to try for the platform named by `os`, in order.
///
/// `os` uses the values of `std::env::consts::OS`.
pub fn library_candidates(os: &str) -> Vec<OsString> {
    let mut names = Vec::new();
    if let Some(path) = env::var_os(LIBRARY_ENV).filter(|p| !p.is_empty()) {
        names.push(path);
    }

    match os {
        "windows" => {
            names.push("hidapi.dll".into());
            if let Some(path) = env::var_os("PATH") {
                names.extend(
                    env::split_paths(&path)
                        .map(|dir| dir.join("hidapi.dll"))
                        .filter(|file| file.is_file())
                        .map(PathBuf::into_os_string),
                );
            }
        }
        "macos" | "ios" => {
            names.push("hidapi".into());
            names.push("libhidapi.dylib".into());
            names.push("libhidapi.0.dylib".into());
            names.push("/opt/homebrew/lib/libhidapi.dylib".into());
            names.push("/usr/local/lib/libhidapi.dylib".into());
            names.push("/opt/local/lib/libhidapi.dylib".into());
        }
        _ => {
            names.push("hidapi-libusb".into());
            names.push("libhidapi-libusb.so.0".into());
            names.push("libhidapi-libusb.so".into());
        }
    }

    names
}

/// Resolved hidapi entry points.
///
/// The function pointers are only valid while `_library` is loaded, which is
/// as long as this struct lives.
pub struct NativeLibrary {
    hid_init: ffi::HidInit,
    hid_exit: ffi::HidExit,
    hid_enumerate: ffi::HidEnumerate,
    hid_free_enumeration: ffi::HidFreeEnumeration,
    hid_open_path: ffi::HidOpenPath,
    hid_close: ffi::HidClose,
    hid_write: ffi::HidWrite,
    hid_read: ffi::HidRead,
    hid_read_timeout: ffi::HidReadTimeout,
    hid_set_nonblocking: ffi::HidSetNonblocking,
    hid_send_feature_report: ffi::HidSendFeatureReport,
    hid_get_feature_report: ffi::HidGetFeatureReport,
    hid_get_manufacturer_string: ffi::HidGetString,
    hid_get_product_string: ffi::HidGetString,
    hid_get_serial_number_string: ffi::HidGetString,
    hid_get_indexed_string: ffi::HidGetIndexedString,
    hid_error: ffi::HidError,
    /// `hid_error(NULL)` is only safe from hidapi 0.10, which added `hid_version`.
    global_error: bool,
    _library: Library,
}

/// Copy a function pointer out of the library.
unsafe fn symbol<T: Copy>(library: &Library, name: &str) -> Result<T> {
    let mut raw = name.as_bytes().to_vec();
    raw.push(0);
    library
        .get::<T>(&raw)
        .map(|sym| *sym)
        .map_err(|e| HidError::MissingSymbol {
            symbol: name.to_string(),
            reason: e.to_string(),
        })
}

impl NativeLibrary {
    fn open_first() -> Result<Library> {
        let candidates = library_candidates(env::consts::OS);
        for name in &candidates {
            match unsafe { Library::new(name) } {
                Ok(library) => {
                    info!("Loaded hidapi from {}", name.to_string_lossy());
                    return Ok(library);
                }
                Err(e) => debug!("Could not load {}: {}", name.to_string_lossy(), e),
            }
        }

        let tried = candidates
            .iter()
            .map(|name| name.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        Err(HidError::LibraryNotFound { tried })
    }

    /// Log the hidapi version; `false` when the library predates `hid_version`.
    fn log_version(library: &Library) -> bool {
        match unsafe { symbol::<ffi::HidVersion>(library, "hid_version") } {
            Ok(hid_version) => {
                if let Some(v) = unsafe { hid_version().as_ref() } {
                    info!("hidapi version {}.{}.{}", v.major, v.minor, v.patch);
                }
                true
            }
            Err(_) => {
                debug!("hidapi older than 0.10, library-wide errors unavailable");
                false
            }
        }
    }

    fn load() -> Result<Arc<Self>> {
        let library = Self::open_first()?;

        let lib = unsafe {
            Self {
                hid_init: symbol(&library, "hid_init")?,
                hid_exit: symbol(&library, "hid_exit")?,
                hid_enumerate: symbol(&library, "hid_enumerate")?,
                hid_free_enumeration: symbol(&library, "hid_free_enumeration")?,
                hid_open_path: symbol(&library, "hid_open_path")?,
                hid_close: symbol(&library, "hid_close")?,
                hid_write: symbol(&library, "hid_write")?,
                hid_read: symbol(&library, "hid_read")?,
                hid_read_timeout: symbol(&library, "hid_read_timeout")?,
                hid_set_nonblocking: symbol(&library, "hid_set_nonblocking")?,
                hid_send_feature_report: symbol(&library, "hid_send_feature_report")?,
                hid_get_feature_report: symbol(&library, "hid_get_feature_report")?,
                hid_get_manufacturer_string: symbol(&library, "hid_get_manufacturer_string")?,
                hid_get_product_string: symbol(&library, "hid_get_product_string")?,
                hid_get_serial_number_string: symbol(&library, "hid_get_serial_number_string")?,
                hid_get_indexed_string: symbol(&library, "hid_get_indexed_string")?,
                hid_error: symbol(&library, "hid_error")?,
                global_error: Self::log_version(&library),
                _library: library,
            }
        };

        match lib.init() {
            0 => Ok(Arc::new(lib)),
            code => Err(HidError::Init(code)),
        }
    }
}

/// Device pointer to hand to `hid_error`, `None` when the call must be skipped.
fn error_target(dev: Option<&RawDevice>, global_error: bool) -> Option<*mut hid_device> {
    match dev {
        Some(dev) => Some(dev.as_ptr()),
        None if global_error => Some(std::ptr::null_mut()),
        None => None,
    }
}

unsafe impl HidBackend for NativeLibrary {
    fn init(&self) -> i32 {
        unsafe { (self.hid_init)() }
    }

    fn exit(&self) -> i32 {
        unsafe { (self.hid_exit)() }
    }

    fn enumerate(&self, vendor_id: u16, product_id: u16) -> *mut hid_device_info {
        unsafe { (self.hid_enumerate)(vendor_id, product_id) }
    }

    unsafe fn free_enumeration(&self, devs: *mut hid_device_info) {
        (self.hid_free_enumeration)(devs)
    }

    fn open_path(&self, path: &CStr) -> Option<RawDevice> {
        unsafe { RawDevice::from_ptr((self.hid_open_path)(path.as_ptr())) }
    }

    fn close(&self, dev: RawDevice) {
        unsafe { (self.hid_close)(dev.as_ptr()) }
    }

    fn write(&self, dev: &RawDevice, data: &[u8]) -> i32 {
        unsafe { (self.hid_write)(dev.as_ptr(), data.as_ptr(), data.len()) }
    }

    fn read(&self, dev: &RawDevice, buf: &mut [u8]) -> i32 {
        unsafe { (self.hid_read)(dev.as_ptr(), buf.as_mut_ptr(), buf.len()) }
    }

    fn read_timeout(&self, dev: &RawDevice, buf: &mut [u8], milliseconds: i32) -> i32 {
        unsafe { (self.hid_read_timeout)(dev.as_ptr(), buf.as_mut_ptr(), buf.len(), milliseconds) }
    }

    fn set_nonblocking(&self, dev: &RawDevice, nonblock: bool) -> i32 {
        unsafe { (self.hid_set_nonblocking)(dev.as_ptr(), nonblock as i32) }
    }

    fn send_feature_report(&self, dev: &RawDevice, data: &[u8]) -> i32 {
        unsafe { (self.hid_send_feature_report)(dev.as_ptr(), data.as_ptr(), data.len()) }
    }

    fn get_feature_report(&self, dev: &RawDevice, buf: &mut [u8]) -> i32 {
        unsafe { (self.hid_get_feature_report)(dev.as_ptr(), buf.as_mut_ptr(), buf.len()) }
    }

    fn get_manufacturer_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        unsafe { (self.hid_get_manufacturer_string)(dev.as_ptr(), buf.as_mut_ptr(), buf.len()) }
    }

    fn get_product_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        unsafe { (self.hid_get_product_string)(dev.as_ptr(), buf.as_mut_ptr(), buf.len()) }
    }

    fn get_serial_number_string(&self, dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        unsafe { (self.hid_get_serial_number_string)(dev.as_ptr(), buf.as_mut_ptr(), buf.len()) }
    }

    fn get_indexed_string(&self, dev: &RawDevice, index: i32, buf: &mut [wchar_t]) -> i32 {
        unsafe { (self.hid_get_indexed_string)(dev.as_ptr(), index, buf.as_mut_ptr(), buf.len()) }
    }

    fn error(&self, dev: Option<&RawDevice>) -> *const wchar_t {
        match error_target(dev, self.global_error) {
            Some(ptr) => unsafe { (self.hid_error)(ptr) },
            None => std::ptr::null(),
        }
    }
}
