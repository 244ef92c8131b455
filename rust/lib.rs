//! Simple object model over the native hidapi library
//!
//! - Enumerate attached HID interfaces into owned descriptors
//! - Filter descriptors by identity fields
//! - Open, read, write and exchange feature reports with a device
//! - Optional Python module (`python` feature)
//!
//! ```no_run
//! use easyhid::{DeviceFilter, Enumeration};
//!
//! let en = Enumeration::all()?;
//! let filter = DeviceFilter::new().manufacturer("Company").product("Widget");
//! if let Some(info) = en.find(&filter).first() {
//!     let mut dev = en.open(info)?;
//!     dev.write(&[0, 1, 2, 3], 0)?;
//!     println!("{:?}", dev.read(easyhid::DEFAULT_REPORT_SIZE, None)?);
//! }
//! # Ok::<(), easyhid::HidError>(())
//! ```

mod hid;

#[cfg(feature = "python")]
mod python;

pub use hid::{
    backend, enumerate_devices, exit, ffi, find, native, DeviceFilter, DeviceInfo, Enumeration,
    HidBackend, HidDevice, HidError, RawDevice, Result, DEFAULT_REPORT_SIZE, LIBRARY_ENV,
    STRING_BUFFER_LEN,
};
