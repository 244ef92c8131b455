//! HID access through the native hidapi library
//!
//! Provides enumeration, filtering and device I/O over a dynamically loaded
//! hidapi, with every native record copied into owned Rust values.

pub mod backend;
pub mod device;
pub mod device_info;
pub mod enumerate;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod library;
pub mod wide;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{HidBackend, RawDevice};
pub use device::{HidDevice, DEFAULT_REPORT_SIZE};
pub use device_info::DeviceInfo;
pub use enumerate::{enumerate_devices, Enumeration};
pub use error::{HidError, Result};
pub use filter::{find, DeviceFilter};
pub use library::{exit, native, LIBRARY_ENV};
pub use wide::STRING_BUFFER_LEN;
