//! HID device information from enumeration

use std::fmt;

use crate::hid::ffi::hid_device_info;
use crate::hid::wide::{narrow_to_string, wide_to_string};
use crate::hid::{HidError, Result};

/// Identity of one HID interface, copied out of a native enumeration record.
///
/// Owns all of its data; nothing here points into native memory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    /// Platform-specific locator passed back to `hid_open_path`.
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// USB bcdDevice.
    pub release_number: u16,
    pub manufacturer_string: Option<String>,
    pub product_string: Option<String>,
    pub serial_number: Option<String>,
    pub usage_page: u16,
    pub usage: u16,
    /// `-1` when the backend cannot tell.
    pub interface_number: i32,
}

impl DeviceInfo {
    /// Copy one native record.
    ///
    /// # Safety
    /// `raw` must be null or point to a record whose string pointers are
    /// null or NUL-terminated.
    pub unsafe fn from_raw(raw: *const hid_device_info) -> Result<Self> {
        let raw = raw
            .as_ref()
            .ok_or(HidError::InvalidRecord("null device record"))?;
        let path =
            narrow_to_string(raw.path).ok_or(HidError::InvalidRecord("device record has no path"))?;

        Ok(Self {
            path,
            vendor_id: raw.vendor_id,
            product_id: raw.product_id,
            release_number: raw.release_number,
            manufacturer_string: wide_to_string(raw.manufacturer_string),
            product_string: wide_to_string(raw.product_string),
            serial_number: wide_to_string(raw.serial_number),
            usage_page: raw.usage_page,
            usage: raw.usage,
            interface_number: raw.interface_number,
        })
    }

    /// Multi-line summary of the identity fields.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HIDDevice:")?;
        writeln!(
            f,
            "    {} | {:x}:{:x} | {} | {} | {}",
            self.path,
            self.vendor_id,
            self.product_id,
            or_none(&self.manufacturer_string),
            or_none(&self.product_string),
            or_none(&self.serial_number)
        )?;
        writeln!(f, "    release_number: {}", self.release_number)?;
        writeln!(f, "    usage_page: {}", self.usage_page)?;
        writeln!(f, "    usage: {}", self.usage)?;
        write!(f, "    interface_number: {}", self.interface_number)
    }
}
