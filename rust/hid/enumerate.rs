//! HID device enumeration

use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::hid::backend::HidBackend;
use crate::hid::ffi::hid_device_info;
use crate::hid::filter::DeviceFilter;
use crate::hid::library::native;
use crate::hid::{DeviceInfo, HidDevice, Result};

/// Run one native enumeration pass and copy every record.
///
/// Pass 0 for vendor_id or product_id to match all. The result keeps the
/// native list order; the native list is released exactly once before
/// returning. Records without a path cannot be opened and are skipped.
pub fn enumerate_devices(
    backend: &dyn HidBackend,
    vendor_id: u16,
    product_id: u16,
) -> Result<Vec<DeviceInfo>> {
    let head = backend.enumerate(vendor_id, product_id);

    let mut devices = Vec::new();
    let mut cur: *const hid_device_info = head;
    while !cur.is_null() {
        match unsafe { DeviceInfo::from_raw(cur) } {
            Ok(info) => devices.push(info),
            Err(e) => warn!("Skipping HID record: {}", e),
        }
        cur = unsafe { (*cur).next };
    }

    unsafe { backend.free_enumeration(head) };

    trace!(
        "Enumerated {} HID interfaces for {:04x}:{:04x}",
        devices.len(),
        vendor_id,
        product_id
    );
    Ok(devices)
}

/// Snapshot of the HID interfaces attached when it was created.
pub struct Enumeration {
    backend: Arc<dyn HidBackend>,
    devices: Vec<DeviceInfo>,
}

impl Enumeration {
    /// Enumerate through the process-wide hidapi library.
    pub fn new(vendor_id: u16, product_id: u16) -> Result<Self> {
        Self::with_backend(native()?, vendor_id, product_id)
    }

    /// Enumerate every attached HID interface.
    pub fn all() -> Result<Self> {
        Self::new(0, 0)
    }

    pub fn with_backend(
        backend: Arc<dyn HidBackend>,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Self> {
        let devices = enumerate_devices(backend.as_ref(), vendor_id, product_id)?;
        Ok(Self { backend, devices })
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceInfo> {
        self.devices.iter()
    }

    /// Descriptors matching every criterion in `filter`, in enumeration order.
    pub fn find(&self, filter: &DeviceFilter) -> Vec<&DeviceInfo> {
        filter.apply(&self.devices)
    }

    /// Closed handle for `info`, bound to this enumeration's backend.
    pub fn device(&self, info: &DeviceInfo) -> HidDevice {
        HidDevice::with_backend(self.backend.clone(), info.clone())
    }

    /// Open `info` through this enumeration's backend.
    pub fn open(&self, info: &DeviceInfo) -> Result<HidDevice> {
        let mut device = self.device(info);
        device.open()?;
        Ok(device)
    }
}

impl<'a> IntoIterator for &'a Enumeration {
    type Item = &'a DeviceInfo;
    type IntoIter = std::slice::Iter<'a, DeviceInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumeration")
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dev in &self.devices {
            writeln!(f, "{}", dev)?;
        }
        Ok(())
    }
}
