//! HID device handle for communication

use std::ffi::CString;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::hid::backend::{HidBackend, RawDevice};
use crate::hid::enumerate::enumerate_devices;
use crate::hid::ffi::wchar_t;
use crate::hid::filter::DeviceFilter;
use crate::hid::library::native;
use crate::hid::wide::{string_buffer, wide_buffer_to_string, wide_to_string};
use crate::hid::{DeviceInfo, HidError, Result};

/// Default report buffer size for `read` and `get_feature_report`.
pub const DEFAULT_REPORT_SIZE: usize = 64;

/// HID interface handle, closed until `open` succeeds.
///
/// The native handle is owned exclusively and closed on drop. There is no
/// internal locking: share across threads behind a mutex.
pub struct HidDevice {
    backend: Arc<dyn HidBackend>,
    info: DeviceInfo,
    handle: Option<RawDevice>,
}

fn timeout_ms(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

fn with_report_id(data: &[u8], report_id: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(data.len() + 1);
    buf.push(report_id);
    buf.extend_from_slice(data);
    buf
}

impl HidDevice {
    /// Closed handle using the process-wide hidapi library.
    pub fn new(info: DeviceInfo) -> Result<Self> {
        Ok(Self::with_backend(native()?, info))
    }

    pub fn with_backend(backend: Arc<dyn HidBackend>, info: DeviceInfo) -> Self {
        Self {
            backend,
            info,
            handle: None,
        }
    }

    /// Descriptor this handle was created from.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn handle(&self) -> Result<&RawDevice> {
        self.handle.as_ref().ok_or(HidError::NotOpen)
    }

    fn native_error(&self) -> Option<String> {
        let ptr = self.backend.error(self.handle.as_ref());
        unsafe { wide_to_string(ptr) }
    }

    /// Open the interface at `info().path` for reading and writing.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(HidError::AlreadyOpen);
        }

        let path = CString::new(self.info.path.as_str()).map_err(|_| HidError::Open {
            path: self.info.path.clone(),
            message: Some("path contains a NUL byte".into()),
        })?;

        match self.backend.open_path(&path) {
            Some(handle) => {
                debug!("Opened HID device {}", self.info.path);
                self.handle = Some(handle);
                Ok(())
            }
            None => Err(HidError::Open {
                path: self.info.path.clone(),
                message: self.native_error(),
            }),
        }
    }

    /// Close the native handle. Does nothing when already closed.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.close(handle);
            debug!("Closed HID device {}", self.info.path);
        }
    }

    /// Send an output report. `data` is prefixed with `report_id`.
    ///
    /// Returns the number of bytes written, report ID included.
    pub fn write(&mut self, data: &[u8], report_id: u8) -> Result<usize> {
        let handle = self.handle()?;
        let report = with_report_id(data, report_id);

        let written = self.backend.write(handle, &report);
        if written < 0 {
            return Err(HidError::Write {
                code: written,
                message: self.native_error(),
            });
        }
        trace!("Wrote {} bytes to {}", written, self.info.path);
        Ok(written as usize)
    }

    /// Read an input report of up to `size` bytes.
    ///
    /// Blocks until data arrives when `timeout` is `None`. An empty result
    /// means nothing was read, e.g. the timeout expired. The first byte is
    /// the report ID for devices using numbered reports.
    pub fn read(&mut self, size: usize, timeout: Option<Duration>) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        let mut buf = vec![0u8; size];

        let count = match timeout {
            None => self.backend.read(handle, &mut buf),
            Some(t) => self.backend.read_timeout(handle, &mut buf, timeout_ms(t)),
        };
        if count < 0 {
            return Err(HidError::Read {
                code: count,
                message: self.native_error(),
            });
        }

        buf.truncate(count as usize);
        trace!("Read {} bytes from {}", count, self.info.path);
        Ok(buf)
    }

    /// Switch `read` between blocking and returning immediately.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> Result<()> {
        let handle = self.handle()?;
        let code = self.backend.set_nonblocking(handle, nonblocking);
        if code < 0 {
            return Err(HidError::SetNonblocking {
                code,
                message: self.native_error(),
            });
        }
        Ok(())
    }

    /// Whether the device is still attached.
    ///
    /// An open handle is checked with a zero-length read; a closed one is
    /// looked up by path in a fresh enumeration.
    pub fn is_connected(&self) -> Result<bool> {
        match &self.handle {
            Some(handle) => Ok(self.backend.read_timeout(handle, &mut [], 0) != -1),
            None => {
                let devices = enumerate_devices(
                    self.backend.as_ref(),
                    self.info.vendor_id,
                    self.info.product_id,
                )?;
                let filter = DeviceFilter::new().path(self.info.path.as_str());
                Ok(!filter.apply(&devices).is_empty())
            }
        }
    }

    /// Send a feature report over the control endpoint (Set_Report).
    ///
    /// Returns the number of bytes sent, report ID included.
    pub fn send_feature_report(&mut self, data: &[u8], report_id: u8) -> Result<usize> {
        let handle = self.handle()?;
        let report = with_report_id(data, report_id);

        let sent = self.backend.send_feature_report(handle, &report);
        if sent < 0 {
            return Err(HidError::FeatureReport {
                code: sent,
                message: self.native_error(),
            });
        }
        Ok(sent as usize)
    }

    /// Fetch feature report `report_id` over the control endpoint (Get_Report).
    ///
    /// Returns the `size` bytes following the report ID.
    pub fn get_feature_report(&mut self, size: usize, report_id: u8) -> Result<Vec<u8>> {
        let handle = self.handle()?;
        let len = size.checked_add(1).ok_or_else(|| HidError::FeatureReport {
            code: -1,
            message: Some(format!("report size {} too large", size)),
        })?;
        let mut buf = vec![0u8; len];
        buf[0] = report_id;

        let count = self.backend.get_feature_report(handle, &mut buf);
        if count < 0 {
            return Err(HidError::FeatureReport {
                code: count,
                message: self.native_error(),
            });
        }
        buf.remove(0);
        Ok(buf)
    }

    /// Native error text for this device, or the library-wide one when closed.
    pub fn error(&self) -> Option<String> {
        self.native_error()
    }

    fn query_string(
        &self,
        query: impl FnOnce(&dyn HidBackend, &RawDevice, &mut [wchar_t]) -> i32,
    ) -> Result<(i32, Vec<wchar_t>)> {
        let handle = self.handle()?;
        let mut buf = string_buffer();
        let code = query(self.backend.as_ref(), handle, &mut buf);
        if code < 0 {
            return Err(HidError::StringQuery {
                code,
                message: self.native_error(),
            });
        }
        Ok((code, buf))
    }

    /// Manufacturer string read from the device.
    pub fn manufacturer(&self) -> Result<String> {
        let (_, buf) = self.query_string(|b, h, buf| b.get_manufacturer_string(h, buf))?;
        Ok(wide_buffer_to_string(&buf))
    }

    /// Product string read from the device.
    pub fn product(&self) -> Result<String> {
        let (_, buf) = self.query_string(|b, h, buf| b.get_product_string(h, buf))?;
        Ok(wide_buffer_to_string(&buf))
    }

    /// Serial number string read from the device.
    pub fn serial_number(&self) -> Result<String> {
        let (_, buf) = self.query_string(|b, h, buf| b.get_serial_number_string(h, buf))?;
        Ok(wide_buffer_to_string(&buf))
    }

    /// USB string descriptor `index`.
    ///
    /// A zero native return means the device has no such string and yields
    /// `None`; only a positive return carries text.
    pub fn indexed_string(&self, index: i32) -> Result<Option<String>> {
        let (code, buf) = self.query_string(|b, h, buf| b.get_indexed_string(h, index, buf))?;
        if code == 0 {
            return Ok(None);
        }
        Ok(Some(wide_buffer_to_string(&buf)))
    }
}

impl Drop for HidDevice {
    fn drop(&mut self) {
        if self.is_open() {
            debug!("HID device {} dropped while open", self.info.path);
            self.close();
        }
    }
}

impl std::fmt::Debug for HidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidDevice")
            .field("info", &self.info)
            .field("is_open", &self.is_open())
            .finish()
    }
}
