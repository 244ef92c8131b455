//! Python module exposing `Enumeration` and `HIDDevice`

use std::time::Duration;

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;

use crate::hid::{
    DeviceFilter, DeviceInfo, Enumeration, HidDevice, HidError, DEFAULT_REPORT_SIZE,
    STRING_BUFFER_LEN,
};

create_exception!(easyhid, HIDException, PyException);
create_exception!(easyhid, LibraryNotFoundError, HIDException);
create_exception!(easyhid, InvalidRecordError, HIDException);
create_exception!(easyhid, AlreadyOpenError, HIDException);
create_exception!(easyhid, NotOpenError, HIDException);
create_exception!(easyhid, OpenError, HIDException);
create_exception!(easyhid, WriteError, HIDException);
create_exception!(easyhid, ReadError, HIDException);
create_exception!(easyhid, FeatureReportError, HIDException);
create_exception!(easyhid, StringQueryError, HIDException);

impl From<HidError> for PyErr {
    fn from(err: HidError) -> PyErr {
        let msg = err.to_string();
        match err {
            HidError::LibraryNotFound { .. } | HidError::MissingSymbol { .. } | HidError::Init(_) => {
                LibraryNotFoundError::new_err(msg)
            }
            HidError::InvalidRecord(_) => InvalidRecordError::new_err(msg),
            HidError::AlreadyOpen => AlreadyOpenError::new_err(msg),
            HidError::NotOpen => NotOpenError::new_err(msg),
            HidError::Open { .. } => OpenError::new_err(msg),
            HidError::Write { .. } => WriteError::new_err(msg),
            HidError::Read { .. } => ReadError::new_err(msg),
            HidError::SetNonblocking { .. } => HIDException::new_err(msg),
            HidError::FeatureReport { .. } => FeatureReportError::new_err(msg),
            HidError::StringQuery { .. } => StringQueryError::new_err(msg),
        }
    }
}

/// A HID interface. Normally obtained from an `Enumeration`.
#[pyclass(name = "HIDDevice", module = "easyhid", unsendable)]
pub struct PyHidDevice {
    inner: HidDevice,
}

impl PyHidDevice {
    fn info(&self) -> &DeviceInfo {
        self.inner.info()
    }
}

#[pymethods]
impl PyHidDevice {
    #[getter]
    fn path(&self) -> String {
        self.info().path.clone()
    }

    #[getter]
    fn vendor_id(&self) -> u16 {
        self.info().vendor_id
    }

    #[getter]
    fn product_id(&self) -> u16 {
        self.info().product_id
    }

    #[getter]
    fn release_number(&self) -> u16 {
        self.info().release_number
    }

    #[getter]
    fn manufacturer_string(&self) -> Option<String> {
        self.info().manufacturer_string.clone()
    }

    #[getter]
    fn product_string(&self) -> Option<String> {
        self.info().product_string.clone()
    }

    #[getter]
    fn serial_number(&self) -> Option<String> {
        self.info().serial_number.clone()
    }

    #[getter]
    fn usage_page(&self) -> u16 {
        self.info().usage_page
    }

    #[getter]
    fn usage(&self) -> u16 {
        self.info().usage
    }

    #[getter]
    fn interface_number(&self) -> i32 {
        self.info().interface_number
    }

    fn open(&mut self) -> PyResult<()> {
        Ok(self.inner.open()?)
    }

    fn close(&mut self) {
        self.inner.close();
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn is_connected(&self) -> PyResult<bool> {
        Ok(self.inner.is_connected()?)
    }

    /// Write `data` prefixed with `report_id`; returns bytes written.
    #[pyo3(signature = (data, report_id=0))]
    fn write(&mut self, data: Vec<u8>, report_id: u8) -> PyResult<usize> {
        Ok(self.inner.write(&data, report_id)?)
    }

    /// Read up to `size` bytes, waiting at most `timeout` milliseconds.
    #[pyo3(signature = (size=DEFAULT_REPORT_SIZE, timeout=None))]
    fn read(&mut self, size: usize, timeout: Option<u64>) -> PyResult<Vec<u8>> {
        Ok(self.inner.read(size, timeout.map(Duration::from_millis))?)
    }

    fn set_nonblocking(&mut self, enable_nonblocking: bool) -> PyResult<()> {
        Ok(self.inner.set_nonblocking(enable_nonblocking)?)
    }

    #[pyo3(signature = (data, report_id=0))]
    fn send_feature_report(&mut self, data: Vec<u8>, report_id: u8) -> PyResult<usize> {
        Ok(self.inner.send_feature_report(&data, report_id)?)
    }

    #[pyo3(signature = (size=DEFAULT_REPORT_SIZE, report_id=0))]
    fn get_feature_report(&mut self, size: usize, report_id: u8) -> PyResult<Vec<u8>> {
        Ok(self.inner.get_feature_report(size, report_id)?)
    }

    fn get_error(&self) -> Option<String> {
        self.inner.error()
    }

    fn get_manufacturer_string(&self) -> PyResult<String> {
        Ok(self.inner.manufacturer()?)
    }

    fn get_product_string(&self) -> PyResult<String> {
        Ok(self.inner.product()?)
    }

    fn get_serial_number(&self) -> PyResult<String> {
        Ok(self.inner.serial_number()?)
    }

    fn get_indexed_string(&self, index: i32) -> PyResult<Option<String>> {
        Ok(self.inner.indexed_string(index)?)
    }

    fn description(&self) -> String {
        self.info().description()
    }

    fn __repr__(&self) -> String {
        format!(
            "HIDDevice(path={:?}, vendor_id=0x{:04x}, product_id=0x{:04x}, interface={})",
            self.info().path,
            self.info().vendor_id,
            self.info().product_id,
            self.info().interface_number
        )
    }

    fn __enter__(mut slf: PyRefMut<'_, Self>) -> PyResult<PyRefMut<'_, Self>> {
        slf.inner.open()?;
        Ok(slf)
    }

    fn __exit__(
        &mut self,
        _exc_type: &Bound<'_, PyAny>,
        _exc_value: &Bound<'_, PyAny>,
        _traceback: &Bound<'_, PyAny>,
    ) -> bool {
        self.inner.close();
        false
    }
}

/// The HID interfaces connected when the object was created.
///
/// Each interface is wrapped once, so `device_list` and `find` hand out the
/// same `HIDDevice` objects and an opened handle stays open between calls.
#[pyclass(name = "Enumeration", module = "easyhid", unsendable)]
pub struct PyEnumeration {
    inner: Enumeration,
    devices: Vec<Py<PyHidDevice>>,
}

impl PyEnumeration {
    fn from_enumeration(py: Python<'_>, inner: Enumeration) -> PyResult<Self> {
        let devices = inner
            .iter()
            .map(|info| {
                Py::new(
                    py,
                    PyHidDevice {
                        inner: inner.device(info),
                    },
                )
            })
            .collect::<PyResult<Vec<_>>>()?;
        Ok(Self { inner, devices })
    }
}

#[pymethods]
impl PyEnumeration {
    #[new]
    #[pyo3(signature = (vid=0, pid=0))]
    fn new(py: Python<'_>, vid: u16, pid: u16) -> PyResult<Self> {
        Self::from_enumeration(py, Enumeration::new(vid, pid)?)
    }

    #[getter]
    fn device_list(&self, py: Python<'_>) -> Vec<Py<PyHidDevice>> {
        self.devices.iter().map(|dev| dev.clone_ref(py)).collect()
    }

    /// Print the description of every device.
    fn show(&self, py: Python<'_>) -> PyResult<()> {
        let print = PyModule::import(py, "builtins")?.getattr("print")?;
        for info in &self.inner {
            print.call1((info.description(),))?;
        }
        Ok(())
    }

    /// Devices matching every given filter. `vid`/`pid` of 0 match anything.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        vid=None,
        pid=None,
        serial=None,
        interface=None,
        path=None,
        release_number=None,
        manufacturer=None,
        product=None,
        usage=None,
        usage_page=None
    ))]
    fn find(
        &self,
        py: Python<'_>,
        vid: Option<u16>,
        pid: Option<u16>,
        serial: Option<String>,
        interface: Option<i32>,
        path: Option<String>,
        release_number: Option<u16>,
        manufacturer: Option<String>,
        product: Option<String>,
        usage: Option<u16>,
        usage_page: Option<u16>,
    ) -> Vec<Py<PyHidDevice>> {
        let filter = DeviceFilter {
            vendor_id: vid,
            product_id: pid,
            serial_number: serial,
            interface_number: interface,
            path,
            release_number,
            manufacturer,
            product,
            usage,
            usage_page,
        };
        self.inner
            .iter()
            .zip(&self.devices)
            .filter(|(info, _)| filter.matches(info))
            .map(|(_, dev)| dev.clone_ref(py))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[pymodule(name = "easyhid")]
fn easyhid_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    m.add_class::<PyEnumeration>()?;
    m.add_class::<PyHidDevice>()?;

    m.add("HIDException", py.get_type::<HIDException>())?;
    m.add("LibraryNotFoundError", py.get_type::<LibraryNotFoundError>())?;
    m.add("InvalidRecordError", py.get_type::<InvalidRecordError>())?;
    m.add("AlreadyOpenError", py.get_type::<AlreadyOpenError>())?;
    m.add("NotOpenError", py.get_type::<NotOpenError>())?;
    m.add("OpenError", py.get_type::<OpenError>())?;
    m.add("WriteError", py.get_type::<WriteError>())?;
    m.add("ReadError", py.get_type::<ReadError>())?;
    m.add("FeatureReportError", py.get_type::<FeatureReportError>())?;
    m.add("StringQueryError", py.get_type::<StringQueryError>())?;

    m.add("DEFAULT_REPORT_SIZE", DEFAULT_REPORT_SIZE)?;
    m.add("STRING_BUFFER_LEN", STRING_BUFFER_LEN)?;

    Ok(())
}
