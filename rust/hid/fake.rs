//! In-memory hidapi stand-in for tests
//!
//! Builds real `hid_device_info` lists on the heap so enumeration code walks
//! and frees them exactly as it would with the native library.

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::ptr::{self, NonNull};
use std::sync::{Arc, Mutex, MutexGuard};

use widestring::WideCString;

use crate::hid::backend::{HidBackend, RawDevice};
use crate::hid::ffi::{hid_device_info, wchar_t};
use crate::hid::DeviceInfo;

#[derive(Default)]
pub(crate) struct FakeState {
    pub devices: Vec<DeviceInfo>,
    /// Devices listed with a null path.
    pub pathless: Vec<String>,
    pub enumerate_calls: Vec<(u16, u16)>,
    pub free_calls: usize,
    pub freed_nodes: usize,
    pub refuse_open: bool,
    pub opened: Vec<String>,
    pub closes: usize,
    pub written: Vec<Vec<u8>>,
    pub write_result: Option<i32>,
    /// Timeout per read call, `None` for the blocking entry point.
    pub reads: Vec<Option<i32>>,
    pub read_len: Vec<usize>,
    pub read_result: i32,
    pub read_data: Vec<u8>,
    pub nonblocking: Option<bool>,
    pub nonblocking_result: i32,
    pub features_sent: Vec<Vec<u8>>,
    pub feature_requests: Vec<Vec<u8>>,
    pub feature_fill: Vec<u8>,
    pub feature_result: Option<i32>,
    pub manufacturer: String,
    pub product: String,
    pub serial: String,
    pub indexed: HashMap<i32, String>,
    pub string_result: i32,
    pub error: Option<WideCString>,
}

pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(devices: Vec<DeviceInfo>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                devices,
                ..Default::default()
            }),
        })
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn set_error(&self, text: &str) {
        self.state().error = Some(WideCString::from_str(text).unwrap());
    }
}

pub(crate) fn device(path: &str, vendor_id: u16, product_id: u16, interface: i32) -> DeviceInfo {
    DeviceInfo {
        path: path.to_string(),
        vendor_id,
        product_id,
        release_number: 0x0100,
        manufacturer_string: Some("Company".into()),
        product_string: Some("Widget".into()),
        serial_number: None,
        usage_page: 0xff00,
        usage: 1,
        interface_number: interface,
    }
}

fn wide_raw(value: &Option<String>) -> *mut wchar_t {
    value
        .as_ref()
        .map_or(ptr::null_mut(), |s| WideCString::from_str(s).unwrap().into_raw())
}

unsafe fn wide_free(ptr: *mut wchar_t) {
    if !ptr.is_null() {
        drop(WideCString::from_raw(ptr));
    }
}

fn fill_wide(buf: &mut [wchar_t], text: &str) {
    let units = WideCString::from_str(text).unwrap().into_vec();
    let len = units.len().min(buf.len().saturating_sub(1));
    buf[..len].copy_from_slice(&units[..len]);
    if len < buf.len() {
        buf[len] = 0;
    }
}

fn fill_read(state: &FakeState, buf: &mut [u8]) -> i32 {
    if state.read_result > 0 {
        let len = state.read_data.len().min(buf.len());
        buf[..len].copy_from_slice(&state.read_data[..len]);
    }
    state.read_result
}

unsafe impl HidBackend for FakeBackend {
    fn init(&self) -> i32 {
        0
    }

    fn exit(&self) -> i32 {
        0
    }

    fn enumerate(&self, vendor_id: u16, product_id: u16) -> *mut hid_device_info {
        let mut state = self.state();
        state.enumerate_calls.push((vendor_id, product_id));

        let mut head: *mut hid_device_info = ptr::null_mut();
        for dev in state.devices.iter().rev() {
            if vendor_id != 0 && dev.vendor_id != vendor_id {
                continue;
            }
            if product_id != 0 && dev.product_id != product_id {
                continue;
            }
            let path = if state.pathless.contains(&dev.path) {
                ptr::null_mut()
            } else {
                CString::new(dev.path.clone()).unwrap().into_raw()
            };
            let node = Box::new(hid_device_info {
                path,
                vendor_id: dev.vendor_id,
                product_id: dev.product_id,
                serial_number: wide_raw(&dev.serial_number),
                release_number: dev.release_number,
                manufacturer_string: wide_raw(&dev.manufacturer_string),
                product_string: wide_raw(&dev.product_string),
                usage_page: dev.usage_page,
                usage: dev.usage,
                interface_number: dev.interface_number,
                next: head,
            });
            head = Box::into_raw(node);
        }
        head
    }

    unsafe fn free_enumeration(&self, devs: *mut hid_device_info) {
        let mut state = self.state();
        state.free_calls += 1;

        let mut cur = devs;
        while !cur.is_null() {
            let node = Box::from_raw(cur);
            if !node.path.is_null() {
                drop(CString::from_raw(node.path));
            }
            wide_free(node.serial_number);
            wide_free(node.manufacturer_string);
            wide_free(node.product_string);
            state.freed_nodes += 1;
            cur = node.next;
        }
    }

    fn open_path(&self, path: &CStr) -> Option<RawDevice> {
        let mut state = self.state();
        let path = path.to_string_lossy().into_owned();
        if state.refuse_open || !state.devices.iter().any(|d| d.path == path) {
            return None;
        }
        state.opened.push(path);
        unsafe { RawDevice::from_ptr(NonNull::dangling().as_ptr()) }
    }

    fn close(&self, _dev: RawDevice) {
        self.state().closes += 1;
    }

    fn write(&self, _dev: &RawDevice, data: &[u8]) -> i32 {
        let mut state = self.state();
        state.written.push(data.to_vec());
        state.write_result.unwrap_or(data.len() as i32)
    }

    fn read(&self, _dev: &RawDevice, buf: &mut [u8]) -> i32 {
        let mut state = self.state();
        state.reads.push(None);
        state.read_len.push(buf.len());
        fill_read(&state, buf)
    }

    fn read_timeout(&self, _dev: &RawDevice, buf: &mut [u8], milliseconds: i32) -> i32 {
        let mut state = self.state();
        state.reads.push(Some(milliseconds));
        state.read_len.push(buf.len());
        fill_read(&state, buf)
    }

    fn set_nonblocking(&self, _dev: &RawDevice, nonblock: bool) -> i32 {
        let mut state = self.state();
        state.nonblocking = Some(nonblock);
        state.nonblocking_result
    }

    fn send_feature_report(&self, _dev: &RawDevice, data: &[u8]) -> i32 {
        let mut state = self.state();
        state.features_sent.push(data.to_vec());
        state.feature_result.unwrap_or(data.len() as i32)
    }

    fn get_feature_report(&self, _dev: &RawDevice, buf: &mut [u8]) -> i32 {
        let mut state = self.state();
        state.feature_requests.push(buf.to_vec());
        let len = state.feature_fill.len().min(buf.len().saturating_sub(1));
        buf[1..=len].copy_from_slice(&state.feature_fill[..len]);
        state.feature_result.unwrap_or(len as i32 + 1)
    }

    fn get_manufacturer_string(&self, _dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        let state = self.state();
        fill_wide(buf, &state.manufacturer);
        state.string_result
    }

    fn get_product_string(&self, _dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        let state = self.state();
        fill_wide(buf, &state.product);
        state.string_result
    }

    fn get_serial_number_string(&self, _dev: &RawDevice, buf: &mut [wchar_t]) -> i32 {
        let state = self.state();
        fill_wide(buf, &state.serial);
        state.string_result
    }

    fn get_indexed_string(&self, _dev: &RawDevice, index: i32, buf: &mut [wchar_t]) -> i32 {
        let state = self.state();
        if let Some(text) = state.indexed.get(&index) {
            fill_wide(buf, text);
        }
        state.string_result
    }

    fn error(&self, _dev: Option<&RawDevice>) -> *const wchar_t {
        self.state()
            .error
            .as_ref()
            .map_or(ptr::null(), |e| e.as_ptr())
    }
}
