//! Selecting descriptors out of an enumeration

use crate::hid::DeviceInfo;

/// Equality criteria over descriptor fields; unset fields match anything.
///
/// Vendor and product IDs follow the enumeration convention where `0` also
/// means "any", since 0 is never a valid USB ID. Every other numeric field
/// treats `0` as a real value to match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub serial_number: Option<String>,
    pub interface_number: Option<i32>,
    pub path: Option<String>,
    pub release_number: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub usage: Option<u16>,
    pub usage_page: Option<u16>,
}

fn id_matches(wanted: Option<u16>, actual: u16) -> bool {
    match wanted {
        None | Some(0) => true,
        Some(id) => id == actual,
    }
}

fn field_matches<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
    wanted.as_ref().map_or(true, |w| w == actual)
}

fn text_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual.as_deref() == Some(w.as_str()),
    }
}

impl DeviceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vendor_id(mut self, vendor_id: u16) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn product_id(mut self, product_id: u16) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn interface_number(mut self, interface: i32) -> Self {
        self.interface_number = Some(interface);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn release_number(mut self, release_number: u16) -> Self {
        self.release_number = Some(release_number);
        self
    }

    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn usage(mut self, usage: u16) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn usage_page(mut self, usage_page: u16) -> Self {
        self.usage_page = Some(usage_page);
        self
    }

    pub fn matches(&self, dev: &DeviceInfo) -> bool {
        id_matches(self.vendor_id, dev.vendor_id)
            && id_matches(self.product_id, dev.product_id)
            && text_matches(&self.serial_number, &dev.serial_number)
            && field_matches(&self.interface_number, &dev.interface_number)
            && field_matches(&self.path, &dev.path)
            && field_matches(&self.release_number, &dev.release_number)
            && text_matches(&self.manufacturer, &dev.manufacturer_string)
            && text_matches(&self.product, &dev.product_string)
            && field_matches(&self.usage, &dev.usage)
            && field_matches(&self.usage_page, &dev.usage_page)
    }

    /// Matching descriptors, in input order.
    pub fn apply<'a>(&self, devices: &'a [DeviceInfo]) -> Vec<&'a DeviceInfo> {
        find(devices, self)
    }
}

/// Descriptors in `devices` that satisfy `filter`, in input order.
pub fn find<'a>(devices: &'a [DeviceInfo], filter: &DeviceFilter) -> Vec<&'a DeviceInfo> {
    devices.iter().filter(|dev| filter.matches(dev)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::fake::device;

    fn devices() -> Vec<DeviceInfo> {
        let mut keyboard = device("kbd-0", 0x1209, 0x0001, 0);
        keyboard.serial_number = Some("SN-1".into());
        keyboard.usage_page = 0x01;
        keyboard.usage = 0x06;
        keyboard.release_number = 0;

        let mut vendor = device("kbd-1", 0x1209, 0x0001, 1);
        vendor.serial_number = Some("SN-1".into());
        vendor.manufacturer_string = None;

        let other = device("mouse-0", 0x046d, 0xc077, 0);
        vec![keyboard, vendor, other]
    }

    fn paths(found: Vec<&DeviceInfo>) -> Vec<&str> {
        found.into_iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let devs = devices();
        assert_eq!(find(&devs, &DeviceFilter::new()).len(), 3);
    }

    #[test]
    fn test_zero_vendor_id_is_unfiltered() {
        let devs = devices();
        let unset = find(&devs, &DeviceFilter::new());
        let zero = find(&devs, &DeviceFilter::new().vendor_id(0).product_id(0));
        assert_eq!(unset, zero);
    }

    #[test]
    fn test_zero_interface_is_a_real_filter() {
        let devs = devices();
        let found = find(&devs, &DeviceFilter::new().interface_number(0));
        assert_eq!(paths(found), ["kbd-0", "mouse-0"]);
    }

    #[test]
    fn test_zero_release_number_is_a_real_filter() {
        let devs = devices();
        let found = find(&devs, &DeviceFilter::new().release_number(0));
        assert_eq!(paths(found), ["kbd-0"]);
    }

    #[test]
    fn test_criteria_are_combined() {
        let devs = devices();
        let filter = DeviceFilter::new()
            .vendor_id(0x1209)
            .serial_number("SN-1")
            .interface_number(1);
        assert_eq!(paths(find(&devs, &filter)), ["kbd-1"]);
    }

    #[test]
    fn test_absent_string_never_matches_a_value() {
        let devs = devices();
        let found = find(&devs, &DeviceFilter::new().manufacturer("Company"));
        assert_eq!(paths(found), ["kbd-0", "mouse-0"]);
    }

    #[test]
    fn test_usage_and_path() {
        let devs = devices();
        let filter = DeviceFilter::new().usage_page(0x01).usage(0x06);
        assert_eq!(paths(find(&devs, &filter)), ["kbd-0"]);
        assert_eq!(
            paths(find(&devs, &DeviceFilter::new().path("mouse-0"))),
            ["mouse-0"]
        );
    }

    #[test]
    fn test_no_match() {
        let devs = devices();
        assert!(find(&devs, &DeviceFilter::new().product("Nope")).is_empty());
    }
}
