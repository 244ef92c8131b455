//! Benchmarks for descriptor filtering and formatting
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use easyhid::{find, DeviceFilter, DeviceInfo};

/// Synthetic enumeration: several interfaces per physical device.
fn descriptors(count: usize) -> Vec<DeviceInfo> {
    (0..count)
        .map(|i| DeviceInfo {
            path: format!("/dev/hidraw{}", i),
            vendor_id: 0x1000 + (i / 4) as u16,
            product_id: 0x2000 + (i % 7) as u16,
            release_number: 0x0100,
            manufacturer_string: Some("Company".into()),
            product_string: Some(format!("Widget {}", i / 4)),
            serial_number: if i % 3 == 0 {
                None
            } else {
                Some(format!("SN-{:05}", i))
            },
            usage_page: if i % 2 == 0 { 0x01 } else { 0xff00 },
            usage: (i % 5) as u16,
            interface_number: (i % 4) as i32,
        })
        .collect()
}

/// Filtering cost grows with enumeration size; hubs with many devices
/// produce hundreds of entries.
fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for &count in &[16usize, 256, 4096] {
        let devices = descriptors(count);
        group.throughput(Throughput::Elements(count as u64));

        let by_id = DeviceFilter::new().vendor_id(0x1003).interface_number(2);
        group.bench_with_input(BenchmarkId::new("vid_interface", count), &count, |b, _| {
            b.iter(|| find(black_box(&devices), black_box(&by_id)))
        });

        let by_strings = DeviceFilter::new()
            .manufacturer("Company")
            .product("Widget 3")
            .serial_number("SN-00013");
        group.bench_with_input(BenchmarkId::new("strings", count), &count, |b, _| {
            b.iter(|| find(black_box(&devices), black_box(&by_strings)))
        });
    }

    group.finish();
}

fn bench_description(c: &mut Criterion) {
    let devices = descriptors(64);

    c.bench_function("description_64", |b| {
        b.iter(|| {
            for dev in black_box(&devices) {
                black_box(dev.description());
            }
        })
    });
}

criterion_group!(benches, bench_find, bench_description);
criterion_main!(benches);
