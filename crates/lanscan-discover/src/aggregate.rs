//! Turn parsed ARP entries into the canonical device list.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use ipnet::Ipv4Net;
use once_cell::sync::Lazy;

use lanscan_core::types::Device;

use crate::arp_table::RawCacheEntry;
use crate::vendor::VendorTable;

/// Ranges that never hold interesting physical hosts: link-local
/// autoconfiguration and the local virtualization bridge.
static EXCLUDED_NETS: Lazy<[Ipv4Net; 2]> = Lazy::new(|| {
    [
        Ipv4Net::new(Ipv4Addr::new(169, 254, 0, 0), 16).expect("valid prefix length"),
        Ipv4Net::new(Ipv4Addr::new(192, 168, 64, 0), 24).expect("valid prefix length"),
    ]
});

fn is_excluded(ip: &Ipv4Addr) -> bool {
    EXCLUDED_NETS.iter().any(|net| net.contains(ip))
}

/// Aggregate entries using the built-in vendor table and the current time.
pub fn aggregate(entries: &[RawCacheEntry]) -> Vec<Device> {
    aggregate_at(entries, VendorTable::builtin(), Utc::now())
}

/// Deduplicate by MAC (first occurrence wins), drop excluded ranges, resolve
/// manufacturers, stamp `last_seen`, and sort by numeric IPv4 order.
pub fn aggregate_at(
    entries: &[RawCacheEntry],
    vendors: &VendorTable,
    now: DateTime<Utc>,
) -> Vec<Device> {
    let mut seen = HashSet::new();

    let mut devices: Vec<Device> = entries
        .iter()
        .filter(|e| e.complete)
        .filter(|e| seen.insert(e.mac))
        .filter(|e| !is_excluded(&e.ip))
        .map(|e| Device {
            ip: e.ip,
            mac: e.mac,
            manufacturer: Some(vendors.manufacturer_for(&e.mac)),
            hostname: None,
            last_seen: now,
        })
        .collect();

    // Ipv4Addr orders by octets, left to right.
    devices.sort_by_key(|d| d.ip);
    devices
}

/// Find a device by IP in an aggregation result.
pub fn find_by_ip(devices: &[Device], ip: Ipv4Addr) -> Option<&Device> {
    devices.iter().find(|d| d.ip == ip)
}
