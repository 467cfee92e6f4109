//! Core domain types for the lanscan inventory engine.
//!
//! These are the emitted data contracts: devices produced by a discovery
//! pass, the snapshot held between passes, diffs, and security flags.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MacAddress;

/// Manufacturer placeholder for locally-administered addresses.
pub const PRIVATE_MANUFACTURER: &str = "Private/Randomized MAC";

/// Manufacturer placeholder when the OUI is not in the vendor table.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

// ── Devices ───────────────────────────────────────────────────────

/// A host seen in the ARP cache during one discovery pass.
///
/// `mac` is the identity key: within one aggregation result no two devices
/// share a MAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub ip: Ipv4Addr,
    pub mac: MacAddress,
    pub manufacturer: Option<String>,
    pub hostname: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl Device {
    pub fn is_private_mac(&self) -> bool {
        self.mac.is_locally_administered()
    }
}

/// Presentation form of a [`Device`] with `is_private_mac` computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub device: Device,
    pub is_private_mac: bool,
}

impl From<Device> for DeviceView {
    fn from(device: Device) -> Self {
        let is_private_mac = device.is_private_mac();
        Self {
            device,
            is_private_mac,
        }
    }
}

// ── Snapshots & Diffs ─────────────────────────────────────────────

/// One complete, timestamped device list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub scan_id: Uuid,
    pub devices: Vec<Device>,
    pub taken_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(devices: Vec<Device>, taken_at: DateTime<Utc>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            devices,
            taken_at,
        }
    }
}

/// Devices that appeared or disappeared between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResult {
    pub new_devices: Vec<Device>,
    pub removed_devices: Vec<Device>,
    pub previous_scan_time: DateTime<Utc>,
    pub current_scan_time: DateTime<Utc>,
}

impl DiffResult {
    pub fn is_unchanged(&self) -> bool {
        self.new_devices.is_empty() && self.removed_devices.is_empty()
    }
}

// ── Security ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A device that matched one of the security rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedDevice {
    #[serde(flatten)]
    pub device: Device,
    pub flag_reason: String,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Result of classifying one device list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    pub total_devices: u32,
    pub flagged_count: u32,
    pub by_risk: RiskCounts,
    pub flagged: Vec<FlaggedDevice>,
    pub recommendations: Vec<String>,
}
