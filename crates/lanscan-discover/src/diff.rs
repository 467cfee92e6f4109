//! Change detection between two device snapshots.
//!
//! Devices are matched by MAC only. IPs move under DHCP and are never used
//! as identity.

use std::collections::HashSet;

use lanscan_core::types::{DiffResult, Snapshot};
use lanscan_core::MacAddress;

use crate::error::{DiscoverError, Result};
use crate::store::StoreGuard;

/// Compare two snapshots. Output order follows each snapshot's device order.
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> DiffResult {
    let previous_macs: HashSet<MacAddress> = previous.devices.iter().map(|d| d.mac).collect();
    let current_macs: HashSet<MacAddress> = current.devices.iter().map(|d| d.mac).collect();

    let new_devices = current
        .devices
        .iter()
        .filter(|d| !previous_macs.contains(&d.mac))
        .cloned()
        .collect();

    let removed_devices = previous
        .devices
        .iter()
        .filter(|d| !current_macs.contains(&d.mac))
        .cloned()
        .collect();

    DiffResult {
        new_devices,
        removed_devices,
        previous_scan_time: previous.taken_at,
        current_scan_time: current.taken_at,
    }
}

/// Diff `current` against the stored baseline, then make `current` the new
/// baseline.
///
/// Fails with [`DiscoverError::NoBaseline`] when nothing has been stored
/// yet; the store is left untouched in that case.
pub fn diff_and_advance(store: &mut StoreGuard<'_>, current: Snapshot) -> Result<DiffResult> {
    let previous = store.current().ok_or(DiscoverError::NoBaseline)?;
    let result = diff_snapshots(previous, &current);

    tracing::info!(
        previous_scan_id = %previous.scan_id,
        current_scan_id = %current.scan_id,
        new = result.new_devices.len(),
        removed = result.removed_devices.len(),
        "Snapshot diff computed"
    );

    store.replace(current);
    Ok(result)
}
