//! Request handling: sweep → read → parse → aggregate, then store, diff, or
//! classify as each request needs.

use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use lanscan_core::types::{Device, DeviceView, DiffResult, SecurityReport, Snapshot};

use crate::aggregate::{aggregate_at, find_by_ip};
use crate::arp_table::parse_arp_table_detailed;
use crate::config::DiscoverConfig;
use crate::diff::diff_and_advance;
use crate::error::{DiscoverError, Result};
use crate::reader::{ArpReader, ArpSource};
use crate::security::classify;
use crate::store::ScanStore;
use crate::sweep::{PingProber, Sweeper};
use crate::vendor::VendorTable;

/// Owns the discovery pipeline and the injected snapshot store.
pub struct DiscoveryService {
    subnet: String,
    source: Arc<dyn ArpSource>,
    sweeper: Sweeper,
    vendors: &'static VendorTable,
    store: Arc<ScanStore>,
}

impl DiscoveryService {
    /// Build a service that shells out to `arp` and `ping` per `config`.
    pub fn from_config(config: &DiscoverConfig, store: Arc<ScanStore>) -> Self {
        let reader = ArpReader::new(&config.arp_path, &config.arp_args);
        let prober = PingProber::new(&config.ping_path, &config.ping_args, config.probe_timeout());
        let sweeper = Sweeper::new(Arc::new(prober), config.sweep_batch_size);
        Self::new(&config.subnet, Arc::new(reader), sweeper, store)
    }

    pub fn new(
        subnet: &str,
        source: Arc<dyn ArpSource>,
        sweeper: Sweeper,
        store: Arc<ScanStore>,
    ) -> Self {
        Self {
            subnet: subnet.to_string(),
            source,
            sweeper,
            vendors: VendorTable::builtin(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<ScanStore> {
        &self.store
    }

    /// Run one pipeline pass and return the aggregated devices.
    async fn collect(&self, sweep: bool, cancel: &CancellationToken) -> Result<Vec<Device>> {
        if sweep {
            self.sweeper.sweep(&self.subnet, cancel).await;
            if cancel.is_cancelled() {
                return Err(DiscoverError::Cancelled);
            }
        }

        let text = self.source.read_table(cancel).await?;
        let report = parse_arp_table_detailed(&text);
        if !report.unrecognized.is_empty() {
            tracing::warn!(
                lines = report.unrecognized.len(),
                "ARP table contained unrecognized lines; they were skipped"
            );
        }

        let devices = aggregate_at(&report.entries, self.vendors, Utc::now());
        tracing::debug!(
            entries = report.entries.len(),
            incomplete = report.incomplete,
            multicast = report.multicast,
            malformed = report.malformed,
            devices = devices.len(),
            "ARP table aggregated"
        );
        Ok(devices)
    }

    /// Discover devices and make the result the new baseline.
    pub async fn discover(&self, sweep: bool, cancel: &CancellationToken) -> Result<Snapshot> {
        let mut guard = self.store.lock().await;
        let devices = self.collect(sweep, cancel).await?;
        let snapshot = Snapshot::new(devices, Utc::now());

        tracing::info!(
            scan_id = %snapshot.scan_id,
            devices = snapshot.devices.len(),
            swept = sweep,
            "Discovery complete"
        );

        guard.replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Look up one device by IP in a fresh aggregation. The baseline is not
    /// touched; an absent device is `Ok(None)`.
    pub async fn device_details(
        &self,
        ip: Ipv4Addr,
        sweep: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<DeviceView>> {
        let devices = self.collect(sweep, cancel).await?;
        let found = find_by_ip(&devices, ip).cloned().map(DeviceView::from);
        if found.is_none() {
            tracing::debug!(ip = %ip, "Device not found");
        }
        Ok(found)
    }

    /// Diff a fresh aggregation against the baseline and advance it.
    pub async fn check_changes(&self, sweep: bool, cancel: &CancellationToken) -> Result<DiffResult> {
        let mut guard = self.store.lock().await;
        if guard.current().is_none() {
            return Err(DiscoverError::NoBaseline);
        }

        let devices = self.collect(sweep, cancel).await?;
        diff_and_advance(&mut guard, Snapshot::new(devices, Utc::now()))
    }

    /// Classify a fresh aggregation. The baseline is not touched.
    pub async fn security_report(
        &self,
        sweep: bool,
        cancel: &CancellationToken,
    ) -> Result<SecurityReport> {
        let devices = self.collect(sweep, cancel).await?;
        let report = classify(&devices);
        tracing::info!(
            devices = report.total_devices,
            flagged = report.flagged_count,
            high = report.by_risk.high,
            "Security classification complete"
        );
        Ok(report)
    }
}
