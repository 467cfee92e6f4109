//! Active probe sweep.
//!
//! Sends one short ping to every host of a /24 so the kernel resolves and
//! caches their link-layer addresses before the ARP table is read. Probes
//! are dispatched in fixed-size batches: everything in a batch runs at once,
//! and the next batch starts only after the previous one has settled.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Host suffixes probed in a /24: `.1` through `.254`.
pub const FIRST_HOST: u8 = 1;
pub const LAST_HOST: u8 = 254;

/// A best-effort reachability probe. Implementations swallow every failure.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &str);
}

/// Probes by running the system `ping` binary once per target.
#[derive(Debug, Clone)]
pub struct PingProber {
    ping_path: String,
    ping_args: Vec<String>,
    timeout: Duration,
}

impl PingProber {
    pub fn new(ping_path: &str, ping_args: &[String], timeout: Duration) -> Self {
        Self {
            ping_path: ping_path.to_string(),
            ping_args: ping_args.to_vec(),
            timeout,
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, target: &str) {
        let mut cmd = Command::new(&self.ping_path);
        cmd.args(&self.ping_args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let Ok(mut child) = cmd.spawn() else {
            return;
        };
        // Exit status is irrelevant; on timeout the child is killed on drop.
        let _ = tokio::time::timeout(self.timeout, child.wait()).await;
    }
}

/// Every probe target for `prefix`, in ascending host order.
///
/// The prefix is used verbatim; a malformed prefix yields malformed targets.
pub fn probe_targets(prefix: &str) -> Vec<String> {
    (FIRST_HOST..=LAST_HOST)
        .map(|host| format!("{prefix}.{host}"))
        .collect()
}

/// Split the targets for `prefix` into consecutive batches of `batch_size`.
pub fn plan_batches(prefix: &str, batch_size: usize) -> Vec<Vec<String>> {
    probe_targets(prefix)
        .chunks(batch_size.max(1))
        .map(<[String]>::to_vec)
        .collect()
}

/// Batch-sequential, batch-parallel probe dispatcher.
#[derive(Clone)]
pub struct Sweeper {
    prober: Arc<dyn Prober>,
    batch_size: usize,
}

impl Sweeper {
    pub fn new(prober: Arc<dyn Prober>, batch_size: usize) -> Self {
        Self {
            prober,
            batch_size: batch_size.max(1),
        }
    }

    /// Probe `prefix.1` through `prefix.254`.
    ///
    /// Returns once the last batch has settled. Never fails. If `cancel`
    /// fires, in-flight probes are aborted and no further batches start.
    pub async fn sweep(&self, prefix: &str, cancel: &CancellationToken) {
        let start = Instant::now();
        let batches = plan_batches(prefix, self.batch_size);
        let batch_count = batches.len();

        tracing::info!(
            subnet = %prefix,
            batches = batch_count,
            batch_size = self.batch_size,
            "Starting probe sweep"
        );

        for (index, batch) in batches.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(subnet = %prefix, completed_batches = index, "Probe sweep cancelled");
                return;
            }

            let size = batch.len();
            let mut tasks = JoinSet::new();
            for target in batch {
                let prober = Arc::clone(&self.prober);
                tasks.spawn(async move {
                    prober.probe(&target).await;
                });
            }

            let cancelled = tokio::select! {
                biased;
                _ = cancel.cancelled() => true,
                _ = drain(&mut tasks) => false,
            };
            if cancelled {
                tasks.shutdown().await;
                tracing::info!(subnet = %prefix, completed_batches = index, "Probe sweep cancelled");
                return;
            }

            tracing::debug!(batch = index + 1, of = batch_count, probes = size, "Probe batch settled");
        }

        tracing::info!(
            subnet = %prefix,
            duration_ms = start.elapsed().as_millis() as u64,
            "Probe sweep complete"
        );
    }
}

async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(res) = tasks.join_next().await {
        if let Err(e) = res {
            if e.is_panic() {
                tracing::warn!(error = %e, "Probe task panicked");
            }
        }
    }
}
