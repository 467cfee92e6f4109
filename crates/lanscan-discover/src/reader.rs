//! ARP cache reader.
//!
//! Executes the OS ARP listing command as a child process via
//! `tokio::process::Command` and returns its raw stdout.

use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::{DiscoverError, Result};

/// Source of raw ARP table text.
#[async_trait]
pub trait ArpSource: Send + Sync {
    async fn read_table(&self, cancel: &CancellationToken) -> Result<String>;
}

/// Wrapper around the ARP listing binary (`arp -a` by default).
#[derive(Debug, Clone)]
pub struct ArpReader {
    arp_path: String,
    arp_args: Vec<String>,
}

impl ArpReader {
    pub fn new(arp_path: &str, arp_args: &[String]) -> Self {
        Self {
            arp_path: arp_path.to_string(),
            arp_args: arp_args.to_vec(),
        }
    }

    fn command_line(&self) -> String {
        if self.arp_args.is_empty() {
            self.arp_path.clone()
        } else {
            format!("{} {}", self.arp_path, self.arp_args.join(" "))
        }
    }

    /// Read the current ARP cache as text.
    ///
    /// Fails if the binary cannot be launched or exits non-zero. A cancelled
    /// token kills the child and returns [`DiscoverError::Cancelled`].
    pub async fn read(&self, cancel: &CancellationToken) -> Result<String> {
        let start = Instant::now();
        let mut cmd = Command::new(&self.arp_path);
        cmd.args(&self.arp_args).kill_on_drop(true);
        let output = cmd.output();

        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DiscoverError::Cancelled),
            res = output => res.map_err(|e| DiscoverError::CommandExecution {
                command: self.command_line(),
                reason: e.to_string(),
            })?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DiscoverError::CommandExecution {
                command: self.command_line(),
                reason: format!(
                    "exited with code {}: {stderr}",
                    output.status.code().unwrap_or(-1)
                ),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(
            command = %self.command_line(),
            bytes = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "ARP cache read"
        );
        Ok(text)
    }
}

#[async_trait]
impl ArpSource for ArpReader {
    async fn read_table(&self, cancel: &CancellationToken) -> Result<String> {
        self.read(cancel).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::test_support::{write_script, SCRIPT_LOCK};

    #[tokio::test]
    async fn returns_stdout() {
        let _guard = SCRIPT_LOCK.lock().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, "fake-arp", "echo '? (192.168.1.1) at 0:11:22:33:44:55 on en0'");
        let reader = ArpReader::new(&path, &[]);

        let text = reader.read(&CancellationToken::new()).await.unwrap();
        assert!(text.contains("192.168.1.1"));
    }

    #[tokio::test]
    async fn missing_binary_is_command_error() {
        let reader = ArpReader::new("/nonexistent/lanscan-arp", &["-a".to_string()]);
        let err = reader.read(&CancellationToken::new()).await.unwrap_err();
        match err {
            DiscoverError::CommandExecution { command, .. } => {
                assert_eq!(command, "/nonexistent/lanscan-arp -a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_zero_exit_is_command_error() {
        let _guard = SCRIPT_LOCK.lock().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, "fake-arp", "echo 'no permission' >&2\nexit 3");
        let reader = ArpReader::new(&path, &[]);

        let err = reader.read(&CancellationToken::new()).await.unwrap_err();
        match err {
            DiscoverError::CommandExecution { reason, .. } => {
                assert!(reason.contains("code 3"));
                assert!(reason.contains("no permission"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn cancelled_token_aborts_read() {
        let _guard = SCRIPT_LOCK.lock().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, "fake-arp", "sleep 5");
        let reader = ArpReader::new(&path, &[]);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = reader.read(&cancel).await.unwrap_err();
        assert!(matches!(err, DiscoverError::Cancelled));
    }

    #[tokio::test]
    async fn cancel_during_read_kills_child() {
        let _guard = SCRIPT_LOCK.lock().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(&dir, "fake-arp", "sleep 5");
        let reader = ArpReader::new(&path, &[]);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = reader.read(&cancel).await.unwrap_err();
        assert!(matches!(err, DiscoverError::Cancelled));
        assert!(
            start.elapsed() < Duration::from_secs(1),
            "read took {:?}",
            start.elapsed()
        );
    }
}
