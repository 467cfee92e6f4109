//! JSON request dispatch for the long-running `serve` mode.
//!
//! One request per line on stdin, one response per line on stdout:
//!
//! ```text
//! {"op": "discover", "sweep": true}
//! {"op": "device", "ip": "192.168.1.10"}
//! {"op": "changes"}
//! {"op": "security"}
//! ```

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::service::DiscoveryService;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Discover {
        #[serde(default)]
        sweep: bool,
    },
    Device {
        ip: Ipv4Addr,
        #[serde(default)]
        sweep: bool,
    },
    Changes {
        #[serde(default)]
        sweep: bool,
    },
    Security {
        #[serde(default)]
        sweep: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

async fn dispatch(
    service: &DiscoveryService,
    request: Request,
    cancel: &CancellationToken,
) -> Result<Value> {
    let value = match request {
        Request::Discover { sweep } => serde_json::to_value(service.discover(sweep, cancel).await?),
        Request::Device { ip, sweep } => {
            serde_json::to_value(service.device_details(ip, sweep, cancel).await?)
        }
        Request::Changes { sweep } => {
            serde_json::to_value(service.check_changes(sweep, cancel).await?)
        }
        Request::Security { sweep } => {
            serde_json::to_value(service.security_report(sweep, cancel).await?)
        }
    };
    Ok(value?)
}

/// Parse and answer one request line.
pub async fn handle_line(
    service: &DiscoveryService,
    line: &str,
    cancel: &CancellationToken,
) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return Response::failure(format!("Invalid request: {e}")),
    };

    tracing::debug!(request = ?request, "Handling request");
    match dispatch(service, request, cancel).await {
        Ok(value) => Response::success(value),
        Err(e) => {
            tracing::warn!(error = %e, "Request failed");
            Response::failure(e)
        }
    }
}
