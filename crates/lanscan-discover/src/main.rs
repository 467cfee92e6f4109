//! CLI entry point for the lanscan network inventory engine.

use std::net::Ipv4Addr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use lanscan_discover::config::DiscoverConfig;
use lanscan_discover::requests::handle_line;
use lanscan_discover::service::DiscoveryService;
use lanscan_discover::store::ScanStore;

#[derive(Parser)]
#[command(name = "lanscan")]
#[command(about = "Discover, track, and risk-flag devices on the local subnet")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the three-octet subnet prefix to sweep (e.g. 192.168.1).
    #[arg(long, global = true)]
    subnet: Option<String>,

    /// Config file prefix (default: lanscan).
    #[arg(short, long, default_value = "lanscan", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// List devices currently in the ARP cache.
    Discover {
        /// Ping every host in the subnet first to populate the cache.
        #[arg(long)]
        sweep: bool,
    },
    /// Show one device by IP address.
    Device {
        ip: Ipv4Addr,
        #[arg(long)]
        sweep: bool,
    },
    /// Flag devices that need a security review.
    Security {
        #[arg(long)]
        sweep: bool,
    },
    /// Answer JSON requests from stdin, one per line, keeping scan state.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_discover_config(&cli.config)?;
    if let Some(subnet) = &cli.subnet {
        config.subnet = subnet.clone();
    }
    config.validate()?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    let store = Arc::new(ScanStore::new());
    let service = DiscoveryService::from_config(&config, store);

    match cli.command {
        Command::Discover { sweep } => {
            let snapshot = service.discover(sweep, &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Device { ip, sweep } => match service.device_details(ip, sweep, &cancel).await? {
            Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
            None => println!("{}", serde_json::json!({ "ip": ip, "found": false })),
        },
        Command::Security { sweep } => {
            let report = service.security_report(sweep, &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve => serve(&service, &cancel).await?,
    }

    Ok(())
}

async fn serve(service: &DiscoveryService, cancel: &CancellationToken) -> anyhow::Result<()> {
    tracing::info!("Serving requests on stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(service, &line, cancel).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    tracing::info!("Request stream closed");
    Ok(())
}

fn load_discover_config(file_prefix: &str) -> anyhow::Result<DiscoverConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("LANSCAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<DiscoverConfig>("discover") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(DiscoverConfig::default()),
        Err(e) => Err(e.into()),
    }
}
