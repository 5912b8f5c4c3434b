//! site-router
//!
//! ```text
//!                        ┌────────────────────────────────────────────┐
//!   GET /admin/routes/   │  http::server  (trace, timeout, request-id)│
//!   ────────────────────▶│        │ strip leading '/'                 │
//!                        │        ▼                                   │
//!                        │  RoutingTable (root)                       │
//!                        │   ├─ "admin/" ──▶ admin table (ns admin)   │
//!                        │   └─ ""       ──▶ app table (config)       │
//!                        │        │ endpoint + remaining path         │
//!                        │        ▼                                   │
//!                        │  SiteEndpoint::respond                     │
//!                        └────────────────────────────────────────────┘
//!   config file ──notify──▶ reload ──▶ build table ──▶ atomic swap
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use site_router::config::{load_config, watcher::ConfigWatcher, SiteConfig};
use site_router::lifecycle::{signals, Shutdown};
use site_router::observability::{logging, metrics};
use site_router::routing::Dispatch;
use site_router::site::build_routes;
use site_router::HttpServer;

#[derive(Parser)]
#[command(name = "site-router", version)]
#[command(about = "Serve and inspect a prefix-routed site", long_about = None)]
struct Cli {
    /// Path to the TOML configuration; defaults apply if it does not exist.
    #[arg(short, long, default_value = "site-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve HTTP (the default)
    Serve {
        /// Do not reload when the config file changes
        #[arg(long)]
        no_watch: bool,
    },
    /// Validate the config, build the routing table and list named routes
    Check,
    /// Show where a path dispatches to
    Resolve { path: String },
    /// Build the path of a named route, e.g. `reverse item-detail id=42`
    Reverse {
        name: String,
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let from_file = cli.config.exists();
    let config = if from_file {
        load_config(&cli.config)?
    } else {
        SiteConfig::default()
    };

    logging::init_logging(&config.observability)?;
    if from_file {
        tracing::info!(path = ?cli.config, "Configuration loaded");
    } else {
        tracing::warn!(path = ?cli.config, "Config file not found, using defaults");
    }

    match cli.command.unwrap_or(Command::Serve { no_watch: false }) {
        Command::Serve { no_watch } => serve(cli.config, config, from_file && !no_watch).await,
        Command::Check => {
            let table = build_routes(&config)?;
            println!("{} top-level rules", table.len());
            for route in table.named_routes() {
                println!("{:<32} /{}", route.name, route.pattern);
            }
            Ok(())
        }
        Command::Resolve { path } => {
            let table = build_routes(&config)?;
            let path = path.strip_prefix('/').unwrap_or(&path);
            let report = match table.dispatch(path) {
                Dispatch::Matched(m) => json!({
                    "matched": true,
                    "route": m.qualified_name(),
                    "endpoint": format!("{:?}", m.endpoint),
                    "params": m.params.iter().collect::<Vec<_>>(),
                    "remaining": m.remaining,
                    "trail": m.trail,
                }),
                Dispatch::NotFound => json!({ "matched": false }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Reverse { name, params } => {
            let table = build_routes(&config)?;
            let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            println!("/{}", table.reverse(&name, &pairs)?);
            Ok(())
        }
    }
}

async fn serve(path: PathBuf, config: SiteConfig, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        admin_prefix = %config.admin.prefix,
        app_prefix = %config.app.prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "site-router v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server or reloads stop.
    let (_watcher, config_updates) = if watch {
        let (watcher, updates) = ConfigWatcher::new(&path);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
