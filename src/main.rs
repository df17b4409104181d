//! branchfinder
//!
//! Dev server for the bank branch lookup application.
//!
//! ```text
//! branchfinder serve              # serve dist/ and proxy /api
//! branchfinder resolve /004/0037  # show how a path resolves
//! branchfinder rewrite /api/banks # show where a request is forwarded
//! branchfinder init-config        # print the default config file
//! ```
//!
//! The proxy target comes from `VITE_API_URL`, set in the environment or in
//! a `.env` file. `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use branchfinder::config::{generate_default_config, Config, LogFormat, LoggingConfig};
use branchfinder::router::RouteTable;
use branchfinder::server::{serve, AppState};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "branchfinder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dev server for the bank branch lookup app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ./branchfinder.toml or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dev server (default)
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve a browser path against the route table
    Resolve {
        /// Path such as /004/0037/Taipei
        path: String,
    },

    /// Show how the proxy rule treats a request path
    Rewrite {
        /// Path such as /api/branches/001?page=2
        path: String,
    },

    /// Print the default configuration file
    InitConfig,
}

/// Output of the `rewrite` command
#[derive(Serialize)]
struct RewriteReport {
    path: String,
    proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewritten: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forward_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::discover);
    let mut config = match &config_path {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            init_tracing(&config.logging);
            tracing::info!("Starting branchfinder v{}", env!("CARGO_PKG_VERSION"));
            match &config_path {
                Some(path) => tracing::info!("Loaded config from {:?}", path),
                None => tracing::info!("Using default config with environment overrides"),
            }
            tracing::info!("Serving files from {:?}", config.static_files.root);

            let state = AppState::from_config(&config).context("Invalid dev server configuration")?;
            serve(state, &config.server).await?;
        }

        Commands::Resolve { path } => {
            let routes = RouteTable::branch_lookup()?;
            println!("{}", serde_json::to_string_pretty(&routes.resolve(&path))?);
        }

        Commands::Rewrite { path } => {
            let rule = config.proxy_rule()?;
            let (path_only, query) = match path.split_once('?') {
                Some((p, q)) => (p, Some(q)),
                None => (path.as_str(), None),
            };

            let report = if rule.matches(path_only) {
                RewriteReport {
                    path: path.clone(),
                    proxied: true,
                    rewritten: Some(rule.rewrite(path_only).to_string()),
                    forward_url: Some(rule.forward_url(path_only, query)?.to_string()),
                    host: rule.outbound_host(None),
                }
            } else {
                RewriteReport {
                    path: path.clone(),
                    proxied: false,
                    rewritten: None,
                    forward_url: None,
                    host: None,
                }
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "branchfinder={level},tower_http={level}",
            level = logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
