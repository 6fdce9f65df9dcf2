use anyhow::Context;
use clap::{Parser, Subcommand};
use postback_relay::{logging, metrics, server, PostbackParams, PostbackUseCase, RelayConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "postback_relay")]
#[command(about = "Relays affiliate postbacks to a tracker as derived conversion events")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true, env = "POSTBACK_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Also write JSON diagnostics to a daily-rotated file in this directory
    #[arg(long, global = true, env = "POSTBACK_TRACE_DIR")]
    trace_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP postback endpoint
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Process a single postback given as a query string and print the report
    Fire {
        /// e.g. "clickid=abc123&sum=12.5&type=purchase"
        #[arg(long)]
        query: String,
        /// Only print the planned outbound URLs; send nothing, log nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and validate the configuration, then print the effective values
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.trace_dir.as_deref());

    let mut config = RelayConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            metrics::init_metrics();
            let use_case = Arc::new(PostbackUseCase::from_config(&config)?);
            info!(
                threshold = config.relay.value_threshold,
                timeout_secs = config.relay.timeout_seconds,
                log_enabled = config.log.enabled,
                "Starting postback relay"
            );
            server::start_server(&config, use_case).await?;
        }
        Commands::Fire { query, dry_run } => {
            let use_case = PostbackUseCase::from_config(&config)?;
            let params = PostbackParams::from_query_string(&query);

            if dry_run {
                match use_case.plan(&params) {
                    Ok(planned) => {
                        for (i, (event, url)) in planned.iter().enumerate() {
                            println!("[{}/{}] {} -> {}", i + 1, planned.len(), event.category, url);
                        }
                    }
                    Err(e) => println!("Rejected: {}", e),
                }
            } else {
                let body = use_case.handle(&params).await.body();
                if body.ends_with('\n') {
                    print!("{}", body);
                } else {
                    println!("{}", body);
                }
            }
        }
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
