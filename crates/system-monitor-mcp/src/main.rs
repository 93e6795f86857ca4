//! System Monitor MCP Server: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use system_monitor::{collect_snapshot, DataStorage, JsonStore, MonitorData, DEFAULT_SWEEP_INTERVAL};
use system_monitor_mcp::config::{resolve_data_dir, ServerConfig};
use system_monitor_mcp::protocol::ProtocolHandler;
use system_monitor_mcp::tools::{MetricCache, ToolRegistry};
use system_monitor_mcp::transport::StdioTransport;
use system_monitor_mcp::types::{InitializeResult, SERVER_NAME, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "system-monitor-mcp",
    about = "MCP server exposing host CPU, memory, disk, network and process metrics as tools",
    version
)]
struct Cli {
    /// Server name reported on initialize.
    #[arg(long, global = true, default_value = SERVER_NAME)]
    name: String,

    /// Server version reported on initialize.
    #[arg(long, global = true, default_value = SERVER_VERSION)]
    server_version: String,

    /// Directory for saved snapshots (env: SYSTEM_MONITOR_DATA_DIR, default: ./data).
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Disable the metric cache; every tool call samples the system.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities and tools as JSON.
    Info,

    /// Collect a full metric snapshot and save it under KEY.
    Snapshot {
        key: String,
    },

    /// Print a saved snapshot.
    Show {
        key: String,
    },

    /// Delete a saved snapshot.
    Delete {
        key: String,
    },

    /// List saved snapshot keys.
    Keys,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   system-monitor-mcp completions bash > ~/.local/share/bash-completion/completions/system-monitor-mcp
    ///   system-monitor-mcp completions zsh > ~/.zfunc/_system-monitor-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig {
        name: cli.name,
        version: cli.server_version,
        data_dir: resolve_data_dir(cli.data_dir.as_deref()),
        cache_enabled: !cli.no_cache,
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,

        Commands::Info => {
            let handler =
                ProtocolHandler::new(ToolRegistry::with_default_tools(None), config.server_info());
            let result = InitializeResult::new(handler.server_info().clone());
            let info = serde_json::json!({
                "server": result.server_info,
                "protocol_version": result.protocol_version,
                "capabilities": result.capabilities,
                "tools": handler.registry().names(),
                "tool_count": handler.registry().len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Snapshot { key } => {
            let store = JsonStore::open(&config.data_dir)?;
            let data = tokio::task::spawn_blocking(collect_snapshot).await??;
            store.save(&key, &data)?;
            println!(
                "Saved snapshot {key} to {}",
                store.data_dir().join(format!("{key}.json")).display()
            );
        }

        Commands::Show { key } => {
            let store = JsonStore::open(&config.data_dir)?;
            let data: MonitorData = store.load(&key)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Delete { key } => {
            let store = JsonStore::open(&config.data_dir)?;
            store.delete(&key)?;
            println!("Deleted snapshot {key}");
        }

        Commands::Keys => {
            let store = JsonStore::open(&config.data_dir)?;
            for key in store.list_keys()? {
                println!("{key}");
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "system-monitor-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let cache = config.cache_enabled.then(MetricCache::new);
    let _sweeper = cache
        .as_ref()
        .map(|cache| cache.spawn_sweeper(DEFAULT_SWEEP_INTERVAL));

    let registry = ToolRegistry::with_default_tools(cache);
    tracing::info!(
        "{} v{} ready with {} tools",
        config.name,
        config.version,
        registry.len()
    );
    if !config.cache_enabled {
        tracing::info!("Metric cache disabled");
    }

    let handler = ProtocolHandler::new(registry, config.server_info());
    let transport = StdioTransport::new(handler);

    let stop = transport.stop_handle();
    tokio::spawn({
        let stop = stop.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            stop.stop();
        }
    });

    transport.run().await?;
    tracing::info!("Server stopped");

    // A stdin read still parked on its blocking thread would hold the runtime open.
    if stop.is_stopped() {
        std::process::exit(0);
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
