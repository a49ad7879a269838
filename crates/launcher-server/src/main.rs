//! Game Launcher Server - starts and stops one game executable over HTTP.
//!
//! Running the binary with no flags binds `0.0.0.0:5001` and manages the
//! platform default executable. Every flag can also be set through the
//! environment.

use anyhow::Result;
use clap::Parser;
use game_launcher_core::config::{
    default_executable, DEFAULT_GAME_NAME, DEFAULT_PORT, EXECUTABLE_ENV, GAME_NAME_ENV,
    STRATEGY_ENV,
};
use game_launcher_core::{platform, LaunchStrategy, LauncherConfig};
use game_launcher_server::{start_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "game-launcher-server")]
#[command(about = "HTTP control plane for launching and closing a game")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, env = "GAME_LAUNCHER_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "GAME_LAUNCHER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Absolute path to the game executable
    #[arg(long, env = EXECUTABLE_ENV)]
    executable: Option<PathBuf>,

    /// Game name used in response messages
    #[arg(long, env = GAME_NAME_ENV, default_value = DEFAULT_GAME_NAME)]
    game_name: String,

    /// Launch strategy: direct or shell
    #[arg(long, env = STRATEGY_ENV, default_value = "direct")]
    strategy: LaunchStrategy,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting game launcher server on {}", platform::current_platform());

    let config = LauncherConfig::new(args.executable.unwrap_or_else(default_executable))
        .with_game_name(args.game_name)
        .with_strategy(args.strategy);
    config.validate()?;

    info!("Game executable: {}", config.executable.display());
    info!("Launch strategy: {}", config.strategy);
    if config.strategy == LaunchStrategy::Shell {
        info!("Shell strategy: launches run on a background thread, close kills by executable name");
    }

    let state = Arc::new(AppState::new(&config));
    let addr = start_server(state, &args.host, args.port).await?;

    // Print port for the parent process to read (intentional stdout for IPC)
    println!("LAUNCHER_PORT={}", addr.port());

    info!("Endpoints:");
    info!("  GET  /health - server health");
    info!("  POST /launch - launch {}", config.game_name);
    info!("  POST /close  - stop {}", config.game_name);
    info!("  GET  /status - managed process state");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
