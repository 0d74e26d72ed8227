// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Process entry point: parses CLI args, loads the config file, wires up
//! the engine, and runs the admin socket and submap watcher until a
//! shutdown signal arrives.

mod config;
mod listener;
mod protocol;
mod watcher;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use vimap_engine::{Server, ServerDeps};
use vimap_storage::JsonSubmapLoader;

use config::DaemonConfig;
use listener::Listener;

#[derive(Parser, Debug)]
#[command(name = "vimapd", version, about = "Multi-robot visual-inertial mapping server")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "/etc/vimap/vimapd.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = DaemonConfig::load(&args.config).with_context(|| format!("loading config from {}", args.config.display()))?;

    let deps = ServerDeps {
        loader: Arc::new(JsonSubmapLoader),
        runner: Arc::new(vimap_engine::LoggingCommandRunner),
        pose_publisher: Arc::new(vimap_engine::LoggingPoseCorrectionPublisher),
        status_publisher: Some(Arc::new(vimap_engine::LoggingStatusPublisher)),
        visualization_publisher: Arc::new(vimap_engine::NoopVisualizationPublisher),
    };

    let server = Arc::new(Server::new(config.engine_config(), deps));
    server.restore_checkpoint_if_present().context("restoring checkpoint")?;
    server.start().context("starting server")?;

    let admin_listener = Listener::bind(&config.admin_socket_path, Arc::clone(&server)).context("binding admin socket")?;
    tracing::info!(path = %config.admin_socket_path.display(), "admin socket listening");
    let listener_task = tokio::spawn(admin_listener.run());

    let watcher_server = Arc::clone(&server);
    let watch_dir = config.submap_watch_dir.clone();
    let poll_interval = Duration::from_millis(config.submap_watch_interval_ms);
    let default_robot_name = config.default_robot_name.clone();
    let watcher_shutdown = Arc::new(vimap_engine::ShutdownSignal::new());
    let watcher_shutdown_for_thread = Arc::clone(&watcher_shutdown);
    let watcher_handle = std::thread::spawn(move || {
        if let Err(err) = watcher::run(watcher_server, watch_dir, poll_interval, default_robot_name, watcher_shutdown_for_thread) {
            tracing::error!(%err, "submap watcher exited with an error");
        }
    });

    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    tracing::info!("shutdown signal received");

    listener_task.abort();
    watcher_shutdown.trigger();
    let _ = watcher_handle.join();
    server.shutdown().context("shutting down server")?;

    Ok(())
}
