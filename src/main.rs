//! Tictactoe - unified CLI
//!
//! Each invocation opens the store, applies one command, and renders the
//! resulting snapshot. `watch` keeps running and re-renders on external
//! changes.

#![warn(missing_docs)]

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use serde_json::json;
use tictactoe_store::{ChangeWatcher, MoveError, Position, Store, StoreConfig, render};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut store = open_store(&config)?;

    match cli.command {
        Command::Show { json } => show(&store, json),
        Command::Move { square } => play(&mut store, square),
        Command::NewRound => {
            store.new_round();
            print!("{}", render::render(&store.game(), &store.stats()));
            Ok(())
        }
        Command::Reset => {
            store.reset();
            print!("{}", render::render(&store.game(), &store.stats()));
            Ok(())
        }
        Command::Clear => {
            store.clear();
            print!("{}", render::render(&store.game(), &store.stats()));
            Ok(())
        }
        Command::Watch { interval_ms } => watch(store, Duration::from_millis(interval_ms)).await,
    }
}

/// Builds the effective config: file (if any), then CLI overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StoreConfig::default(),
    };

    let mut storage = config.storage().clone();
    if let Some(backend) = cli.backend {
        storage = storage.with_backend(backend);
    }
    if let Some(path) = &cli.path {
        storage = storage.with_path(path.clone());
    }
    config = config.with_storage(storage);

    info!(
        backend = %config.storage().backend(),
        path = %config.storage().path(),
        key = %config.storage_key(),
        "Effective configuration"
    );
    Ok(config)
}

/// Opens the configured backend and the store over it.
fn open_store(config: &StoreConfig) -> Result<Store> {
    let storage = config.storage().open().context("opening storage")?;
    let store = Store::with_config(storage, config).context("building store")?;
    Ok(store)
}

fn show(store: &Store, as_json: bool) -> Result<()> {
    if as_json {
        let snapshot = json!({
            "game": store.game(),
            "stats": store.stats(),
            "roundStats": store.round_stats(),
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::render(&store.game(), &store.stats()));
    }
    Ok(())
}

/// Cell selected: occupied squares and finished rounds are ignored.
#[instrument(skip(store))]
fn play(store: &mut Store, square: usize) -> Result<()> {
    let position = Position::try_from(square)?;

    match store.player_move(position) {
        Ok(()) => {}
        Err(MoveError::SquareOccupied(_)) => {
            let open: Vec<String> = Position::valid_moves(&store.game().board())
                .iter()
                .map(|pos| pos.to_index().to_string())
                .collect();
            println!("Square {} is taken; open squares: {}.", square, open.join(", "));
        }
        Err(MoveError::GameOver) => {
            println!("The round is over; run `tictactoe new-round` to play again.");
        }
    }

    print!("{}", render::render(&store.game(), &store.stats()));
    Ok(())
}

/// Renders now and again after every external change, until Ctrl-C.
async fn watch(mut store: Store, interval: Duration) -> Result<()> {
    store.subscribe(|store| {
        // Clear screen and home the cursor before each full re-render.
        print!("\x1b[2J\x1b[H{}", render::render(&store.game(), &store.stats()));
    });

    print!("\x1b[2J\x1b[H{}", render::render(&store.game(), &store.stats()));

    let mut watcher = ChangeWatcher::new(store.storage(), store.key())?;
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match watcher.poll(store.storage()) {
                    Ok(true) => {
                        info!("State changed in another process");
                        store.reload();
                    }
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "Failed to poll storage"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; leaving watch mode");
                break;
            }
        }
    }

    Ok(())
}
