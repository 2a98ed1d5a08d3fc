//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `restaurant_core` linkage with deterministic output.
//! - Optionally drive one in-process screen session end to end (`--demo`).

use clap::Parser;
use restaurant_core::{
    init_logging, load_config, CoreConfig, HomeScreen, LogNavigator, LogNotifier,
    MemoryRemoteStore, ModalAction, PreferenceService, PreferenceStore, RemoteStore,
    SqlitePreferenceStore,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "restaurant_cli")]
#[command(about = "Smoke checks for the restaurant home-screen core")]
#[command(version)]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Absolute directory for log files; overrides the config value.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Run a scripted screen session against in-process stores.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    println!("restaurant_core ping={}", restaurant_core::ping());
    println!("restaurant_core version={}", restaurant_core::core_version());

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CoreConfig::default(),
    };
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
        config.validate()?;
    }
    if let Some(dir) = &config.log_dir {
        init_logging(&config.log_level, &dir.to_string_lossy())?;
    }

    if cli.demo {
        run_demo(&config).await?;
    }
    Ok(())
}

async fn run_demo(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let prefs: Arc<dyn PreferenceStore> = match &config.preferences_db {
        Some(path) => Arc::new(SqlitePreferenceStore::open(path)?),
        None => Arc::new(SqlitePreferenceStore::open_in_memory()?),
    };
    let remote = Arc::new(MemoryRemoteStore::new());
    let cafe = remote.add(
        &config.collection,
        fields(json!({
            "name": "Cafe",
            "notes": "flat white\nwindow seat",
            "images": ["cafe.jpg"],
            "showReviews": true
        })),
    )?;
    remote.add(
        &config.collection,
        fields(json!({ "name": "Noodle Bar", "showReviews": false })),
    )?;

    let mut screen = HomeScreen::new(
        config,
        Arc::clone(&remote) as Arc<dyn RemoteStore>,
        Arc::clone(&prefs),
        Arc::new(LogNavigator),
        Arc::new(LogNotifier),
    );
    screen.mount().await?;
    let mut generation = screen.wait_for_generation(1).await.map_or(0, |s| s.generation);
    print_rows(&screen);

    PreferenceService::new(Arc::clone(&prefs))
        .set_show_reviews(&cafe, false)
        .await?;
    // Local overrides surface with the next pushed snapshot.
    if let Some(current) = remote.get(&config.collection, &cafe) {
        remote.set(&config.collection, &cafe, current)?;
    }
    generation = screen
        .wait_for_generation(generation + 1)
        .await
        .map_or(generation, |s| s.generation);
    print_rows(&screen);

    screen.toggle_edit_mode();
    if screen.request_edit(&cafe)? {
        let report = screen.modal_action(ModalAction::Delete).await?;
        println!("deleted={report:?}");
    }
    screen.wait_for_generation(generation + 1).await;
    print_rows(&screen);

    screen.unmount().await;
    println!("subscriptions_after_unmount={}", remote.subscriber_count());
    Ok(())
}

fn print_rows(screen: &HomeScreen) {
    let view = screen.view();
    println!("{} [{}]", view.title, view.edit_button_label);
    for (row, restaurant) in view.rows.iter().zip(screen.restaurants()) {
        println!(
            "  {} name={:?} show_reviews={} thumbnail={:?}",
            row.id, row.name, restaurant.show_reviews, row.thumbnail
        );
    }
}

fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}
