//! Main entry point for the mealshare service.
//!
//! This binary wires the configured store backend to the order service and
//! serves the HTTP API. Backends are pluggable through the same
//! registry/factory scheme the store crate exposes.

use clap::Parser;
use mealshare_config::Config;
use mealshare_store::{MealStore, StoreFactory};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod server;

/// Command-line arguments for the mealshare service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the mealshare service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the store from the configured backend
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	// Load configuration
	let config = Config::from_file(&args.config)?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let store = Arc::new(build_store(&config)?);

	let api_config = match config.api {
		Some(api) if api.enabled => api,
		_ => {
			tracing::warn!("API server is disabled in configuration; nothing to serve");
			return Ok(());
		}
	};

	server::start_server(api_config, store).await?;

	tracing::info!("Stopped mealshare service");
	Ok(())
}

/// Builds the meal store from the configured backend implementation.
///
/// All registered backends are collected into a factory map keyed by their
/// configuration name, and the configured primary is instantiated with its
/// own configuration section.
fn build_store(config: &Config) -> Result<MealStore, Box<dyn std::error::Error>> {
	let factories: HashMap<&'static str, StoreFactory> =
		mealshare_store::get_all_implementations().into_iter().collect();

	let primary = config.storage.primary.as_str();
	let factory = factories
		.get(primary)
		.ok_or_else(|| format!("Unknown storage implementation: {}", primary))?;

	let backend_config = config
		.storage
		.implementations
		.get(primary)
		.ok_or_else(|| format!("Missing configuration for storage '{}'", primary))?;

	let backend = factory(backend_config)?;
	Ok(MealStore::new(backend))
}
