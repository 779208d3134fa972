mod app;
mod blog;
mod config;
mod coordinator;
mod error;
mod event;
mod logging;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "blogtui")]
#[command(about = "A terminal reader and editor for a JSON blog API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/blogtui/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Blog API base URL, e.g. http://localhost:3001
  #[arg(short, long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = logging::init()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override API url if specified on command line
  if let Some(url) = args.url {
    config.api.url = url;
    config.api.base_url()?;
  }
  info!(url = %config.api.url, "configuration loaded");

  // Initialize and run the app
  let mut app = app::App::new(&config)?;
  app.run().await?;

  Ok(())
}
