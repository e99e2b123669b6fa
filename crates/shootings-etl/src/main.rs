//! `shootings`: load the NYPD shooting-incident and precinct files into a
//! normalized SQLite store.
//!
//! # Usage
//!
//! ```
//! shootings --incidents NYPD_Shooting_Incident_Data.csv \
//!           --precincts precincts.csv --store shootings.db
//! shootings --config ~/.config/shootings/config.toml --dry-run --report-json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use shootings_etl::{EtlConfig, RunSummary};
use shootings_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Normalize NYPD shooting data into SQLite")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Incident CSV; overrides `incidents_path`.
  #[arg(long, value_name = "FILE")]
  incidents: Option<PathBuf>,

  /// Precinct CSV; overrides `precincts_path`.
  #[arg(long, value_name = "FILE")]
  precincts: Option<PathBuf>,

  /// SQLite database; overrides `store_path`.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Normalize and report without opening the store.
  #[arg(long)]
  dry_run: bool,

  /// Print the run summary as JSON on stdout.
  #[arg(long)]
  report_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  // File, then environment, then flags.
  let mut builder = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("SHOOTINGS"));
  for (key, value) in [
    ("incidents_path", &cli.incidents),
    ("precincts_path", &cli.precincts),
    ("store_path", &cli.store),
  ] {
    if let Some(path) = value {
      builder = builder
        .set_override(key, path.to_string_lossy().into_owned())
        .context("failed to apply command-line override")?;
    }
  }
  if cli.dry_run {
    // A dry run never touches the store, so it need not be configured.
    builder = builder
      .set_default("store_path", "")
      .context("failed to set store_path default")?;
  }

  let cfg: EtlConfig = builder
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise EtlConfig")?;

  let incidents_path = expand_tilde(&cfg.incidents_path);
  let precincts_path = expand_tilde(&cfg.precincts_path);

  let (incidents, precincts) =
    shootings_etl::extract_paths(&incidents_path, &precincts_path)
      .context("failed to read source files")?;

  let summary: RunSummary = if cli.dry_run {
    shootings_etl::run::<SqliteStore>(None, &incidents, &precincts, true).await?
  } else {
    let store_path = expand_tilde(&cfg.store_path);
    let store = SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?;
    shootings_etl::run(
      Some(&store),
      &incidents,
      &precincts,
      cfg.require_empty_store,
    )
    .await
    .with_context(|| format!("failed to load {store_path:?}"))?
  };

  if cli.report_json {
    let json = serde_json::to_string_pretty(&summary)
      .context("failed to serialise run summary")?;
    println!("{json}");
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
