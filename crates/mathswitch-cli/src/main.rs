//! `mathswitch` — import, link, resolve and serve mathematical concepts.
//!
//! # Usage
//!
//! ```text
//! mathswitch import-wikidata Wd=wikidata.json
//! mathswitch import-agda-unimath concept_index.json
//! mathswitch link-same
//! mathswitch resolve
//! mathswitch rebuild --wikidata Wd=wd.json --wikidata nL=nlab.json --agda-unimath index.json
//! mathswitch serve
//! ```
//!
//! Reads `mathswitch.toml` (or the path given with `--config`) and
//! `MATHSWITCH_*` environment variables.

mod commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::{Parser, Subcommand};
use commands::WikidataInput;
use settings::AppConfig;
use mathswitch_core::source::Source;
use mathswitch_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "mathswitch", author, version, about = "Merge mathematical concepts across sources")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "mathswitch.toml")]
  config: PathBuf,

  /// Override the store path from the config file.
  #[arg(long)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import a Wikidata SPARQL result file, reading its rows as SOURCE.
  ImportWikidata {
    /// `SOURCE=FILE`, e.g. `nL=nlab.json`.
    input: WikidataInput,
  },
  /// Import the Agda Unimath concept index.
  ImportAgdaUnimath { file: PathBuf },
  /// Link items whose names agree ignoring case.
  LinkSame,
  /// Merge all items into concepts.
  Resolve,
  /// Delete every item of one source, with its links.
  Clear {
    #[arg(long)]
    source: Source,
  },
  /// Clear, re-import, link and resolve in one go.
  Rebuild {
    /// `SOURCE=FILE`; may be repeated.
    #[arg(long)]
    wikidata:     Vec<WikidataInput>,
    #[arg(long)]
    agda_unimath: Option<PathBuf>,
  },
  /// Show a concept and its items.
  Concept { name: String },
  /// List concepts whose name contains TEXT.
  Search {
    text:  String,
    #[arg(long, default_value_t = 20)]
    limit: usize,
  },
  /// Serve the JSON API under `/api`.
  Serve,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries command output.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = AppConfig::load(&cli.config)?;
  if let Some(path) = cli.store {
    cfg.store_path = path;
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::ImportWikidata { input } => commands::import_wikidata(&store, &input).await,
    Command::ImportAgdaUnimath { file } => commands::import_agda_unimath(&store, &file).await,
    Command::LinkSame => commands::link_same(&store).await,
    Command::Resolve => commands::resolve(&store, &cfg).await,
    Command::Clear { source } => commands::clear(&store, source).await,
    Command::Rebuild { wikidata, agda_unimath } => {
      commands::rebuild(&store, &cfg, &wikidata, agda_unimath.as_deref()).await
    }
    Command::Concept { name } => commands::concept(&store, &name).await,
    Command::Search { text, limit } => commands::search(&store, &text, limit).await,
    Command::Serve => serve(store, &cfg).await,
  }
}

async fn serve(store: SqliteStore, cfg: &AppConfig) -> anyhow::Result<()> {
  let app = Router::new()
    .nest("/api", mathswitch_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
