//! Runtime configuration, layered from an optional TOML file and
//! `MATHSWITCH_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use mathswitch_core::materialize::SourcePriority;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
  pub store_path:      PathBuf,
  pub host:            String,
  pub port:            u16,
  /// Source codes in canonical-name order, e.g. `["Wd", "WpEN", "nL"]`.
  pub source_priority: SourcePriority,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:      PathBuf::from("mathswitch.db"),
      host:            "127.0.0.1".into(),
      port:            8000,
      source_priority: SourcePriority::default(),
    }
  }
}

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MATHSWITCH"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
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
