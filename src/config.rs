//! Host configuration read from the environment.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `STACKFALL_SEED` | piece stream seed (unset: random) |
//! | `STACKFALL_LEVEL` | starting level (unset: 0) |
//! | `STACKFALL_LOG` | log file path (unset: `stackfall.log`) |
//!
//! Log verbosity follows `RUST_LOG`.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::core::SessionConfig;

pub const SEED_VAR: &str = "STACKFALL_SEED";
pub const LEVEL_VAR: &str = "STACKFALL_LEVEL";
pub const LOG_VAR: &str = "STACKFALL_LOG";

const DEFAULT_LOG_PATH: &str = "stackfall.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub session: SessionConfig,
    pub log_path: PathBuf,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset and empty values take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let seed = var(SEED_VAR).map(|v| parse(SEED_VAR, &v)).transpose()?;
        let start_level = var(LEVEL_VAR)
            .map(|v| parse(LEVEL_VAR, &v))
            .transpose()?
            .unwrap_or(0);
        let log_path = var(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());

        Ok(Self {
            session: SessionConfig { seed, start_level },
            log_path: PathBuf::from(log_path),
        })
    }
}

fn parse<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid {name}: {value:?}"))
}
