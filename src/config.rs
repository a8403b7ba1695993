//! Runtime configuration
//!
//! Values come from explicit overrides first, then environment variables,
//! then built-in defaults.

use anyhow::{anyhow, Result};
use log::warn;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

// Environment variable names
const ENV_DB: &str = "FIELDOPS_DB";
const ENV_YIELD_EVERY: &str = "FIELDOPS_YIELD_EVERY";
const ENV_PAGE_SIZE: &str = "FIELDOPS_PAGE_SIZE";

/// Lines parsed between cooperative yields during an import.
pub const DEFAULT_YIELD_EVERY: usize = 800;
/// Initial visible-window size and the amount each load-more adds.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub yield_every: usize,
    pub page_size: usize,
}

impl Config {
    /// Load configuration. `db_override` wins over `FIELDOPS_DB`.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(db_override, |key| env::var_os(key))
    }

    fn from_lookup<F>(db_override: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let db_path = match db_override.or_else(|| lookup(ENV_DB).map(PathBuf::from)) {
            Some(path) => path,
            None => default_db_path()?,
        };

        Ok(Self {
            db_path,
            yield_every: lookup_usize(&lookup, ENV_YIELD_EVERY, DEFAULT_YIELD_EVERY),
            page_size: lookup_usize(&lookup, ENV_PAGE_SIZE, DEFAULT_PAGE_SIZE),
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
    Ok(config_dir.join("fieldops").join("fieldops.db"))
}

fn lookup_usize<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<OsString>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    let raw = raw.to_string_lossy();
    parse_positive(&raw).unwrap_or_else(|| {
        warn!("ignoring {}={:?}: expected a positive integer", key, raw);
        default
    })
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
