// Runtime configuration: command line first, then environment, then defaults

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use std::path::PathBuf;

use crate::credentials::DEFAULT_TOKEN_BYTES;

pub const ENV_STATE_PATH: &str = "TOXBRIDGE_STATE_PATH";
pub const ENV_LOG_FILE: &str = "TOXBRIDGE_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "TOXBRIDGE_LOG_LEVEL";

const STATE_DIR: &str = ".toxbridge";
const STATE_FILE: &str = "state.tox";

/// Values given explicitly on the command line
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub state_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub token_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Where the core state is loaded from and saved to. May be empty, in
    /// which case every load and save fails with `EmptyPath`.
    pub state_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub token_bytes: usize,
}

impl BridgeConfig {
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for environment variables
    pub fn resolve_with<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_path = match overrides.state_path.or_else(|| lookup(ENV_STATE_PATH).map(PathBuf::from)) {
            Some(path) => path,
            None => default_state_path()?,
        };

        let log_file = overrides.log_file.or_else(|| lookup(ENV_LOG_FILE).map(PathBuf::from));

        let log_level = match overrides.log_level.or_else(|| lookup(ENV_LOG_LEVEL)) {
            Some(level) => level
                .parse::<LevelFilter>()
                .with_context(|| format!("Invalid log level {:?}", level))?,
            None => LevelFilter::Info,
        };

        Ok(BridgeConfig {
            state_path,
            log_file,
            log_level,
            token_bytes: overrides.token_bytes.unwrap_or(DEFAULT_TOKEN_BYTES),
        })
    }
}

/// `<home>/.toxbridge/state.tox`
pub fn default_state_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(STATE_DIR).join(STATE_FILE))
}
