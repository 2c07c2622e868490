use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Optional `[network]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Total per-request timeout in seconds. No timeout when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Route every request through this proxy.
    #[serde(default)]
    pub proxy: Option<String>,
}

/// Run configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory downloads are written into. Expected to exist already.
    pub target_dir: PathBuf,
    pub network: NetworkConfig,
}

// Both levels optional so a missing section and a missing key can be told apart.
#[derive(Deserialize)]
struct RawConfig {
    output: Option<RawOutput>,
    #[serde(default)]
    network: NetworkConfig,
}

#[derive(Deserialize)]
struct RawOutput {
    target_dir: Option<PathBuf>,
}

/// Parse config text; `path` is only used for error messages.
pub fn parse(text: &str, path: &Path) -> Result<Config> {
    let raw: RawConfig = toml::from_str(text).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    let output = raw.output.ok_or_else(|| Error::ConfigSection {
        path: path.to_path_buf(),
        section: "output",
    })?;
    let target_dir = output.target_dir.ok_or_else(|| Error::ConfigKey {
        path: path.to_path_buf(),
        section: "output",
        key: "target_dir",
    })?;

    Ok(Config {
        target_dir,
        network: raw.network,
    })
}

/// Load configuration from `path`.
pub fn load(path: &Path) -> Result<Config> {
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: <toml::de::Error as serde::de::Error>::custom(e),
    })?;
    let cfg = parse(&text, path)?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}
