//! Layered engine configuration: built-in defaults, an optional TOML file,
//! then environment variables (`TPCC_*`), which take precedence over the
//! file. The CLI's own arguments (warehouse count, memory budget, mode,
//! transaction count) are run parameters passed separately to `run()`, not
//! part of this layered config.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TpccError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// B+ tree internal and leaf fanout (shared across all indexes).
    pub index_fanout: usize,
    /// Bytes per compressed block in a cold table's disk tier.
    pub block_size: u32,
    /// zstd dictionary size trained per cold table, in bytes.
    pub dict_size: usize,
    /// How many transactions between throughput/memory reports.
    pub stats_interval: u64,
    /// RNG seed for the driver's data generator and client.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_fanout: 8,
            block_size: 64 * 1024,
            dict_size: 64 * 1024,
            stats_interval: 50_000,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Loads defaults, layers an optional TOML file at `path` if it exists,
    /// then environment variables prefixed `TPCC_` (e.g. `TPCC_BLOCK_SIZE`).
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));
        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        figment = figment.merge(Env::prefixed("TPCC_"));
        figment
            .extract()
            .map_err(|e| TpccError::Argument(format!("invalid configuration: {e}")))
    }
}
