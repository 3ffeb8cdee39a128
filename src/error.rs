use std::path::PathBuf;

use thiserror::Error;

use crate::upgrades::UpgradeKey;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PurchaseError {
    #[error("cannot afford {key:?}: costs {cost}, balance is {balance}")]
    InsufficientFunds {
        key: UpgradeKey,
        cost: u32,
        balance: f32,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
