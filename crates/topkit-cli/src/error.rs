use std::path::PathBuf;
use thiserror::Error;
use topkit::parser::TopologyError;
use topkit::workflows::load::ConfigLoadError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    ConfigLoad(#[from] ConfigLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
