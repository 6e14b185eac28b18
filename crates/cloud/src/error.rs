use std::path::PathBuf;

use thiserror::Error;

/// Errors of loading or validating a [Cloud](crate::cloud::Cloud) catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("can't read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid VM type {name} in datacenter {datacenter}: {reason}")]
    InvalidVmType {
        datacenter: String,
        name: String,
        reason: &'static str,
    },
}
