//! Loading of a [Cloud] catalog from YAML.

use std::path::Path;

use crate::{cloud::Cloud, error::CatalogError};

impl Cloud {
    /// Read and validate [Cloud] from YAML file.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(&file).map_err(|source| CatalogError::Io {
            path: file.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate [Cloud] from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let cloud: Cloud = serde_yaml::from_str(content)?;
        cloud.validate()?;
        log::debug!(
            "loaded catalog with {} public and {} private datacenters",
            cloud.public_datacenters.len(),
            cloud.private_datacenters.len()
        );
        Ok(cloud)
    }
}
