//! Batch configuration file
//!
//! ```yaml
//! dataBundle: AcmeDataBundle
//! apiBundle: AcmeApiBundle
//! routePrefix: api
//! test: no-authentication
//! entities:
//!   Post: ~
//!   Comment:
//!     parents: [Post]
//!     exclude: [delete]
//! ```

use crate::error::{Result, ScaffoldError};
use crate::format::{RouteFormat, ServiceFormat, TestMode};
use crate::fs_utils;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Per-entity settings of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityConfig {
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Top-level batch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchConfig {
    /// Bundle holding the entities
    pub data_bundle: String,
    /// Bundle receiving the generated code, the data bundle when absent
    #[serde(default)]
    pub api_bundle: Option<String>,
    #[serde(default)]
    entities: IndexMap<String, Option<EntityConfig>>,
    #[serde(default)]
    pub route_prefix: Option<String>,
    #[serde(default)]
    pub route_format: Option<RouteFormat>,
    #[serde(default)]
    pub service_format: Option<ServiceFormat>,
    #[serde(default)]
    pub test: Option<TestMode>,
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_utils::read_to_string(path)?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| ScaffoldError::yaml(path, content, &e))?;
        if config.data_bundle.trim().is_empty() {
            return Err(ScaffoldError::config(format!(
                "{}: dataBundle must not be empty",
                path.display()
            )));
        }
        if config.entities.is_empty() {
            return Err(ScaffoldError::config(format!(
                "{}: no entities to generate",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn api_bundle(&self) -> &str {
        self.api_bundle.as_deref().unwrap_or(&self.data_bundle)
    }

    /// Entities in file order, with empty settings for `Name: ~`
    pub fn entities(&self) -> impl Iterator<Item = (&str, EntityConfig)> {
        self.entities
            .iter()
            .map(|(name, config)| (name.as_str(), config.clone().unwrap_or_default()))
    }
}
