//! Application configuration.
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file says. Every key is optional:
//!
//! ```toml
//! backend = "sqlite"
//! connection_string = "planner.db"
//! log_level = "debug"
//! log_file = "fabric-planner.log"
//!
//! [catalog]
//! fabrics = ["Cotton", "Hemp"]
//! ```
//!
//! A `[catalog]` list that is present replaces the built-in list of the same
//! kind; lists that are left out keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plan_core::Catalog;
use plan_core::db::DbConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub fabrics: Option<Vec<String>>,
    pub processes: Option<Vec<String>>,
    pub stages: Option<Vec<String>>,
}

impl CatalogConfig {
    /// The built-in catalog with the configured lists swapped in.
    pub fn to_catalog(&self) -> Catalog {
        let mut catalog = Catalog::default();
        if let Some(fabrics) = &self.fabrics {
            catalog.fabrics = fabrics.clone();
        }
        if let Some(processes) = &self.processes {
            catalog.processes = processes.clone();
        }
        if let Some(stages) = &self.stages {
            catalog.stages = stages.clone();
        }
        catalog
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub catalog: Option<CatalogConfig>,
}

/// Flag values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub db: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies command-line values on top of the file's.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.backend.is_some() {
            self.backend = overrides.backend;
        }
        if overrides.db.is_some() {
            self.connection_string = overrides.db;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    pub fn db_config(&self) -> DbConfig {
        let defaults = DbConfig::default();
        DbConfig {
            backend: self.backend.clone().unwrap_or(defaults.backend),
            connection_string: self
                .connection_string
                .clone()
                .unwrap_or(defaults.connection_string),
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
            .as_ref()
            .map(CatalogConfig::to_catalog)
            .unwrap_or_default()
    }
}
