// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Plan configuration via `streamplan.yaml`.

use crate::core::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables shared by the logical and physical plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Upper bound on physical operators packed into one new container.
    pub max_operators_per_container: usize,
    /// Partition count given to operators that don't set one explicitly.
    pub default_partition_count: usize,
    /// Reject streams whose source and sink ports declare different data types.
    pub strict_port_types: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_operators_per_container: 1,
            default_partition_count: 1,
            strict_port_types: true,
        }
    }
}

impl PlanConfig {
    /// Configuration file name.
    pub const FILE_NAME: &'static str = "streamplan.yaml";

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| PlanError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory. Returns error if the file is
    /// missing, cannot be parsed, or holds invalid values.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        let content = std::fs::read_to_string(&config_path)?;

        let config = Self::from_yaml_str(&content).map_err(|e| {
            PlanError::Configuration(format!("{}: {}", config_path.display(), e))
        })?;

        tracing::info!("Loaded plan config from {}", config_path.display());
        Ok(config)
    }

    /// Load configuration from a directory, returning defaults if the file is
    /// missing or unusable.
    pub fn load_or_default(dir: &Path) -> Self {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(
                "No {} found in {}, using defaults",
                Self::FILE_NAME,
                dir.display()
            );
            return Self::default();
        }

        match Self::load(dir) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_operators_per_container == 0 {
            return Err(PlanError::Configuration(
                "max_operators_per_container must be at least 1".into(),
            ));
        }
        if self.default_partition_count == 0 {
            return Err(PlanError::Configuration(
                "default_partition_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlanConfig::default();
        assert_eq!(config.max_operators_per_container, 1);
        assert_eq!(config.default_partition_count, 1);
        assert!(config.strict_port_types);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PlanConfig::from_yaml_str("max_operators_per_container: 4\n").unwrap();
        assert_eq!(config.max_operators_per_container, 4);
        assert_eq!(config.default_partition_count, 1);
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = PlanConfig::from_yaml_str("default_partition_count: 0\n").unwrap_err();
        assert!(matches!(err, PlanError::Configuration(_)));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PlanConfig::FILE_NAME),
            "max_operators_per_container: 2\nstrict_port_types: false\n",
        )
        .unwrap();

        let config = PlanConfig::load(dir.path()).unwrap();
        assert_eq!(config.max_operators_per_container, 2);
        assert!(!config.strict_port_types);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlanConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
        assert_eq!(PlanConfig::load_or_default(dir.path()), PlanConfig::default());
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PlanConfig::FILE_NAME), ": : :\n- [").unwrap();
        assert_eq!(PlanConfig::load_or_default(dir.path()), PlanConfig::default());
    }
}
