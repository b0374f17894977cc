//! Query engine configuration

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{CacheError, QueryError, Result};
use quickeval_types::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Evaluator settings plus the result cache size
///
/// Reads flat JSON such as
/// `{"precision": 4, "angleUnit": "Degrees", "cacheCapacity": 50}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryEngineConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    pub cache_capacity: usize,
}

impl Default for QueryEngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl QueryEngineConfig {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.cache_capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.cache_capacity).into());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(quickeval_types::ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| QueryError::io(path, e))?;
        Self::from_json_str(&json).inspect_err(|e| warn!(path = %path.display(), error = %e, "rejected configuration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickeval_types::AngleUnit;

    #[test]
    fn test_flat_json() {
        let config =
            QueryEngineConfig::from_json_str(r#"{"precision": 4, "angleUnit": "Degrees", "cacheCapacity": 5}"#)
                .unwrap();
        assert_eq!(config.engine.precision, 4);
        assert_eq!(config.engine.angle_unit, AngleUnit::Degrees);
        assert_eq!(config.cache_capacity, 5);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = QueryEngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, QueryEngineConfig::default());
        assert_eq!(config.cache_capacity, 100);
    }

    #[test]
    fn test_rejects_zero_capacity_and_bad_precision() {
        assert!(matches!(
            QueryEngineConfig::from_json_str(r#"{"cacheCapacity": 0}"#),
            Err(QueryError::Cache(CacheError::InvalidCapacity(0)))
        ));
        assert!(matches!(
            QueryEngineConfig::from_json_str(r#"{"precision": 30}"#),
            Err(QueryError::Config(_))
        ));
    }
}
