//! CLI functionality for the quickeval tool
//!
//! This module contains all CLI-related functionality including:
//! - Configuration merging (file, then flags)
//! - One-shot commands (eval, parse, classify)
//! - REPL
//! - Output formatting

pub mod commands;
pub mod output;
pub mod repl;

use crate::config::QueryEngineConfig;
use anyhow::{Context, Result};
use quickeval_types::AngleUnit;
use std::path::PathBuf;
use tracing::debug;

/// Engine settings gathered from the command line
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub config_file: Option<PathBuf>,
    pub precision: Option<u32>,
    pub angle_unit: Option<AngleUnit>,
}

impl EngineOptions {
    /// Load the config file if given, then apply flag overrides and validate
    /// the merged result
    pub fn resolve(&self) -> Result<QueryEngineConfig> {
        let mut config = match &self.config_file {
            Some(path) => QueryEngineConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => QueryEngineConfig::default(),
        };
        if let Some(precision) = self.precision {
            config.engine.precision = precision;
        }
        if let Some(angle_unit) = self.angle_unit {
            config.engine.angle_unit = angle_unit;
        }
        config.validate().context("Invalid configuration")?;
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}
