//! Planner defaults

use crate::analysis::problem_size::{check_utilization, ReserveFactor};
use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_UTILIZATION: f64 = 0.95;
pub const DEFAULT_BLOCK_SIZE: u64 = 2048;

/// Inputs that stay fixed across clusters
///
/// Missing fields in a JSON config fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub utilization: f64,
    pub block_size: u64,
    pub reserve_factor: ReserveFactor,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            utilization: DEFAULT_UTILIZATION,
            block_size: DEFAULT_BLOCK_SIZE,
            reserve_factor: ReserveFactor::NONE,
        }
    }
}

impl PlannerConfig {
    /// 99% utilization with 10% of it held back as runtime workspace
    pub fn with_workspace_reserve() -> PlannerConfig {
        PlannerConfig {
            utilization: 0.99,
            block_size: DEFAULT_BLOCK_SIZE,
            reserve_factor: ReserveFactor::WORKSPACE,
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<PlannerConfig> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PlannerConfig =
            serde_json::from_str(&raw).map_err(|source| PlannerError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_utilization(self.utilization)?;
        if self.block_size == 0 {
            return Err(PlannerError::invalid("block_size", "must be positive"));
        }
        Ok(())
    }
}
