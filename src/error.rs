//! Planner error taxonomy

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// A user-supplied value is outside the accepted domain
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A GPU model name that the preset table does not know
    #[error("unknown GPU model '{name}', available: {available:?}")]
    UnknownPreset { name: String, available: Vec<String> },

    #[error("failed to parse {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlannerError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PlannerError::InvalidArgument { .. })
    }
}
