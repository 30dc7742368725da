//! GPU memory presets
//!
//! Maps a GPU model name to the usable device memory in MiB, as reported by the
//! driver. The table is a plain value handed to whoever needs it; nothing in the
//! planning core reads it.

use crate::error::{PlannerError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Built-in device memory sizes (MiB)
pub const BUILTIN_PRESETS: &[(&str, u64)] = &[
    ("NVIDIA B100/200 192GB", 183359),
    ("NVIDIA H200 141GB", 143771),
    ("NVIDIA H100 80GB", 81559),
    ("NVIDIA A100 80GB", 81920),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GpuPresets {
    models: BTreeMap<String, u64>,
}

impl GpuPresets {
    pub fn new() -> GpuPresets {
        GpuPresets::default()
    }

    pub fn builtin() -> GpuPresets {
        BUILTIN_PRESETS.iter().map(|(n, m)| (n.to_string(), *m)).collect()
    }

    /// Parse a JSON object of `"model name": mib` pairs
    pub fn from_json_str(s: &str) -> std::result::Result<GpuPresets, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<GpuPresets> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PlannerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        GpuPresets::from_json_str(&raw).map_err(|source| PlannerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Insert or replace a model, returning the previous size if any
    pub fn insert(&mut self, model: impl Into<String>, mib: u64) -> Option<u64> {
        self.models.insert(model.into(), mib)
    }

    /// Entries of `other` win over entries already present
    pub fn merge(&mut self, other: GpuPresets) {
        self.models.extend(other.models);
    }

    pub fn memory_mib(&self, model: &str) -> Option<u64> {
        self.models.get(model).copied()
    }

    /// Like `memory_mib`, but an unknown model is an error listing the known ones
    pub fn require(&self, model: &str) -> Result<u64> {
        self.memory_mib(model)
            .ok_or_else(|| PlannerError::UnknownPreset {
                name: model.to_string(),
                available: self.names().map(String::from).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.models.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// One `name: size MiB` line per model, name column padded
    pub fn pretty_print(&self) -> String {
        let width = self.names().map(str::len).max().unwrap_or(0);
        self.iter()
            .map(|(name, mib)| format!("{:width$}  {:>8} MiB", name, mib, width = width))
            .join("\n")
    }
}

impl FromIterator<(String, u64)> for GpuPresets {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        GpuPresets {
            models: iter.into_iter().collect(),
        }
    }
}
