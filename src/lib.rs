//! HPL parameter planner
//!
//! Derives `Ns`, `NBs`, `Ps` and `Qs` for an HPL run on a GPU cluster from the
//! number of GPUs, the memory of each GPU, and the share of that memory the
//! matrix is allowed to take.

/// Problem size and process grid analysis
pub mod analysis;

/// Planner defaults: utilization, block size, reserve factor
pub mod config;

/// Hardware environment: cluster shape, memory units, GPU presets
pub mod environment;

/// Planner errors
pub mod error;

/// Composition of the analyses into HPL.dat values
pub mod orchestration;

/// Public API: Python
pub mod api;

pub use analysis::problem_size::{
    estimate_problem_size, estimate_problem_size_with_reserve, MemoryBudget, ReserveFactor,
};
pub use analysis::process_grid::{best_process_grid, ProcessGrid};
pub use config::PlannerConfig;
pub use environment::cluster::Cluster;
pub use environment::presets::GpuPresets;
pub use error::{PlannerError, Result};
pub use orchestration::derive::{
    derive_parameters, derive_parameters_with_reserve, HplParameters, Planner,
};
pub use orchestration::sweep::{sweep_presets, PresetPlan};
