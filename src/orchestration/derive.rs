use crate::analysis::problem_size::{estimate_problem_size_with_reserve, ReserveFactor};
use crate::analysis::process_grid::{best_process_grid, ProcessGrid};
use crate::config::PlannerConfig;
use crate::environment::cluster::Cluster;
use crate::error::Result;
use crate::orchestration::{Orchestrate, OrchestrationResult};
#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Shown under every result; the planner itself never writes HPL.dat
pub const HPL_DAT_REMINDER: &str = "Generate HPL.dat from the NB, Ns, P and Q values above.";

/// The four HPL.dat values derived for one cluster
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HplParameters {
    pub ns: u64,
    pub nb: u64,
    pub ps: u32,
    pub qs: u32,
}

impl HplParameters {
    pub fn grid(&self) -> ProcessGrid {
        ProcessGrid {
            rows: self.ps,
            cols: self.qs,
        }
    }

    /// Cluster cannot hold a single NB x NB block
    pub fn is_degenerate(&self) -> bool {
        self.ns == 0
    }
}

impl fmt::Display for HplParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ns = {}", self.ns)?;
        writeln!(f, "NBs = {}", self.nb)?;
        writeln!(f, "Ps = {}", self.ps)?;
        writeln!(f, "Qs = {}", self.qs)?;
        writeln!(f)?;
        write!(f, "{}", HPL_DAT_REMINDER)
    }
}

impl OrchestrationResult for HplParameters {
    fn pretty_print(&self) -> String {
        self.to_string()
    }
}

pub fn derive_parameters(
    process_count: u32,
    memory_per_process_mib: u64,
    utilization: f64,
    block_size: u64,
) -> Result<HplParameters> {
    derive_parameters_with_reserve(
        process_count,
        memory_per_process_mib,
        utilization,
        block_size,
        ReserveFactor::NONE,
    )
}

pub fn derive_parameters_with_reserve(
    process_count: u32,
    memory_per_process_mib: u64,
    utilization: f64,
    block_size: u64,
    reserve: ReserveFactor,
) -> Result<HplParameters> {
    let cluster = Cluster::new(process_count, memory_per_process_mib);
    let total = cluster.total_memory_bytes()?;
    debug!(
        process_count,
        memory_per_process_mib,
        total_bytes = total,
        "deriving HPL parameters"
    );

    let ns = estimate_problem_size_with_reserve(total, utilization, block_size, reserve)?;
    let grid = best_process_grid(process_count)?;

    Ok(HplParameters {
        ns,
        nb: block_size,
        ps: grid.rows,
        qs: grid.cols,
    })
}

/// Derives parameters for clusters under a fixed `PlannerConfig`
#[derive(Debug, Clone, Default)]
pub struct Planner {
    pub config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Planner {
        Planner { config }
    }

    pub fn derive(&self, cluster: &Cluster) -> Result<HplParameters> {
        derive_parameters_with_reserve(
            cluster.process_count,
            cluster.memory_per_process_mib,
            self.config.utilization,
            self.config.block_size,
            self.config.reserve_factor,
        )
    }
}

impl Orchestrate for Planner {
    type Plan = HplParameters;

    fn orchestrate(&self, cluster: &Cluster) -> Result<HplParameters> {
        self.derive(cluster)
    }
}
