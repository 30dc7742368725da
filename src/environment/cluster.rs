use crate::environment::memory::mib_to_bytes;
use crate::environment::presets::GpuPresets;
use crate::error::{PlannerError, Result};
#[cfg(feature = "python")]
use crate::{analysis::problem_size::ReserveFactor, config::PlannerConfig};
#[cfg(feature = "python")]
use crate::orchestration::derive::{HplParameters, Planner};
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A homogeneous cluster: one HPL process per GPU, every GPU with the same memory
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    pub process_count: u32,
    pub memory_per_process_mib: u64,
}

impl Cluster {
    pub fn new(process_count: u32, memory_per_process_mib: u64) -> Cluster {
        Cluster {
            process_count,
            memory_per_process_mib,
        }
    }

    /// Build a cluster whose per-GPU memory comes from a named preset
    pub fn from_preset(presets: &GpuPresets, model: &str, process_count: u32) -> Result<Cluster> {
        let mib = presets.require(model)?;
        Ok(Cluster::new(process_count, mib))
    }

    /// Cluster-wide memory in bytes
    pub fn total_memory_bytes(&self) -> Result<u64> {
        mib_to_bytes(self.memory_per_process_mib)
            .and_then(|b| b.checked_mul(self.process_count as u64))
            .ok_or_else(|| {
                PlannerError::invalid(
                    "memory_per_process_mib",
                    format!(
                        "{} processes x {} MiB overflows a 64-bit byte count",
                        self.process_count, self.memory_per_process_mib
                    ),
                )
            })
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Cluster {
    #[new]
    fn py_new(process_count: u32, memory_per_process_mib: u64) -> Cluster {
        Cluster::new(process_count, memory_per_process_mib)
    }

    #[pyo3(name = "total_memory_bytes")]
    fn py_total_memory_bytes(&self) -> PyResult<u64> {
        Ok(self.total_memory_bytes()?)
    }

    #[pyo3(signature = (utilization, block_size, reserve_factor = 1.0))]
    fn derive(
        &self,
        utilization: f64,
        block_size: u64,
        reserve_factor: f64,
    ) -> PyResult<HplParameters> {
        let config = PlannerConfig {
            utilization,
            block_size,
            reserve_factor: ReserveFactor::new(reserve_factor)?,
        };
        Ok(Planner::new(config).derive(self)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "Cluster(process_count={}, memory_per_process_mib={})",
            self.process_count, self.memory_per_process_mib
        )
    }
}
