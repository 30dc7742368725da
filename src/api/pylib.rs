use crate::analysis::problem_size::{self, ReserveFactor};
use crate::analysis::process_grid::{self, ProcessGrid};
use crate::environment::cluster::Cluster;
use crate::environment::presets::GpuPresets;
use crate::error::PlannerError;
use crate::orchestration::derive::{self, HplParameters};
use pyo3::exceptions::{PyKeyError, PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;
use std::collections::BTreeMap;

impl From<PlannerError> for PyErr {
    fn from(e: PlannerError) -> PyErr {
        match e {
            PlannerError::InvalidArgument { .. } | PlannerError::Config { .. } => {
                PyValueError::new_err(e.to_string())
            }
            PlannerError::UnknownPreset { .. } => PyKeyError::new_err(e.to_string()),
            PlannerError::Io { .. } => PyOSError::new_err(e.to_string()),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (total_memory_bytes, utilization, block_size, reserve_factor = 1.0))]
fn estimate_problem_size(
    total_memory_bytes: u64,
    utilization: f64,
    block_size: u64,
    reserve_factor: f64,
) -> PyResult<u64> {
    let reserve = ReserveFactor::new(reserve_factor)?;
    Ok(problem_size::estimate_problem_size_with_reserve(
        total_memory_bytes,
        utilization,
        block_size,
        reserve,
    )?)
}

#[pyfunction]
fn best_process_grid(process_count: u32) -> PyResult<ProcessGrid> {
    Ok(process_grid::best_process_grid(process_count)?)
}

#[pyfunction]
#[pyo3(signature = (process_count, memory_per_process_mib, utilization, block_size, reserve_factor = 1.0))]
fn derive_parameters(
    process_count: u32,
    memory_per_process_mib: u64,
    utilization: f64,
    block_size: u64,
    reserve_factor: f64,
) -> PyResult<HplParameters> {
    let reserve = ReserveFactor::new(reserve_factor)?;
    Ok(derive::derive_parameters_with_reserve(
        process_count,
        memory_per_process_mib,
        utilization,
        block_size,
        reserve,
    )?)
}

#[pyfunction]
fn gpu_presets() -> BTreeMap<String, u64> {
    GpuPresets::builtin()
        .iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[pymodule]
fn hpl_planner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Cluster>()?;
    m.add_class::<ProcessGrid>()?;
    m.add_class::<HplParameters>()?;
    m.add_function(wrap_pyfunction!(estimate_problem_size, m)?)?;
    m.add_function(wrap_pyfunction!(best_process_grid, m)?)?;
    m.add_function(wrap_pyfunction!(derive_parameters, m)?)?;
    m.add_function(wrap_pyfunction!(gpu_presets, m)?)?;

    Ok(())
}
