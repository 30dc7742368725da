use crate::config::PlannerConfig;
use crate::environment::cluster::Cluster;
use crate::environment::presets::GpuPresets;
use crate::error::Result;
use crate::orchestration::derive::{HplParameters, Planner};
use crate::orchestration::OrchestrationResult;
use itertools::Itertools;
use rayon::prelude::*;

/// Derivation outcome for one GPU preset
#[derive(Debug)]
pub struct PresetPlan {
    pub model: String,
    pub memory_per_process_mib: u64,
    pub result: Result<HplParameters>,
}

/// Run the derivation for every preset at the same process count
///
/// Results come back in the preset table's order.
pub fn sweep_presets(
    presets: &GpuPresets,
    process_count: u32,
    config: &PlannerConfig,
) -> Vec<PresetPlan> {
    let planner = Planner::new(*config);
    let models: Vec<(&str, u64)> = presets.iter().collect();
    models
        .par_iter()
        .map(|(model, mib)| PresetPlan {
            model: model.to_string(),
            memory_per_process_mib: *mib,
            result: planner.derive(&Cluster::new(process_count, *mib)),
        })
        .collect()
}

/// Sweep results wrapped for printing
pub struct SweepReport(pub Vec<PresetPlan>);

impl OrchestrationResult for SweepReport {
    fn pretty_print(&self) -> String {
        let width = self.0.iter().map(|p| p.model.len()).max().unwrap_or(0);
        self.0
            .iter()
            .map(|p| match &p.result {
                Ok(hp) => format!(
                    "{:width$}  {:>8} MiB  Ns = {:<10} NBs = {:<6} Ps = {:<5} Qs = {}",
                    p.model,
                    p.memory_per_process_mib,
                    hp.ns,
                    hp.nb,
                    hp.ps,
                    hp.qs,
                    width = width
                ),
                Err(e) => format!(
                    "{:width$}  {:>8} MiB  error: {}",
                    p.model,
                    p.memory_per_process_mib,
                    e,
                    width = width
                ),
            })
            .join("\n")
    }
}
