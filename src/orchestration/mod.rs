use crate::environment::cluster::Cluster;
use crate::error::Result;

/// Single-cluster derivation
pub mod derive;
/// Derivation over every GPU preset
pub mod sweep;

pub trait OrchestrationResult {
    fn pretty_print(&self) -> String;
}

pub trait Orchestrate {
    type Plan: OrchestrationResult;

    fn orchestrate(&self, cluster: &Cluster) -> Result<Self::Plan>;
}
