use hpl_planner::environment::presets::GpuPresets;
use hpl_planner::orchestration::derive::derive_parameters;
use hpl_planner::orchestration::sweep::*;
use hpl_planner::orchestration::OrchestrationResult;
use hpl_planner::PlannerConfig;

#[test]
fn test_sweep_matches_single_derivations() {
    let presets = GpuPresets::builtin();
    let config = PlannerConfig::default();
    let plans = sweep_presets(&presets, 64, &config);

    assert_eq!(plans.len(), presets.len());
    let names: Vec<&str> = plans.iter().map(|p| p.model.as_str()).collect();
    assert_eq!(names, presets.names().collect::<Vec<_>>());

    for p in &plans {
        let expected = derive_parameters(64, p.memory_per_process_mib, 0.95, 2048).unwrap();
        assert_eq!(p.result.as_ref().unwrap(), &expected);
    }
    println!("{}", SweepReport(plans).pretty_print());
}

#[test]
fn test_sweep_reports_errors_per_preset() {
    let presets = GpuPresets::builtin();
    let plans = sweep_presets(&presets, 0, &PlannerConfig::default());
    assert!(plans
        .iter()
        .all(|p| p.result.as_ref().unwrap_err().is_invalid_argument()));
    let report = SweepReport(plans).pretty_print();
    assert_eq!(report.lines().count(), 4);
    assert!(report.lines().all(|l| l.contains("error:")));
}

#[test]
fn test_sweep_empty_table() {
    let plans = sweep_presets(&GpuPresets::new(), 8, &PlannerConfig::default());
    assert!(plans.is_empty());
    assert_eq!(SweepReport(plans).pretty_print(), "");
}
