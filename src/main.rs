//! hpl-planner: print HPL Ns, NBs, Ps and Qs for a GPU cluster
//!
//! Examples:
//!   hpl-planner --gpus 504 --mem-per-gpu 183359 --utilization 0.99 --nb 2048
//!   hpl-planner --gpus 64 --gpu-model "NVIDIA H100 80GB" --workspace-reserve
//!   hpl-planner --gpus 128 --all-presets --format json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use hpl_planner::orchestration::sweep::SweepReport;
use hpl_planner::orchestration::OrchestrationResult;
use hpl_planner::{
    sweep_presets, Cluster, GpuPresets, Planner, PlannerConfig, ReserveFactor, Result,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_GPUS: u32 = 504;
const DEFAULT_MEM_PER_GPU_MIB: u64 = 183359;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Derive HPL problem size, block size and process grid for a GPU cluster
#[derive(Parser, Debug)]
#[command(name = "hpl-planner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of GPUs, one HPL process each
    #[arg(short = 'g', long, env = "HPL_PLANNER_GPUS", default_value_t = DEFAULT_GPUS)]
    gpus: u32,

    /// Memory per GPU in MiB, ignored when --gpu-model or --all-presets is given
    #[arg(short = 'm', long, env = "HPL_PLANNER_MEM_PER_GPU")]
    mem_per_gpu: Option<u64>,

    /// Take the memory per GPU from a named preset
    #[arg(long, value_name = "MODEL", conflicts_with = "all_presets")]
    gpu_model: Option<String>,

    /// Fraction of GPU memory the matrix may use, in [0, 1]
    #[arg(short = 'u', long, env = "HPL_PLANNER_UTILIZATION")]
    utilization: Option<f64>,

    /// Block size NB
    #[arg(short = 'b', long, env = "HPL_PLANNER_NB")]
    nb: Option<u64>,

    /// Divide usable memory by this factor (>= 1.0) to leave runtime workspace
    #[arg(long, env = "HPL_PLANNER_RESERVE_FACTOR")]
    reserve_factor: Option<f64>,

    /// Shorthand for --reserve-factor 1.1, wins over --reserve-factor
    #[arg(long)]
    workspace_reserve: bool,

    /// JSON file with utilization, block_size and reserve_factor defaults
    #[arg(short, long, env = "HPL_PLANNER_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file of extra GPU presets ("model": MiB), merged over the built-in ones
    #[arg(long, env = "HPL_PLANNER_PRESETS")]
    presets: Option<PathBuf>,

    /// Print the known GPU presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Derive parameters for every GPU preset
    #[arg(long)]
    all_presets: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags and env override the config file, which overrides the defaults
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => PlannerConfig::from_json_file(path)?,
            None => PlannerConfig::default(),
        };
        if let Some(u) = self.utilization {
            config.utilization = u;
        }
        if let Some(nb) = self.nb {
            config.block_size = nb;
        }
        if self.workspace_reserve {
            config.reserve_factor = ReserveFactor::WORKSPACE;
        } else if let Some(r) = self.reserve_factor {
            config.reserve_factor = ReserveFactor::new(r)?;
        }
        Ok(config)
    }

    fn gpu_presets(&self) -> Result<GpuPresets> {
        let mut presets = GpuPresets::builtin();
        if let Some(path) = &self.presets {
            presets.merge(GpuPresets::from_json_file(path)?);
        }
        Ok(presets)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String> {
    let presets = cli.gpu_presets()?;
    if cli.list_presets {
        return Ok(match cli.format {
            OutputFormat::Text => presets.pretty_print(),
            OutputFormat::Json => json!(presets).to_string(),
        });
    }

    let config = cli.planner_config()?;
    debug!(?config, gpus = cli.gpus, "planner configuration");

    if cli.all_presets {
        let plans = sweep_presets(&presets, cli.gpus, &config);
        return Ok(match cli.format {
            OutputFormat::Text => SweepReport(plans).pretty_print(),
            OutputFormat::Json => {
                let rows: Vec<_> = plans
                    .iter()
                    .map(|p| match &p.result {
                        Ok(hp) => json!({
                            "model": p.model,
                            "memory_per_gpu_mib": p.memory_per_process_mib,
                            "parameters": hp,
                        }),
                        Err(e) => json!({
                            "model": p.model,
                            "memory_per_gpu_mib": p.memory_per_process_mib,
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                json!(rows).to_string()
            }
        });
    }

    let cluster = match &cli.gpu_model {
        Some(model) => Cluster::from_preset(&presets, model, cli.gpus)?,
        None => Cluster::new(cli.gpus, cli.mem_per_gpu.unwrap_or(DEFAULT_MEM_PER_GPU_MIB)),
    };
    let hp = Planner::new(config).derive(&cluster)?;
    Ok(match cli.format {
        OutputFormat::Text => hp.pretty_print(),
        OutputFormat::Json => json!(hp).to_string(),
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "planning failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hpl-planner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["--utilization", "0.99", "--nb", "1024", "--workspace-reserve"]);
        let config = cli.planner_config().unwrap();
        assert_eq!(config.utilization, 0.99);
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.reserve_factor, ReserveFactor::WORKSPACE);
    }

    #[test]
    fn workspace_shorthand_wins_over_reserve_factor() {
        let cli = parse(&["--reserve-factor", "1.2", "--workspace-reserve"]);
        assert_eq!(cli.planner_config().unwrap().reserve_factor, ReserveFactor::WORKSPACE);

        let cli = parse(&["--reserve-factor", "1.2"]);
        assert_eq!(cli.planner_config().unwrap().reserve_factor.get(), 1.2);
    }

    #[test]
    fn default_run_prints_parameters() {
        let out = run(&parse(&["--gpus", "504", "--mem-per-gpu", "183359"])).unwrap();
        assert!(out.starts_with("Ns = "));
        assert!(out.contains("Ps = 21\nQs = 24"));
    }

    #[test]
    fn model_flag_wins_over_memory_env() {
        std::env::set_var("HPL_PLANNER_MEM_PER_GPU", "1024");
        let by_model = Cli::try_parse_from(["hpl-planner", "--gpus", "8", "--gpu-model", "NVIDIA H100 80GB"]);
        let sweep = Cli::try_parse_from(["hpl-planner", "--gpus", "8", "--all-presets"]);
        std::env::remove_var("HPL_PLANNER_MEM_PER_GPU");

        let by_model = by_model.unwrap();
        assert_eq!(by_model.mem_per_gpu, Some(1024));
        let expected = Planner::default()
            .derive(&Cluster::new(8, 81559))
            .unwrap()
            .pretty_print();
        assert_eq!(run(&by_model).unwrap(), expected);

        let report = run(&sweep.unwrap()).unwrap();
        assert_eq!(report.lines().count(), GpuPresets::builtin().len());
        assert!(!report.contains("1024 MiB"));
    }

    #[test]
    fn model_and_sweep_flags_conflict() {
        let r = Cli::try_parse_from(["hpl-planner", "--gpu-model", "NVIDIA H100 80GB", "--all-presets"]);
        assert!(r.is_err());
    }

    #[test]
    fn unknown_model_fails() {
        assert!(run(&parse(&["--gpu-model", "nope"])).is_err());
    }

    #[test]
    fn json_output() {
        let out = run(&parse(&["--gpus", "4", "--mem-per-gpu", "1024", "--nb", "256", "-f", "json"]))
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["ps"], 2);
        assert_eq!(v["qs"], 2);
        assert_eq!(v["nb"], 256);
    }
}
