use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use desk_assign::desk::{solve, Assignment, Instance, Method, Report, SolveConfig};
use desk_assign::experiment::{run_experiments, write_csv, ExperimentPlan, MethodKind};
use desk_assign::ils::IlsConfig;
use desk_assign::io;
use desk_assign::sa::SaConfig;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Desk assignment: greedy construction refined by simulated annealing or
/// iterated local search.
#[derive(Parser, Debug)]
#[command(name = "desk-assign", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one instance and write the assignment.
    Solve(SolveArgs),
    /// Check a stored assignment against its instance.
    Validate(ValidateArgs),
    /// Run seeded batches over several instances and write a CSV.
    Experiment(ExperimentArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Instance file.
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output directory, created if missing.
    #[arg(long, default_value = "solutions")]
    outdir: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Leading preferred desks sampled by the builder.
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Proposals per temperature (annealing).
    #[arg(long, default_value_t = 1000)]
    iters: usize,

    #[arg(long, default_value_t = 200.0)]
    tinit: f64,

    #[arg(long, default_value_t = 1.0)]
    tfinal: f64,

    /// Cooling factor (annealing).
    #[arg(long, default_value_t = 0.95)]
    alpha: f64,

    /// Use iterated local search instead of annealing.
    #[arg(long)]
    ils: bool,

    /// Outer ILS iterations.
    #[arg(long, default_value_t = 20)]
    ils_iters: usize,

    /// Hill-climbing proposals per ILS descent.
    #[arg(long, default_value_t = 500)]
    ls_iters: usize,

    /// Swaps per ILS perturbation.
    #[arg(long, default_value_t = 3)]
    perturb_k: usize,

    /// Derive surrogate weights that are order-exact for the instance.
    #[arg(long)]
    exact_weights: bool,

    /// Print the assignment instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// Print per-day scores and totals.
    #[arg(long)]
    report: bool,

    /// Validate before saving; exit with status 2 on violations.
    #[arg(long)]
    validate: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    #[arg(long, value_name = "FILE")]
    solution: PathBuf,

    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Methods {
    Both,
    Ils,
    Sa,
}

#[derive(Args, Debug)]
struct ExperimentArgs {
    /// Instance files.
    #[arg(required = true)]
    instances: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = Methods::Both)]
    methods: Methods,

    #[arg(long, default_value_t = 3)]
    top_k: usize,

    #[arg(long, default_value_t = 1000)]
    iters: usize,

    /// Explicit seeds; overrides --num-seeds and --seed-start.
    #[arg(long, value_delimiter = ',')]
    seeds: Vec<u64>,

    #[arg(long, default_value_t = 5)]
    num_seeds: u64,

    #[arg(long, default_value_t = 1)]
    seed_start: u64,

    #[arg(long, default_value = "results/experiments.csv")]
    out: PathBuf,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn print_violations(errors: &[String]) {
    println!("validation: {} violation(s)", errors.len());
    for e in errors {
        println!(" - {e}");
    }
}

fn solution_path(outdir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "instance".to_string());
    outdir.join(format!("solution_{stem}_result.json"))
}

fn run_solve(args: SolveArgs) -> Result<ExitCode> {
    let instance = io::load_instance(&args.input)
        .with_context(|| format!("loading instance {}", args.input.display()))?;

    let method = if args.ils {
        Method::IteratedLocalSearch(
            IlsConfig::default()
                .with_max_iterations(args.ils_iters)
                .with_local_search_iterations(args.ls_iters)
                .with_perturbation_strength(args.perturb_k),
        )
    } else {
        Method::Annealing(
            SaConfig::default()
                .with_initial_temperature(args.tinit)
                .with_final_temperature(args.tfinal)
                .with_alpha(args.alpha)
                .with_iterations_per_temperature(args.iters),
        )
    };
    let config = SolveConfig::default()
        .with_seed(args.seed)
        .with_top_k(args.top_k)
        .with_method(method)
        .with_exact_weights(args.exact_weights);

    let outcome = solve(&instance, &config).context("solving")?;
    println!("score before (C1, C2, C3): {}", outcome.initial_score);
    println!("score after (C1, C2, C3): {}", outcome.final_score);

    let named = outcome.assignment.to_named(&instance);
    if args.validate {
        let errors = desk_assign::desk::validate(&instance, &named);
        if !errors.is_empty() {
            print_violations(&errors);
            return Ok(ExitCode::from(2));
        }
        println!("validation: OK");
    }

    if args.report {
        println!("{}", Report::new(&instance, &outcome.assignment));
    }

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&named)?);
    } else {
        let path = solution_path(&args.outdir, &args.input);
        io::save_assignment(&path, &named)?;
        tracing::info!(path = %path.display(), "solution written");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode> {
    let instance = io::load_instance(&args.input)
        .with_context(|| format!("loading instance {}", args.input.display()))?;
    let named = io::load_assignment(&args.solution)
        .with_context(|| format!("loading solution {}", args.solution.display()))?;

    let errors = desk_assign::desk::validate(&instance, &named);
    if !errors.is_empty() {
        print_violations(&errors);
        return Ok(ExitCode::from(2));
    }
    println!("validation: OK");

    if args.report {
        let assignment = Assignment::from_named(&instance, &named)?;
        println!("{}", Report::new(&instance, &assignment));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_experiment(args: ExperimentArgs) -> Result<ExitCode> {
    let mut instances: Vec<(String, Instance)> = Vec::with_capacity(args.instances.len());
    for path in &args.instances {
        let instance =
            io::load_instance(path).with_context(|| format!("loading instance {}", path.display()))?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        instances.push((name, instance));
    }

    let methods = match args.methods {
        Methods::Both => MethodKind::ALL.to_vec(),
        Methods::Ils => vec![MethodKind::Ils],
        Methods::Sa => vec![MethodKind::Sa],
    };
    let seeds = if args.seeds.is_empty() {
        (args.seed_start..args.seed_start + args.num_seeds).collect()
    } else {
        args.seeds
    };
    if seeds.is_empty() {
        bail!("no seeds to run");
    }

    let plan = ExperimentPlan::default()
        .with_methods(methods)
        .with_seeds(seeds)
        .with_top_k(args.top_k)
        .with_iters(args.iters);
    let rows = run_experiments(&instances, &plan)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    write_csv(BufWriter::new(file), &rows).with_context(|| format!("writing {}", args.out.display()))?;
    tracing::info!(rows = rows.len(), path = %args.out.display(), "experiments written");
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    enable_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Validate(args) => run_validate(args),
        Command::Experiment(args) => run_experiment(args),
    }
}
