use hillsim::{Scenario, ScenarioConfig, BuiltinHill, Hill, IntegrationMethod, SimulationResult, TextTrajectory};
use hillsim::{bench_methods, compare_methods, compile, profile_extent};
use hillsim::simulation::hills::DEFAULT_EXTENT_STEP;
use hillsim::simulation::params::kmh_to_ms;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[allow(non_snake_case)]
#[derive(Parser, Debug)]
#[command(about = "Rider and bike sliding down a hill: Euler / RK4 until finish, stop or detachment")]
struct Args {
    /// Scenario YAML; relative paths are also looked up in the crate's `scenarios/`
    #[arg(short, long = "file")]
    file_name: Option<String>,

    /// Built-in hill, by index or name (see --list-hills)
    #[arg(long, conflicts_with = "expr")]
    hill: Option<String>,

    /// Hill formula in `x`, may use pi, H and L, e.g. "(H/L)*(L-x)"
    #[arg(long)]
    expr: Option<String>,

    /// Integration method: euler or rk4
    #[arg(long)]
    method: Option<IntegrationMethod>,

    /// Rider mass, kg
    #[arg(long)]
    m1: Option<f64>,

    /// Bike mass, kg
    #[arg(long)]
    m2: Option<f64>,

    /// Initial speed, km/h
    #[arg(long)]
    v0: Option<f64>,

    /// Drag coefficient
    #[arg(long)]
    beta: Option<f64>,

    /// Hill height, m
    #[arg(long = "H")]
    H: Option<f64>,

    /// Hill length, m
    #[arg(long = "L")]
    L: Option<f64>,

    /// Time step, s
    #[arg(long)]
    dt: Option<f64>,

    /// Write `time position height` lines to this file
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// List built-in hills and exit
    #[arg(long)]
    list_hills: bool,

    /// Run both integration methods and compare them
    #[arg(long, conflicts_with = "convergence")]
    compare: bool,

    /// Sweep dt for both methods and print a table
    #[arg(long)]
    convergence: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to init logging. {e}");
    }
}

fn print_hills() {
    for (i, hill) in BuiltinHill::ALL.iter().enumerate() {
        println!("{i}. {}: {}", hill.name(), hill.formula());
    }
}

fn resolve_scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.is_absolute() || direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<Scenario> {
    let cfg = match &args.file_name {
        Some(file_name) => {
            let path = resolve_scenario_path(file_name);
            ScenarioConfig::from_yaml_file(&path)
                .with_context(|| format!("failed to load scenario {}", path.display()))?
        }
        None => ScenarioConfig::default(),
    };
    let mut scenario = Scenario::build_scenario(cfg)?;

    // command line overrides the file
    let p = &mut scenario.params;
    if let Some(m1) = args.m1 { p.m1 = m1; }
    if let Some(m2) = args.m2 { p.m2 = m2; }
    if let Some(v0) = args.v0 { p.v0 = kmh_to_ms(v0); }
    if let Some(beta) = args.beta { p.beta = beta; }
    if let Some(h) = args.H { p.H = h; }
    if let Some(l) = args.L { p.L = l; }
    if let Some(dt) = args.dt { p.dt = dt; }
    if let Some(method) = args.method { p.method = method; }

    if let Some(key) = &args.hill {
        let Some(builtin) = BuiltinHill::lookup(key) else {
            bail!("unknown hill `{key}`, see --list-hills");
        };
        scenario.hill = Hill::Builtin(builtin);
    }
    if let Some(text) = &args.expr {
        scenario.hill = Hill::Expression(compile(text).with_context(|| format!("failed to compile `{text}`"))?);
    }
    if args.trajectory.is_some() {
        scenario.trajectory = args.trajectory.clone();
    }

    scenario.validate()?;
    Ok(scenario)
}

fn print_result(result: &SimulationResult) {
    println!("{}", result.ground_state);
    println!("{}", result.report());
    if result.iteration_cap_reached {
        println!("(iteration cap reached after {} steps)", result.iterations);
    }
}

fn run_single(scenario: &Scenario) -> Result<()> {
    let result = match &scenario.trajectory {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = TextTrajectory::new(BufWriter::new(file));
            let result = scenario.run(Some(&mut sink))?;
            if let Err(e) = sink.into_inner() {
                warn!("failed to flush trajectory {}: {e}", path.display());
            }
            info!(path = %path.display(), "trajectory written");
            result
        }
        None => scenario.run(None)?,
    };

    print_result(&result);
    Ok(())
}

fn run_compare(scenario: &Scenario) -> Result<()> {
    let [euler, rk4] = compare_methods(scenario)?;
    for (method, result) in IntegrationMethod::ALL.iter().zip([&euler, &rk4]) {
        println!("[{method}] {}", result.ground_state);
        println!("{}\n", result.report());
    }
    println!("|v_euler - v_rk4| = {} m/s", (euler.final_velocity - rk4.final_velocity).abs());
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    if args.list_hills {
        print_hills();
        return Ok(());
    }

    let scenario = load_scenario(&args)?;
    let extent = profile_extent(&scenario.hill, &scenario.params, 0.0, scenario.params.L, DEFAULT_EXTENT_STEP);
    println!("{}", scenario.hill.describe());
    println!("height range: {} .. {} m", extent.min, extent.max);

    if args.convergence {
        bench_methods(&scenario, 6)?;
    } else if args.compare {
        run_compare(&scenario)?;
    } else {
        run_single(&scenario)?;
    }

    if let Some(path) = scenario.trajectory.as_deref().filter(|_| args.compare || args.convergence) {
        warn!(path = %path.display(), "trajectory output is only written for single runs");
    }

    Ok(())
}
