use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Args;
use comfy_table::Table;
use dispatch_optimizer::{
    json::types::{JsonDispatchInput, assignment_to_json},
    problem::point::DistanceParams,
    solver::{
        assignment::Assignment,
        solver::Solver,
        solver_params::{IdleFillParams, SolverParams, Threads},
    },
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::sample::sample_input;

#[derive(Args)]
pub struct SolveArgs {
    /// Input file with couriers, orders and depots
    #[arg(short, long, env = "DISPATCH_INPUT")]
    input: PathBuf,

    /// Where the stop sequence is written, rewritten after every improvement
    #[arg(short, long, env = "DISPATCH_OUTPUT", default_value = "solution.json")]
    output: PathBuf,

    /// Minute at which every courier starts working
    #[arg(long, env = "DISPATCH_START_TIME", default_value_t = 360)]
    start_time: i64,

    /// Fixed cost added to every travelled leg
    #[arg(long, env = "DISPATCH_SETUP_COST", default_value_t = 10)]
    setup_cost: i64,

    /// Money charged per working minute of a courier
    #[arg(long, env = "DISPATCH_TIME_COST_RATE", default_value_t = 2.0)]
    time_cost_rate: f64,

    /// Farthest pickup considered during speculative passes
    #[arg(long, env = "DISPATCH_MAX_DETOUR", default_value_t = 100)]
    max_detour: i64,

    /// Maximum number of passes per phase
    #[arg(long, env = "DISPATCH_MAX_ITERATIONS", default_value_t = 15)]
    max_iterations: usize,

    /// Threads evaluating insertions, 0 uses every available core
    #[arg(short, long, env = "DISPATCH_THREADS", default_value_t = 1)]
    threads: usize,

    /// Give couriers left without orders a nearest-neighbour route built
    /// from the given number of closest orders
    #[arg(long, env = "DISPATCH_FILL_IDLE")]
    fill_idle: Option<usize>,

    /// Only keep this many randomly chosen couriers
    #[arg(long, env = "DISPATCH_SAMPLE_COURIERS")]
    sample_couriers: Option<usize>,

    /// Only keep this many randomly chosen orders
    #[arg(long, env = "DISPATCH_SAMPLE_ORDERS")]
    sample_orders: Option<usize>,

    #[arg(long, env = "DISPATCH_SEED", default_value_t = 117)]
    seed: u64,
}

impl SolveArgs {
    fn solver_params(&self) -> SolverParams {
        SolverParams {
            start_time: self.start_time,
            time_cost_rate: self.time_cost_rate,
            max_detour_distance: self.max_detour,
            max_iterations: self.max_iterations,
            threads: match self.threads {
                0 => Threads::Auto,
                1 => Threads::Single,
                threads => Threads::Multi(threads),
            },
            idle_fill: self
                .fill_idle
                .map(|neighbors| IdleFillParams { neighbors }),
        }
    }
}

pub fn run(args: SolveArgs) -> Result<(), anyhow::Error> {
    info!("Reading {:?}", args.input);
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let mut input: JsonDispatchInput = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    if args.sample_couriers.is_some() || args.sample_orders.is_some() {
        sample_input(
            &mut input,
            args.sample_couriers,
            args.sample_orders,
            args.seed,
        );
    }

    let problem = input
        .build_problem(DistanceParams {
            setup_cost: args.setup_cost,
        })
        .context("invalid dispatch input")?;

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} [{elapsed}] {msg}")?);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message("constructing routes");

    let mut solver = Solver::new(problem, args.solver_params());
    let output = args.output.clone();
    let t_bar = bar.clone();
    solver.on_improvement(move |assignment| {
        t_bar.set_message(format!(
            "money {:.1}, {} orders",
            assignment.total_money(),
            assignment.assigned_orders()
        ));
        if let Err(err) = write_assignment(&output, assignment) {
            error!("failed to write {}: {err:#}", output.display());
        }
    });

    let outcome = solver.solve()?;
    bar.finish_and_clear();

    write_assignment(&args.output, &outcome.assignment)?;
    print_summary(&outcome.assignment);

    info!(
        money = outcome.assignment.total_money(),
        orders = outcome.assignment.assigned_orders(),
        passes = outcome.statistics.passes().len(),
        search = %outcome.statistics.total_duration(),
        "Solution written to {:?}",
        args.output
    );

    Ok(())
}

fn write_assignment(path: &Path, assignment: &Assignment) -> Result<(), anyhow::Error> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &assignment_to_json(assignment))?;
    writer.flush()?;

    Ok(())
}

fn print_summary(assignment: &Assignment) {
    let mut table = Table::new();
    table.set_header(vec!["Courier", "Orders", "Money", "Ends at"]);

    for courier in assignment.couriers() {
        table.add_row(vec![
            courier.courier_id.to_string(),
            courier.orders.to_string(),
            format!("{:.1}", courier.money),
            courier.end_time.to_string(),
        ]);
    }

    table.add_row(vec![
        String::from("Total"),
        assignment.assigned_orders().to_string(),
        format!("{:.1}", assignment.total_money()),
        String::new(),
    ]);

    println!("{table}");
}
