use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::solve::SolveArgs;

mod sample;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assigns orders to couriers and writes the stop sequence as JSON
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Prints the JSON schema of the input file
    Schema,
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Solve { args } => solve::run(args)?,
        Commands::Schema => {
            println!(
                "{}",
                dispatch_optimizer::json::schema::generate_json_schema()?
            );
        }
    }

    Ok(())
}
