use crate::demo::{run_categories, run_simulation, CategoriesArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_coach::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Approval Simulator",
    about = "Simulate credit approval odds and coaching tips from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single what-if simulation and print the result
    Simulate(SimulateArgs),
    /// List the accepted income type, education and marital status labels
    Categories(CategoriesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured artifact directory
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulation(args),
        Command::Categories(args) => run_categories(args),
    }
}
