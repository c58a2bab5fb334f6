use crate::demo::{run_batch, run_evaluate, run_rank, BatchArgs, EvaluateArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use supplier_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Supplier Evaluation Service",
    about = "Score, rank, and batch-evaluate suppliers from the command line",
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
    /// Evaluate one demo supplier for a period and print the breakdown
    Evaluate(EvaluateArgs),
    /// Batch-evaluate the demo suppliers and print the leaderboard
    Rank(RankArgs),
    /// Batch-evaluate every active material supplier in the demo store
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory store with demo suppliers for the current month
    #[arg(long)]
    pub(crate) demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Rank(args) => run_rank(args),
        Command::Batch(args) => run_batch(args),
    }
}
