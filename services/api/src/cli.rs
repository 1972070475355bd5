use crate::report::{run_score_report, run_weights_report, ScoreArgs, WeightsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use esg_score::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ESG Greenwashing Scorer",
    about = "Score sustainability report disclosures against SASB materiality weights",
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
    /// Score a JSON or CSV export of analysed disclosures
    Score(ScoreArgs),
    /// List SASB industries, or one industry's topic weights
    Weights(WeightsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the SASB weight table location
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score_report(args),
        Command::Weights(args) => run_weights_report(args),
    }
}
