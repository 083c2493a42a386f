use crate::demo::{run_demo, run_replay, DemoArgs, ReplayArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use storefront::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Storefront Rating Service",
    about = "Run and demo the storefront rating inference service from the command line",
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
    /// Replay an exported interaction log and print the outcome tally
    Replay(ReplayArgs),
    /// Run an end-to-end CLI demo covering ingestion and rating inference
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Replay(args) => run_replay(args),
        Command::Demo(args) => run_demo(args),
    }
}
