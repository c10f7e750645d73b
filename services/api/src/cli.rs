use crate::demo::{run_demo, run_evaluate, run_ruleset, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use habitabilitat::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Cédula Pre-validation",
    about = "Pre-validate Catalan dwellings against the cédula de habitabilitat requirements",
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
    /// Evaluate a property description (JSON) or a batch of properties (CSV)
    Evaluate(EvaluateArgs),
    /// Print the active ruleset version and rule catalog
    Ruleset,
    /// Run a scripted end-to-end case walkthrough against in-memory stores
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
    /// Persist cases, templates and evidence metadata as JSON files in this directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Ruleset => {
            run_ruleset();
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}
