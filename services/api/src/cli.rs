use crate::demo::{run_demo, run_venue_report, DemoArgs, VenueReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staffdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Staffdesk",
    about = "Run and demonstrate the community venue staffdesk from the command line",
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
    /// Inspect the venue catalog from the command line
    Venues {
        #[command(subcommand)]
        command: VenuesCommand,
    },
    /// Run an end-to-end CLI demo covering venue and job posting workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum VenuesCommand {
    /// Render the alphabetical catalog report for a sample community
    Report(VenueReportArgs),
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
        Command::Venues {
            command: VenuesCommand::Report(args),
        } => run_venue_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
