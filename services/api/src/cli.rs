use crate::commands::{
    run_add, run_delete, run_export, run_import, run_list, run_picker, run_report, run_reset,
    AddArgs, ExportArgs, ListArgs, PickerArgs, ReportArgs,
};
use crate::infra::open_roster;
use crate::server;
use clap::{Args, Parser, Subcommand};
use hawkeye::config::AppConfig;
use hawkeye::error::AppError;
use hawkeye::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Hawk-Eye",
    about = "Record, rank and export volleyball tryout evaluations",
    version
)]
struct Cli {
    /// Override the directory holding the saved roster
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a new player, or update one with --id
    Add(AddArgs),
    /// Remove a player from the roster
    Delete {
        /// Id of the player to remove
        id: u64,
    },
    /// Delete every player
    Reset {
        /// Confirm that all data should be cleared
        #[arg(long)]
        yes: bool,
    },
    /// Show the roster, ranked
    List(ListArgs),
    /// List players available for editing
    Picker(PickerArgs),
    /// Print a ranked report and optionally save it as CSV
    Report(ReportArgs),
    /// Add players from a CSV file
    Import {
        /// CSV file with First Name, Last Name, Number[, Grade, Position]
        path: PathBuf,
    },
    /// Save the full roster as CSV
    Export(ExportArgs),
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
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let open = || open_roster(&config.storage);
    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Add(args) => run_add(&mut open(), args),
        Command::Delete { id } => run_delete(&mut open(), id),
        Command::Reset { yes } => run_reset(&mut open(), yes),
        Command::List(args) => run_list(&mut open(), args),
        Command::Picker(args) => run_picker(&open(), args),
        Command::Report(args) => run_report(&mut open(), args),
        Command::Import { path } => run_import(&mut open(), &path),
        Command::Export(args) => run_export(&open(), args),
    }
}
