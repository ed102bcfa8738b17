mod commands;
mod helpers;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ww3_core::domain::Ww3Error;

const DEFAULT_LOG_FILTER: &str = "ww3=info,ww3_core=info";

pub fn run_from_env() -> i32 {
    init_tracing();

    match parse_and_dispatch(std::env::args().collect()) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_ww3_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("ww3-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "ww3-rs",
    version,
    about = "Write WAVEWATCH III namelists and run the WW3 executables"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Prepare ww3_grid: grid preprocessing into mod_def.ww3
    Grid(commands::GridArgs),
    /// Prepare ww3_prnc: forcing field preprocessing
    Prnc(commands::PrncArgs),
    /// Prepare ww3_bounc: spectral boundary preprocessing
    Bounc(commands::BouncArgs),
    /// Prepare ww3_shel: the single-grid model run
    Shel(commands::ModelArgs),
    /// Prepare ww3_ounf: gridded output postprocessing
    Ounf(commands::ModelArgs),
    /// Prepare ww3_ounp: point output postprocessing
    Ounp(commands::ModelArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Grid(args) => commands::run_grid_command(args),
        CliCommand::Prnc(args) => commands::run_prnc_command(args),
        CliCommand::Bounc(args) => commands::run_bounc_command(args),
        CliCommand::Shel(args) => commands::run_shel_command(args),
        CliCommand::Ounf(args) => commands::run_ounf_command(args),
        CliCommand::Ounp(args) => commands::run_ounp_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Core(Ww3Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<Ww3Error> for CliError {
    fn from(error: Ww3Error) -> Self {
        Self::Core(error)
    }
}

impl CliError {
    fn as_ww3_error(&self) -> Ww3Error {
        match self {
            Self::Usage(message) => Ww3Error::invalid_value("VALUE.CLI_USAGE", message.trim_end()),
            Self::Core(error) => error.clone(),
            Self::Internal(error) => Ww3Error::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
