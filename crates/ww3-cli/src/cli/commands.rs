use super::CliError;
use super::helpers::{dataset_backend, finish_program, load_params, read_block_edits};
use std::path::PathBuf;
use ww3_core::programs::{
    BoundaryInput, BouncParams, BouncProgram, GridParams, GridProgram, OunfParams, OunfProgram,
    OunpParams, OunpProgram, PrncParams, PrncProgram, ShelParams, ShelProgram,
};
use ww3_core::runner::Launcher;

#[derive(clap::Args)]
pub(super) struct NamelistFlags {
    /// Directory the namelist is written to and the program runs in
    #[arg(long, default_value = ".")]
    pub(super) run_dir: PathBuf,

    /// JSON parameter record for the program
    #[arg(long, value_name = "FILE")]
    pub(super) params: Option<PathBuf>,

    /// Comment out the block starting with this marker, e.g. '&SMC_NML'
    #[arg(long, value_name = "&NAME")]
    pub(super) remove_block: Vec<String>,

    /// Add the complete namelist block stored in FILE
    #[arg(long, value_name = "FILE")]
    pub(super) add_block: Vec<PathBuf>,

    /// Insert the matching --add-block at this character offset instead of
    /// appending it; pairs with --add-block in flag order
    #[arg(long, value_name = "OFFSET")]
    pub(super) add_block_at: Vec<usize>,

    /// Run the WW3 executable after writing the namelist
    #[arg(long)]
    pub(super) execute: bool,

    /// Launch through mpirun with N processes
    #[arg(long, value_name = "N")]
    pub(super) mpi: Option<usize>,
}

impl NamelistFlags {
    pub(super) fn launcher(&self, default: Launcher) -> Launcher {
        self.mpi.map_or(default, |nproc| Launcher::Mpi { nproc })
    }
}

#[derive(clap::Args)]
pub(super) struct GridArgs {
    #[command(flatten)]
    namelist: NamelistFlags,
}

#[derive(clap::Args)]
pub(super) struct ModelArgs {
    #[command(flatten)]
    namelist: NamelistFlags,

    /// Grid definition written by ww3_grid
    #[arg(long, default_value = "mod_def.ww3")]
    mod_def: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct PrncArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Point the namelist at a south-to-north copy named NEW_NAME when the
    /// dataset's latitudes descend
    #[arg(long, value_name = "NEW_NAME")]
    reverse_latitudes: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct BouncArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Boundary spectra file, or a directory of them
    #[arg(long)]
    input: PathBuf,
}

pub(super) fn run_grid_command(args: GridArgs) -> Result<i32, CliError> {
    let flags = &args.namelist;
    let params: GridParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let grid = GridProgram::new(&flags.run_dir, params)?;
    finish_program(grid, &edits, flags)
}

pub(super) fn run_prnc_command(args: PrncArgs) -> Result<i32, CliError> {
    let flags = &args.model.namelist;
    let params: PrncParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let dataset = dataset_backend()?;

    let mut prnc =
        PrncProgram::new(&flags.run_dir, &args.model.mod_def, params, dataset.as_ref())?;
    if let Some(new_name) = &args.reverse_latitudes {
        let reversed = prnc.reverse_latitudes(new_name, dataset.as_ref())?;
        if reversed {
            println!(
                "Latitudes reversed into {}",
                flags.run_dir.join(new_name).display()
            );
        }
    }
    finish_program(prnc, &edits, flags)
}

pub(super) fn run_bounc_command(args: BouncArgs) -> Result<i32, CliError> {
    let flags = &args.model.namelist;
    let params: BouncParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let input = BoundaryInput::from_path(&args.input);
    let bounc = BouncProgram::new(&flags.run_dir, &args.model.mod_def, &input, params)?;
    finish_program(bounc, &edits, flags)
}

pub(super) fn run_shel_command(args: ModelArgs) -> Result<i32, CliError> {
    let flags = &args.namelist;
    let params: ShelParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let shel = ShelProgram::new(&flags.run_dir, &args.mod_def, params)?;
    finish_program(shel, &edits, flags)
}

pub(super) fn run_ounf_command(args: ModelArgs) -> Result<i32, CliError> {
    let flags = &args.namelist;
    let params: OunfParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let ounf = OunfProgram::new(&flags.run_dir, &args.mod_def, params)?;
    finish_program(ounf, &edits, flags)
}

pub(super) fn run_ounp_command(args: ModelArgs) -> Result<i32, CliError> {
    let flags = &args.namelist;
    let params: OunpParams = load_params(flags.params.as_deref())?;
    let edits = read_block_edits(flags)?;
    let ounp = OunpProgram::new(&flags.run_dir, &args.mod_def, params)?;
    finish_program(ounp, &edits, flags)
}
