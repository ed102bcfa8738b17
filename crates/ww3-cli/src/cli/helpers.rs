use super::CliError;
use super::commands::NamelistFlags;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::info;
use ww3_core::dataset::DatasetOracle;
use ww3_core::domain::Ww3Error;
use ww3_core::namelist::{BlockEdit, BlockPosition};
use ww3_core::programs::Ww3Program;

/// Reads the JSON parameter record at `path`; no file means every field takes
/// its default.
pub(super) fn load_params<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, CliError> {
    let (source, content) = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read parameters '{}'", path.display()))?;
            (path.display().to_string(), content)
        }
        None => ("<defaults>".to_string(), "{}".to_string()),
    };

    serde_json::from_str::<T>(&content).map_err(|error| {
        CliError::Core(Ww3Error::invalid_value(
            "VALUE.PARAMS",
            format!("invalid parameters in {}: {}", source, error),
        ))
    })
}

/// Removals first, then additions, each in flag order. The n-th --add-block-at
/// places the n-th added block; unpaired blocks go to the end of the text.
pub(super) fn read_block_edits(flags: &NamelistFlags) -> Result<Vec<BlockEdit>, CliError> {
    if flags.add_block_at.len() > flags.add_block.len() {
        return Err(CliError::Usage(format!(
            "{} --add-block-at offset(s) given for {} --add-block file(s)",
            flags.add_block_at.len(),
            flags.add_block.len()
        )));
    }

    let mut edits = flags
        .remove_block
        .iter()
        .map(|marker| BlockEdit::remove(marker.as_str()))
        .collect::<Vec<_>>();

    for (index, path) in flags.add_block.iter().enumerate() {
        let block = fs::read_to_string(path)
            .with_context(|| format!("failed to read namelist block '{}'", path.display()))?;
        let position = flags
            .add_block_at
            .get(index)
            .map_or(BlockPosition::End, |&offset| BlockPosition::At(offset));
        edits.push(BlockEdit::add(block.trim_end(), position));
    }
    Ok(edits)
}

pub(super) fn finish_program<P: Ww3Program>(
    mut program: P,
    edits: &[BlockEdit],
    flags: &NamelistFlags,
) -> Result<i32, CliError> {
    for edit in edits {
        program.update_text(edit)?;
    }
    if !edits.is_empty() {
        info!(
            "Applied {} block edit(s) to {}",
            edits.len(),
            P::KIND.namelist_file()
        );
    }

    let written = program.write_namelist()?;
    println!("Wrote {}", written.display());
    if !flags.execute {
        return Ok(0);
    }

    let launcher = flags.launcher(program.default_launcher());
    let outcome = program.run(launcher)?;
    print!("{}", outcome.stdout_lossy());
    eprint!("{}", outcome.stderr_lossy());
    println!(
        "{} finished with {}",
        P::KIND.executable(),
        outcome.describe_status()
    );

    if outcome.success() { Ok(0) } else { Ok(1) }
}

#[cfg(feature = "netcdf")]
pub(super) fn dataset_backend() -> Result<Box<dyn DatasetOracle>, CliError> {
    Ok(Box::new(ww3_core::dataset::NetcdfDataset))
}

#[cfg(not(feature = "netcdf"))]
pub(super) fn dataset_backend() -> Result<Box<dyn DatasetOracle>, CliError> {
    Err(CliError::Core(Ww3Error::setup(
        "SETUP.DATASET_BACKEND",
        "ww3-rs was built without NetCDF support; rebuild with `--features netcdf` \
         to preprocess forcing fields",
    )))
}
