//! Locating and invoking the external WW3 executables.

use crate::domain::{RunOutcome, Ww3Error, Ww3Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub const MPI_LAUNCHER: &str = "mpirun";

/// How an executable is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Launcher {
    #[default]
    Direct,
    /// `mpirun -n <nproc> <exe>`.
    Mpi { nproc: usize },
}

/// Finds `name` on `$PATH`, or checks it directly when it already carries a
/// directory component.
pub fn locate_executable(name: &str) -> Ww3Result<PathBuf> {
    locate_in(name, std::env::var_os("PATH").as_deref())
}

fn locate_in(name: &str, search_path: Option<&OsStr>) -> Ww3Result<PathBuf> {
    let direct = Path::new(name);
    let found = if direct.components().count() > 1 {
        is_executable(direct).then(|| direct.to_path_buf())
    } else {
        search_path.and_then(|paths| {
            std::env::split_paths(paths)
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
        })
    };

    found.ok_or_else(|| {
        Ww3Error::tool_not_found(
            "TOOL.NOT_FOUND",
            format!(
                "command '{}' is not available. Please make sure WW3 was compiled properly \
                 and that the executables are set in your $PATH",
                name
            ),
        )
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `executable` with `run_dir` as its working directory and captures its
/// streams. The caller's working directory is never touched.
pub fn run_program(executable: &str, run_dir: &Path, launcher: Launcher) -> Ww3Result<RunOutcome> {
    let program = locate_executable(executable)?;

    let mut command = match launcher {
        Launcher::Direct => {
            info!("Running {}, please wait...", executable);
            Command::new(&program)
        }
        Launcher::Mpi { nproc } => {
            let mpirun = locate_executable(MPI_LAUNCHER)?;
            info!("Running {} with MPI ({} processes), please wait...", executable, nproc);
            let mut command = Command::new(mpirun);
            command.arg("-n").arg(nproc.to_string()).arg(&program);
            command
        }
    };

    let output = command.current_dir(run_dir).output().map_err(|source| {
        Ww3Error::io_system(
            "IO.TOOL_EXEC",
            format!(
                "failed to execute '{}' in '{}': {}",
                program.display(),
                run_dir.display(),
                source
            ),
        )
    })?;

    let outcome = RunOutcome {
        return_code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    };
    info!(
        "Done running {}. Return code was {}",
        executable,
        outcome
            .return_code
            .map_or_else(|| "none (signal)".to_string(), |code| code.to_string())
    );
    Ok(outcome)
}
