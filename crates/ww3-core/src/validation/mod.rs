//! Precondition checks shared by every program family.
//!
//! Each check either auto-repairs (and warns) or fails with a categorized
//! [`Ww3Error`]. None of them are re-run after construction.

pub mod natural;

use crate::domain::{MOD_DEF_FILE, Ww3Error, Ww3Result};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use natural::natural_cmp;

pub fn ensure_run_dir(run_dir: &Path) -> Ww3Result<()> {
    if run_dir.is_dir() {
        return Ok(());
    }
    warn!("Run directory {} does not exist; creating it", run_dir.display());
    fs::create_dir_all(run_dir).map_err(|source| {
        Ww3Error::setup(
            "SETUP.RUN_DIR",
            format!(
                "failed to create run directory '{}': {}",
                run_dir.display(),
                source
            ),
        )
    })
}

/// Copies the model definition into `run_dir` unless a copy is already there.
pub fn ensure_mod_def(source: &Path, run_dir: &Path) -> Ww3Result<PathBuf> {
    if !source.is_file() {
        return Err(Ww3Error::missing_input(
            "INPUT.MOD_DEF_MISSING",
            format!("No such file or directory '{}'", source.display()),
        ));
    }

    let mirrored = run_dir.join(MOD_DEF_FILE);
    if !mirrored.exists() {
        fs::copy(source, &mirrored).map_err(|error| {
            Ww3Error::setup(
                "SETUP.MOD_DEF_COPY",
                format!(
                    "could not copy '{}' to '{}': {}",
                    source.display(),
                    mirrored.display(),
                    error
                ),
            )
        })?;
    }
    Ok(mirrored)
}

/// Makes `source` reachable by bare name from inside `run_dir`, symlinking it
/// when nothing of that name exists there yet. Returns the bare name.
pub fn link_into_run_dir(source: &Path, run_dir: &Path) -> Ww3Result<String> {
    if !source.exists() {
        return Err(Ww3Error::missing_input(
            "INPUT.FILE_MISSING",
            format!("No such file or directory '{}'", source.display()),
        ));
    }

    let name = file_name_of(source)?;
    let destination = run_dir.join(&name);
    if destination.symlink_metadata().is_err() {
        let target = std::path::absolute(source).map_err(|error| {
            Ww3Error::io_system(
                "IO.ABSOLUTE_PATH",
                format!("failed to resolve '{}': {}", source.display(), error),
            )
        })?;
        warn!(
            "{} is not in {}; linking it there",
            name,
            run_dir.display()
        );
        create_link(&target, &destination)?;
    }
    Ok(name)
}

/// Links a raw model output file after checking it carries the name the
/// postprocessor reads.
pub fn ensure_output_artifact(source: &Path, expected: &str, run_dir: &Path) -> Ww3Result<String> {
    let name = file_name_of(source)?;
    if name != expected {
        return Err(Ww3Error::invalid_value(
            "VALUE.OUTPUT_ARTIFACT",
            format!("model output file must be named '{}'; got '{}'", expected, name),
        ));
    }
    link_into_run_dir(source, run_dir)
}

pub fn check_int_choice(field: &str, value: i64, allowed: &[i64]) -> Ww3Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(Ww3Error::invalid_value(
        "VALUE.ENUMERATION",
        format!(
            "{} must be one of {}; got {}",
            field,
            quoted_set(allowed),
            value
        ),
    ))
}

/// `YYYYMMDD HHMMSS`, as two whitespace-separated digit groups.
pub fn check_timeshift(value: &str) -> Ww3Result<()> {
    let tokens = value.split_whitespace().collect::<Vec<_>>();
    let well_formed = matches!(
        tokens.as_slice(),
        [date, time] if is_digits(date, 8) && is_digits(time, 6)
    );
    if well_formed {
        return Ok(());
    }
    Err(Ww3Error::invalid_value(
        "VALUE.TIMESHIFT",
        format!(
            "time shift must have the form 'YYYYMMDD HHMMSS'; got '{}'",
            value
        ),
    ))
}

pub fn quoted_set<T: Display>(values: &[T]) -> String {
    let items = values
        .iter()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", items)
}

pub(crate) fn file_name_of(path: &Path) -> Ww3Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Ww3Error::invalid_value(
                "VALUE.FILE_NAME",
                format!("'{}' does not name a file", path.display()),
            )
        })
}

fn is_digits(token: &str, width: usize) -> bool {
    token.len() == width && token.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(unix)]
fn create_link(target: &Path, destination: &Path) -> Ww3Result<()> {
    std::os::unix::fs::symlink(target, destination).map_err(|error| link_error(destination, error))
}

#[cfg(not(unix))]
fn create_link(target: &Path, destination: &Path) -> Ww3Result<()> {
    fs::copy(target, destination)
        .map(|_| ())
        .map_err(|error| link_error(destination, error))
}

fn link_error(destination: &Path, error: std::io::Error) -> Ww3Error {
    Ww3Error::setup(
        "SETUP.LINK",
        format!("failed to link '{}': {}", destination.display(), error),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        check_int_choice, check_timeshift, ensure_mod_def, ensure_output_artifact,
        ensure_run_dir, link_into_run_dir, quoted_set,
    };
    use crate::domain::{MOD_DEF_FILE, Ww3ErrorCategory};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn run_dir_is_created_with_parents() {
        let temp = TempDir::new().expect("tempdir should be created");
        let run_dir = temp.path().join("nested").join("run");
        ensure_run_dir(&run_dir).expect("run dir should be created");
        assert!(run_dir.is_dir());
        ensure_run_dir(&run_dir).expect("existing run dir is accepted");
    }

    #[test]
    fn mod_def_is_copied_once() {
        let temp = TempDir::new().expect("tempdir should be created");
        let source = temp.path().join("grid.ww3");
        fs::write(&source, b"model").expect("source should be written");
        let run_dir = temp.path().join("run");
        fs::create_dir(&run_dir).expect("run dir should be created");

        let mirrored = ensure_mod_def(&source, &run_dir).expect("mod_def should be mirrored");
        assert_eq!(mirrored, run_dir.join(MOD_DEF_FILE));
        assert_eq!(fs::read(&mirrored).expect("copy should exist"), b"model");

        fs::write(&source, b"changed").expect("source should be rewritten");
        ensure_mod_def(&source, &run_dir).expect("existing copy is kept");
        assert_eq!(fs::read(&mirrored).expect("copy should exist"), b"model");
    }

    #[test]
    fn missing_mod_def_is_missing_input() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = ensure_mod_def(&temp.path().join("absent.ww3"), temp.path())
            .expect_err("missing mod_def should fail");
        assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);
    }

    #[cfg(unix)]
    #[test]
    fn referenced_file_is_linked_by_bare_name() {
        let temp = TempDir::new().expect("tempdir should be created");
        let inputs = temp.path().join("inputs");
        fs::create_dir(&inputs).expect("inputs dir should be created");
        let source = inputs.join("depth.dat");
        fs::write(&source, b"1 2 3").expect("source should be written");
        let run_dir = temp.path().join("run");
        fs::create_dir(&run_dir).expect("run dir should be created");

        let name = link_into_run_dir(&source, &run_dir).expect("file should be linked");
        assert_eq!(name, "depth.dat");
        let linked = run_dir.join("depth.dat");
        assert!(
            fs::symlink_metadata(&linked)
                .expect("link should exist")
                .file_type()
                .is_symlink()
        );
        assert_eq!(fs::read(&linked).expect("link should resolve"), b"1 2 3");

        let again = link_into_run_dir(&source, &run_dir).expect("second link is a no-op");
        assert_eq!(again, "depth.dat");
    }

    #[test]
    fn missing_reference_is_missing_input() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = link_into_run_dir(&temp.path().join("absent.nc"), temp.path())
            .expect_err("missing file should fail");
        assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);
    }

    #[test]
    fn output_artifact_names_are_fixed() {
        let temp = TempDir::new().expect("tempdir should be created");
        let wrong = temp.path().join("out.ww3");
        fs::write(&wrong, b"").expect("file should be written");
        let error = ensure_output_artifact(&wrong, "out_grd.ww3", temp.path())
            .expect_err("name is checked");
        assert_eq!(error.category(), Ww3ErrorCategory::InvalidValue);
        assert!(error.message().contains("'out_grd.ww3'; got 'out.ww3'"));

        let point = temp.path().join("out_pnt.ww3");
        fs::write(&point, b"").expect("file should be written");
        let error = ensure_output_artifact(&point, "out_grd.ww3", temp.path())
            .expect_err("point output is not gridded output");
        assert_eq!(error.category(), Ww3ErrorCategory::InvalidValue);

        let absent = temp.path().join("out_grd.ww3");
        let error = ensure_output_artifact(&absent, "out_grd.ww3", temp.path())
            .expect_err("absent artifact should fail");
        assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);
    }

    #[test]
    fn integer_choices_quote_allowed_set() {
        check_int_choice("BOUND%INTERP", 2, &[1, 2]).expect("2 is allowed");
        let error = check_int_choice("BOUND%INTERP", 3, &[1, 2]).expect_err("3 is rejected");
        assert_eq!(error.category(), Ww3ErrorCategory::InvalidValue);
        assert_eq!(error.message(), "BOUND%INTERP must be one of ['1', '2']; got 3");
        assert_eq!(quoted_set::<&str>(&[]), "[]");
    }

    #[test]
    fn timeshift_requires_date_and_time_groups() {
        check_timeshift("00000000 000000").expect("zero shift is valid");
        check_timeshift("20200101 120000").expect("full shift is valid");
        for bad in ["", "20200101", "2020011 120000", "20200101 12000a", "1 2 3"] {
            let error = check_timeshift(bad).expect_err("malformed shift should fail");
            assert_eq!(error.placeholder(), "VALUE.TIMESHIFT");
        }
    }
}
