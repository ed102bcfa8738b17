//! `ww3_bounc`: boundary spectra preprocessing.

use super::{NamelistDocument, Ww3Program};
use crate::domain::{ProgramKind, Ww3Error, Ww3Result};
use crate::namelist::{TemplateValues, render_template};
use crate::serialization::write_text_artifact;
use crate::validation::{
    check_int_choice, ensure_mod_def, ensure_run_dir, file_name_of, link_into_run_dir,
    natural_cmp,
};
use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const TEMPLATE: &str = include_str!("../../../templates/ww3_bounc.nml.tpl");

/// Listing written when the boundary input is a directory.
pub const SPEC_LIST_FILE: &str = "spec.list";

namelist_choice! {
    BoundMode, "BOUND%MODE" {
        Write => "WRITE",
        Read => "READ",
    }
}

impl Default for BoundMode {
    fn default() -> Self {
        Self::Write
    }
}

/// Spectra to process: one file, or every matching file of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryInput {
    SingleFile(PathBuf),
    FileSet(PathBuf),
}

impl BoundaryInput {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::FileSet(path)
        } else {
            Self::SingleFile(path)
        }
    }
}

fn default_interp() -> i64 {
    2
}

fn default_verbose() -> i64 {
    1
}

fn match_everything() -> String {
    "*".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BouncParams {
    #[serde(default)]
    pub mode: BoundMode,
    #[serde(default = "default_interp")]
    pub interp: i64,
    #[serde(default = "default_verbose")]
    pub verbose: i64,
    /// File-name glob selecting the members of a [`BoundaryInput::FileSet`].
    #[serde(default = "match_everything")]
    pub pattern: String,
    /// File named by `BOUND%FILE`; resolved from the boundary input.
    #[serde(skip)]
    pub file: String,
}

impl Default for BouncParams {
    fn default() -> Self {
        Self {
            mode: BoundMode::default(),
            interp: default_interp(),
            verbose: default_verbose(),
            pattern: match_everything(),
            file: String::new(),
        }
    }
}

impl BouncParams {
    fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values
            .set("bound_mode", self.mode.as_str())
            .set("bound_interp", self.interp.to_string())
            .set("bound_verbose", self.verbose.to_string())
            .set("bound_file", self.file.as_str());
        values
    }
}

#[derive(Debug, Clone)]
pub struct BouncProgram {
    params: BouncParams,
    document: NamelistDocument,
}

impl BouncProgram {
    pub fn new(
        run_dir: impl Into<PathBuf>,
        mod_def: &Path,
        input: &BoundaryInput,
        mut params: BouncParams,
    ) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;
        ensure_mod_def(mod_def, &run_dir)?;
        check_int_choice("BOUND%INTERP", params.interp, &[1, 2])?;
        check_int_choice("BOUND%VERBOSE", params.verbose, &[0, 1, 2])?;

        params.file = match input {
            BoundaryInput::SingleFile(path) => link_into_run_dir(path, &run_dir)?,
            BoundaryInput::FileSet(dir) => mirror_file_set(dir, &run_dir, &params.pattern)?,
        };

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }
}

/// Copies the matching files of `dir` into a same-named directory of
/// `run_dir` and lists them, naturally ordered, in [`SPEC_LIST_FILE`].
fn mirror_file_set(dir: &Path, run_dir: &Path, pattern: &str) -> Ww3Result<String> {
    let matcher = compile_pattern(pattern)?;
    let folder = folder_name(dir)?;
    let mirror = run_dir.join(&folder);
    if !mirror.is_dir() {
        warn!("Folder {} is not in the run directory; creating it", folder);
        fs::create_dir_all(&mirror).map_err(|source| {
            Ww3Error::setup(
                "SETUP.BOUNDARY_DIR",
                format!("failed to create '{}': {}", mirror.display(), source),
            )
        })?;
    }

    let mut names = list_files(dir, &matcher)?;
    names.sort_by(|left, right| natural_cmp(left, right));

    let mut listing = String::new();
    for name in &names {
        let destination = mirror.join(name);
        if !destination.exists() {
            fs::copy(dir.join(name), &destination).map_err(|source| {
                Ww3Error::setup(
                    "SETUP.BOUNDARY_COPY",
                    format!(
                        "could not copy '{}' to '{}': {}",
                        dir.join(name).display(),
                        destination.display(),
                        source
                    ),
                )
            })?;
        }
        listing.push_str(&format!("{}/{}\n", folder, name));
    }

    write_text_artifact(&run_dir.join(SPEC_LIST_FILE), &listing)?;
    Ok(SPEC_LIST_FILE.to_string())
}

fn compile_pattern(pattern: &str) -> Ww3Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|error| {
            Ww3Error::invalid_value(
                "VALUE.BOUNDARY_PATTERN",
                format!("invalid boundary file pattern '{}': {}", pattern, error),
            )
        })
}

fn folder_name(dir: &Path) -> Ww3Result<String> {
    if dir.file_name().is_some() {
        return file_name_of(dir);
    }
    let resolved = fs::canonicalize(dir).map_err(|source| {
        Ww3Error::missing_input(
            "INPUT.BOUNDARY_DIR",
            format!("No such file or directory '{}': {}", dir.display(), source),
        )
    })?;
    file_name_of(&resolved)
}

/// Regular, non-hidden files of `dir` whose names match.
fn list_files(dir: &Path, matcher: &GlobMatcher) -> Ww3Result<Vec<String>> {
    let read_error = |source: std::io::Error| {
        Ww3Error::missing_input(
            "INPUT.BOUNDARY_DIR",
            format!("could not read '{}': {}", dir.display(), source),
        )
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.path().is_file() || !matcher.is_match(&name) {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}

impl Ww3Program for BouncProgram {
    type Params = BouncParams;

    const KIND: ProgramKind = ProgramKind::Bounc;

    fn params(&self) -> &BouncParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BouncParams {
        &mut self.params
    }

    fn document(&self) -> &NamelistDocument {
        &self.document
    }

    fn document_mut(&mut self) -> &mut NamelistDocument {
        &mut self.document
    }

    fn render(&self) -> Ww3Result<String> {
        render_template(TEMPLATE, &self.params.template_values())
    }
}
