//! One configuration family per WW3 executable.
//!
//! Every family validates its inputs once in its constructor, renders its
//! namelist from a template and then exposes the shared operations of
//! [`Ww3Program`].

/// Declares a closed set of namelist string values. Parsing outside the set
/// is an `InvalidValue` error naming every allowed value.
macro_rules! namelist_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::Ww3Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    _ => {
                        let allowed = Self::ALL.iter().map(|choice| choice.as_str()).collect::<Vec<_>>();
                        Err($crate::domain::Ww3Error::invalid_value(
                            "VALUE.ENUMERATION",
                            format!(
                                "{} must be one of {}; got '{}'",
                                $field,
                                $crate::validation::quoted_set(&allowed),
                                value
                            ),
                        ))
                    }
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::Ww3Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod bounc;
pub mod grid;
pub mod ounf;
pub mod ounp;
pub mod prnc;
pub mod shel;

use crate::domain::{ProgramKind, RunOutcome, Ww3Result};
use crate::namelist::BlockEdit;
use crate::runner::{Launcher, run_program};
use crate::serialization::write_text_artifact;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

pub use bounc::{BoundMode, BoundaryInput, BouncParams, BouncProgram};
pub use grid::{CoordinateSystem, GridClosure, GridParams, GridProgram, GridType};
pub use ounf::{OunfParams, OunfProgram};
pub use ounp::{OunpParams, OunpProgram};
pub use prnc::{ForcingField, PrncParams, PrncProgram};
pub use shel::{ShelParams, ShelProgram};

/// Earliest date WW3 namelists default to.
pub fn default_start() -> NaiveDateTime {
    midnight(1900, 1, 1)
}

/// Latest date WW3 namelists default to.
pub fn default_stop() -> NaiveDateTime {
    midnight(2900, 12, 31)
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Rendered namelist text plus the run directory it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamelistDocument {
    run_dir: PathBuf,
    text: String,
    outcome: Option<RunOutcome>,
}

impl NamelistDocument {
    pub fn new(run_dir: impl Into<PathBuf>, text: String) -> Self {
        Self {
            run_dir: run_dir.into(),
            text,
            outcome: None,
        }
    }
}

pub trait Ww3Program {
    type Params;

    const KIND: ProgramKind;

    fn params(&self) -> &Self::Params;

    fn params_mut(&mut self) -> &mut Self::Params;

    fn document(&self) -> &NamelistDocument;

    fn document_mut(&mut self) -> &mut NamelistDocument;

    /// Renders the namelist from the current parameters.
    fn render(&self) -> Ww3Result<String>;

    fn default_launcher(&self) -> Launcher {
        Launcher::Direct
    }

    fn text(&self) -> &str {
        &self.document().text
    }

    fn run_dir(&self) -> &Path {
        &self.document().run_dir
    }

    /// Recomputes the text from the parameters. Block edits are discarded.
    fn rerender(&mut self) -> Ww3Result<()> {
        let text = self.render()?;
        self.document_mut().text = text;
        Ok(())
    }

    /// Applies `update` to the parameters and re-renders. Construction-time
    /// checks are not repeated.
    fn with_updated<F>(mut self, update: F) -> Ww3Result<Self>
    where
        Self: Sized,
        F: FnOnce(&mut Self::Params),
    {
        update(self.params_mut());
        self.rerender()?;
        Ok(self)
    }

    fn update_text(&mut self, edit: &BlockEdit) -> Ww3Result<()> {
        let text = edit.apply(self.text())?;
        self.document_mut().text = text;
        Ok(())
    }

    /// Writes the text to the executable's namelist file in the run directory.
    fn write_namelist(&self) -> Ww3Result<PathBuf> {
        let path = self.run_dir().join(Self::KIND.namelist_file());
        write_text_artifact(&path, self.text())?;
        Ok(path)
    }

    fn run(&mut self, launcher: Launcher) -> Ww3Result<&RunOutcome> {
        let outcome = run_program(Self::KIND.executable(), self.run_dir(), launcher)?;
        Ok(self.document_mut().outcome.insert(outcome))
    }

    fn outcome(&self) -> Option<&RunOutcome> {
        self.document().outcome.as_ref()
    }
}
