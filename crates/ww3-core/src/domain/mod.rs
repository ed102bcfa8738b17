pub mod errors;

pub use errors::{ExitPlaceholder, Ww3Error, Ww3ErrorCategory, Ww3Result};

use std::fmt::{Display, Formatter};

/// Name the model definition artifact takes inside a run directory.
pub const MOD_DEF_FILE: &str = "mod_def.ww3";

/// Timestamp layout shared by every namelist date field.
pub const DATE_FORMAT: &str = "%Y%m%d %H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Grid,
    Prnc,
    Bounc,
    Shel,
    Ounf,
    Ounp,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 6] = [
        Self::Grid,
        Self::Prnc,
        Self::Bounc,
        Self::Shel,
        Self::Ounf,
        Self::Ounp,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "GRID",
            Self::Prnc => "PRNC",
            Self::Bounc => "BOUNC",
            Self::Shel => "SHEL",
            Self::Ounf => "OUNF",
            Self::Ounp => "OUNP",
        }
    }

    /// Executable looked up on the search path.
    pub const fn executable(self) -> &'static str {
        match self {
            Self::Grid => "ww3_grid",
            Self::Prnc => "ww3_prnc",
            Self::Bounc => "ww3_bounc",
            Self::Shel => "ww3_shel",
            Self::Ounf => "ww3_ounf",
            Self::Ounp => "ww3_ounp",
        }
    }

    /// Namelist file the executable reads from its working directory.
    pub const fn namelist_file(self) -> &'static str {
        match self {
            Self::Grid => "ww3_grid.nml",
            Self::Prnc => "ww3_prnc.nml",
            Self::Bounc => "ww3_bounc.nml",
            Self::Shel => "ww3_shel.nml",
            Self::Ounf => "ww3_ounf.nml",
            Self::Ounp => "ww3_ounp.nml",
        }
    }

    pub const fn requires_mod_def(self) -> bool {
        !matches!(self, Self::Grid)
    }
}

impl Display for ProgramKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Exit status and console streams of one external program invocation.
///
/// A non-zero `return_code` is data for the caller, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub return_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.return_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn describe_status(&self) -> String {
        self.return_code.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("return code {}", code),
        )
    }
}
