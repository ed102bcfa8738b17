//! `ww3_ounf`: gridded output postprocessing.

use super::{NamelistDocument, Ww3Program, default_start};
use crate::domain::{ProgramKind, Ww3Result};
use crate::namelist::format::{format_timestamp, fortran_flag, join_values, join_words};
use crate::namelist::{TemplateValues, render_template};
use crate::validation::{ensure_mod_def, ensure_output_artifact, ensure_run_dir};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = include_str!("../../../templates/ww3_ounf.nml.tpl");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldOutput {
    pub timestart: NaiveDateTime,
    pub timestride: u64,
    pub timecount: u64,
    /// 4 yearly, 6 monthly, 8 daily, 10 hourly.
    pub timesplit: u32,
    pub list: Vec<String>,
    pub samefile: bool,
    pub partition: Vec<u32>,
    #[serde(rename = "type")]
    pub kind: u32,
}

impl Default for FieldOutput {
    fn default() -> Self {
        Self {
            timestart: default_start(),
            timestride: 0,
            timecount: 1_000_000_000,
            timesplit: 6,
            list: ["HS", "FP", "DIR", "SPR", "WND", "ICE"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            samefile: true,
            partition: vec![0, 1, 2, 3],
            kind: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GriddedFileOutput {
    pub prefix: String,
    pub netcdf: u32,
    pub ix0: u64,
    pub ixn: u64,
    pub iy0: u64,
    pub iyn: u64,
}

impl Default for GriddedFileOutput {
    fn default() -> Self {
        Self {
            prefix: "ww3.".to_string(),
            netcdf: 4,
            ix0: 1,
            ixn: 1_000_000_000,
            iy0: 1,
            iyn: 1_000_000_000,
        }
    }
}

/// Spherical multiple-cell grid output window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SmcOutput {
    #[serde(rename = "type")]
    pub kind: i32,
    pub sxo: i64,
    pub exo: i64,
    pub syo: i64,
    pub eyo: i64,
    pub celfac: i64,
    pub noval: i64,
}

impl Default for SmcOutput {
    fn default() -> Self {
        Self {
            kind: 1,
            sxo: 0,
            exo: 0,
            syo: 0,
            eyo: 0,
            celfac: 1,
            noval: -999,
        }
    }
}

/// Name `ww3_ounf` reads its raw input from.
pub const GRIDDED_OUTPUT: &str = "out_grd.ww3";

fn gridded_output() -> String {
    GRIDDED_OUTPUT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OunfParams {
    /// Raw gridded model output.
    #[serde(default = "gridded_output")]
    pub model_output: String,
    #[serde(default)]
    pub field: FieldOutput,
    #[serde(default)]
    pub file: GriddedFileOutput,
    #[serde(default)]
    pub smc: SmcOutput,
}

impl Default for OunfParams {
    fn default() -> Self {
        Self {
            model_output: gridded_output(),
            field: FieldOutput::default(),
            file: GriddedFileOutput::default(),
            smc: SmcOutput::default(),
        }
    }
}

impl OunfParams {
    fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values
            .set("field_timestart", format_timestamp(&self.field.timestart))
            .set("field_timestride", self.field.timestride.to_string())
            .set("field_timecount", self.field.timecount.to_string())
            .set("field_timesplit", self.field.timesplit.to_string())
            .set("field_list", join_words(&self.field.list))
            .set("field_samefile", fortran_flag(self.field.samefile))
            .set("field_partition", join_values(&self.field.partition))
            .set("field_type", self.field.kind.to_string())
            .set("file_prefix", self.file.prefix.as_str())
            .set("file_netcdf", self.file.netcdf.to_string())
            .set("file_ix0", self.file.ix0.to_string())
            .set("file_ixn", self.file.ixn.to_string())
            .set("file_iy0", self.file.iy0.to_string())
            .set("file_iyn", self.file.iyn.to_string())
            .set("smc_type", self.smc.kind.to_string())
            .set("smc_sxo", self.smc.sxo.to_string())
            .set("smc_exo", self.smc.exo.to_string())
            .set("smc_syo", self.smc.syo.to_string())
            .set("smc_eyo", self.smc.eyo.to_string())
            .set("smc_celfac", self.smc.celfac.to_string())
            .set("smc_noval", self.smc.noval.to_string());
        values
    }
}

#[derive(Debug, Clone)]
pub struct OunfProgram {
    params: OunfParams,
    document: NamelistDocument,
}

impl OunfProgram {
    pub fn new(
        run_dir: impl Into<PathBuf>,
        mod_def: &Path,
        mut params: OunfParams,
    ) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;
        ensure_mod_def(mod_def, &run_dir)?;
        params.model_output =
            ensure_output_artifact(Path::new(&params.model_output), GRIDDED_OUTPUT, &run_dir)?;

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }
}

impl Ww3Program for OunfProgram {
    type Params = OunfParams;

    const KIND: ProgramKind = ProgramKind::Ounf;

    fn params(&self) -> &OunfParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut OunfParams {
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
