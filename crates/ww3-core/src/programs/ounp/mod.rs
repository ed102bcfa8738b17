//! `ww3_ounp`: point output postprocessing.

use super::{NamelistDocument, Ww3Program, default_start};
use crate::domain::{ProgramKind, Ww3Error, Ww3Result};
use crate::namelist::format::{format_timestamp, fortran_flag};
use crate::namelist::{TemplateValues, render_template};
use crate::validation::{ensure_mod_def, ensure_output_artifact, ensure_run_dir};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const TEMPLATE: &str = include_str!("../../../templates/ww3_ounp.nml.tpl");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PointOutput {
    pub timestart: NaiveDateTime,
    pub timestride: u64,
    pub timecount: u64,
    pub timesplit: u32,
    /// Point indices, or `all`.
    pub list: String,
    pub samefile: bool,
    pub buffer: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    pub dimorder: bool,
}

impl Default for PointOutput {
    fn default() -> Self {
        Self {
            timestart: default_start(),
            timestride: 0,
            timecount: 1_000_000_000,
            timesplit: 6,
            list: "all".to_string(),
            samefile: true,
            buffer: 150,
            kind: 1,
            dimorder: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PointFileOutput {
    pub prefix: String,
    pub netcdf: u32,
}

impl Default for PointFileOutput {
    fn default() -> Self {
        Self {
            prefix: "ww3.".to_string(),
            netcdf: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpectraOutput {
    pub output: i32,
    pub scale_fac: i32,
    pub output_fac: i32,
}

impl Default for SpectraOutput {
    fn default() -> Self {
        Self {
            output: 3,
            scale_fac: 1,
            output_fac: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParamOutput {
    pub output: i32,
}

impl Default for ParamOutput {
    fn default() -> Self {
        Self { output: 4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOutput {
    pub output: i32,
    pub scale_fac: i32,
    pub output_fac: i32,
    pub table_fac: i32,
    pub spectrum: bool,
    pub input: bool,
    pub interactions: bool,
    pub dissipation: bool,
    pub bottom: bool,
    pub ice: bool,
    pub total: bool,
}

impl Default for SourceOutput {
    fn default() -> Self {
        Self {
            output: 4,
            scale_fac: 0,
            output_fac: 0,
            table_fac: 0,
            spectrum: true,
            input: true,
            interactions: true,
            dissipation: true,
            bottom: true,
            ice: true,
            total: true,
        }
    }
}

pub const POINT_OUTPUT: &str = "out_pnt.ww3";

fn point_output() -> String {
    POINT_OUTPUT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OunpParams {
    /// Raw point model output.
    #[serde(default = "point_output")]
    pub model_output: String,
    #[serde(default)]
    pub point: PointOutput,
    #[serde(default)]
    pub file: PointFileOutput,
    #[serde(default)]
    pub spectra: SpectraOutput,
    #[serde(default)]
    pub param: ParamOutput,
    #[serde(default)]
    pub source: SourceOutput,
}

impl Default for OunpParams {
    fn default() -> Self {
        Self {
            model_output: point_output(),
            point: PointOutput::default(),
            file: PointFileOutput::default(),
            spectra: SpectraOutput::default(),
            param: ParamOutput::default(),
            source: SourceOutput::default(),
        }
    }
}

impl OunpParams {
    fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values
            .set("point_timestart", format_timestamp(&self.point.timestart))
            .set("point_timestride", self.point.timestride.to_string())
            .set("point_timecount", self.point.timecount.to_string())
            .set("point_timesplit", self.point.timesplit.to_string())
            .set("point_list", self.point.list.as_str())
            .set("point_samefile", fortran_flag(self.point.samefile))
            .set("point_buffer", self.point.buffer.to_string())
            .set("point_type", self.point.kind.to_string())
            .set("point_dimorder", fortran_flag(self.point.dimorder))
            .set("file_prefix", self.file.prefix.as_str())
            .set("file_netcdf", self.file.netcdf.to_string())
            .set("spectra_output", self.spectra.output.to_string())
            .set("spectra_scale_fac", self.spectra.scale_fac.to_string())
            .set("spectra_output_fac", self.spectra.output_fac.to_string())
            .set("param_output", self.param.output.to_string());

        let source = &self.source;
        values
            .set("source_output", source.output.to_string())
            .set("source_scale_fac", source.scale_fac.to_string())
            .set("source_output_fac", source.output_fac.to_string())
            .set("source_table_fac", source.table_fac.to_string())
            .set("source_spectrum", fortran_flag(source.spectrum))
            .set("source_input", fortran_flag(source.input))
            .set("source_interactions", fortran_flag(source.interactions))
            .set("source_dissipation", fortran_flag(source.dissipation))
            .set("source_bottom", fortran_flag(source.bottom))
            .set("source_ice", fortran_flag(source.ice))
            .set("source_total", fortran_flag(source.total));
        values
    }
}

#[derive(Debug, Clone)]
pub struct OunpProgram {
    params: OunpParams,
    document: NamelistDocument,
}

impl OunpProgram {
    pub fn new(
        run_dir: impl Into<PathBuf>,
        mod_def: &Path,
        mut params: OunpParams,
    ) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;
        ensure_mod_def(mod_def, &run_dir)?;
        params.model_output =
            ensure_output_artifact(Path::new(&params.model_output), POINT_OUTPUT, &run_dir)?;
        ensure_prefix_dir(&run_dir, &params.file.prefix)?;

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }
}

/// A prefix such as `points/ww3.` writes into `points/` under the run dir.
fn ensure_prefix_dir(run_dir: &Path, prefix: &str) -> Ww3Result<()> {
    let Some((folder, _)) = prefix.rsplit_once('/') else {
        return Ok(());
    };
    let target = run_dir.join(folder);
    if target.is_dir() {
        return Ok(());
    }
    warn!(
        "Output folder {} does not exist in the run directory; creating it",
        target.display()
    );
    fs::create_dir_all(&target).map_err(|source| {
        Ww3Error::setup(
            "SETUP.PREFIX_DIR",
            format!("failed to create '{}': {}", target.display(), source),
        )
    })
}

impl Ww3Program for OunpProgram {
    type Params = OunpParams;

    const KIND: ProgramKind = ProgramKind::Ounp;

    fn params(&self) -> &OunpParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut OunpParams {
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

#[cfg(test)]
mod tests {
    use super::{OunpParams, OunpProgram};
    use crate::namelist::BlockEdit;
    use crate::programs::Ww3Program;
    use crate::programs::test_support::touch;
    use tempfile::TempDir;

    fn params(dir: &std::path::Path) -> OunpParams {
        let output = touch(dir, "out_pnt.ww3");
        OunpParams {
            model_output: output.to_string_lossy().into_owned(),
            ..OunpParams::default()
        }
    }

    #[test]
    fn renders_point_blocks_with_defaults() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let ounp = OunpProgram::new(temp.path().join("run"), &mod_def, params(temp.path()))
            .expect("ounp should build");

        let text = ounp.text();
        assert!(text.contains("  POINT%LIST = 'all'\n"));
        assert!(text.contains("  POINT%BUFFER = 150\n"));
        assert!(text.contains("  POINT%DIMORDER = T\n"));
        assert!(text.contains("  SPECTRA%OUTPUT = 3\n"));
        assert!(text.contains("  PARAM%OUTPUT = 4\n"));
        assert!(text.contains("  SOURCE%TOTAL = T\n"));
        assert_eq!(ounp.params().model_output, "out_pnt.ww3");
    }

    #[test]
    fn prefix_folder_is_created_in_run_dir() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let mut ounp_params = params(temp.path());
        ounp_params.file.prefix = "points/buoys/ww3.".to_string();

        let run_dir = temp.path().join("run");
        let ounp = OunpProgram::new(&run_dir, &mod_def, ounp_params).expect("ounp should build");
        assert!(run_dir.join("points").join("buoys").is_dir());
        assert!(ounp.text().contains("  FILE%PREFIX = 'points/buoys/ww3.'\n"));
    }

    #[test]
    fn unused_source_block_can_be_dropped() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let mut ounp = OunpProgram::new(temp.path().join("run"), &mod_def, params(temp.path()))
            .expect("ounp should build");
        ounp.update_text(&BlockEdit::remove("&SOURCE_NML"))
            .expect("source block should be removed");
        assert!(!ounp.text().contains("  SOURCE%OUTPUT = 4\n"));
        assert!(ounp.text().contains("  PARAM%OUTPUT = 4\n"));
    }
}
