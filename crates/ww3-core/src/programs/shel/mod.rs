//! `ww3_shel`: the single-grid model driver.

use super::{NamelistDocument, Ww3Program, default_start, default_stop};
use crate::domain::{ProgramKind, Ww3Result};
use crate::namelist::format::{format_timestamp, fortran_flag, join_words};
use crate::namelist::{TemplateValues, render_template};
use crate::runner::Launcher;
use crate::validation::{check_int_choice, ensure_mod_def, ensure_run_dir, link_into_run_dir};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = include_str!("../../../templates/ww3_shel.nml.tpl");

pub const DEFAULT_FIELD_LIST: [&str; 20] = [
    "DPT", "WND", "HS", "LM", "T02", "T0M1", "T01", "FP", "DIR", "SPR", "DP", "PHS", "PTP", "PLP",
    "PDIR", "PSPR", "PWS", "TWS", "PNR", "DW",
];

/// `INPUT%FORCING%*` and `INPUT%ASSIM%*` switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputSwitches {
    pub water_levels: bool,
    pub currents: bool,
    pub winds: bool,
    pub ice_conc: bool,
    pub ice_param1: bool,
    pub ice_param2: bool,
    pub ice_param3: bool,
    pub ice_param4: bool,
    pub ice_param5: bool,
    pub mud_density: bool,
    pub mud_thickness: bool,
    pub mud_viscosity: bool,
    pub assim_mean: bool,
    pub assim_spec1d: bool,
    pub assim_spec2d: bool,
}

/// Output interval in seconds for each output type; 0 disables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputStrides {
    pub field: u64,
    pub point: u64,
    pub track: u64,
    /// Also the middle term of the composite `DATE%RESTART` line.
    pub restart: u64,
    pub boundary: u64,
    pub partition: u64,
    pub coupling: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartitionOutput {
    pub x0: i64,
    pub xn: i64,
    pub nx: i64,
    pub y0: i64,
    pub yn: i64,
    pub ny: i64,
    pub format: bool,
}

impl Default for PartitionOutput {
    fn default() -> Self {
        Self {
            x0: 0,
            xn: 0,
            nx: 0,
            y0: 0,
            yn: 0,
            ny: 0,
            format: true,
        }
    }
}

/// Number of homogeneous inputs of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HomogCounts {
    pub n_ic1: u32,
    pub n_ic2: u32,
    pub n_ic3: u32,
    pub n_ic4: u32,
    pub n_ic5: u32,
    pub n_mdn: u32,
    pub n_mth: u32,
    pub n_mvs: u32,
    pub n_lev: u32,
    pub n_cur: u32,
    pub n_wnd: u32,
    pub n_ice: u32,
    pub n_mov: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShelParams {
    pub nproc: usize,
    pub iostyp: i64,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub inputs: InputSwitches,
    pub field_list: Vec<String>,
    /// Point list; only needed when point output is enabled.
    pub point_file: String,
    pub track_format: bool,
    pub partition: PartitionOutput,
    pub coupling_sent: String,
    pub coupling_received: String,
    pub strides: OutputStrides,
    pub homog_count: HomogCounts,
}

impl Default for ShelParams {
    fn default() -> Self {
        Self {
            nproc: 1,
            iostyp: 1,
            start: default_start(),
            stop: default_stop(),
            inputs: InputSwitches::default(),
            field_list: DEFAULT_FIELD_LIST.iter().map(ToString::to_string).collect(),
            point_file: "mylist".to_string(),
            track_format: true,
            partition: PartitionOutput::default(),
            coupling_sent: " ".to_string(),
            coupling_received: " ".to_string(),
            strides: OutputStrides::default(),
            homog_count: HomogCounts::default(),
        }
    }
}

impl ShelParams {
    /// `'start' 'restart stride' 'stop'`.
    pub fn restart_line(&self) -> String {
        format!(
            "'{}' '{}' '{}'",
            format_timestamp(&self.start),
            self.strides.restart,
            format_timestamp(&self.stop)
        )
    }

    fn template_values(&self) -> TemplateValues {
        let start = format_timestamp(&self.start);
        let stop = format_timestamp(&self.stop);
        let mut values = TemplateValues::new();

        values
            .set("domain_iostyp", self.iostyp.to_string())
            .set("domain_start", start.as_str())
            .set("domain_stop", stop.as_str());

        let inputs = &self.inputs;
        let switches = [
            ("input_forcing_water_levels", inputs.water_levels),
            ("input_forcing_currents", inputs.currents),
            ("input_forcing_winds", inputs.winds),
            ("input_forcing_ice_conc", inputs.ice_conc),
            ("input_forcing_ice_param1", inputs.ice_param1),
            ("input_forcing_ice_param2", inputs.ice_param2),
            ("input_forcing_ice_param3", inputs.ice_param3),
            ("input_forcing_ice_param4", inputs.ice_param4),
            ("input_forcing_ice_param5", inputs.ice_param5),
            ("input_forcing_mud_density", inputs.mud_density),
            ("input_forcing_mud_thickness", inputs.mud_thickness),
            ("input_forcing_mud_viscosity", inputs.mud_viscosity),
            ("input_assim_mean", inputs.assim_mean),
            ("input_assim_spec1d", inputs.assim_spec1d),
            ("input_assim_spec2d", inputs.assim_spec2d),
        ];
        for (key, enabled) in switches {
            values.set(key, fortran_flag(enabled));
        }

        values
            .set("type_field_list", join_words(&self.field_list))
            .set("type_point_file", self.point_file.as_str())
            .set("type_track_format", fortran_flag(self.track_format))
            .set("type_partition_x0", self.partition.x0.to_string())
            .set("type_partition_xn", self.partition.xn.to_string())
            .set("type_partition_nx", self.partition.nx.to_string())
            .set("type_partition_y0", self.partition.y0.to_string())
            .set("type_partition_yn", self.partition.yn.to_string())
            .set("type_partition_ny", self.partition.ny.to_string())
            .set("type_partition_format", fortran_flag(self.partition.format))
            .set("type_coupling_sent", self.coupling_sent.as_str())
            .set("type_coupling_received", self.coupling_received.as_str());

        let strides = &self.strides;
        let outputs = [
            ("date_field_start", "date_field_stride", "date_field_stop", strides.field),
            ("date_point_start", "date_point_stride", "date_point_stop", strides.point),
            ("date_track_start", "date_track_stride", "date_track_stop", strides.track),
            ("date_restart_start", "date_restart_stride", "date_restart_stop", strides.restart),
            ("date_boundary_start", "date_boundary_stride", "date_boundary_stop", strides.boundary),
            (
                "date_partition_start",
                "date_partition_stride",
                "date_partition_stop",
                strides.partition,
            ),
            ("date_coupling_start", "date_coupling_stride", "date_coupling_stop", strides.coupling),
        ];
        for (start_key, stride_key, stop_key, stride) in outputs {
            values
                .set(start_key, start.as_str())
                .set(stride_key, stride.to_string())
                .set(stop_key, stop.as_str());
        }
        values.set("date_restart", self.restart_line());

        let counts = &self.homog_count;
        let homog = [
            ("homog_count_n_ic1", counts.n_ic1),
            ("homog_count_n_ic2", counts.n_ic2),
            ("homog_count_n_ic3", counts.n_ic3),
            ("homog_count_n_ic4", counts.n_ic4),
            ("homog_count_n_ic5", counts.n_ic5),
            ("homog_count_n_mdn", counts.n_mdn),
            ("homog_count_n_mth", counts.n_mth),
            ("homog_count_n_mvs", counts.n_mvs),
            ("homog_count_n_lev", counts.n_lev),
            ("homog_count_n_cur", counts.n_cur),
            ("homog_count_n_wnd", counts.n_wnd),
            ("homog_count_n_ice", counts.n_ice),
            ("homog_count_n_mov", counts.n_mov),
        ];
        for (key, count) in homog {
            values.set(key, count.to_string());
        }
        values
    }
}

#[derive(Debug, Clone)]
pub struct ShelProgram {
    params: ShelParams,
    document: NamelistDocument,
}

impl ShelProgram {
    pub fn new(
        run_dir: impl Into<PathBuf>,
        mod_def: &Path,
        mut params: ShelParams,
    ) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;
        ensure_mod_def(mod_def, &run_dir)?;
        check_int_choice("DOMAIN%IOSTYP", params.iostyp, &[0, 1, 2, 3])?;

        if params.strides.point > 0 {
            params.point_file = link_into_run_dir(Path::new(&params.point_file), &run_dir)?;
        }

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }
}

impl Ww3Program for ShelProgram {
    type Params = ShelParams;

    const KIND: ProgramKind = ProgramKind::Shel;

    fn params(&self) -> &ShelParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ShelParams {
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

    fn default_launcher(&self) -> Launcher {
        Launcher::Mpi {
            nproc: self.params.nproc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ShelParams, ShelProgram};
    use crate::domain::Ww3ErrorCategory;
    use crate::programs::Ww3Program;
    use crate::programs::test_support::{timestamp, touch};
    use crate::runner::Launcher;
    use tempfile::TempDir;

    fn params() -> ShelParams {
        ShelParams {
            nproc: 4,
            start: timestamp(2010, 1, 1, 0),
            stop: timestamp(2010, 1, 3, 0),
            ..ShelParams::default()
        }
    }

    #[test]
    fn domain_dates_propagate_to_every_output() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let mut shel_params = params();
        shel_params.strides.field = 3600;
        shel_params.strides.restart = 86400;
        shel_params.inputs.winds = true;

        let shel = ShelProgram::new(temp.path().join("run"), &mod_def, shel_params)
            .expect("shel should build");
        let text = shel.text();

        assert!(text.contains("  DOMAIN%START  = '20100101 000000'\n"));
        for output in ["FIELD", "POINT", "TRACK", "RESTART", "BOUNDARY", "PARTITION", "COUPLING"] {
            assert!(text.contains(&format!("  DATE%{output}%START = '20100101 000000'\n")));
            assert!(text.contains(&format!("  DATE%{output}%STOP = '20100103 000000'\n")));
        }
        assert!(text.contains("  DATE%FIELD%STRIDE = '3600'\n"));
        assert!(text.contains("  DATE%POINT%STRIDE = '0'\n"));
        assert!(text.contains("  DATE%RESTART%STRIDE = '86400'\n"));
        assert!(text.contains(
            "  DATE%RESTART             =  '20100101 000000' '86400' '20100103 000000'\n"
        ));
        assert!(text.contains("  INPUT%FORCING%WINDS = 'T'\n"));
        assert!(text.contains("  INPUT%FORCING%CURRENTS = 'F'\n"));
        assert!(text.contains("  TYPE%FIELD%LIST = 'DPT WND HS LM T02 T0M1 T01 FP DIR SPR DP PHS PTP PLP PDIR PSPR PWS TWS PNR DW'\n"));
        assert!(text.contains("  TYPE%TRACK%FORMAT = T\n"));
        assert!(text.contains("  HOMOG_COUNT%N_WND = 0\n"));
        assert_eq!(shel.default_launcher(), Launcher::Mpi { nproc: 4 });
    }

    #[test]
    fn iostyp_outside_set_is_rejected() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let shel_params = ShelParams {
            iostyp: 4,
            ..params()
        };
        let error = ShelProgram::new(temp.path().join("run"), &mod_def, shel_params)
            .expect_err("iostyp 4 should fail");
        assert_eq!(error.category(), Ww3ErrorCategory::InvalidValue);
        assert!(error.message().contains("['0', '1', '2', '3']"));
    }

    #[test]
    fn point_list_is_required_only_with_point_output() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mod_def = touch(temp.path(), "mod_def.ww3");
        let run_dir = temp.path().join("run");

        let shel = ShelProgram::new(&run_dir, &mod_def, params()).expect("no point output");
        assert_eq!(shel.params().point_file, "mylist");

        let mut with_points = params();
        with_points.strides.point = 600;
        with_points.point_file = temp.path().join("buoys.list").to_string_lossy().into_owned();
        let error = ShelProgram::new(&run_dir, &mod_def, with_points.clone())
            .expect_err("absent point list should fail");
        assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);

        touch(temp.path(), "buoys.list");
        let shel = ShelProgram::new(&run_dir, &mod_def, with_points).expect("point list linked");
        assert_eq!(shel.params().point_file, "buoys.list");
        assert!(run_dir.join("buoys.list").exists());
        assert!(shel.text().contains("  TYPE%POINT%FILE = 'buoys.list'\n"));
    }

    #[test]
    fn json_params_override_nested_defaults() {
        let parsed = serde_json::from_str::<ShelParams>(
            r#"{"start":"2015-06-01T00:00:00","inputs":{"winds":true},
                "strides":{"restart":3600},"field_list":["HS","DIR"]}"#,
        )
        .expect("params should parse");
        assert_eq!(parsed.start, timestamp(2015, 6, 1, 0));
        assert!(parsed.inputs.winds);
        assert!(!parsed.inputs.currents);
        assert_eq!(parsed.strides.restart, 3600);
        assert_eq!(parsed.field_list, vec!["HS", "DIR"]);
        assert_eq!(parsed.point_file, "mylist");
        assert!(parsed.restart_line().contains("'3600'"));
    }
}
