//! `ww3_prnc`: forcing field preprocessing from a gridded dataset.

use super::{NamelistDocument, Ww3Program, default_start, default_stop};
use crate::dataset::{
    DatasetOracle, LATITUDE_PREFIXES, LONGITUDE_PREFIXES, check_variables, infer_coordinate,
    is_descending,
};
use crate::domain::{ProgramKind, Ww3Result};
use crate::namelist::format::{format_timestamp, fortran_flag_lower};
use crate::namelist::{TemplateValues, render_template};
use crate::validation::{
    check_timeshift, ensure_mod_def, ensure_run_dir, file_name_of, link_into_run_dir,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const TEMPLATE: &str = include_str!("../../../templates/ww3_prnc.nml.tpl");

namelist_choice! {
    ForcingField, "FORCING%FIELD" {
        IceParam1 => "ICE_PARAM1",
        IceParam2 => "ICE_PARAM2",
        IceParam3 => "ICE_PARAM3",
        IceParam4 => "ICE_PARAM4",
        IceParam5 => "ICE_PARAM5",
        MudDensity => "MUD_DENSITY",
        MudThickness => "MUD_THICKNESS",
        MudViscosity => "MUD_VISCOSITY",
        WaterLevels => "WATER_LEVELS",
        Currents => "CURRENTS",
        Winds => "WINDS",
        WindAst => "WIND_AST",
        AtmMomentum => "ATM_MOMENTUM",
        AirDensity => "AIR_DENSITY",
        IceConc => "ICE_CONC",
        IceBerg => "ICE_BERG",
        DataAssim => "DATA_ASSIM",
    }
}

fn blank_variable() -> String {
    " ".to_string()
}

fn zero_timeshift() -> String {
    "00000000 000000".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrncParams {
    pub forcing_field: ForcingField,
    pub forcing_grid_latlon: bool,
    pub file_filename: String,
    pub file_longitude: String,
    pub file_latitude: String,
    pub file_var_1: String,
    #[serde(default = "blank_variable")]
    pub file_var_2: String,
    #[serde(default = "blank_variable")]
    pub file_var_3: String,
    #[serde(default = "default_start")]
    pub forcing_timestart: NaiveDateTime,
    #[serde(default = "default_stop")]
    pub forcing_timestop: NaiveDateTime,
    #[serde(default = "zero_timeshift")]
    pub file_timeshift: String,
}

impl PrncParams {
    pub fn new(
        forcing_field: ForcingField,
        forcing_grid_latlon: bool,
        file_filename: impl Into<String>,
        file_longitude: impl Into<String>,
        file_latitude: impl Into<String>,
        file_var_1: impl Into<String>,
    ) -> Self {
        Self {
            forcing_field,
            forcing_grid_latlon,
            file_filename: file_filename.into(),
            file_longitude: file_longitude.into(),
            file_latitude: file_latitude.into(),
            file_var_1: file_var_1.into(),
            file_var_2: blank_variable(),
            file_var_3: blank_variable(),
            forcing_timestart: default_start(),
            forcing_timestop: default_stop(),
            file_timeshift: zero_timeshift(),
        }
    }

    fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values
            .set("forcing_timestart", format_timestamp(&self.forcing_timestart))
            .set("forcing_timestop", format_timestamp(&self.forcing_timestop))
            .set("forcing_field", self.forcing_field.as_str())
            .set("forcing_grid_latlon", fortran_flag_lower(self.forcing_grid_latlon))
            .set("file_filename", self.file_filename.as_str())
            .set("file_longitude", self.file_longitude.as_str())
            .set("file_latitude", self.file_latitude.as_str())
            .set("file_var_1", self.file_var_1.as_str())
            .set("file_var_2", self.file_var_2.as_str())
            .set("file_var_3", self.file_var_3.as_str())
            .set("file_timeshift", self.file_timeshift.as_str());
        values
    }
}

#[derive(Debug, Clone)]
pub struct PrncProgram {
    params: PrncParams,
    document: NamelistDocument,
}

impl PrncProgram {
    /// Links the dataset into the run directory and resolves the declared
    /// coordinate and variable names against it.
    pub fn new(
        run_dir: impl Into<PathBuf>,
        mod_def: &Path,
        mut params: PrncParams,
        dataset: &dyn DatasetOracle,
    ) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;
        ensure_mod_def(mod_def, &run_dir)?;

        params.file_filename = link_into_run_dir(Path::new(&params.file_filename), &run_dir)?;
        let schema = dataset.schema(&run_dir.join(&params.file_filename))?;
        params.file_longitude = infer_coordinate(
            &schema,
            "FILE%LONGITUDE",
            &params.file_longitude,
            &LONGITUDE_PREFIXES,
        )?;
        params.file_latitude = infer_coordinate(
            &schema,
            "FILE%LATITUDE",
            &params.file_latitude,
            &LATITUDE_PREFIXES,
        )?;
        check_variables(
            &schema,
            &[&params.file_var_1, &params.file_var_2, &params.file_var_3],
        )?;
        check_timeshift(&params.file_timeshift)?;

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }

    /// Points the namelist at a south-to-north copy of the dataset when its
    /// latitudes run north to south. Returns whether a copy was written.
    pub fn reverse_latitudes(
        &mut self,
        new_name: &str,
        dataset: &dyn DatasetOracle,
    ) -> Ww3Result<bool> {
        let input = self.run_dir().join(&self.params.file_filename);
        let latitudes = dataset.coordinate_values(&input, &self.params.file_latitude)?;

        let reversed = is_descending(&latitudes);
        if reversed {
            let name = file_name_of(Path::new(new_name))?;
            let output = self.run_dir().join(&name);
            info!("Reversing latitudes of {}, please wait...", input.display());
            dataset.write_reversed(&input, &output, &self.params.file_latitude)?;
            self.params.file_filename = name;
        } else {
            info!(
                "Latitudes of {} already ascend; not reversing them",
                self.params.file_filename
            );
        }

        self.rerender()?;
        Ok(reversed)
    }
}

impl Ww3Program for PrncProgram {
    type Params = PrncParams;

    const KIND: ProgramKind = ProgramKind::Prnc;

    fn params(&self) -> &PrncParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut PrncParams {
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
