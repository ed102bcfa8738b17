//! `ww3_grid`: grid preprocessing.

use super::{NamelistDocument, Ww3Program};
use crate::domain::{ProgramKind, Ww3Result};
use crate::namelist::format::{format_real, fortran_flag};
use crate::namelist::{TemplateValues, render_template};
use crate::validation::{ensure_run_dir, link_into_run_dir};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = include_str!("../../../templates/ww3_grid.nml.tpl");

namelist_choice! {
    GridType, "GRID%TYPE" {
        Rect => "RECT",
        Curv => "CURV",
        Unst => "UNST",
    }
}

namelist_choice! {
    CoordinateSystem, "GRID%COORD" {
        Sphe => "SPHE",
        Cart => "CART",
    }
}

namelist_choice! {
    GridClosure, "GRID%CLOS" {
        None => "NONE",
        Smpl => "SMPL",
        Trpl => "TRPL",
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpectrumBlock {
    pub xfr: f64,
    pub freq1: f64,
    pub nk: u32,
    pub nth: u32,
    pub thoff: f64,
}

impl Default for SpectrumBlock {
    fn default() -> Self {
        Self {
            xfr: 1.1,
            freq1: 0.04118,
            nk: 32,
            nth: 24,
            thoff: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunBlock {
    pub fldry: bool,
    pub flcx: bool,
    pub flcy: bool,
    pub flcth: bool,
    pub flck: bool,
    pub flsou: bool,
}

impl Default for RunBlock {
    fn default() -> Self {
        Self {
            fldry: false,
            flcx: true,
            flcy: true,
            flcth: true,
            flck: true,
            flsou: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimestepsBlock {
    pub dtmax: f64,
    pub dtxy: f64,
    pub dtkth: f64,
    pub dtmin: f64,
}

impl Default for TimestepsBlock {
    fn default() -> Self {
        Self {
            dtmax: 480.0,
            dtxy: 160.0,
            dtkth: 240.0,
            dtmin: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RectBlock {
    pub nx: u32,
    pub ny: u32,
    pub sx: f64,
    pub sy: f64,
    pub sf: f64,
    pub x0: f64,
    pub y0: f64,
    pub sf0: f64,
}

impl Default for RectBlock {
    fn default() -> Self {
        Self {
            nx: 0,
            ny: 0,
            sx: 0.0,
            sy: 0.0,
            sf: 1.0,
            x0: 0.0,
            y0: 0.0,
            sf0: 1.0,
        }
    }
}

/// Curvilinear grid; coordinate files are written unquoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurvBlock {
    pub nx: u32,
    pub ny: u32,
    pub xcoord_sf: f64,
    pub xcoord_off: f64,
    pub xcoord_filename: String,
    pub xcoord_idf: i32,
    pub xcoord_idla: i32,
    pub xcoord_idfm: i32,
    pub xcoord_format: String,
    pub ycoord_sf: f64,
    pub ycoord_off: f64,
    pub ycoord_filename: String,
    pub ycoord_idf: i32,
    pub ycoord_idla: i32,
    pub ycoord_idfm: i32,
    pub ycoord_format: String,
}

impl Default for CurvBlock {
    fn default() -> Self {
        Self {
            nx: 0,
            ny: 0,
            xcoord_sf: 1.0,
            xcoord_off: 0.0,
            xcoord_filename: String::new(),
            xcoord_idf: 21,
            xcoord_idla: 1,
            xcoord_idfm: 1,
            xcoord_format: "(....)".to_string(),
            ycoord_sf: 1.0,
            ycoord_off: 0.0,
            ycoord_filename: String::new(),
            ycoord_idf: 22,
            ycoord_idla: 1,
            ycoord_idfm: 1,
            ycoord_format: "(....)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnstBlock {
    pub sf: f64,
    pub filename: String,
    pub idla: i32,
    pub idfm: i32,
    pub format: String,
    /// Open boundary file, written verbatim and unquoted.
    pub ugobcfile: String,
}

impl Default for UnstBlock {
    fn default() -> Self {
        Self {
            sf: 1.0,
            filename: String::new(),
            idla: 20,
            idfm: 1,
            format: "(20f10.2)".to_string(),
            ugobcfile: String::new(),
        }
    }
}

/// Declares one DEPTH/OBST/SLOPE style input file block. The blocks share a
/// layout and differ only in their default Fortran unit number.
macro_rules! input_file_block {
    ($name:ident, $unit:literal) => {
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub sf: f64,
            pub filename: String,
            pub idf: i32,
            pub idla: i32,
            pub idfm: i32,
            pub format: String,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    sf: 1.0,
                    filename: String::new(),
                    idf: $unit,
                    idla: 1,
                    idfm: 1,
                    format: "(....)".to_string(),
                }
            }
        }

        impl $name {
            fn set_values(&self, values: &mut TemplateValues, keys: InputKeys) {
                values
                    .set(keys.sf, format_real(self.sf))
                    .set(keys.filename, self.filename.as_str())
                    .set(keys.idf, self.idf.to_string())
                    .set(keys.idla, self.idla.to_string())
                    .set(keys.idfm, self.idfm.to_string())
                    .set(keys.format, self.format.as_str());
            }
        }
    };
}

input_file_block!(DepthBlock, 50);
input_file_block!(ObstBlock, 70);
input_file_block!(SlopeBlock, 80);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MaskBlock {
    pub filename: String,
    pub idf: i32,
    pub idla: i32,
    pub idfm: i32,
    pub format: String,
}

impl Default for MaskBlock {
    fn default() -> Self {
        Self {
            filename: String::new(),
            idf: 60,
            idla: 1,
            idfm: 1,
            format: "(....)".to_string(),
        }
    }
}

/// The SED block carries `SED%IDFM` twice; `leading_idfm` fills the first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SedBlock {
    pub sf: f64,
    pub filename: String,
    pub leading_idfm: i32,
    pub idla: i32,
    pub idfm: i32,
    pub format: String,
}

impl Default for SedBlock {
    fn default() -> Self {
        Self {
            sf: 1.0,
            filename: String::new(),
            leading_idfm: 1,
            idla: 1,
            idfm: 1,
            format: "(....)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridParams {
    pub name: String,
    /// Namelist file with the grid's extra parameters.
    pub nml: String,
    pub grid_type: GridType,
    pub coord: CoordinateSystem,
    pub clos: GridClosure,
    #[serde(default)]
    pub zlim: f64,
    #[serde(default)]
    pub dmin: f64,
    #[serde(default)]
    pub spectrum: SpectrumBlock,
    #[serde(default)]
    pub run: RunBlock,
    #[serde(default)]
    pub timesteps: TimestepsBlock,
    #[serde(default)]
    pub rect: RectBlock,
    #[serde(default)]
    pub curv: CurvBlock,
    #[serde(default)]
    pub unst: UnstBlock,
    #[serde(default)]
    pub depth: DepthBlock,
    #[serde(default)]
    pub mask: MaskBlock,
    #[serde(default)]
    pub obst: ObstBlock,
    #[serde(default)]
    pub slope: SlopeBlock,
    #[serde(default)]
    pub sed: SedBlock,
}

impl GridParams {
    pub fn new(
        name: impl Into<String>,
        nml: impl Into<String>,
        grid_type: GridType,
        coord: CoordinateSystem,
        clos: GridClosure,
    ) -> Self {
        Self {
            name: name.into(),
            nml: nml.into(),
            grid_type,
            coord,
            clos,
            zlim: 0.0,
            dmin: 0.0,
            spectrum: SpectrumBlock::default(),
            run: RunBlock::default(),
            timesteps: TimestepsBlock::default(),
            rect: RectBlock::default(),
            curv: CurvBlock::default(),
            unst: UnstBlock::default(),
            depth: DepthBlock::default(),
            mask: MaskBlock::default(),
            obst: ObstBlock::default(),
            slope: SlopeBlock::default(),
            sed: SedBlock::default(),
        }
    }

    fn input_files_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.depth.filename,
            &mut self.mask.filename,
            &mut self.obst.filename,
            &mut self.slope.filename,
            &mut self.sed.filename,
            &mut self.unst.filename,
            &mut self.curv.xcoord_filename,
            &mut self.curv.ycoord_filename,
        ]
    }

    fn template_values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        values
            .set("spectrum_xfr", format_real(self.spectrum.xfr))
            .set("spectrum_freq1", format_real(self.spectrum.freq1))
            .set("spectrum_nk", self.spectrum.nk.to_string())
            .set("spectrum_nth", self.spectrum.nth.to_string())
            .set("spectrum_thoff", format_real(self.spectrum.thoff))
            .set("run_fldry", fortran_flag(self.run.fldry))
            .set("run_flcx", fortran_flag(self.run.flcx))
            .set("run_flcy", fortran_flag(self.run.flcy))
            .set("run_flcth", fortran_flag(self.run.flcth))
            .set("run_flck", fortran_flag(self.run.flck))
            .set("run_flsou", fortran_flag(self.run.flsou))
            .set("timesteps_dtmax", format_real(self.timesteps.dtmax))
            .set("timesteps_dtxy", format_real(self.timesteps.dtxy))
            .set("timesteps_dtkth", format_real(self.timesteps.dtkth))
            .set("timesteps_dtmin", format_real(self.timesteps.dtmin))
            .set("grid_name", self.name.as_str())
            .set("grid_nml", self.nml.as_str())
            .set("grid_type", self.grid_type.as_str())
            .set("grid_coord", self.coord.as_str())
            .set("grid_clos", self.clos.as_str())
            .set("grid_zlim", format_real(self.zlim))
            .set("grid_dmin", format_real(self.dmin))
            .set("rect_nx", self.rect.nx.to_string())
            .set("rect_ny", self.rect.ny.to_string())
            .set("rect_sx", format_real(self.rect.sx))
            .set("rect_sy", format_real(self.rect.sy))
            .set("rect_sf", format_real(self.rect.sf))
            .set("rect_x0", format_real(self.rect.x0))
            .set("rect_y0", format_real(self.rect.y0))
            .set("rect_sf0", format_real(self.rect.sf0));

        let curv = &self.curv;
        values
            .set("curv_nx", curv.nx.to_string())
            .set("curv_ny", curv.ny.to_string())
            .set("curv_xcoord_sf", format_real(curv.xcoord_sf))
            .set("curv_xcoord_off", format_real(curv.xcoord_off))
            .set("curv_xcoord_filename", curv.xcoord_filename.as_str())
            .set("curv_xcoord_idf", curv.xcoord_idf.to_string())
            .set("curv_xcoord_idla", curv.xcoord_idla.to_string())
            .set("curv_xcoord_idfm", curv.xcoord_idfm.to_string())
            .set("curv_xcoord_format", curv.xcoord_format.as_str())
            .set("curv_ycoord_sf", format_real(curv.ycoord_sf))
            .set("curv_ycoord_off", format_real(curv.ycoord_off))
            .set("curv_ycoord_filename", curv.ycoord_filename.as_str())
            .set("curv_ycoord_idf", curv.ycoord_idf.to_string())
            .set("curv_ycoord_idla", curv.ycoord_idla.to_string())
            .set("curv_ycoord_idfm", curv.ycoord_idfm.to_string())
            .set("curv_ycoord_format", curv.ycoord_format.as_str())
            .set("unst_sf", format_real(self.unst.sf))
            .set("unst_filename", self.unst.filename.as_str())
            .set("unst_idla", self.unst.idla.to_string())
            .set("unst_idfm", self.unst.idfm.to_string())
            .set("unst_format", self.unst.format.as_str())
            .set("unst_ugobcfile", self.unst.ugobcfile.as_str());

        self.depth.set_values(&mut values, InputKeys::DEPTH);
        self.obst.set_values(&mut values, InputKeys::OBST);
        self.slope.set_values(&mut values, InputKeys::SLOPE);

        values
            .set("mask_filename", self.mask.filename.as_str())
            .set("mask_idf", self.mask.idf.to_string())
            .set("mask_idla", self.mask.idla.to_string())
            .set("mask_idfm", self.mask.idfm.to_string())
            .set("mask_format", self.mask.format.as_str())
            .set("sed_sf", format_real(self.sed.sf))
            .set("sed_filename", self.sed.filename.as_str())
            .set("sed_leading_idfm", self.sed.leading_idfm.to_string())
            .set("sed_idla", self.sed.idla.to_string())
            .set("sed_idfm", self.sed.idfm.to_string())
            .set("sed_format", self.sed.format.as_str());
        values
    }
}

struct InputKeys {
    sf: &'static str,
    filename: &'static str,
    idf: &'static str,
    idla: &'static str,
    idfm: &'static str,
    format: &'static str,
}

impl InputKeys {
    const DEPTH: Self = Self {
        sf: "depth_sf",
        filename: "depth_filename",
        idf: "depth_idf",
        idla: "depth_idla",
        idfm: "depth_idfm",
        format: "depth_format",
    };
    const OBST: Self = Self {
        sf: "obst_sf",
        filename: "obst_filename",
        idf: "obst_idf",
        idla: "obst_idla",
        idfm: "obst_idfm",
        format: "obst_format",
    };
    const SLOPE: Self = Self {
        sf: "slope_sf",
        filename: "slope_filename",
        idf: "slope_idf",
        idla: "slope_idla",
        idfm: "slope_idfm",
        format: "slope_format",
    };
}

#[derive(Debug, Clone)]
pub struct GridProgram {
    params: GridParams,
    document: NamelistDocument,
}

impl GridProgram {
    pub fn new(run_dir: impl Into<PathBuf>, mut params: GridParams) -> Ww3Result<Self> {
        let run_dir = run_dir.into();
        ensure_run_dir(&run_dir)?;

        params.nml = link_into_run_dir(Path::new(&params.nml), &run_dir)?;
        for filename in params.input_files_mut() {
            if !filename.is_empty() {
                *filename = link_into_run_dir(Path::new(filename.as_str()), &run_dir)?;
            }
        }

        let text = render_template(TEMPLATE, &params.template_values())?;
        Ok(Self {
            params,
            document: NamelistDocument::new(run_dir, text),
        })
    }
}

impl Ww3Program for GridProgram {
    type Params = GridParams;

    const KIND: ProgramKind = ProgramKind::Grid;

    fn params(&self) -> &GridParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GridParams {
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
