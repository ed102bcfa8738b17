use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use ww3_core::dataset::{DatasetOracle, DatasetSchema};
use ww3_core::domain::{Ww3ErrorCategory, Ww3Result};
use ww3_core::programs::{
    BoundaryInput, BouncParams, BouncProgram, CoordinateSystem, ForcingField, GridClosure,
    GridParams, GridProgram, GridType, OunfParams, OunfProgram, PrncParams, PrncProgram,
    ShelParams, ShelProgram, Ww3Program,
};
use ww3_core::runner::{Launcher, run_program};

fn touch(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture parent should be created");
    }
    fs::write(path, b"fixture").expect("fixture file should be written");
    path.to_path_buf()
}

struct FixedSchema(DatasetSchema);

impl FixedSchema {
    fn new(coordinates: &[&str], variables: &[&str]) -> Self {
        Self(DatasetSchema {
            coordinates: coordinates.iter().map(ToString::to_string).collect(),
            variables: variables.iter().map(ToString::to_string).collect(),
        })
    }
}

impl DatasetOracle for FixedSchema {
    fn schema(&self, _path: &Path) -> Ww3Result<DatasetSchema> {
        Ok(self.0.clone())
    }

    fn coordinate_values(&self, _path: &Path, _name: &str) -> Ww3Result<Vec<f64>> {
        Ok(vec![-10.0, 0.0, 10.0])
    }

    fn write_reversed(&self, _source: &Path, _destination: &Path, _coordinate: &str)
    -> Ww3Result<()> {
        panic!("ascending latitudes must not be rewritten");
    }
}

fn winds_params(forcing: &Path, longitude: &str, latitude: &str) -> PrncParams {
    let mut params = PrncParams::new(
        ForcingField::Winds,
        true,
        forcing.to_string_lossy(),
        longitude,
        latitude,
        "u10",
    );
    params.file_var_2 = "v10".to_string();
    params
}

fn forcing_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| line.trim_start().starts_with("FORCING%FIELD%"))
        .collect()
}

#[test]
fn grid_namelist_is_written_into_a_fresh_run_dir() {
    let temp = TempDir::new().expect("tempdir should be created");
    let nml = touch(&temp.path().join("inputs/namelists_Atlantic.nml"));
    let depth = touch(&temp.path().join("inputs/atlantic.depth"));
    let mut params = GridParams::new(
        "Atlantic",
        nml.to_string_lossy(),
        GridType::Rect,
        CoordinateSystem::Sphe,
        GridClosure::Smpl,
    );
    params.depth.filename = depth.to_string_lossy().into_owned();

    let run_dir = temp.path().join("runs/atlantic");
    let grid = GridProgram::new(&run_dir, params).expect("grid should build");
    let written = grid.write_namelist().expect("namelist should be written");

    assert_eq!(written, run_dir.join("ww3_grid.nml"));
    assert!(run_dir.join("namelists_Atlantic.nml").exists());
    assert!(run_dir.join("atlantic.depth").exists());
    let on_disk = fs::read_to_string(&written).expect("namelist should be readable");
    assert_eq!(on_disk, grid.text());
    assert!(on_disk.contains("  GRID%NML = 'namelists_Atlantic.nml'\n"));
    assert!(on_disk.contains("  DEPTH%FILENAME = 'atlantic.depth'\n"));
}

#[test]
fn programs_needing_a_grid_definition_refuse_to_start_without_one() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("mod_def.ww3");

    let error = ShelProgram::new(temp.path().join("run"), &missing, ShelParams::default())
        .expect_err("shel needs mod_def");
    assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);

    let error = OunfProgram::new(temp.path().join("run"), &missing, OunfParams::default())
        .expect_err("ounf needs mod_def");
    assert_eq!(error.category(), Ww3ErrorCategory::MissingInput);
}

#[test]
fn renamed_grid_definition_is_copied_under_its_canonical_name() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mod_def = touch(&temp.path().join("grids/mod_def.atlantic"));
    let run_dir = temp.path().join("run");

    ShelProgram::new(&run_dir, &mod_def, ShelParams::default()).expect("shel should build");

    let copied = fs::read(run_dir.join("mod_def.ww3")).expect("mod_def should be copied");
    assert_eq!(copied, b"fixture");
}

#[test]
fn boundary_directory_becomes_a_naturally_ordered_manifest() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mod_def = touch(&temp.path().join("mod_def.ww3"));
    let spectra = temp.path().join("subdir");
    for name in ["c.nc", "a.nc", "b.nc"] {
        touch(&spectra.join(name));
    }

    let run_dir = temp.path().join("run");
    let bounc = BouncProgram::new(
        &run_dir,
        &mod_def,
        &BoundaryInput::from_path(&spectra),
        BouncParams::default(),
    )
    .expect("bounc should build");

    let manifest = fs::read_to_string(run_dir.join("spec.list")).expect("manifest written");
    assert_eq!(manifest, "subdir/a.nc\nsubdir/b.nc\nsubdir/c.nc\n");
    assert!(run_dir.join("subdir/b.nc").exists());
    assert!(bounc.text().contains("BOUND%FILE                 = 'spec.list'"));
}

#[test]
fn prnc_keeps_declared_coordinates_that_exist() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mod_def = touch(&temp.path().join("mod_def.ww3"));
    let forcing = touch(&temp.path().join("winds.nc"));
    let dataset = FixedSchema::new(&["longitude", "latitude", "time"], &["u10", "v10"]);

    let prnc = PrncProgram::new(
        temp.path().join("run"),
        &mod_def,
        winds_params(&forcing, "longitude", "latitude"),
        &dataset,
    )
    .expect("prnc should build");

    assert_eq!(forcing_lines(prnc.text()), vec!["  FORCING%FIELD%WINDS = t"]);
    assert!(prnc.text().contains("  FILE%LONGITUDE = 'longitude'\n"));
    assert!(prnc.text().contains("  FILE%LATITUDE = 'latitude'\n"));
}

#[test]
fn prnc_infers_coordinates_from_their_prefixes() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mod_def = touch(&temp.path().join("mod_def.ww3"));
    let forcing = touch(&temp.path().join("winds.nc"));
    let dataset = FixedSchema::new(&["time", "lon", "lat"], &["u10", "v10"]);

    let mut prnc = PrncProgram::new(
        temp.path().join("run"),
        &mod_def,
        winds_params(&forcing, "longitude", "latitude"),
        &dataset,
    )
    .expect("prnc should build");

    assert_eq!(prnc.params().file_longitude, "lon");
    assert_eq!(prnc.params().file_latitude, "lat");
    assert!(prnc.text().contains("  FILE%LONGITUDE = 'lon'\n"));

    let reversed = prnc
        .reverse_latitudes("winds_reversed.nc", &dataset)
        .expect("ascending latitudes need no rewrite");
    assert!(!reversed);
    assert!(prnc.text().contains("  FILE%FILENAME = 'winds.nc'\n"));
}

#[test]
fn prnc_without_any_latitude_like_coordinate_fails() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mod_def = touch(&temp.path().join("mod_def.ww3"));
    let forcing = touch(&temp.path().join("winds.nc"));
    let dataset = FixedSchema::new(&["lon", "time"], &["u10", "v10"]);

    let error = PrncProgram::new(
        temp.path().join("run"),
        &mod_def,
        winds_params(&forcing, "longitude", "latitude"),
        &dataset,
    )
    .expect_err("no latitude coordinate");
    assert_eq!(error.placeholder(), "VALUE.COORDINATE");
}

#[test]
fn absent_executable_is_reported_without_touching_the_working_directory() {
    let temp = TempDir::new().expect("tempdir should be created");
    let before = std::env::current_dir().expect("cwd should be readable");

    let error = run_program("ww3_not_a_real_tool_for_tests", temp.path(), Launcher::Direct)
        .expect_err("tool should be missing");

    assert_eq!(error.category(), Ww3ErrorCategory::ToolNotFound);
    assert!(error.message().contains("$PATH"));
    assert_eq!(std::env::current_dir().expect("cwd should be readable"), before);
}
