//! Read-only view of the scientific datasets a forcing namelist points at.

#[cfg(feature = "netcdf")]
pub mod netcdf;

use crate::domain::{Ww3Error, Ww3Result};
use crate::validation::quoted_set;
use std::path::Path;
use tracing::warn;

#[cfg(feature = "netcdf")]
pub use self::netcdf::NetcdfDataset;

/// Prefixes tried, case-insensitively, when a declared longitude is absent.
pub const LONGITUDE_PREFIXES: [&str; 2] = ["lo", "x"];
/// Prefixes tried, case-insensitively, when a declared latitude is absent.
pub const LATITUDE_PREFIXES: [&str; 2] = ["la", "y"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSchema {
    /// Coordinate variables, in file order.
    pub coordinates: Vec<String>,
    /// Data (non-coordinate) variables, in file order.
    pub variables: Vec<String>,
}

impl DatasetSchema {
    pub fn has_coordinate(&self, name: &str) -> bool {
        self.coordinates.iter().any(|coordinate| coordinate == name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|variable| variable == name)
    }
}

pub trait DatasetOracle {
    fn schema(&self, path: &Path) -> Ww3Result<DatasetSchema>;

    fn coordinate_values(&self, path: &Path, name: &str) -> Ww3Result<Vec<f64>>;

    /// Writes `destination` as a copy of `source` with `coordinate` and every
    /// variable laid out along it reversed.
    fn write_reversed(&self, source: &Path, destination: &Path, coordinate: &str)
    -> Ww3Result<()>;
}

/// Resolves `declared` against the dataset, falling back to the first
/// coordinate whose name starts with one of `prefixes`.
pub fn infer_coordinate(
    schema: &DatasetSchema,
    field: &str,
    declared: &str,
    prefixes: &[&str],
) -> Ww3Result<String> {
    if schema.has_coordinate(declared) {
        return Ok(declared.to_string());
    }

    warn!(
        "Could not find coordinate '{}' in the input data. Options are {}",
        declared,
        quoted_set(&schema.coordinates)
    );
    let inferred = schema.coordinates.iter().find(|coordinate| {
        let lowered = coordinate.to_ascii_lowercase();
        prefixes.iter().any(|prefix| lowered.starts_with(prefix))
    });

    match inferred {
        Some(name) => {
            warn!(
                "Setting {} to '{}'. If this is wrong, set the correct name explicitly",
                field, name
            );
            Ok(name.clone())
        }
        None => Err(Ww3Error::invalid_value(
            "VALUE.COORDINATE",
            format!(
                "could not set {} automatically: '{}' is not a coordinate and none of {} start with {}",
                field,
                declared,
                quoted_set(&schema.coordinates),
                quoted_set(prefixes)
            ),
        )),
    }
}

/// Blank names are unused variable slots and are skipped.
pub fn check_variables<S: AsRef<str>>(schema: &DatasetSchema, names: &[S]) -> Ww3Result<()> {
    for name in names.iter().map(AsRef::as_ref) {
        if name.trim().is_empty() || schema.has_variable(name) {
            continue;
        }
        return Err(Ww3Error::invalid_value(
            "VALUE.VARIABLE",
            format!(
                "variable '{}' is not in the dataset. Options are {}",
                name,
                quoted_set(&schema.variables)
            ),
        ));
    }
    Ok(())
}

/// True when a coordinate runs from high to low.
pub fn is_descending(values: &[f64]) -> bool {
    matches!(values, [first, second, ..] if second - first < 0.0)
}

/// Reverses a row-major array of `shape` along `axis`.
pub fn reverse_axis<T: Copy>(values: &[T], shape: &[usize], axis: usize) -> Vec<T> {
    let Some(&length) = shape.get(axis) else {
        return values.to_vec();
    };
    let inner = shape[axis + 1..].iter().product::<usize>();
    let stride = length * inner;
    if stride == 0 {
        return values.to_vec();
    }

    let mut reversed = Vec::with_capacity(values.len());
    for block in values.chunks(stride) {
        for row in block.chunks(inner).rev() {
            reversed.extend_from_slice(row);
        }
    }
    reversed
}
