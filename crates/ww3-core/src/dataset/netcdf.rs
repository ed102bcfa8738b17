use super::{DatasetOracle, DatasetSchema, reverse_axis};
use crate::domain::{Ww3Error, Ww3Result};
use netcdf::AttributeValue;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// NetCDF files read through the system netCDF library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfDataset;

macro_rules! nc_result {
    ($placeholder:expr, $path:expr, $result:expr) => {
        $result.map_err(|error| {
            Ww3Error::io_system(
                $placeholder,
                format!("netCDF error on '{}': {}", $path.display(), error),
            )
        })
    };
}

impl DatasetOracle for NetcdfDataset {
    fn schema(&self, path: &Path) -> Ww3Result<DatasetSchema> {
        let file = open_dataset(path)?;
        let dimension_names = file
            .dimensions()
            .map(|dimension| dimension.name().to_string())
            .collect::<HashSet<_>>();

        let mut schema = DatasetSchema::default();
        for variable in file.variables() {
            let name = variable.name().to_string();
            if dimension_names.contains(&name) {
                schema.coordinates.push(name);
            } else {
                schema.variables.push(name);
            }
        }
        Ok(schema)
    }

    fn coordinate_values(&self, path: &Path, name: &str) -> Ww3Result<Vec<f64>> {
        let file = open_dataset(path)?;
        let variable = file.variable(name).ok_or_else(|| {
            Ww3Error::invalid_value(
                "VALUE.COORDINATE",
                format!("coordinate '{}' not found in '{}'", name, path.display()),
            )
        })?;
        let mut values = vec![0.0_f64; variable.len()];
        nc_result!(
            "IO.DATASET_READ",
            path,
            variable.values_to(&mut values, None, None)
        )?;
        Ok(values)
    }

    fn write_reversed(
        &self,
        source: &Path,
        destination: &Path,
        coordinate: &str,
    ) -> Ww3Result<()> {
        let input = open_dataset(source)?;
        if input.variable(coordinate).is_none() {
            return Err(Ww3Error::invalid_value(
                "VALUE.COORDINATE",
                format!(
                    "coordinate '{}' not found in '{}'",
                    coordinate,
                    source.display()
                ),
            ));
        }

        info!("Reversing {} into {}", coordinate, destination.display());
        let mut output = nc_result!("IO.DATASET_CREATE", destination, netcdf::create(destination))?;

        for dimension in input.dimensions() {
            let name = dimension.name().to_string();
            if dimension.is_unlimited() {
                nc_result!(
                    "IO.DATASET_WRITE",
                    destination,
                    output.add_unlimited_dimension(&name)
                )?;
            } else {
                nc_result!(
                    "IO.DATASET_WRITE",
                    destination,
                    output.add_dimension(&name, dimension.len())
                )?;
            }
        }

        for attribute in input.attributes() {
            let value = nc_result!("IO.DATASET_READ", source, attribute.value())?;
            nc_result!(
                "IO.DATASET_WRITE",
                destination,
                output.add_attribute(&attribute.name().to_string(), value)
            )?;
        }

        for variable in input.variables() {
            let name = variable.name().to_string();
            let dimension_names = variable
                .dimensions()
                .iter()
                .map(|dimension| dimension.name().to_string())
                .collect::<Vec<_>>();
            let shape = variable
                .dimensions()
                .iter()
                .map(|dimension| dimension.len())
                .collect::<Vec<_>>();

            let mut values = vec![0.0_f64; variable.len()];
            nc_result!(
                "IO.DATASET_READ",
                source,
                variable.values_to(&mut values, None, None)
            )?;
            if let Some(axis) = dimension_names.iter().position(|dim| dim == coordinate) {
                values = reverse_axis(&values, &shape, axis);
            }

            let dimension_refs = dimension_names.iter().map(String::as_str).collect::<Vec<_>>();
            let mut copy = nc_result!(
                "IO.DATASET_WRITE",
                destination,
                output.add_variable::<f64>(&name, &dimension_refs)
            )?;
            for attribute in variable.attributes() {
                let attribute_name = attribute.name().to_string();
                let value = nc_result!("IO.DATASET_READ", source, attribute.value())?;
                let value = if attribute_name == "_FillValue" {
                    AttributeValue::Double(attribute_as_f64(&value).unwrap_or(f64::NAN))
                } else {
                    value
                };
                nc_result!(
                    "IO.DATASET_WRITE",
                    destination,
                    copy.add_attribute(&attribute_name, value)
                )?;
            }

            if shape.is_empty() {
                let scalar = values.first().copied().unwrap_or_default();
                nc_result!("IO.DATASET_WRITE", destination, copy.put_value(scalar, None))?;
            } else {
                let origin = vec![0_usize; shape.len()];
                nc_result!(
                    "IO.DATASET_WRITE",
                    destination,
                    copy.put_values(&values, Some(&origin), Some(&shape))
                )?;
            }
        }
        Ok(())
    }
}

fn open_dataset(path: &Path) -> Ww3Result<netcdf::File> {
    netcdf::open(path).map_err(|error| {
        Ww3Error::invalid_value(
            "VALUE.DATASET",
            format!(
                "problem with input netCDF '{}': {}. Please use a valid file",
                path.display(),
                error
            ),
        )
    })
}

/// Variables are copied as doubles, so their fill value must be one too.
fn attribute_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(value) => Some(*value),
        AttributeValue::Float(value) => Some(f64::from(*value)),
        AttributeValue::Int(value) => Some(f64::from(*value)),
        AttributeValue::Short(value) => Some(f64::from(*value)),
        AttributeValue::Schar(value) => Some(f64::from(*value)),
        AttributeValue::Uchar(value) => Some(f64::from(*value)),
        AttributeValue::Ushort(value) => Some(f64::from(*value)),
        AttributeValue::Uint(value) => Some(f64::from(*value)),
        _ => None,
    }
}
