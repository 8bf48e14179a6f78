//! NetCDF variables as column arrays
//!
//! Regression and plotting code wants each variable as an `n x 1` column with
//! missing values already replaced.

use crate::errors::{EhcError, Result};
use ndarray::Array2;
use netcdf::File;

/// Replaces NaN with `fill`, leaving every other value untouched.
pub fn nan_to_num(values: &mut [f64], fill: f64) {
    for value in values.iter_mut().filter(|v| v.is_nan()) {
        *value = fill;
    }
}

/// Reads each variable of `file` as an `n x 1` column array.
///
/// `fill_nan_values[i]` replaces NaN in `variables[i]`. Variables of any
/// rank are flattened in storage order.
///
/// # Errors
///
/// Fails if the two slices differ in length, a variable is missing, or it
/// can't be read as `f64`.
pub fn create_array_from_dataset<S: AsRef<str>>(
    file: &File,
    variables: &[S],
    fill_nan_values: &[f64],
) -> Result<Vec<Array2<f64>>> {
    if variables.len() != fill_nan_values.len() {
        return Err(EhcError::Generic(format!(
            "{} variables but {} fill values",
            variables.len(),
            fill_nan_values.len()
        )));
    }

    variables
        .iter()
        .zip(fill_nan_values)
        .map(|(name, &fill)| {
            let name = name.as_ref();
            let var = file
                .variable(name)
                .ok_or_else(|| EhcError::VariableNotFound {
                    var: name.to_string(),
                })?;

            let mut values: Vec<f64> = var.get_values::<f64, _>(..)?;
            nan_to_num(&mut values, fill);

            let rows = values.len();
            Ok(Array2::from_shape_vec((rows, 1), values)?)
        })
        .collect()
}
