//! Scenario-matrix orientation detection
//!
//! Plotting code expects scenarios organized by ensemble member, with one row
//! per member and one column per scenario set:
//!
//! ```text
//! [["Control",   "Full feedback"],     // member 1
//!  ["Control_2", "Full feedback_2"],   // member 2
//!  ["Control_3", "Full feedback_3"]]   // member 3
//! ```
//!
//! Users often write the transposed form instead, one row per scenario set:
//!
//! ```text
//! [["Control", "Control_2", "Control_3"],
//!  ["Full feedback", "Full feedback_2", "Full feedback_3"]]
//! ```
//!
//! [`transpose_scenarios_if_needed`] detects which form it was given and
//! returns the member-major form. Scenario names are never inspected, only
//! the matrix shape and the number of scenario-set labels.

use serde_json::Value;

/// Transposes a rectangular matrix. Rows must all have the same length.
pub fn transpose<T: Clone>(matrix: &[Vec<T>]) -> Vec<Vec<T>> {
    let num_cols = matrix.first().map_or(0, Vec::len);
    (0..num_cols)
        .map(|col| matrix.iter().map(|row| row[col].clone()).collect())
        .collect()
}

/// Returns `(rows, cols)` for a non-empty rectangular matrix.
fn rectangular_shape<T>(matrix: &[Vec<T>]) -> Option<(usize, usize)> {
    let num_cols = matrix.first()?.len();
    if matrix.iter().all(|row| row.len() == num_cols) {
        Some((matrix.len(), num_cols))
    } else {
        None
    }
}

/// Decides whether a `num_rows x num_cols` matrix is in scenario-set-major form.
fn needs_transpose(num_rows: usize, num_cols: usize, num_sets: Option<usize>) -> bool {
    if let Some(num_sets) = num_sets {
        match (num_sets == num_rows, num_sets == num_cols) {
            // One label per row: scenario-set-major.
            (true, false) => return true,
            (false, true) => return false,
            // Square and ambiguous: assume one label per row.
            (true, true) => return true,
            (false, false) => {}
        }
    }

    // Fewer scenario sets than members is the usual case.
    num_cols > num_rows
}

/// Re-orients `scenarios` so rows are ensemble members, columns scenario sets.
///
/// Returns the (possibly transposed) matrix and whether a transpose happened.
/// Empty or ragged input is returned unchanged.
///
/// # Examples
///
/// ```
/// use ehc_tools::scenarios::transpose_scenarios_if_needed;
///
/// let scenarios = vec![
///     vec!["run_A", "run_B", "run_C"],
///     vec!["exp_X", "exp_Y", "exp_Z"],
/// ];
/// let (oriented, transposed) =
///     transpose_scenarios_if_needed(&scenarios, Some(&["Control", "Treatment"][..]));
///
/// assert!(transposed);
/// assert_eq!(oriented[0], vec!["run_A", "exp_X"]);
/// assert_eq!(oriented.len(), 3);
/// ```
pub fn transpose_scenarios_if_needed<T: Clone, S>(
    scenarios: &[Vec<T>],
    scenario_sets: Option<&[S]>,
) -> (Vec<Vec<T>>, bool) {
    let Some((num_rows, num_cols)) = rectangular_shape(scenarios) else {
        return (scenarios.to_vec(), false);
    };

    if needs_transpose(num_rows, num_cols, scenario_sets.map(<[S]>::len)) {
        (transpose(scenarios), true)
    } else {
        (scenarios.to_vec(), false)
    }
}

/// Same as [`transpose_scenarios_if_needed`] for scenarios read from JSON.
///
/// A value that is not an array of arrays is returned unchanged.
pub fn transpose_scenarios_json(
    scenarios: &Value,
    scenario_sets: Option<&[String]>,
) -> (Value, bool) {
    let Some(rows) = scenarios.as_array() else {
        return (scenarios.clone(), false);
    };

    let matrix: Option<Vec<Vec<Value>>> = rows.iter().map(|row| row.as_array().cloned()).collect();
    let Some(matrix) = matrix else {
        return (scenarios.clone(), false);
    };

    let (oriented, transposed) = transpose_scenarios_if_needed(&matrix, scenario_sets);
    if !transposed {
        return (scenarios.clone(), false);
    }

    let value = Value::Array(oriented.into_iter().map(Value::Array).collect());
    (value, true)
}
