//! JSON job configuration files
//!
//! A configuration file holds a JSON array with one object per job. The
//! validators work on the raw [`Value`] entries so that they can report
//! missing or mistyped fields; the compile pipeline deserializes entries into
//! [`CompileJob`].

use crate::errors::{EhcError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fields every extraction entry must define.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "variables",
    "netcdf_substrings",
    "simulation_path",
    "output_file",
];

/// Aggregation applied to variable groups without an explicit type.
pub const DEFAULT_AGGREGATION_TYPE: &str = "area_weighted_mean_or_sum";

/// One EHC scalar compilation job
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompileJob {
    /// One directory of scalar files per scenario
    pub input_directories: Vec<PathBuf>,
    /// Destination `.csv` or `.dat` file
    pub output_file: PathBuf,
    /// Scenario labels, parallel to `input_directories`
    pub scenarios: Vec<String>,
    /// Standardize GCAM crop names before writing
    #[serde(default)]
    pub call_modify_crop_names: bool,
}

/// Reads a configuration file and returns its entries.
///
/// # Errors
///
/// Fails if the file can't be read, isn't valid JSON, or its top level
/// isn't an array.
pub fn load_config_entries(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(entries) => {
            debug!(file = %path.display(), entries = entries.len(), "loaded configuration");
            Ok(entries)
        }
        other => Err(EhcError::InvalidConfig {
            message: format!(
                "expected a list of configuration entries in {}, found {}",
                path.display(),
                json_type_name(&other)
            ),
        }),
    }
}

/// Loads and concatenates the compile jobs of every file, in argument order.
pub fn load_compile_jobs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<CompileJob>> {
    let mut jobs = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path.as_ref())?;
        let file_jobs: Vec<CompileJob> = serde_json::from_str(&text)?;
        jobs.extend(file_jobs);
    }
    Ok(jobs)
}

/// Length of a JSON array, `None` for anything else.
pub fn array_len(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

/// Reads a `regions` list: strings are names, `null` means global.
///
/// Non-string entries are kept in their JSON form so they fail lookup.
/// Returns `None` when `value` isn't a list.
pub fn parse_regions(value: &Value) -> Option<Vec<Option<String>>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

/// Whether a JSON value counts as unset: missing, `null`, `false` or empty.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
