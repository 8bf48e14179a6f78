//! Pre-submission validation of extraction job configurations
//!
//! Two checks are provided. [`check_config`] looks at the structure of each
//! entry (required fields, matching group lengths, paths, regions).
//! [`dry_run`] replays the parameter set-up the extraction job performs,
//! including defaulting of optional fields, without touching any data.
//!
//! Both write a report to the given sink and return whether every entry is
//! valid. Configuration problems never surface as errors; an unreadable file
//! is reported and counts as invalid.

use crate::config::{
    array_len, is_falsy, json_type_name, load_config_entries, parse_regions,
    DEFAULT_AGGREGATION_TYPE, REQUIRED_FIELDS,
};
use crate::files::count_files_with_extension;
use crate::regions::{get_regional_bounds, validate_region_names};
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info};

const RULE: &str = "============================================================";

/// Validates the structure of every entry in a configuration file.
pub fn check_config<W: Write>(json_file: &Path, out: &mut W) -> bool {
    report_outcome(json_file, run_check_config(json_file, out))
}

/// Replays the extraction set-up for every entry in a configuration file.
pub fn dry_run<W: Write>(json_file: &Path, out: &mut W) -> bool {
    report_outcome(json_file, run_dry_run(json_file, out))
}

/// Runs [`check_config`] on each file. Every file is checked even after a failure.
pub fn check_configs<P: AsRef<Path>, W: Write>(json_files: &[P], out: &mut W) -> bool {
    json_files
        .iter()
        .fold(true, |all_valid, path| check_config(path.as_ref(), out) && all_valid)
}

/// Runs [`dry_run`] on each file. Every file is checked even after a failure.
pub fn dry_run_all<P: AsRef<Path>, W: Write>(json_files: &[P], out: &mut W) -> bool {
    json_files
        .iter()
        .fold(true, |all_valid, path| dry_run(path.as_ref(), out) && all_valid)
}

fn report_outcome(json_file: &Path, outcome: io::Result<bool>) -> bool {
    match outcome {
        Ok(valid) => {
            info!(file = %json_file.display(), valid, "validation finished");
            valid
        }
        Err(e) => {
            error!(file = %json_file.display(), error = %e, "could not write validation report");
            false
        }
    }
}

fn run_check_config<W: Write>(json_file: &Path, out: &mut W) -> io::Result<bool> {
    writeln!(out, "Testing configuration file: {}", json_file.display())?;
    writeln!(out, "{RULE}")?;

    let entries = match load_config_entries(json_file) {
        Ok(entries) => {
            writeln!(out, "✓ JSON file loaded successfully")?;
            writeln!(out, "✓ Found {} configuration entries", entries.len())?;
            entries
        }
        Err(e) => {
            writeln!(out, "✗ Failed to load JSON: {}", e)?;
            return Ok(false);
        }
    };

    let empty = Map::new();
    let mut all_valid = true;

    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "\n--- Entry {} ---", i + 1)?;

        let entry = match entry.as_object() {
            Some(map) => map,
            None => {
                writeln!(out, "✗ Entry is {}, expected an object", json_type_name(entry))?;
                all_valid = false;
                &empty
            }
        };

        for field in REQUIRED_FIELDS {
            if entry.contains_key(field) {
                writeln!(out, "✓ Has {field}")?;
            } else {
                writeln!(out, "✗ Missing required field: {field}")?;
                all_valid = false;
            }
        }

        if let (Some(variables), Some(substrings)) =
            (entry.get("variables"), entry.get("netcdf_substrings"))
        {
            all_valid &= write_group_lengths(out, variables, substrings)?;
            writeln!(out, "Variables structure: {}", variables)?;
            writeln!(out, "NetCDF structure: {}", substrings)?;
        }

        if let Some(sim_path) = entry.get("simulation_path") {
            write_simulation_path(out, sim_path, true)?;
        }

        if let Some(output_file) = entry.get("output_file") {
            match output_file.as_str() {
                Some(output_file) => {
                    let output_dir = parent_dir(Path::new(output_file));
                    writeln!(out, "Output directory: {}", output_dir.display())?;
                    if !output_dir.exists() {
                        writeln!(out, "⚠ Output directory doesn't exist, will be created")?;
                    }
                }
                None => {
                    writeln!(out, "✗ output_file must be a path, found {}", output_file)?;
                    all_valid = false;
                }
            }
        }

        if !is_falsy(entry.get("regions")) {
            match parse_regions(&entry["regions"]) {
                Some(regions) => all_valid &= write_region_check(out, &regions)?,
                None => {
                    write_not_a_list(out, "regions", &entry["regions"])?;
                    all_valid = false;
                }
            }
        }
    }

    writeln!(out, "\n{RULE}")?;
    if all_valid {
        writeln!(out, "✓ Configuration appears valid for SLURM submission!")?;
    } else {
        writeln!(out, "✗ Configuration has issues - fix before submitting")?;
    }

    Ok(all_valid)
}

fn run_dry_run<W: Write>(json_file: &Path, out: &mut W) -> io::Result<bool> {
    writeln!(out, "Dry-run testing: {}", json_file.display())?;
    writeln!(out, "{RULE}")?;

    let entries = match load_config_entries(json_file) {
        Ok(entries) => {
            writeln!(out, "✓ Loaded {} entries from JSON", entries.len())?;
            entries
        }
        Err(e) => {
            writeln!(out, "✗ JSON load failed: {}", e)?;
            return Ok(false);
        }
    };

    let empty = Map::new();
    let mut all_valid = true;

    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "\n--- Testing Entry {} ---", i + 1)?;

        let entry = match entry.as_object() {
            Some(map) => map,
            None => {
                writeln!(out, "✗ Entry is {}, expected an object", json_type_name(entry))?;
                all_valid = false;
                &empty
            }
        };

        let variables = list_field(out, entry, "variables")?;
        let substrings = list_field(out, entry, "netcdf_substrings")?;
        let (variables, substrings) = match (variables, substrings) {
            (Some(variables), Some(substrings)) => {
                writeln!(out, "Variables: {} groups", variables.len())?;
                writeln!(out, "NetCDF substrings: {} groups", substrings.len())?;

                if variables.len() != substrings.len() {
                    writeln!(out, "✗ VALIDATION FAIL: Length mismatch")?;
                    writeln!(
                        out,
                        "   variables={}, netcdf_substrings={}",
                        variables.len(),
                        substrings.len()
                    )?;
                    all_valid = false;
                } else {
                    writeln!(out, "✓ Length validation: PASS")?;
                }
                (variables, substrings)
            }
            (variables, substrings) => {
                all_valid = false;
                (variables.unwrap_or_default(), substrings.unwrap_or_default())
            }
        };
        let num_groups = variables.len();

        let aggregation_types = if is_falsy(entry.get("lat_lon_aggregation_types")) {
            let defaults = vec![Value::from(DEFAULT_AGGREGATION_TYPE); num_groups];
            writeln!(out, "✓ Default aggregation types: {} created", defaults.len())?;
            Some(defaults)
        } else {
            list_field(out, entry, "lat_lon_aggregation_types")?
        };

        let regions = if is_falsy(entry.get("regions")) {
            writeln!(out, "✓ Default regions: {} created", num_groups)?;
            Some(vec![None; num_groups])
        } else {
            let regions = parse_regions(&entry["regions"]);
            if regions.is_none() {
                write_not_a_list(out, "regions", &entry["regions"])?;
            }
            regions
        };

        // A field that isn't a list has already been reported.
        let mut lengths_ok = aggregation_types.is_some() && regions.is_some();
        if let Some(aggregation_types) = &aggregation_types {
            if aggregation_types.len() != num_groups {
                writeln!(
                    out,
                    "✗ Aggregation types length mismatch: {} vs {}",
                    aggregation_types.len(),
                    num_groups
                )?;
                lengths_ok = false;
            }
        }
        if let Some(regions) = &regions {
            if regions.len() != num_groups {
                writeln!(
                    out,
                    "✗ Regions length mismatch: {} vs {}",
                    regions.len(),
                    num_groups
                )?;
                lengths_ok = false;
            }
        }
        let regions = regions.unwrap_or_default();
        if lengths_ok {
            writeln!(out, "✓ All parameter lengths consistent")?;
        }
        all_valid &= lengths_ok;

        if regions.iter().any(Option::is_some) {
            all_valid &= write_region_check(out, &regions)?;
        }

        let sim_path = entry
            .get("simulation_path")
            .cloned()
            .unwrap_or_else(|| Value::from(""));
        write_simulation_path(out, &sim_path, false)?;

        for (idx, group) in variables.iter().enumerate() {
            let group_len = array_len(group).unwrap_or(0);
            match substrings.get(idx) {
                Some(substring) => writeln!(
                    out,
                    "  Group {}: {} variables, substring {}",
                    idx + 1,
                    group_len,
                    substring
                )?,
                None => writeln!(
                    out,
                    "  Group {}: {} variables, no substring group",
                    idx + 1,
                    group_len
                )?,
            }
        }
    }

    writeln!(out, "\n{RULE}")?;
    if all_valid {
        writeln!(out, "✓ All validations passed! Ready for SLURM submission.")?;
    } else {
        writeln!(out, "✗ Configuration has issues - fix before submitting")?;
    }

    Ok(all_valid)
}

/// Reports the group counts of `variables` and `netcdf_substrings`; true if they match.
fn write_group_lengths<W: Write>(
    out: &mut W,
    variables: &Value,
    substrings: &Value,
) -> io::Result<bool> {
    let (Some(var_len), Some(netcdf_len)) = (array_len(variables), array_len(substrings)) else {
        if !variables.is_array() {
            write_not_a_list(out, "variables", variables)?;
        }
        if !substrings.is_array() {
            write_not_a_list(out, "netcdf_substrings", substrings)?;
        }
        return Ok(false);
    };

    writeln!(out, "Variables groups: {}", var_len)?;
    writeln!(out, "NetCDF substring groups: {}", netcdf_len)?;

    if var_len == netcdf_len {
        writeln!(out, "✓ Lengths match!")?;
        Ok(true)
    } else {
        writeln!(
            out,
            "✗ Length mismatch: variables={}, netcdf_substrings={}",
            var_len, netcdf_len
        )?;
        Ok(false)
    }
}

/// Reports whether the simulation directory is reachable. Never invalidates the entry.
fn write_simulation_path<W: Write>(out: &mut W, sim_path: &Value, count_nc: bool) -> io::Result<()> {
    let Some(sim_path) = sim_path.as_str() else {
        writeln!(out, "⚠ Simulation path is not a string: {}", sim_path)?;
        return Ok(());
    };
    let sim_path = Path::new(sim_path);

    match (sim_path.exists(), count_nc) {
        (true, true) => {
            writeln!(out, "✓ Simulation path exists: {}", sim_path.display())?;
            match count_files_with_extension(sim_path, ".nc") {
                Ok(count) => writeln!(out, "  Found {} .nc files", count)?,
                Err(e) => writeln!(out, "  ⚠ Could not list .nc files: {}", e)?,
            }
        }
        (true, false) => writeln!(out, "✓ Simulation path accessible")?,
        (false, true) => {
            writeln!(out, "⚠ Simulation path not accessible: {}", sim_path.display())?
        }
        (false, false) => {
            writeln!(out, "⚠ Cannot access simulation path: {}", sim_path.display())?
        }
    }

    Ok(())
}

/// Reports each region's bounds and any unrecognized names; true if all are recognized.
fn write_region_check<W: Write>(out: &mut W, regions: &[Option<String>]) -> io::Result<bool> {
    writeln!(out, "Checking region names...")?;

    for region in regions.iter().flatten() {
        if let Some(bounds) = get_regional_bounds(region) {
            writeln!(out, "✓ Region '{}' recognized: bounds {}", region, bounds)?;
        }
    }

    let issues = validate_region_names(regions);
    if issues.is_empty() {
        writeln!(out, "✓ All regions recognized")?;
        return Ok(true);
    }

    writeln!(out, "⚠ Region validation warnings:")?;
    for issue in &issues {
        writeln!(out, "  • {}", issue)?;
    }
    Ok(false)
}

/// A list-valued field, empty when missing. A value that isn't a list is
/// reported and yields `None`.
fn list_field<W: Write>(
    out: &mut W,
    entry: &Map<String, Value>,
    field: &str,
) -> io::Result<Option<Vec<Value>>> {
    match entry.get(field) {
        None => Ok(Some(Vec::new())),
        Some(Value::Array(items)) => Ok(Some(items.clone())),
        Some(other) => {
            write_not_a_list(out, field, other)?;
            Ok(None)
        }
    }
}

fn write_not_a_list<W: Write>(out: &mut W, field: &str, value: &Value) -> io::Result<()> {
    writeln!(out, "✗ {} must be a list, found {}", field, json_type_name(value))
}

/// Parent directory of a path, `.` for bare file names.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
