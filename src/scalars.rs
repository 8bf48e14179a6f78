//! Compilation of EHC scalar files
//!
//! The E3SM human component (EHC) writes vegetation and soil scalars at run
//! time, one directory of files per scenario, before handing them to GCAM.
//! [`compile_ehc_scalars`] gathers those files into a single sorted table
//! with one row per `(scenario, region, basin, landtype, year)`.

use crate::config::CompileJob;
use crate::crops::modify_crop_names;
use crate::errors::{EhcError, Result};
use crate::files::get_all_files_in_path;
use crate::parallel::ParallelConfig;
use crate::table::{concat, read_file_into_table, write_table, Table};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Key columns, in sort order
pub const KEY_COLUMNS: [&str; 5] = ["scenario", "region", "basin", "landtype", "year"];

/// Value columns written after the keys
pub const VALUE_COLUMNS: [&str; 2] = ["vegetation", "soil"];

/// Combined land type and basin column in the raw files, e.g. `Corn_IndusR`
pub const LANDTYPE_BASIN_COLUMN: &str = "landtype_basin";

/// One row of the compiled scalar table
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarRecord {
    pub scenario: String,
    pub region: String,
    pub basin: String,
    pub landtype: String,
    pub year: i64,
    pub vegetation: f64,
    pub soil: f64,
}

impl ScalarRecord {
    /// Orders records by the key columns.
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.scenario
            .cmp(&other.scenario)
            .then_with(|| self.region.cmp(&other.region))
            .then_with(|| self.basin.cmp(&other.basin))
            .then_with(|| self.landtype.cmp(&other.landtype))
            .then_with(|| self.year.cmp(&other.year))
    }

    /// Whether two records share every key column.
    pub fn same_key(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}

/// Outcome of one compile job
#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub output_file: PathBuf,
    pub scenarios: usize,
    pub rows: usize,
    pub elapsed: Duration,
}

/// Splits a `landtype_basin` value on its single underscore.
pub fn split_landtype_basin(value: &str) -> Result<(String, String)> {
    let mut parts = value.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(landtype), Some(basin), None) => Ok((landtype.to_string(), basin.to_string())),
        _ => Err(EhcError::MalformedField {
            column: LANDTYPE_BASIN_COLUMN.to_string(),
            value: value.to_string(),
            message: "expected exactly one '_' separating land type and basin".to_string(),
        }),
    }
}

fn parse_year(value: &str) -> Result<i64> {
    // Years sometimes come through as floats, e.g. `2015.0`.
    value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|y| y.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(y))
                .map(|y| y as i64)
        })
        .ok_or_else(|| EhcError::MalformedField {
            column: "year".to_string(),
            value: value.to_string(),
            message: "not an integer year".to_string(),
        })
}

fn parse_value(column: &str, value: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|e| EhcError::MalformedField {
        column: column.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Formats a value the way the downstream GCAM readers expect: `1.0`, not `1`.
/// NaN is written as an empty cell.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Reads every scalar file of one scenario and converts the rows to records.
///
/// Rows are sorted by year, keeping file order among equal years.
pub fn read_scenario_records(input_directory: &Path, scenario: &str) -> Result<Vec<ScalarRecord>> {
    let files = get_all_files_in_path::<&str>(input_directory, None, None)?;
    if files.is_empty() {
        return Err(EhcError::InvalidConfig {
            message: format!(
                "no scalar files found in {} for scenario '{}'",
                input_directory.display(),
                scenario
            ),
        });
    }

    // Lowercase before aligning so `Region` and `region` land in one column.
    let tables = files
        .iter()
        .map(|file| {
            let mut table = read_file_into_table(file)?;
            table.lowercase_columns();
            Ok::<_, EhcError>(table)
        })
        .collect::<Result<Vec<_>>>()?;
    let table = concat(tables);

    let mut records = table_to_records(&table, scenario, &input_directory.display().to_string())?;
    records.sort_by_key(|record| record.year);

    debug!(
        scenario,
        files = files.len(),
        rows = records.len(),
        "read scenario scalars"
    );
    Ok(records)
}

/// Converts a raw scalar table (lowercase columns) into records for `scenario`.
pub fn table_to_records(table: &Table, scenario: &str, table_name: &str) -> Result<Vec<ScalarRecord>> {
    let region_idx = table.require_column("region", table_name)?;
    let landtype_basin_idx = table.require_column(LANDTYPE_BASIN_COLUMN, table_name)?;
    let year_idx = table.require_column("year", table_name)?;
    let vegetation_idx = table.require_column("vegetation", table_name)?;
    let soil_idx = table.require_column("soil", table_name)?;

    table
        .rows
        .iter()
        .map(|row| {
            let (landtype, basin) = split_landtype_basin(&row[landtype_basin_idx])?;
            Ok(ScalarRecord {
                scenario: scenario.to_string(),
                region: row[region_idx].clone(),
                basin,
                landtype,
                year: parse_year(&row[year_idx])?,
                vegetation: parse_value("vegetation", &row[vegetation_idx])?,
                soil: parse_value("soil", &row[soil_idx])?,
            })
        })
        .collect()
}

/// Converts records into the output table layout.
pub fn records_to_table(records: &[ScalarRecord]) -> Table {
    let columns = KEY_COLUMNS
        .iter()
        .chain(VALUE_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect();

    let mut table = Table::new(columns);
    table.rows = records
        .iter()
        .map(|r| {
            vec![
                r.scenario.clone(),
                r.region.clone(),
                r.basin.clone(),
                r.landtype.clone(),
                r.year.to_string(),
                format_value(r.vegetation),
                format_value(r.soil),
            ]
        })
        .collect();
    table
}

/// Compiles the scalar files of every scenario in `job` into one output file.
pub fn compile_ehc_scalars(job: &CompileJob) -> Result<CompileSummary> {
    let start = Instant::now();

    if job.input_directories.len() < job.scenarios.len() {
        return Err(EhcError::InvalidConfig {
            message: format!(
                "{} scenarios but only {} input directories for {}",
                job.scenarios.len(),
                job.input_directories.len(),
                job.output_file.display()
            ),
        });
    }

    let mut records = Vec::new();
    for (scenario, input_directory) in job.scenarios.iter().zip(&job.input_directories) {
        records.extend(read_scenario_records(input_directory, scenario)?);
    }

    records.sort_by(ScalarRecord::cmp_key);

    if job.call_modify_crop_names {
        records = modify_crop_names(records);
    }

    write_table(&records_to_table(&records), &job.output_file)?;

    let elapsed = start.elapsed();
    info!(
        output = %job.output_file.display(),
        rows = records.len(),
        "Elapsed time processing/compiling the data: {:.2} seconds",
        elapsed.as_secs_f64()
    );

    Ok(CompileSummary {
        output_file: job.output_file.clone(),
        scenarios: job.scenarios.len(),
        rows: records.len(),
        elapsed,
    })
}

/// Runs every job on a dedicated worker pool. The first failure aborts the run.
pub fn compile_all(jobs: &[CompileJob], config: &ParallelConfig) -> Result<Vec<CompileSummary>> {
    let start = Instant::now();
    let summaries = config.map_jobs(jobs, compile_ehc_scalars)?;
    info!(
        jobs = summaries.len(),
        "Elapsed time processing/compiling the data for all files: {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
    Ok(summaries)
}
