//! Unit tests for the EHC tool helpers
//!
//! These cover the pure helpers, the region table, the table reader/writer
//! and the configuration validators.

use ehc_tools::{
    config::{load_compile_jobs, load_config_entries, parse_regions, CompileJob},
    crops::{modify_crop_names, standardize_crop_name},
    errors::{EhcError, Result},
    files::{count_files_with_extension, get_all_files_in_path, sort_file},
    parallel::{default_worker_count, ParallelConfig},
    regions::{get_regional_bounds, known_regions, validate_region_names, RegionBounds},
    scalars::{format_value, split_landtype_basin, table_to_records, ScalarRecord},
    scenarios::{transpose, transpose_scenarios_if_needed, transpose_scenarios_json},
    stats::{format_scientific, print_p_values},
    table::{concat, read_file_into_table, write_table, Table},
    utils::{
        add_lists_elementwise, check_is_list_of_lists, check_substrings_in_list,
        check_substrings_in_string, find_between_chars, modify_list_based_on_condition,
        replace_inside_parentheses, MatchMode,
    },
    validate::{check_config, check_configs, dry_run},
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|row| strings(row)).collect()
}

fn record(landtype: &str, year: i64, vegetation: f64, soil: f64) -> ScalarRecord {
    ScalarRecord {
        scenario: "control".to_string(),
        region: "USA".to_string(),
        basin: "MissppiR".to_string(),
        landtype: landtype.to_string(),
        year,
        vegetation,
        soil,
    }
}

/// Runs a validator against `config` and returns its verdict and report.
fn run_validator(
    config: &serde_json::Value,
    validator: fn(&Path, &mut Vec<u8>) -> bool,
) -> (bool, String) {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.json");
    fs::write(&path, config.to_string()).expect("Failed to write config");

    let mut out = Vec::new();
    let valid = validator(&path, &mut out);
    (valid, String::from_utf8(out).expect("Report should be UTF-8"))
}

#[test]
fn test_error_types() {
    let err = EhcError::MissingColumn {
        column: "soil".to_string(),
        table: "scalars.csv".to_string(),
    };
    assert_eq!(format!("{}", err), "Column 'soil' not found in scalars.csv");

    let err = EhcError::MalformedField {
        column: "landtype_basin".to_string(),
        value: "Corn".to_string(),
        message: "no separator".to_string(),
    };
    assert!(format!("{}", err).contains("Malformed value 'Corn' in column 'landtype_basin'"));

    let generic_err = EhcError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    let io_err: EhcError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
    assert!(format!("{}", io_err).starts_with("I/O error"));
}

#[test]
fn test_transpose_when_labels_match_rows() {
    let scenarios = matrix(&[&["run_A", "run_B", "run_C"], &["exp_X", "exp_Y", "exp_Z"]]);
    let sets = strings(&["Control", "Treatment"]);

    let (oriented, transposed) = transpose_scenarios_if_needed(&scenarios, Some(&sets[..]));
    assert!(transposed);
    assert_eq!(
        oriented,
        matrix(&[&["run_A", "exp_X"], &["run_B", "exp_Y"], &["run_C", "exp_Z"]])
    );
}

#[test]
fn test_no_transpose_when_labels_match_columns() {
    let scenarios = matrix(&[&["A1", "B1"], &["A2", "B2"], &["A3", "B3"]]);
    let sets = strings(&["Control", "Full feedback"]);

    let (oriented, transposed) = transpose_scenarios_if_needed(&scenarios, Some(&sets[..]));
    assert!(!transposed);
    assert_eq!(oriented, scenarios);

    // Labels matching columns win even when the shape alone would transpose.
    let wide = matrix(&[&["A1", "B1", "C1"], &["A2", "B2", "C2"]]);
    let three_sets = strings(&["A", "B", "C"]);
    let (oriented, transposed) = transpose_scenarios_if_needed(&wide, Some(&three_sets[..]));
    assert!(!transposed);
    assert_eq!(oriented, wide);
}

#[test]
fn test_square_matrix_with_labels_transposes() {
    let scenarios = matrix(&[&["A", "B"], &["C", "D"]]);
    let sets = strings(&["Control", "Treatment"]);

    let (oriented, transposed) = transpose_scenarios_if_needed(&scenarios, Some(&sets[..]));
    assert!(transposed);
    assert_eq!(oriented, matrix(&[&["A", "C"], &["B", "D"]]));
}

#[test]
fn test_shape_heuristic_without_labels() {
    let wide = matrix(&[&["A1", "A2", "A3"], &["B1", "B2", "B3"]]);
    let (oriented, transposed) = transpose_scenarios_if_needed(&wide, None::<&[String]>);
    assert!(transposed);
    assert_eq!(oriented, transpose(&wide));

    let tall = matrix(&[&["A1", "B1"], &["A2", "B2"], &["A3", "B3"]]);
    let (oriented, transposed) = transpose_scenarios_if_needed(&tall, None::<&[String]>);
    assert!(!transposed);
    assert_eq!(oriented, tall);

    let square = matrix(&[&["A", "B"], &["C", "D"]]);
    let (oriented, transposed) = transpose_scenarios_if_needed(&square, None::<&[String]>);
    assert!(!transposed);
    assert_eq!(oriented, square);
}

#[test]
fn test_unusable_labels_fall_back_to_shape() {
    let wide = matrix(&[&["A1", "A2", "A3"], &["B1", "B2", "B3"]]);
    let sets = strings(&["only one"]);

    let (_, transposed) = transpose_scenarios_if_needed(&wide, Some(&sets[..]));
    assert!(transposed);

    let tall = transpose(&wide);
    let (_, transposed) = transpose_scenarios_if_needed(&tall, Some(&sets[..]));
    assert!(!transposed);
}

#[test]
fn test_empty_and_ragged_matrices_unchanged() {
    let empty: Vec<Vec<String>> = Vec::new();
    let (oriented, transposed) = transpose_scenarios_if_needed(&empty, None::<&[String]>);
    assert!(!transposed);
    assert!(oriented.is_empty());

    let ragged = matrix(&[&["A1", "A2", "A3"], &["B1"]]);
    let sets = strings(&["A", "B"]);
    let (oriented, transposed) = transpose_scenarios_if_needed(&ragged, Some(&sets[..]));
    assert!(!transposed);
    assert_eq!(oriented, ragged);
}

#[test]
fn test_transpose_scenarios_json() {
    let not_nested = json!(["Control", "Treatment"]);
    let (value, transposed) = transpose_scenarios_json(&not_nested, None);
    assert!(!transposed);
    assert_eq!(value, not_nested);

    let (value, transposed) = transpose_scenarios_json(&json!("Control"), None);
    assert!(!transposed);
    assert_eq!(value, json!("Control"));

    let wide = json!([["a1", "a2", "a3"], ["b1", "b2", "b3"]]);
    let (value, transposed) = transpose_scenarios_json(&wide, None);
    assert!(transposed);
    assert_eq!(value, json!([["a1", "b1"], ["a2", "b2"], ["a3", "b3"]]));
}

#[test]
fn test_add_lists_elementwise() {
    assert_eq!(
        add_lists_elementwise(&["a", "b"], &["1", "2"], true),
        Some(strings(&["a (1)", "b (2)"]))
    );
    assert_eq!(
        add_lists_elementwise(&["a", "b"], &["1", "2"], false),
        Some(strings(&["a1", "b2"]))
    );
    assert_eq!(add_lists_elementwise(&["a"], &["1", "2"], true), None);
}

#[test]
fn test_check_is_list_of_lists() {
    assert!(check_is_list_of_lists(&json!([["a"], ["b", "c"]])));
    assert!(check_is_list_of_lists(&json!([])));
    assert!(!check_is_list_of_lists(&json!([["a"], "b"])));
    assert!(!check_is_list_of_lists(&json!({"a": []})));
}

#[test]
fn test_substring_checks() {
    assert!(check_substrings_in_string(&["foo", "bar"], "foobar123", MatchMode::All));
    assert!(check_substrings_in_string(&["baz", "foo"], "foobar123", MatchMode::Any));
    assert!(!check_substrings_in_string(&["baz", "foo"], "foobar123", MatchMode::All));
    assert!(!check_substrings_in_string(&["baz"], "foobar123", MatchMode::Any));

    let files = ["elm.h0.2015.nc", "eam.h1.2015.nc"];
    assert!(check_substrings_in_list(&["h0", "h1"], &files, MatchMode::All));
    assert!(check_substrings_in_list(&["h2", "eam"], &files, MatchMode::Any));
    assert!(!check_substrings_in_list(&["h2", "eam"], &files, MatchMode::All));
}

#[test]
fn test_match_mode_parsing() {
    assert_eq!("all".parse::<MatchMode>(), Ok(MatchMode::All));
    assert_eq!("any".parse::<MatchMode>(), Ok(MatchMode::Any));
    // Anything other than "all" behaves as "any".
    assert_eq!("ALL".parse::<MatchMode>(), Ok(MatchMode::Any));
    assert_eq!(MatchMode::default(), MatchMode::All);
}

#[test]
fn test_find_between_chars() {
    assert_eq!(find_between_chars("a[b]c", '[', ']'), Some("b"));
    assert_eq!(find_between_chars("TSA (K) [monthly]", '(', ')'), Some("K"));
    assert_eq!(find_between_chars("[]", '[', ']'), Some(""));
    assert_eq!(find_between_chars("abc]", '[', ']'), None);
    assert_eq!(find_between_chars("a[bc", '[', ']'), None);
    // The end character must come after the start character.
    assert_eq!(find_between_chars("]a[b", '[', ']'), None);
}

#[test]
fn test_modify_list_based_on_condition() {
    let values = vec![1, -2, 3, -4];
    let result = modify_list_based_on_condition(&values, |v| *v < 0, |v| -v);
    assert_eq!(result, vec![1, 2, 3, 4]);

    let labels = strings(&["Control", "ctl_2"]);
    let result = modify_list_based_on_condition(
        &labels,
        |s| s.starts_with("ctl"),
        |s| s.replacen("ctl", "Control", 1),
    );
    assert_eq!(result, strings(&["Control", "Control_2"]));
}

#[test]
fn test_replace_inside_parentheses() {
    assert_eq!(
        replace_inside_parentheses("Precipitation (mm/day)", "(in)"),
        "Precipitation (in)"
    );
    assert_eq!(replace_inside_parentheses("a (b) c (d)", ""), "a  c ");
    assert_eq!(replace_inside_parentheses("no parens", "x"), "no parens");
    assert_eq!(replace_inside_parentheses("open (only", "x"), "open (only");
    assert_eq!(replace_inside_parentheses("((nested) x)", "y"), "y x)");
}

#[test]
fn test_get_all_files_in_path() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("run1/sub"))?;
    fs::write(root.join("run1/elm.h0.2015.nc"), "")?;
    fs::write(root.join("run1/sub/elm.h0.2016.nc"), "")?;
    fs::write(root.join("run1/sub/elm.h1.2016.nc"), "")?;
    fs::write(root.join("notes.txt"), "")?;

    let all = get_all_files_in_path::<&str>(root, None, None)?;
    assert_eq!(all.len(), 4);

    let h0 = get_all_files_in_path(root, Some(&["elm", "h0"][..]), Some(".nc"))?;
    assert_eq!(h0.len(), 2);
    assert!(h0.iter().all(|p| p.to_string_lossy().contains("h0")));
    assert!(h0.windows(2).all(|w| w[0] <= w[1]));

    let txt = get_all_files_in_path::<&str>(root, None, Some(".txt"))?;
    assert_eq!(txt, vec![root.join("notes.txt")]);

    let empty_filter: [&str; 0] = [];
    let unfiltered = get_all_files_in_path(root, Some(&empty_filter[..]), None)?;
    assert_eq!(unfiltered.len(), 4);

    assert_eq!(count_files_with_extension(&root.join("run1"), ".nc")?, 1);

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_get_all_files_in_path_skips_directory_links() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("shared"))?;
    fs::create_dir_all(root.join("control"))?;
    fs::write(root.join("shared/scalars.csv"), "")?;
    fs::write(root.join("control/scalars.csv"), "")?;
    std::os::unix::fs::symlink(root.join("shared"), root.join("control/linked"))?;
    std::os::unix::fs::symlink(root.join("shared/scalars.csv"), root.join("control/alias.csv"))?;

    let files = get_all_files_in_path::<&str>(&root.join("control"), None, None)?;
    assert_eq!(
        files,
        vec![root.join("control/alias.csv"), root.join("control/scalars.csv")]
    );

    Ok(())
}

#[test]
fn test_sort_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("lines.txt");
    fs::write(&path, "cherry\napple\nbanana\n")?;

    sort_file(&path)?;
    assert_eq!(fs::read_to_string(&path)?, "apple\nbanana\ncherry\n");

    let missing = sort_file(&temp_dir.path().join("missing.txt"));
    match missing {
        Err(EhcError::FileNotFound { path }) => assert!(path.ends_with("missing.txt")),
        _ => panic!("Expected FileNotFound error"),
    }

    Ok(())
}

#[test]
fn test_regional_bounds_lookup() {
    let conus = get_regional_bounds("conus").expect("conus should be known");
    assert!(conus.lat_min < 40.0 && 40.0 < conus.lat_max);
    assert!(conus.lon_min < -100.0 && -100.0 < conus.lon_max);

    assert_eq!(get_regional_bounds("North America"), get_regional_bounds("north_america"));
    assert_eq!(get_regional_bounds("NORTH-AMERICA"), get_regional_bounds("north_america"));
    assert_eq!(get_regional_bounds("global"), Some(RegionBounds::GLOBAL));
    assert_eq!(get_regional_bounds("Atlantis"), None);

    assert!(known_regions().all(|name| get_regional_bounds(name).is_some()));
}

#[test]
fn test_validate_region_names() {
    let regions = vec![None, Some("conus".to_string()), Some("Atlantis".to_string())];
    let issues = validate_region_names(&regions);
    assert_eq!(
        issues,
        vec!["Region 'Atlantis' not recognized - will use global bounds".to_string()]
    );

    assert!(validate_region_names(&[None, None]).is_empty());
}

#[test]
fn test_parse_regions() {
    let regions = parse_regions(&json!(["conus", null, 3]));
    assert_eq!(
        regions,
        Some(vec![Some("conus".to_string()), None, Some("3".to_string())])
    );
    assert_eq!(parse_regions(&json!("conus")), None);
    assert_eq!(parse_regions(&json!({"conus": true})), None);
}

#[test]
fn test_load_config_entries() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");

    let list_path = temp_dir.path().join("list.json");
    fs::write(&list_path, r#"[{"a": 1}, {"b": 2}]"#)?;
    assert_eq!(load_config_entries(&list_path)?.len(), 2);

    let object_path = temp_dir.path().join("object.json");
    fs::write(&object_path, r#"{"a": 1}"#)?;
    assert!(matches!(
        load_config_entries(&object_path),
        Err(EhcError::InvalidConfig { .. })
    ));

    let broken_path = temp_dir.path().join("broken.json");
    fs::write(&broken_path, "[{")?;
    assert!(matches!(
        load_config_entries(&broken_path),
        Err(EhcError::JsonError(_))
    ));

    Ok(())
}

#[test]
fn test_load_compile_jobs_concatenates_files() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.json");
    fs::write(
        &first,
        json!([{
            "input_directories": ["/runs/control"],
            "output_file": "/out/control.csv",
            "scenarios": ["control"]
        }])
        .to_string(),
    )?;
    fs::write(
        &second,
        json!([{
            "input_directories": ["/runs/a", "/runs/b"],
            "output_file": "/out/ab.dat",
            "scenarios": ["a", "b"],
            "call_modify_crop_names": true
        }])
        .to_string(),
    )?;

    let jobs = load_compile_jobs(&[&first, &second])?;
    assert_eq!(jobs.len(), 2);
    assert_eq!(
        jobs[0],
        CompileJob {
            input_directories: vec!["/runs/control".into()],
            output_file: "/out/control.csv".into(),
            scenarios: strings(&["control"]),
            call_modify_crop_names: false,
        }
    );
    assert!(jobs[1].call_modify_crop_names);

    Ok(())
}

#[test]
fn test_check_config_reports_length_mismatch() {
    let config = json!([{
        "variables": [["TSA"], ["QRUNOFF", "QSOIL"]],
        "netcdf_substrings": [["elm.h0"]],
        "simulation_path": "/does/not/exist",
        "output_file": "/tmp/out.csv"
    }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(!valid);
    assert!(report.contains("✗ Length mismatch: variables=2, netcdf_substrings=1"));
    assert!(report.contains("⚠ Simulation path not accessible"));
    assert!(report.contains("✗ Configuration has issues"));
}

#[test]
fn test_check_config_reports_missing_fields() {
    let config = json!([{ "variables": [["TSA"]] }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(!valid);
    assert!(report.contains("✓ Has variables"));
    assert!(report.contains("✗ Missing required field: netcdf_substrings"));
    assert!(report.contains("✗ Missing required field: simulation_path"));
    assert!(report.contains("✗ Missing required field: output_file"));
}

#[test]
fn test_check_config_passes_valid_entry() -> Result<()> {
    let sim_dir = tempdir().expect("Failed to create temp dir");
    fs::write(sim_dir.path().join("run.elm.h0.2015-01.nc"), "")?;
    fs::write(sim_dir.path().join("run.elm.h0.2015-02.nc"), "")?;

    let config = json!([{
        "variables": [["TSA"], ["QRUNOFF"]],
        "netcdf_substrings": [["elm.h0"], ["elm.h0"]],
        "simulation_path": sim_dir.path(),
        "output_file": sim_dir.path().join("out/series.csv"),
        "regions": ["conus", null]
    }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(valid, "report:\n{report}");
    assert!(report.contains("✓ Lengths match!"));
    assert!(report.contains("Found 2 .nc files"));
    assert!(report.contains("⚠ Output directory doesn't exist, will be created"));
    assert!(report.contains("✓ Region 'conus' recognized"));
    assert!(report.contains("✓ Configuration appears valid for SLURM submission!"));

    Ok(())
}

#[test]
fn test_check_config_flags_unknown_regions() {
    let config = json!([{
        "variables": [["TSA"]],
        "netcdf_substrings": [["elm.h0"]],
        "simulation_path": "/does/not/exist",
        "output_file": "out.csv",
        "regions": ["Atlantis"]
    }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(!valid);
    assert!(report.contains("Output directory: ."));
    assert!(report.contains("• Region 'Atlantis' not recognized - will use global bounds"));
}

#[test]
fn test_check_config_rejects_regions_that_are_not_a_list() {
    let sim_dir = tempdir().expect("Failed to create temp dir");
    let config = json!([{
        "variables": [["TSA"]],
        "netcdf_substrings": [["elm.h0"]],
        "simulation_path": sim_dir.path(),
        "output_file": sim_dir.path().join("out.csv"),
        "regions": "Mars"
    }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(!valid);
    assert!(report.contains("✗ regions must be a list, found a string"));
    assert!(!report.contains("✓ All regions recognized"));
    assert!(report.contains("✗ Configuration has issues"));
}

#[test]
fn test_check_config_names_fields_that_are_not_lists() {
    let config = json!([{
        "variables": "TSA",
        "netcdf_substrings": [["elm.h0"]],
        "simulation_path": "/does/not/exist",
        "output_file": "out.csv"
    }]);

    let (valid, report) = run_validator(&config, check_config);
    assert!(!valid);
    assert!(report.contains("✗ variables must be a list, found a string"));
    assert!(!report.contains("netcdf_substrings must be a list"));
}

#[test]
fn test_check_config_unreadable_json() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "not json").expect("Failed to write config");

    let mut out = Vec::new();
    assert!(!check_config(&path, &mut out));
    let report = String::from_utf8(out).expect("Report should be UTF-8");
    assert!(report.contains("✗ Failed to load JSON"));

    let mut out = Vec::new();
    assert!(!check_config(&temp_dir.path().join("missing.json"), &mut out));
}

#[test]
fn test_check_configs_requires_every_file_valid() -> Result<()> {
    let sim_dir = tempdir().expect("Failed to create temp dir");
    let good = sim_dir.path().join("good.json");
    let bad = sim_dir.path().join("bad.json");
    fs::write(
        &good,
        json!([{
            "variables": [["TSA"]],
            "netcdf_substrings": [["h0"]],
            "simulation_path": sim_dir.path(),
            "output_file": sim_dir.path().join("out.csv")
        }])
        .to_string(),
    )?;
    fs::write(&bad, json!([{ "variables": [] }]).to_string())?;

    let mut out = Vec::new();
    assert!(check_configs(&[&good], &mut out));
    assert!(!check_configs(&[&good, &bad], &mut out));
    assert!(!check_configs(&[&bad, &good], &mut out));

    Ok(())
}

#[test]
fn test_dry_run_defaults_and_mismatch() {
    let config = json!([
        {
            "variables": [["TSA"], ["QRUNOFF"]],
            "netcdf_substrings": [["elm.h0"], ["elm.h0"]],
            "simulation_path": "/does/not/exist"
        },
        {
            "variables": [["TSA"], ["QRUNOFF"]],
            "netcdf_substrings": [["elm.h0"]]
        }
    ]);

    let (valid, report) = run_validator(&config, dry_run);
    assert!(!valid);
    assert!(report.contains("✓ Default aggregation types: 2 created"));
    assert!(report.contains("✓ Default regions: 2 created"));
    assert!(report.contains("⚠ Cannot access simulation path: /does/not/exist"));
    assert!(report.contains("✗ VALIDATION FAIL: Length mismatch"));
    assert!(report.contains("  Group 2: 1 variables, no substring group"));
}

#[test]
fn test_dry_run_checks_parameter_lengths() {
    let config = json!([{
        "variables": [["TSA"], ["QRUNOFF"]],
        "netcdf_substrings": [["elm.h0"], ["elm.h0"]],
        "lat_lon_aggregation_types": ["area_weighted_mean_or_sum"],
        "regions": ["conus", "amazon", "europe"]
    }]);

    let (valid, report) = run_validator(&config, dry_run);
    assert!(!valid);
    assert!(report.contains("✗ Aggregation types length mismatch: 1 vs 2"));
    assert!(report.contains("✗ Regions length mismatch: 3 vs 2"));
    assert!(!report.contains("✓ All parameter lengths consistent"));
}

#[test]
fn test_dry_run_rejects_fields_that_are_not_lists() {
    let config = json!([{
        "variables": "TSA",
        "netcdf_substrings": {"a": 1},
        "simulation_path": "/does/not/exist"
    }]);

    let (valid, report) = run_validator(&config, dry_run);
    assert!(!valid);
    assert!(report.contains("✗ variables must be a list, found a string"));
    assert!(report.contains("✗ netcdf_substrings must be a list, found an object"));
    assert!(!report.contains("✓ Length validation: PASS"));
    assert!(!report.contains("Ready for SLURM submission"));

    let config = json!([{
        "variables": [["TSA"]],
        "netcdf_substrings": [["elm.h0"]],
        "lat_lon_aggregation_types": "area_weighted_mean_or_sum",
        "regions": "Mars"
    }]);

    let (valid, report) = run_validator(&config, dry_run);
    assert!(!valid);
    assert!(report.contains("✓ Length validation: PASS"));
    assert!(report.contains("✗ lat_lon_aggregation_types must be a list, found a string"));
    assert!(report.contains("✗ regions must be a list, found a string"));
    assert!(!report.contains("✓ All parameter lengths consistent"));
    assert!(report.contains("✗ Configuration has issues"));
}

#[test]
fn test_dry_run_passes_valid_entry() {
    let config = json!([{
        "variables": [["TSA", "TREFHT"], ["QRUNOFF"]],
        "netcdf_substrings": [["elm.h0"], ["elm.h1"]],
        "regions": ["amazon", null],
        "simulation_path": "/does/not/exist"
    }]);

    let (valid, report) = run_validator(&config, dry_run);
    assert!(valid, "report:\n{report}");
    assert!(report.contains("✓ All parameter lengths consistent"));
    assert!(report.contains("✓ All regions recognized"));
    assert!(report.contains("  Group 1: 2 variables, substring [\"elm.h0\"]"));
    assert!(report.contains("✓ All validations passed! Ready for SLURM submission."));
}

#[test]
fn test_table_read_formats() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");

    let csv_path = temp_dir.path().join("scalars.csv");
    fs::write(
        &csv_path,
        "# EHC scalars\nregion, landtype_basin, year\nUSA, Corn_MissppiR, 2015\n",
    )?;
    let table = read_file_into_table(&csv_path)?;
    assert_eq!(table.columns, strings(&["region", "landtype_basin", "year"]));
    assert_eq!(table.rows, vec![strings(&["USA", "Corn_MissppiR", "2015"])]);

    let dat_path = temp_dir.path().join("scalars.dat");
    fs::write(&dat_path, "region  landtype_basin\tyear\n\nUSA Corn_MissppiR   2015\n")?;
    let table = read_file_into_table(&dat_path)?;
    assert_eq!(table.columns, strings(&["region", "landtype_basin", "year"]));
    assert_eq!(table.column("year").map(|c| c.collect::<Vec<_>>()), Some(vec!["2015"]));

    let ragged_path = temp_dir.path().join("ragged.dat");
    fs::write(&ragged_path, "a b c\n1 2\n")?;
    assert!(matches!(
        read_file_into_table(&ragged_path),
        Err(EhcError::TableError { .. })
    ));

    Ok(())
}

#[test]
fn test_table_write_creates_directories() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let mut table = Table::new(strings(&["a", "b"]));
    table.rows.push(strings(&["1", "x y"]));

    let csv_path = temp_dir.path().join("nested/out.csv");
    write_table(&table, &csv_path)?;
    assert_eq!(fs::read_to_string(&csv_path)?, "a,b\n1,x y\n");

    let dat_path = temp_dir.path().join("nested/out.dat");
    write_table(&table, &dat_path)?;
    assert_eq!(fs::read_to_string(&dat_path)?, "a\tb\n1\tx y\n");

    Ok(())
}

#[test]
fn test_concat_aligns_columns() {
    let mut first = Table::new(strings(&["region", "year"]));
    first.rows.push(strings(&["USA", "2015"]));
    let mut second = Table::new(strings(&["year", "region", "soil"]));
    second.rows.push(strings(&["2020", "Canada", "0.9"]));

    let combined = concat(vec![first, second]);
    assert_eq!(combined.columns, strings(&["region", "year", "soil"]));
    assert_eq!(
        combined.rows,
        vec![strings(&["USA", "2015", ""]), strings(&["Canada", "2020", "0.9"])]
    );
}

#[test]
fn test_split_landtype_basin() {
    assert_eq!(
        split_landtype_basin("Corn_MissppiR").ok(),
        Some(("Corn".to_string(), "MissppiR".to_string()))
    );
    assert!(matches!(
        split_landtype_basin("Corn"),
        Err(EhcError::MalformedField { .. })
    ));
    assert!(split_landtype_basin("Corn_Missppi_R").is_err());
}

#[test]
fn test_table_to_records_rejects_unrepresentable_years() {
    let mut table = Table::new(strings(&["region", "landtype_basin", "year", "vegetation", "soil"]));
    table.rows = vec![strings(&["USA", "Corn_MissppiR", "2015.0", "1.0", "1.0"])];
    let records = table_to_records(&table, "control", "scalars.csv").expect("valid year");
    assert_eq!(records[0].year, 2015);

    for year in ["1e30", "-1e30", "2015.5", "NaN"] {
        table.rows = vec![strings(&["USA", "Corn_MissppiR", year, "1.0", "1.0"])];
        match table_to_records(&table, "control", "scalars.csv") {
            Err(EhcError::MalformedField { column, value, .. }) => {
                assert_eq!(column, "year");
                assert_eq!(value, year);
            }
            other => panic!("Expected MalformedField error for {}, got {:?}", year, other),
        }
    }
}

#[test]
fn test_format_value() {
    assert_eq!(format_value(1.0), "1.0");
    assert_eq!(format_value(0.95), "0.95");
    assert_eq!(format_value(-2.5), "-2.5");
    assert_eq!(format_value(f64::NAN), "");
}

#[test]
fn test_standardize_crop_name() {
    assert_eq!(standardize_crop_name("CornC4"), "Corn");
    assert_eq!(standardize_crop_name("RiceC3IRR"), "Rice");
    assert_eq!(standardize_crop_name("OilCropTree"), "OilCrop");
    assert_eq!(standardize_crop_name("biomassTree"), "biomass");
    assert_eq!(standardize_crop_name("Soy"), "Soybean");
    assert_eq!(standardize_crop_name("Pasture"), "Pasture");
    assert_eq!(standardize_crop_name("C4"), "C4");
}

#[test]
fn test_modify_crop_names_merges_collisions() {
    let records = vec![
        record("Wheat", 2015, 1.0, 1.0),
        record("CornC4", 2015, 1.2, 0.8),
        record("CornC3", 2015, 1.0, 1.0),
        record("CornC4", 2020, 2.0, 2.0),
    ];

    let merged = modify_crop_names(records);
    assert_eq!(merged.len(), 3);

    assert_eq!(merged[0].landtype, "Corn");
    assert_eq!(merged[0].year, 2015);
    assert!((merged[0].vegetation - 1.1).abs() < 1e-12);
    assert!((merged[0].soil - 0.9).abs() < 1e-12);

    assert_eq!(merged[1].landtype, "Corn");
    assert_eq!(merged[1].year, 2020);
    assert_eq!(merged[1].vegetation, 2.0);

    assert_eq!(merged[2].landtype, "Wheat");
}

#[test]
fn test_format_scientific() {
    assert_eq!(format_scientific(0.00001, 4), "1.0000e-05");
    assert_eq!(format_scientific(0.25, 2), "2.50e-01");
    assert_eq!(format_scientific(3.0, 1), "3.0e+00");
    assert_eq!(format_scientific(1.5e-120, 1), "1.5e-120");
}

#[test]
fn test_print_p_values_file_output() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("p_values.txt");

    assert!(print_p_values(0.01, "TSA", 0.05, Some(&path), "run_a", true)?);
    assert!(!print_p_values(0.5, "QRUNOFF", 0.05, Some(&path), "run_a", true)?);
    assert!(!print_p_values(0.5, "QSOIL", 0.05, Some(&path), "run_b", false)?);
    assert!(!print_p_values(0.5, "QSOIL", 0.05, None, "run_b", false)?);

    let contents = fs::read_to_string(&path)?;
    assert_eq!(
        contents,
        "TSA in run_a: 1.0000e-02\nQSOIL in run_b: 5.0000e-01\n"
    );

    Ok(())
}

#[test]
fn test_parallel_config() {
    assert_eq!(default_worker_count(1), 1);
    assert_eq!(default_worker_count(8), 4);
    assert_eq!(default_worker_count(64), 16);

    assert_eq!(ParallelConfig::with_threads(3).worker_count(), 3);
    assert_eq!(ParallelConfig::with_threads(0).worker_count(), 1);
    assert!(ParallelConfig::default().worker_count() >= 1);
    assert!(ParallelConfig::default().worker_count() <= 16);
}

#[test]
fn test_parallel_map_preserves_order_and_propagates_errors() -> Result<()> {
    let config = ParallelConfig::with_threads(2);
    let items: Vec<u32> = (0..20).collect();

    let doubled = config.map_jobs(&items, |x| Ok(x * 2))?;
    assert_eq!(doubled, (0..20).map(|x| x * 2).collect::<Vec<_>>());

    let failed = config.map_jobs(&items, |&x| {
        if x == 7 {
            Err(EhcError::Generic("job 7 failed".to_string()))
        } else {
            Ok(x)
        }
    });
    match failed {
        Err(EhcError::Generic(msg)) => assert_eq!(msg, "job 7 failed"),
        _ => panic!("Expected the failing job's error"),
    }

    Ok(())
}
