//! Reporting of significance-test results

use crate::errors::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Formats `value` in scientific notation with a signed, two-digit exponent.
///
/// # Examples
///
/// ```
/// use ehc_tools::stats::format_scientific;
///
/// assert_eq!(format_scientific(0.00001, 4), "1.0000e-05");
/// assert_eq!(format_scientific(12345.0, 4), "1.2345e+04");
/// assert_eq!(format_scientific(0.5, 4), "5.0000e-01");
/// ```
pub fn format_scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Prints a p-value, flagging it when below `threshold`, and optionally logs it to a file.
///
/// A value below the threshold is always appended to `p_value_file`. Other
/// values are appended only when `print_only_if_below_threshold` is false.
/// Returns whether the p-value was below the threshold.
pub fn print_p_values(
    p_value: f64,
    variable: &str,
    p_value_threshold: f64,
    p_value_file: Option<&Path>,
    output_file_or_label: &str,
    print_only_if_below_threshold: bool,
) -> Result<bool> {
    let formatted = format_scientific(p_value, 4);
    let below = p_value < p_value_threshold;

    if below {
        println!(
            "p-value of {} in {}: {}, which is less than {}",
            variable, output_file_or_label, formatted, p_value_threshold
        );
    } else {
        println!(
            "p-value of {} in {}: {}",
            variable, output_file_or_label, formatted
        );
    }

    if let Some(path) = p_value_file {
        if below || !print_only_if_below_threshold {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{} in {}: {}", variable, output_file_or_label, formatted)?;
        }
    }

    Ok(below)
}
