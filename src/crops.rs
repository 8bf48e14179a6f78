//! Standardization of GCAM crop names
//!
//! GCAM land types carry photosynthesis-pathway and technology suffixes
//! (`CornC4`, `OilCropTree`, `RiceIRR`) and some crops appear under more
//! than one name across GCAM versions. Reducing them to one common set makes
//! scalars from different runs comparable.

use crate::scalars::ScalarRecord;

/// Suffixes removed from land-type names, checked in order.
const SUFFIXES: [&str; 5] = ["IRR", "RFD", "C3", "C4", "Tree"];

/// Aliases mapped to their standard name after suffix removal.
const ALIASES: &[(&str, &str)] = &[
    ("Maize", "Corn"),
    ("OilPalm", "PalmFruit"),
    ("Palm", "PalmFruit"),
    ("Soy", "Soybean"),
    ("Soybeans", "Soybean"),
    ("Root", "RootTuber"),
    ("RootTubers", "RootTuber"),
    ("Sugar", "SugarCrop"),
    ("Fiber", "FiberCrop"),
    ("Fodder", "FodderHerb"),
    ("Misc", "MiscCrop"),
    ("Oil", "OilCrop"),
    ("OtherGrains", "OtherGrain"),
    ("biomassGrass", "biomass"),
    ("biomassTree", "biomass"),
    ("Biomass", "biomass"),
];

/// Reduces one land-type name to its standard form.
///
/// # Examples
///
/// ```
/// use ehc_tools::crops::standardize_crop_name;
///
/// assert_eq!(standardize_crop_name("CornC4"), "Corn");
/// assert_eq!(standardize_crop_name("OilPalmTree"), "PalmFruit");
/// assert_eq!(standardize_crop_name("Forest"), "Forest");
/// ```
pub fn standardize_crop_name(name: &str) -> String {
    if let Some((_, standard)) = ALIASES.iter().find(|(alias, _)| *alias == name) {
        return standard.to_string();
    }

    let mut base = name;
    for suffix in SUFFIXES {
        if let Some(stripped) = base.strip_suffix(suffix) {
            if !stripped.is_empty() {
                base = stripped;
            }
        }
    }

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == base)
        .map_or_else(|| base.to_string(), |(_, standard)| standard.to_string())
}

/// Renames land types to their standard names and merges the rows that collide.
///
/// Rows whose key columns become identical are averaged. The result is sorted
/// by key.
pub fn modify_crop_names(records: Vec<ScalarRecord>) -> Vec<ScalarRecord> {
    let mut renamed: Vec<ScalarRecord> = records
        .into_iter()
        .map(|mut record| {
            record.landtype = standardize_crop_name(&record.landtype);
            record
        })
        .collect();
    renamed.sort_by(ScalarRecord::cmp_key);

    let mut merged: Vec<ScalarRecord> = Vec::with_capacity(renamed.len());
    let mut counts: Vec<usize> = Vec::with_capacity(renamed.len());

    for record in renamed {
        match merged.last_mut() {
            Some(last) if last.same_key(&record) => {
                last.vegetation += record.vegetation;
                last.soil += record.soil;
                if let Some(count) = counts.last_mut() {
                    *count += 1;
                }
            }
            _ => {
                merged.push(record);
                counts.push(1);
            }
        }
    }

    for (record, count) in merged.iter_mut().zip(counts) {
        if count > 1 {
            record.vegetation /= count as f64;
            record.soil /= count as f64;
        }
    }

    merged
}
