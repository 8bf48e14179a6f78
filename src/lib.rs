//! EHC tools: validation and post-processing for E3SM/GCAM simulation output
//!
//! A small library behind the `ehctools` binary. It checks JSON job
//! configurations before they are submitted to the cluster, compiles the
//! scalar files written by the E3SM human component (EHC) into one sorted
//! table per job, and collects the helpers the plotting and analysis code
//! shares.
//!
//! ## Module Organization
//!
//! - [`validate`]: `check-config` and `dry-run` configuration validators
//! - [`config`]: loading JSON job configuration files
//! - [`regions`]: named regional bounds and region-name validation
//! - [`scalars`]: EHC scalar compilation pipeline
//! - [`table`]: delimited `.csv`/`.dat` table reading and writing
//! - [`crops`]: GCAM crop-name standardization
//! - [`scenarios`]: scenario-matrix orientation detection
//! - [`arrays`]: NetCDF variables as column arrays
//! - [`stats`]: p-value reporting
//! - [`files`]: directory walking and in-place file sorting
//! - [`utils`]: list and string helpers
//! - [`parallel`]: worker-pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust
//! use ehc_tools::prelude::*;
//!
//! let scenarios = vec![
//!     vec!["Control", "Control_2", "Control_3"],
//!     vec!["Full feedback", "Full feedback_2", "Full feedback_3"],
//! ];
//! let (by_member, transposed) = transpose_scenarios_if_needed(&scenarios, None::<&[&str]>);
//!
//! assert!(transposed);
//! assert_eq!(by_member[1], vec!["Control_2", "Full feedback_2"]);
//! ```

pub mod arrays;
pub mod cli;
pub mod config;
pub mod crops;
pub mod errors;
pub mod files;
pub mod logging;
pub mod parallel;
pub mod regions;
pub mod scalars;
pub mod scenarios;
pub mod stats;
pub mod table;
pub mod utils;
pub mod validate;

pub use errors::{EhcError, Result};

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::{load_compile_jobs, load_config_entries, CompileJob};
    pub use crate::errors::{EhcError, Result};
    pub use crate::parallel::ParallelConfig;
    pub use crate::regions::{get_regional_bounds, validate_region_names, RegionBounds};
    pub use crate::scalars::{compile_all, compile_ehc_scalars, CompileSummary, ScalarRecord};
    pub use crate::scenarios::transpose_scenarios_if_needed;
    pub use crate::table::Table;
    pub use crate::utils::{
        add_lists_elementwise, check_substrings_in_list, check_substrings_in_string,
        find_between_chars, MatchMode,
    };
    pub use crate::validate::{check_config, dry_run};
}
