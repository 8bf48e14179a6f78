//! Centralized error handling for EHC tools
//!
//! Configuration problems found by the validators are reported, not raised.
//! This type covers everything else: I/O, malformed input files and the
//! compile pipeline.

use std::fmt;
use std::path::PathBuf;

/// Main error type for EHC tool operations
#[derive(Debug)]
pub enum EhcError {
    /// I/O operation errors
    IoError(std::io::Error),

    /// JSON parse errors
    JsonError(serde_json::Error),

    /// Delimited table parse/write errors
    CsvError(csv::Error),

    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// A file that was expected to exist does not
    FileNotFound { path: PathBuf },

    /// Job configuration is structurally unusable
    InvalidConfig { message: String },

    /// A table lacks a column the pipeline needs
    MissingColumn { column: String, table: String },

    /// A cell could not be split or parsed
    MalformedField {
        column: String,
        value: String,
        message: String,
    },

    /// Table shape errors (ragged rows, empty header)
    TableError { path: PathBuf, message: String },

    /// Variable not found in NetCDF file
    VariableNotFound { var: String },

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error
    Generic(String),
}

impl fmt::Display for EhcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EhcError::IoError(e) => write!(f, "I/O error: {}", e),
            EhcError::JsonError(e) => write!(f, "JSON error: {}", e),
            EhcError::CsvError(e) => write!(f, "Table error: {}", e),
            EhcError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            EhcError::ArrayError(e) => write!(f, "Array error: {}", e),
            EhcError::FileNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            EhcError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            EhcError::MissingColumn { column, table } => {
                write!(f, "Column '{}' not found in {}", column, table)
            }
            EhcError::MalformedField {
                column,
                value,
                message,
            } => write!(f, "Malformed value '{}' in column '{}': {}", value, column, message),
            EhcError::TableError { path, message } => {
                write!(f, "Invalid table {}: {}", path.display(), message)
            }
            EhcError::VariableNotFound { var } => write!(f, "Variable '{}' not found in file", var),
            EhcError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            EhcError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EhcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EhcError::IoError(e) => Some(e),
            EhcError::JsonError(e) => Some(e),
            EhcError::CsvError(e) => Some(e),
            EhcError::NetCDFError(e) => Some(e),
            EhcError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EhcError {
    fn from(error: std::io::Error) -> Self {
        EhcError::IoError(error)
    }
}

impl From<serde_json::Error> for EhcError {
    fn from(error: serde_json::Error) -> Self {
        EhcError::JsonError(error)
    }
}

impl From<csv::Error> for EhcError {
    fn from(error: csv::Error) -> Self {
        EhcError::CsvError(error)
    }
}

impl From<netcdf::Error> for EhcError {
    fn from(error: netcdf::Error) -> Self {
        EhcError::NetCDFError(error)
    }
}

impl From<ndarray::ShapeError> for EhcError {
    fn from(error: ndarray::ShapeError) -> Self {
        EhcError::ArrayError(error)
    }
}

/// Result type alias for EHC tool operations
pub type Result<T> = std::result::Result<T, EhcError>;
