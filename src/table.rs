//! Minimal string table for delimited scalar files
//!
//! Scalar files come either as comma-separated `.csv` or as whitespace
//! separated `.dat` text. Cells are kept as strings; typed parsing happens in
//! the pipeline that consumes the table.

use crate::errors::{EhcError, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Column-named rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Field separator implied by a file's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Whitespace,
}

impl Delimiter {
    /// `.csv` is comma-separated; everything else is whitespace-separated.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Comma,
            _ => Self::Whitespace,
        }
    }
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`] but a missing column is an error.
    pub fn require_column(&self, name: &str, table: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| EhcError::MissingColumn {
            column: name.to_string(),
            table: table.to_string(),
        })
    }

    /// Iterates over the cells of one column.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Lowercases every column name.
    pub fn lowercase_columns(&mut self) {
        for column in &mut self.columns {
            *column = column.to_lowercase();
        }
    }
}

/// Concatenates tables, aligning columns by name.
///
/// Columns appear in first-seen order. Cells for columns a table doesn't have
/// are left empty.
pub fn concat(tables: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for table in &tables {
        for column in &table.columns {
            if !positions.contains_key(column) {
                positions.insert(column.clone(), columns.len());
                columns.push(column.clone());
            }
        }
    }

    let mut combined = Table::new(columns);
    let width = combined.columns.len();

    for table in tables {
        let mapping: Vec<usize> = table.columns.iter().map(|c| positions[c]).collect();
        for row in table.rows {
            let mut aligned = vec![String::new(); width];
            for (cell, &target) in row.into_iter().zip(&mapping) {
                aligned[target] = cell;
            }
            combined.rows.push(aligned);
        }
    }

    combined
}

/// Reads a delimited scalar file into a [`Table`].
///
/// The first non-comment line is the header. Lines starting with `#` are
/// skipped. Every row must have as many cells as the header.
pub fn read_file_into_table(path: &Path) -> Result<Table> {
    let table = match Delimiter::for_path(path) {
        Delimiter::Comma => read_comma_separated(path)?,
        Delimiter::Whitespace => read_whitespace_separated(path)?,
    };

    debug!(
        file = %path.display(),
        columns = table.columns.len(),
        rows = table.len(),
        "read table"
    );
    Ok(table)
}

fn read_comma_separated(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(BufReader::new(file));

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(EhcError::TableError {
            path: path.to_path_buf(),
            message: "missing header".to_string(),
        });
    }

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

fn read_whitespace_separated(path: &Path) -> Result<Table> {
    let text = fs::read_to_string(path)?;
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });

    let Some((_, header)) = lines.next() else {
        return Err(EhcError::TableError {
            path: path.to_path_buf(),
            message: "missing header".to_string(),
        });
    };

    let mut table = Table::new(header.split_whitespace().map(str::to_string).collect());
    for (line_no, line) in lines {
        let row: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if row.len() != table.columns.len() {
            return Err(EhcError::TableError {
                path: path.to_path_buf(),
                message: format!(
                    "line {} has {} fields, header has {}",
                    line_no + 1,
                    row.len(),
                    table.columns.len()
                ),
            });
        }
        table.rows.push(row);
    }
    Ok(table)
}

/// Writes a table, comma-separated for `.csv` and tab-separated otherwise.
///
/// Missing parent directories are created.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let delimiter = match Delimiter::for_path(path) {
        Delimiter::Comma => b',',
        Delimiter::Whitespace => b'\t',
    };

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file));

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!(file = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}
