use crate::error::{EnrichError, Result};
use crate::persist::write_atomic;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// An in-memory CSV table: a header row plus string cells.
///
/// Rows are padded to the header width on read, so every cell access by
/// column index is in bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows.into_iter().map(|row| pad(row, width)).collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(path.display().to_string(), file)?;
        debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a table. Short rows are padded; a row with more fields than the
    /// header is rejected.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(EnrichError::MalformedRow {
                    table: name,
                    line: record.position().map_or(0, |p| p.line()),
                    fields: record.len(),
                    expected: headers.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::new(name, headers, rows))
    }

    /// Write the table to `path`, replacing it only once every row is written.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, |writer| self.to_writer(writer))?;
        debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, or a `MissingColumn` error naming this table.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| EnrichError::MissingColumn {
            column: name.to_string(),
            table: self.name.clone(),
        })
    }

    /// Cells of column `index`, in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Replace the values of `name`, appending the column if it does not exist yet.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        let index = match self.column_index(name) {
            Some(index) => index,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }
}

fn pad(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() < width {
        row.resize(width, String::new());
    }
    row
}
