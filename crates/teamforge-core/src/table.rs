//! Ordered tabular values.
//!
//! A [`Table`] is what table stores read and write: named columns and rows of
//! [`Cell`]s, in insertion order. It is deliberately untyped; typed records
//! such as [`Candidate`](crate::Candidate) are decoded from it once at load
//! time and validated on the way in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single table value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Numeric value.
    Number(f64),
    /// Free text.
    Text(String),
    /// No value.
    #[default]
    Empty,
}

impl Cell {
    /// Returns the numeric value of this cell.
    ///
    /// Text cells are parsed, since spreadsheet and file backends hand every
    /// value over as a string. NaN and infinities are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse().ok()?,
            Cell::Empty => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Returns the text of this cell, if it is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for [`Cell::Empty`] and for blank text.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Parses a raw string into the most specific cell.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
            Cell::Number(n)
        } else {
            Cell::Text(raw.to_string())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Empty, Into::into)
    }
}

static EMPTY: Cell = Cell::Empty;

/// A typed value stored as one table row.
///
/// Every value of a type encodes to as many cells as
/// [`columns`](Record::columns) names, in the same order.
pub trait Record {
    fn columns() -> Vec<String>;

    fn to_cells(&self) -> Vec<Cell>;
}

/// Named columns and ordered rows.
///
/// A table with no columns is the representation of "nothing stored here".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from columns and rows, checking every row's width.
    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<Cell>>) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Encodes records as rows of a table with the record's columns.
    pub fn from_records<'a, R, I>(records: I) -> Self
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let columns = R::columns();
        let width = columns.len();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut cells = record.to_cells();
                debug_assert_eq!(cells.len(), width);
                cells.resize(width, Cell::Empty);
                cells
            })
            .collect();
        Self { columns, rows }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), DataError> {
        if row.len() != self.columns.len() {
            return Err(DataError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the table has neither columns nor rows.
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Returns a view of one row.
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        (index < self.rows.len()).then_some(RowRef { table: self, index })
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = RowRef<'_>> + '_ {
        (0..self.rows.len()).map(move |index| RowRef { table: self, index })
    }

    /// Returns the raw cells of every row.
    pub fn raw_rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| r.get(col).unwrap_or(&EMPTY)))
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowRef<'a> {
    /// Position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the cell under `column`, if both exist.
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let col = self.table.column_index(column)?;
        self.table.rows[self.index].get(col)
    }

    /// Returns a required numeric attribute.
    ///
    /// A missing column or empty cell is [`DataError::MissingAttribute`];
    /// a non-numeric cell is [`DataError::InvalidValue`].
    pub fn number(&self, column: &str) -> Result<f64, DataError> {
        self.optional_number(column)?
            .ok_or_else(|| DataError::MissingAttribute {
                row: self.index,
                attribute: column.to_string(),
            })
    }

    /// Returns an optional numeric attribute; missing or empty reads as `None`.
    pub fn optional_number(&self, column: &str) -> Result<Option<f64>, DataError> {
        match self.get(column) {
            None => Ok(None),
            Some(cell) if cell.is_empty() => Ok(None),
            Some(cell) => cell.as_f64().map(Some).ok_or_else(|| DataError::InvalidValue {
                row: self.index,
                attribute: column.to_string(),
                value: cell.to_string(),
            }),
        }
    }

    /// Returns a required text attribute. Numbers are rendered as text.
    pub fn text(&self, column: &str) -> Result<String, DataError> {
        match self.get(column) {
            Some(cell) if !cell.is_empty() => Ok(cell.to_string()),
            _ => Err(DataError::MissingAttribute {
                row: self.index,
                attribute: column.to_string(),
            }),
        }
    }
}
