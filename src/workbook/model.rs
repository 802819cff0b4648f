/*!
 * Library-independent workbook model.
 *
 * A `Workbook` is an ordered list of styled sheets (`SheetLayout`). The translation
 * pipeline never works on the styled layout directly: it extracts a plain `Sheet`
 * (header plus aligned rows) from the data range, translates that, and hands the
 * result back to the rewriter together with the untouched layout.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::errors::{DocumentError, StyleError};
use super::style::StyleRecord;

static CELL_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$").expect("cell reference pattern is valid")
});

/// Raw value of one cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Literal text
    Text(String),
    /// Formula text, without the leading `=`
    Formula(String),
}

impl CellValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the cell holds nothing worth keeping
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Text(text) => write!(f, "{}", text),
            Self::Formula(formula) => write!(f, "={}", formula),
        }
    }
}

/// 1-based cell coordinate, ordered row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

impl FromStr for Position {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = CELL_REFERENCE
            .captures(s.trim())
            .ok_or_else(|| StyleError::InvalidRange(s.to_string()))?;
        let col = column_number(&captures[1]);
        let row: u32 = captures[2]
            .parse()
            .map_err(|_| StyleError::InvalidRange(s.to_string()))?;
        if row == 0 || col == 0 {
            return Err(StyleError::InvalidRange(s.to_string()));
        }
        Ok(Self { row, col })
    }
}

/// Convert a 1-based column number to spreadsheet letters (1 -> A, 27 -> AA)
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert spreadsheet letters to a 1-based column number
pub fn column_number(letters: &str) -> u32 {
    letters
        .chars()
        .fold(0, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
}

/// Inclusive rectangular range such as `A1:C3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: Position,
    pub end: Position,
}

impl CellRange {
    /// Create a range, rejecting inverted corners
    pub fn new(start: Position, end: Position) -> Result<Self, StyleError> {
        if end.row < start.row || end.col < start.col {
            return Err(StyleError::InvalidRange(format!("{}:{}", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Whether the two ranges share at least one cell
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((start, end)) => Self::new(start.parse()?, end.parse()?),
            None => {
                let single: Position = s.parse()?;
                Self::new(single, single)
            }
        }
    }
}

/// One cell of a styled sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledCell {
    pub value: CellValue,
    pub style: Option<StyleRecord>,
}

impl StyledCell {
    pub fn new(value: CellValue) -> Self {
        Self { value, style: None }
    }

    pub fn with_style(mut self, style: StyleRecord) -> Self {
        self.style = Some(style);
        self
    }
}

/// A sheet with everything needed to reproduce its appearance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetLayout {
    /// Sheet name, unique within the workbook
    pub name: String,
    /// Occupied cells keyed by position
    pub cells: BTreeMap<Position, StyledCell>,
    /// Column widths keyed by 1-based column number
    pub column_widths: BTreeMap<u32, f64>,
    /// Row heights keyed by 1-based row number
    pub row_heights: BTreeMap<u32, f64>,
    /// Merged regions in source order
    pub merged_ranges: Vec<CellRange>,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Value at a position, `Empty` when the cell is absent
    pub fn value_at(&self, position: Position) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&position).map(|cell| &cell.value).unwrap_or(&EMPTY)
    }

    /// Set the value at a position, keeping any existing style
    pub fn set_value(&mut self, position: Position, value: CellValue) {
        self.cells.entry(position).or_default().value = value;
    }

    /// Highest (row, column) of any occupied cell, styled or not
    pub fn occupied_extent(&self) -> (u32, u32) {
        self.cells.keys().fold((0, 0), |(max_row, max_col), position| {
            (max_row.max(position.row), max_col.max(position.col))
        })
    }

    /// Highest (row, column) holding a non-empty value
    pub fn data_extent(&self) -> (u32, u32) {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.value.is_empty())
            .fold((0, 0), |(max_row, max_col), (position, _)| {
                (max_row.max(position.row), max_col.max(position.col))
            })
    }

    /// Extract the data range (header in row 1, body below) as a plain sheet
    pub fn data_sheet(&self) -> Sheet {
        let (max_row, max_col) = self.data_extent();
        let read_row = |row: u32| -> Vec<CellValue> {
            (1..=max_col)
                .map(|col| self.value_at(Position::new(row, col)).clone())
                .collect()
        };

        let header = if max_row == 0 { Vec::new() } else { read_row(1) };
        let rows = (2..=max_row).map(read_row).collect();

        Sheet {
            name: self.name.clone(),
            header,
            rows,
        }
    }
}

/// Header plus body rows of one sheet, each row aligned to the header columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Build a sheet, padding every row to the header width
    pub fn new(name: impl Into<String>, header: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width.max(row.len()), CellValue::Empty);
                row
            })
            .collect();
        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Cells the translation pipeline examines: the header plus every body cell
    pub fn cell_count(&self) -> usize {
        self.header.len() + self.rows.iter().map(|row| row.len()).sum::<usize>()
    }

    /// A sheet of the same shape filled with `Empty`
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            header: vec![CellValue::Empty; self.header.len()],
            rows: self
                .rows
                .iter()
                .map(|row| vec![CellValue::Empty; row.len()])
                .collect(),
        }
    }
}

/// Ordered collection of uniquely named sheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    sheets: Vec<SheetLayout>,
}

impl Workbook {
    /// Create a workbook, rejecting duplicate sheet names
    pub fn new(sheets: Vec<SheetLayout>) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for sheet in &sheets {
            if !seen.insert(sheet.name.as_str()) {
                return Err(DocumentError::DuplicateSheetName(sheet.name.clone()));
            }
        }
        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[SheetLayout] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
