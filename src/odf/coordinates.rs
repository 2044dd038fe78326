//! Cell addressing for spreadsheet formulas and chart ranges.
//!
//! Cells are addressed by 0-indexed column/row pairs. Formulas reference
//! them in OpenFormula notation (`[.A1]`, `[$Sheet1.$B$3:.C4]`), while
//! chart and table attributes use the plain ODF range notation
//! (`Sheet1.A1:Sheet1.B3`).

use crate::common::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert alphabetic column to numeric (0-indexed)
///
/// # Examples
///
/// ```
/// use odfgen::odf::coordinates::alpha_to_digit;
///
/// assert_eq!(alpha_to_digit("A").unwrap(), 0);
/// assert_eq!(alpha_to_digit("AA").unwrap(), 26);
/// ```
pub fn alpha_to_digit(alpha: &str) -> Result<usize> {
    if alpha.is_empty() || !alpha.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidFormat(format!(
            "column '{}' must contain only letters",
            alpha
        )));
    }

    let column = alpha
        .bytes()
        .map(|b| (b.to_ascii_uppercase() - b'A' + 1) as usize)
        .fold(0usize, |acc, v| acc * 26 + v);
    Ok(column - 1)
}

/// Convert numeric column (0-indexed) to alphabetic notation
///
/// # Examples
///
/// ```
/// use odfgen::odf::coordinates::digit_to_alpha;
///
/// assert_eq!(digit_to_alpha(0), "A");
/// assert_eq!(digit_to_alpha(25), "Z");
/// assert_eq!(digit_to_alpha(26), "AA");
/// ```
pub fn digit_to_alpha(digit: usize) -> String {
    let mut letters = Vec::new();
    let mut n = digit + 1;
    while n > 0 {
        letters.push(b'A' + ((n - 1) % 26) as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Reference to one cell, optionally on a named sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CellRef {
    pub sheet: Option<String>,
    pub column: usize,
    pub row: usize,
    pub column_absolute: bool,
    pub row_absolute: bool,
}

impl CellRef {
    #[inline]
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            ..Default::default()
        }
    }

    #[inline]
    pub fn on_sheet(mut self, sheet: &str) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    #[inline]
    pub fn absolute(mut self, column: bool, row: bool) -> Self {
        self.column_absolute = column;
        self.row_absolute = row;
        self
    }

    /// `A1` style address, with `$` markers for absolute parts
    pub fn address(&self) -> String {
        let mut out = String::new();
        if self.column_absolute {
            out.push('$');
        }
        out.push_str(&digit_to_alpha(self.column));
        if self.row_absolute {
            out.push('$');
        }
        let mut buffer = itoa::Buffer::new();
        out.push_str(buffer.format(self.row + 1));
        out
    }

    /// Sheet-qualified part used inside OpenFormula brackets (`.A1` or `$Sheet.A1`)
    fn formula_part(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("${}.{}", quote_sheet(sheet), self.address()),
            None => format!(".{}", self.address()),
        }
    }

    /// OpenFormula reference (`[.A1]`)
    ///
    /// # Examples
    ///
    /// ```
    /// use odfgen::odf::coordinates::CellRef;
    ///
    /// assert_eq!(CellRef::new(1, 2).to_open_formula(), "[.B3]");
    /// assert_eq!(CellRef::new(0, 0).on_sheet("Data").absolute(true, true).to_open_formula(), "[$Data.$A$1]");
    /// ```
    pub fn to_open_formula(&self) -> String {
        format!("[{}]", self.formula_part())
    }
}

fn quote_sheet(sheet: &str) -> String {
    if sheet.chars().all(|c| c.is_alphanumeric() || c == '_') {
        sheet.to_string()
    } else {
        format!("'{}'", sheet.replace('\'', "''"))
    }
}

impl FromStr for CellRef {
    type Err = Error;

    /// Parse `A1`, `$A$1` or `Sheet1.A1`
    fn from_str(s: &str) -> Result<Self> {
        let (sheet, address) = match s.rsplit_once('.') {
            Some((sheet, address)) => {
                let sheet = sheet.trim_start_matches('$').trim_matches('\'');
                ((!sheet.is_empty()).then(|| sheet.to_string()), address)
            },
            None => (None, s),
        };

        let mut rest = address;
        let column_absolute = rest.starts_with('$');
        if column_absolute {
            rest = &rest[1..];
        }
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(|| Error::InvalidFormat(format!("no row number in '{}'", s)))?;
        let (letters, digits) = rest.split_at(split);
        let column = alpha_to_digit(letters)?;
        let row_absolute = digits.starts_with('$');
        let digits = digits.trim_start_matches('$');
        let row: usize = digits
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("bad row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidFormat("row number must be >= 1".to_string()));
        }

        Ok(Self {
            sheet,
            column,
            row: row - 1,
            column_absolute,
            row_absolute,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) => write!(f, "{}.{}", quote_sheet(sheet), self.address()),
            None => f.write_str(&self.address()),
        }
    }
}

/// Rectangular range between two cell references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRangeRef {
    #[inline]
    pub fn new(start: CellRef, end: CellRef) -> Self {
        Self { start, end }
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        self.end.column.saturating_sub(self.start.column) + 1
    }

    /// Number of rows covered
    pub fn height(&self) -> usize {
        self.end.row.saturating_sub(self.start.row) + 1
    }

    /// OpenFormula range (`[.A1:.B2]`)
    ///
    /// # Examples
    ///
    /// ```
    /// use odfgen::odf::coordinates::{CellRangeRef, CellRef};
    ///
    /// let range = CellRangeRef::new(CellRef::new(0, 0), CellRef::new(1, 1));
    /// assert_eq!(range.to_open_formula(), "[.A1:.B2]");
    /// ```
    pub fn to_open_formula(&self) -> String {
        format!("[{}:{}]", self.start.formula_part(), self.end.formula_part())
    }
}

impl FromStr for CellRangeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidFormat(format!("'{}' is not a range", s)))?;
        Ok(Self::new(start.trim().parse()?, end.trim().parse()?))
    }
}

impl fmt::Display for CellRangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
