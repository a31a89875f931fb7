//! Cell address and range types

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of letters in the column alphabet (A-Z)
const RADIX: u64 = 26;

/// A cell address (e.g., "A1", "AB100")
///
/// Labels use a bijective base-26 column numeral (A=1 ... Z=26, then AA) followed
/// by a 1-based row number. Internally both components are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25, AA=26)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The whole input must be one or more ASCII letters followed by a row
    /// number without leading zeros. Letter case is ignored.
    ///
    /// # Examples
    /// ```
    /// use sheetwire_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 0));
    ///
    /// let addr = CellAddress::parse("ab100").unwrap();
    /// assert_eq!((addr.row, addr.col), (99, 27));
    ///
    /// assert!(CellAddress::parse("A0").is_err());
    /// assert!(CellAddress::parse("1A").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();

        let letters_end = bytes
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(bytes.len());
        if letters_end == 0 {
            return Err(Error::label(s));
        }

        let digits = &bytes[letters_end..];
        match digits.first() {
            Some(b'1'..=b'9') => {}
            _ => return Err(Error::label(s)),
        }
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::label(s));
        }

        let col = letters_to_column(&s[..letters_end])?;

        let mut row: u64 = 0;
        for d in digits {
            row = row
                .checked_mul(10)
                .and_then(|r| r.checked_add(u64::from(d - b'0')))
                .ok_or(Error::CoordinateOutOfBounds(u64::MAX))?;
        }

        // Labels are 1-based
        let row = row - 1;
        let row = u32::try_from(row).map_err(|_| Error::CoordinateOutOfBounds(row))?;

        Ok(Self { row, col })
    }

    /// Format as an A1-style label
    pub fn to_label(&self) -> String {
        let mut label = column_to_letters(self.col);
        label.push_str(&(u64::from(self.row) + 1).to_string());
        label
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_label())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<(u32, u32)> for CellAddress {
    fn from((row, col): (u32, u32)) -> Self {
        Self::new(row, col)
    }
}

/// Translate a cell label into a 0-based `(row, col)` pair.
///
/// # Errors
///
/// Malformed labels give [`Error::IncorrectCellLabel`]. Well-formed labels
/// whose row or column does not fit in `u32` (`AAAAAAAA1`, `A99999999999`)
/// give [`Error::CoordinateOutOfBounds`], so callers rejecting bad input
/// must match both.
///
/// ```
/// use sheetwire_core::label_to_coordinate;
///
/// assert_eq!(label_to_coordinate("A1").unwrap(), (0, 0));
/// assert_eq!(label_to_coordinate("AA1").unwrap(), (0, 26));
/// ```
pub fn label_to_coordinate(label: &str) -> Result<(u32, u32)> {
    let addr = CellAddress::parse(label)?;
    Ok((addr.row, addr.col))
}

/// Translate a 0-based `(row, col)` pair into a cell label.
///
/// Negative components are rejected with [`Error::IncorrectCellLabel`].
///
/// ```
/// use sheetwire_core::coordinate_to_label;
///
/// assert_eq!(coordinate_to_label(0, 26).unwrap(), "AA1");
/// assert!(coordinate_to_label(-1, 0).is_err());
/// ```
pub fn coordinate_to_label(row: i64, col: i64) -> Result<String> {
    if row < 0 || col < 0 {
        return Err(Error::label(format!("({}, {})", row, col)));
    }

    let row = u32::try_from(row).map_err(|_| Error::CoordinateOutOfBounds(row as u64))?;
    let col = u32::try_from(col).map_err(|_| Error::CoordinateOutOfBounds(col as u64))?;

    Ok(CellAddress::new(row, col).to_label())
}

/// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
///
/// Spreadsheet columns have no zero digit, so a remainder of 0 stands for
/// `Z` and borrows one from the next position.
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1;

    while n > 0 {
        let (mut div, mut rem) = (n / RADIX, n % RADIX);
        if rem == 0 {
            rem = RADIX;
            div -= 1;
        }
        result.insert(0, (b'A' + rem as u8 - 1) as char);
        n = div;
    }

    result
}

/// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::label(letters));
    }

    let mut col: u64 = 0;
    let mut weight: Option<u64> = Some(1);
    for c in letters.bytes().rev() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::label(letters));
        }
        let digit = u64::from(c.to_ascii_uppercase() - b'A' + 1);
        col = weight
            .and_then(|w| w.checked_mul(digit))
            .and_then(|v| col.checked_add(v))
            .ok_or(Error::CoordinateOutOfBounds(u64::MAX))?;
        weight = weight.and_then(|w| w.checked_mul(RADIX));
    }

    // Convert to 0-based
    let col = col - 1;
    u32::try_from(col).map_err(|_| Error::CoordinateOutOfBounds(col))
}

/// A rectangular range of cells (e.g., "A1:C5")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right, inclusive)
    pub end: CellAddress,
}

/// Zero-based grid bounds with exclusive ends, as remote APIs expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridIndices {
    pub start_row: u64,
    pub end_row: u64,
    pub start_col: u64,
    pub end_col: u64,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        // Normalize so start is top-left and end is bottom-right
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a range from row/column indices
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation, or a single label
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();

        if parts.next().is_some() {
            return Err(Error::InvalidRange(s.to_string()));
        }

        let start = CellAddress::parse(first)?;
        match second {
            Some(end) => Ok(Self::new(start, CellAddress::parse(end)?)),
            None => Ok(Self::single(start)),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u64 {
        u64::from(self.end.row - self.start.row) + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u64 {
        u64::from(self.end.col - self.start.col) + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count().saturating_mul(self.col_count())
    }

    /// Zero-based bounds with exclusive ends
    pub fn to_grid_indices(&self) -> GridIndices {
        GridIndices {
            start_row: u64::from(self.start.row),
            end_row: u64::from(self.end.row) + 1,
            start_col: u64::from(self.start.col),
            end_col: u64::from(self.end.col) + 1,
        }
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            done: false,
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_label()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u32,
    done: bool,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col);

        // Move to next cell; compare before incrementing so u32::MAX ends are safe
        if self.current_col < self.range.end.col {
            self.current_col += 1;
        } else if self.current_row < self.range.end.row {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.done = true;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let rows_left = u64::from(self.range.end.row - self.current_row);
        let remaining = rows_left
            .saturating_mul(self.range.col_count())
            .saturating_add(u64::from(self.range.end.col - self.current_col) + 1);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(0), "A");
        assert_eq!(column_to_letters(1), "B");
        assert_eq!(column_to_letters(25), "Z");
        assert_eq!(column_to_letters(26), "AA");
        assert_eq!(column_to_letters(27), "AB");
        assert_eq!(column_to_letters(51), "AZ");
        assert_eq!(column_to_letters(52), "BA");
        assert_eq!(column_to_letters(701), "ZZ");
        assert_eq!(column_to_letters(702), "AAA");
        assert_eq!(column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 0);
        assert_eq!(letters_to_column("Z").unwrap(), 25);
        assert_eq!(letters_to_column("AA").unwrap(), 26);
        assert_eq!(letters_to_column("AZ").unwrap(), 51);
        assert_eq!(letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(letters_to_column("AAA").unwrap(), 702);
        assert_eq!(letters_to_column("XFD").unwrap(), 16383);

        // Case insensitive
        assert_eq!(letters_to_column("a").unwrap(), 0);
        assert_eq!(letters_to_column("xfd").unwrap(), 16383);
    }

    #[test]
    fn test_letters_to_column_errors() {
        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert_eq!(
            letters_to_column("ZZZZZZZZ"),
            Err(Error::CoordinateOutOfBounds(217_180_147_157))
        );
        assert!(letters_to_column(&"Z".repeat(20)).is_err());
    }

    #[test]
    fn test_label_to_coordinate_boundaries() {
        assert_eq!(label_to_coordinate("A1").unwrap(), (0, 0));
        assert_eq!(label_to_coordinate("Z1").unwrap(), (0, 25));
        assert_eq!(label_to_coordinate("AA1").unwrap(), (0, 26));
        assert_eq!(label_to_coordinate("B12").unwrap(), (11, 1));
        assert_eq!(label_to_coordinate("AB100").unwrap(), (99, 27));
        assert_eq!(label_to_coordinate("a1").unwrap(), label_to_coordinate("A1").unwrap());
    }

    #[test]
    fn test_label_to_coordinate_rejects_malformed() {
        for bad in ["", "A", "1", "1A", "A0", "A01", "A-1", "A1B", "A1 ", " A1", "$A$1", "É1"] {
            assert_eq!(
                label_to_coordinate(bad),
                Err(Error::IncorrectCellLabel(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_label_row_overflow() {
        assert_eq!(label_to_coordinate("A4294967296").unwrap(), (u32::MAX, 0));
        assert_eq!(
            label_to_coordinate("A4294967297"),
            Err(Error::CoordinateOutOfBounds(4_294_967_296))
        );
        assert!(label_to_coordinate("A99999999999999999999999").is_err());
    }

    #[test]
    fn test_well_formed_overflowing_labels_are_out_of_bounds() {
        assert_eq!(
            label_to_coordinate("AAAAAAAA1"),
            Err(Error::CoordinateOutOfBounds(8_353_082_582))
        );
        assert_eq!(
            label_to_coordinate("A99999999999"),
            Err(Error::CoordinateOutOfBounds(99_999_999_998))
        );
    }

    #[test]
    fn test_coordinate_to_label() {
        assert_eq!(coordinate_to_label(0, 0).unwrap(), "A1");
        assert_eq!(coordinate_to_label(0, 25).unwrap(), "Z1");
        assert_eq!(coordinate_to_label(0, 26).unwrap(), "AA1");
        assert_eq!(coordinate_to_label(99, 2).unwrap(), "C100");
    }

    #[test]
    fn test_coordinate_to_label_rejects_negative() {
        assert_eq!(
            coordinate_to_label(-1, 0),
            Err(Error::IncorrectCellLabel("(-1, 0)".into()))
        );
        assert_eq!(
            coordinate_to_label(0, -5),
            Err(Error::IncorrectCellLabel("(0, -5)".into()))
        );
        assert!(coordinate_to_label(1 << 40, 0).is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(11, 1).to_string(), "B12");
        assert_eq!("c3".parse::<CellAddress>().unwrap(), CellAddress::new(2, 2));
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("A1:C5").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(4, 2));
        assert_eq!(range.row_count(), 5);
        assert_eq!(range.col_count(), 3);

        // Reversed corners are normalized
        let range = CellRange::parse("C5:A1").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.to_string(), "A1:C5");

        // Single cell
        let range = CellRange::parse("C3").unwrap();
        assert_eq!(range.start, range.end);
        assert_eq!(range.to_string(), "C3");
    }

    #[test]
    fn test_cell_range_parse_errors() {
        assert_eq!(
            CellRange::parse("A1:B2:C3"),
            Err(Error::InvalidRange("A1:B2:C3".into()))
        );
        assert_eq!(
            CellRange::parse("A1:"),
            Err(Error::IncorrectCellLabel(String::new()))
        );
        assert!(CellRange::parse("").is_err());
    }

    #[test]
    fn test_grid_indices_are_end_exclusive() {
        let range = CellRange::parse("B2:D4").unwrap();
        assert_eq!(
            range.to_grid_indices(),
            GridIndices {
                start_row: 1,
                end_row: 4,
                start_col: 1,
                end_col: 4,
            }
        );
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(1, 1))); // B2
        assert!(range.contains(&CellAddress::new(3, 3))); // D4
        assert!(!range.contains(&CellAddress::new(0, 0))); // A1
        assert!(!range.contains(&CellAddress::new(4, 1))); // B5
    }

    #[test]
    fn test_cell_range_iterator() {
        let range = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 0),
                CellAddress::new(1, 1),
            ]
        );
        assert_eq!(range.cells().size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_cell_range_iterator_at_index_limit() {
        let corner = CellAddress::new(u32::MAX, u32::MAX);
        let cells: Vec<_> = CellRange::single(corner).cells().collect();
        assert_eq!(cells, vec![corner]);
    }
}
