//! Sheet-qualified range references (e.g., "Sheet1!A1:C5")

use super::address::CellRange;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell range optionally qualified with a sheet name.
///
/// Names that are not plain identifiers are quoted on output, with embedded
/// quotes doubled: `'Q1 ''24'!A1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeName {
    pub sheet: Option<String>,
    pub range: CellRange,
}

impl RangeName {
    pub fn new(sheet: impl Into<String>, range: CellRange) -> Self {
        Self {
            sheet: Some(sheet.into()),
            range,
        }
    }

    /// A range with no sheet qualifier
    pub fn unqualified(range: CellRange) -> Self {
        Self { sheet: None, range }
    }

    /// Parse `A1:B2`, `Sheet1!A1:B2` or `'My Sheet'!A1`
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix('\'') {
            let (sheet, tail) = split_quoted(rest).ok_or_else(|| Error::InvalidRange(s.into()))?;
            let range = tail
                .strip_prefix('!')
                .ok_or_else(|| Error::InvalidRange(s.into()))?;
            if sheet.is_empty() {
                return Err(Error::InvalidRange(s.into()));
            }
            return Ok(Self {
                sheet: Some(sheet),
                range: CellRange::parse(range)?,
            });
        }

        match s.rsplit_once('!') {
            Some(("", _)) => Err(Error::InvalidRange(s.into())),
            Some((sheet, range)) => Ok(Self::new(sheet, CellRange::parse(range)?)),
            None => Ok(Self::unqualified(CellRange::parse(s)?)),
        }
    }
}

/// Split `name'...` at the closing quote, unescaping doubled quotes.
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let mut name = String::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if let Some((_, '\'')) = chars.peek() {
                chars.next();
                name.push('\'');
                continue;
            }
            return Some((name, &s[i + 1..]));
        }
        name.push(c);
    }
    None
}

fn needs_quotes(sheet: &str) -> bool {
    sheet.is_empty()
        || !sheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for RangeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            Some(sheet) if needs_quotes(sheet) => {
                write!(f, "'{}'!{}", sheet.replace('\'', "''"), self.range)
            }
            Some(sheet) => write!(f, "{}!{}", sheet, self.range),
            None => write!(f, "{}", self.range),
        }
    }
}

impl FromStr for RangeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellAddress;

    #[test]
    fn test_parse_qualified() {
        let name = RangeName::parse("Sheet1!A1:C5").unwrap();
        assert_eq!(name.sheet.as_deref(), Some("Sheet1"));
        assert_eq!(name.range, CellRange::from_indices(0, 0, 4, 2));
    }

    #[test]
    fn test_parse_unqualified() {
        let name = RangeName::parse("b2").unwrap();
        assert_eq!(name.sheet, None);
        assert_eq!(name.range, CellRange::single(CellAddress::new(1, 1)));
    }

    #[test]
    fn test_parse_quoted() {
        let name = RangeName::parse("'Q1 ''24'!A1:B2").unwrap();
        assert_eq!(name.sheet.as_deref(), Some("Q1 '24"));
        assert_eq!(name.to_string(), "'Q1 ''24'!A1:B2");

        let name = RangeName::parse("'a!b'!C3").unwrap();
        assert_eq!(name.sheet.as_deref(), Some("a!b"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(RangeName::parse("!A1").is_err());
        assert!(RangeName::parse("''!A1").is_err());
        assert!(RangeName::parse("'open!A1").is_err());
        assert!(RangeName::parse("'x'A1").is_err());
        assert_eq!(
            RangeName::parse("Sheet1!1A"),
            Err(Error::IncorrectCellLabel("1A".into()))
        );
    }

    #[test]
    fn test_display_quotes_when_needed() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert_eq!(RangeName::new("Data_2024", range).to_string(), "Data_2024!A1:B2");
        assert_eq!(RangeName::new("My Sheet", range).to_string(), "'My Sheet'!A1:B2");
        assert_eq!(RangeName::unqualified(range).to_string(), "A1:B2");
    }
}
