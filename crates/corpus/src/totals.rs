use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Corpus-wide volume for one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    pub count: u64,
    pub pages: u64,
    pub books: u64,
}

/// Per-year corpus totals read from a `year, count, pages, books` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotals {
    by_year: BTreeMap<i32, YearTotal>,
}

impl YearTotals {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let totals = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded totals for {} years from {}",
            totals.len(),
            path.display()
        );
        Ok(totals)
    }

    /// Parses totals rows. Rows that are not UTF-8 or lack exactly four
    /// numeric fields are skipped.
    pub fn from_reader(mut reader: impl BufRead) -> Result<Self> {
        let mut by_year = BTreeMap::new();
        let mut skipped = 0usize;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            match std::str::from_utf8(&buf).ok().and_then(parse_row) {
                Some((year, total)) => {
                    by_year.insert(year, total);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::debug!("Skipped {skipped} malformed totals rows");
        }
        Ok(Self { by_year })
    }

    #[must_use]
    pub fn get(&self, year: i32) -> Option<YearTotal> {
        self.by_year.get(&year).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_year.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }

    /// First and last year present.
    #[must_use]
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.by_year.keys().next()?;
        let last = self.by_year.keys().next_back()?;
        Some((*first, *last))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, YearTotal)> + '_ {
        self.by_year.iter().map(|(year, total)| (*year, *total))
    }
}

fn parse_row(line: &str) -> Option<(i32, YearTotal)> {
    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    let [year, count, pages, books] = fields.as_slice() else {
        return None;
    };
    let total = YearTotal {
        count: count.trim().parse().ok()?,
        pages: pages.trim().parse().ok()?,
        books: books.trim().parse().ok()?,
    };
    Some((year.trim().parse().ok()?, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn skips_rows_with_wrong_shape() {
        let input = "1999\t100\t10\t2\n\
                     2000\t200\t20\n\
                     2001\tlots\t1\t1\n\
                     2002\t300\t30\t3\r\n";
        let totals = YearTotals::from_reader(Cursor::new(input)).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(
            totals.get(1999),
            Some(YearTotal {
                count: 100,
                pages: 10,
                books: 2
            })
        );
        assert_eq!(totals.get(2000), None);
        assert_eq!(totals.year_range(), Some((1999, 2002)));
    }

    #[test]
    fn skips_rows_that_are_not_utf8() {
        let mut input = b"1999\t100\t10\t2\n".to_vec();
        input.extend_from_slice(b"\xff\xfe\t1\t1\t1\n");
        input.extend_from_slice(b"2000\t200\t20\t4");
        let totals = YearTotals::from_reader(Cursor::new(input)).unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get(2000).map(|t| t.books), Some(4));
    }

    #[test]
    fn later_row_for_year_wins() {
        let input = "2000\t1\t1\t1\n2000\t5\t4\t3\n";
        let totals = YearTotals::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(totals.get(2000).map(|t| t.count), Some(5));
    }
}
