// src/leads/counter.rs

use crate::error::LeadError;

use super::Row;

/// One staged write against the store: a single cell and its new count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub column: char,
    /// 1-based sheet row number.
    pub row: usize,
    pub value: u64,
}

impl CellUpdate {
    /// A1 reference on `sheet`, e.g. `'Hoja 1'!E17`.
    pub fn range(&self, sheet: &str) -> String {
        format!("'{}'!{}{}", sheet.replace('\'', "''"), self.column, self.row)
    }
}

/// Spreadsheet letter for a 0-based column index. Only `A`..=`Z`.
pub fn column_letter(index: usize) -> Option<char> {
    if index < 26 {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Leading decimal digits of the cell, after whitespace; anything else reads as 0.
/// A digit run too long for `u64` saturates at `u64::MAX`.
pub fn parse_count(raw: &str) -> u64 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Bump the download counter of every row by one, in place, and return the
/// matching cell updates in row order.
///
/// The target row number is the row's position within `rows` plus 2
/// (1-based sheet, header on row 1). Short rows are padded with blank cells
/// so the counter column exists for the CSV output.
pub fn increment_download_counts(
    rows: &mut [Row],
    column: usize,
) -> Result<Vec<CellUpdate>, LeadError> {
    let letter = column_letter(column).ok_or(LeadError::ColumnOutOfRange(column))?;

    let updates = rows
        .iter_mut()
        .enumerate()
        .map(|(i, row)| {
            if row.len() <= column {
                row.resize(column + 1, String::new());
            }
            let value = parse_count(&row[column]).saturating_add(1);
            row[column] = value.to_string();
            CellUpdate {
                column: letter,
                row: i + 2,
                value,
            }
        })
        .collect();

    Ok(updates)
}
