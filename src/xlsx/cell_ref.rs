//! A1-style cell reference parsing.

/// Largest column count in a worksheet (column XFD).
pub const MAX_COLUMNS: usize = 16_384;

/// Largest row count in a worksheet.
pub const MAX_ROWS: usize = 1_048_576;

/// Parse a reference such as `B3` or `$AA$10` into zero-based `(row, column)`.
///
/// Returns `None` for malformed or out-of-range references.
pub fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim();
    let digits_at = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(digits_at);

    let col = column_index(letters.trim_matches('$'))?;
    let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
    (row < MAX_ROWS).then_some((row, col))
}

/// Convert column letters (`A`, `Z`, `AA`) to a zero-based index.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut index = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let index = index - 1;
    (index < MAX_COLUMNS).then_some(index)
}

/// Parse a row number attribute (`r="5"`) into a zero-based index.
pub fn parse_row_number(value: &str) -> Option<usize> {
    let row = value.trim().parse::<usize>().ok()?.checked_sub(1)?;
    (row < MAX_ROWS).then_some(row)
}
