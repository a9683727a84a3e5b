//! Cell coordinate helpers (1-based, "E5"-style labels)

/// Convert a 1-based column index to Excel column letters (1→A, 26→Z, 27→AA)
///
/// Index 0 has no letter form and yields an empty string.
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut n = index;

    while n > 0 {
        let remainder = (n - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        n = (n - 1) / 26;
    }

    result
}

/// Convert Excel column letters (case-insensitive) to a 1-based index
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut result: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let val = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        result = result.checked_mul(26)?.checked_add(val)?;
    }

    Some(result)
}

/// Coordinate label for a 1-based (row, column) position, e.g. (5, 5) → "E5"
pub fn coordinate(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row)
}
