//! Rendering of 1-based row/column numbers as A1-style references.

/// Converts a 1-based column number to column letters.
pub(crate) fn number_to_col(mut number: usize) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        let digit = (number - 1) % 26;
        letters.push((b'A' + digit as u8) as char);
        number = (number - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Renders a single cell reference such as `C7`.
pub(crate) fn cell_reference(row: usize, column: usize) -> String {
    format!("{}{}", number_to_col(column), row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(number_to_col(1), "A");
        assert_eq!(number_to_col(26), "Z");
        assert_eq!(number_to_col(27), "AA");
        assert_eq!(number_to_col(703), "AAA");
    }

    #[test]
    fn cell_references() {
        assert_eq!(cell_reference(7, 3), "C7");
    }
}
