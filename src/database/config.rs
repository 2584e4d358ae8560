use crate::error::Result;
use crate::error::RustyRangeError;

/// Row layout of a managed table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Row holding the column names (1-based)
    pub header_row: usize,
    /// First data row (1-based)
    pub first_row: usize,
}

impl Default for TableConfig {
    /// Header on row 1, data from row 2.
    fn default() -> Self {
        Self {
            header_row: 1,
            first_row: 2,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the header row; data starts right below it.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self.first_row = header_row + 1;
        self
    }

    pub fn with_first_row(mut self, first_row: usize) -> Self {
        self.first_row = first_row;
        self
    }

    /// Checks that both rows exist and that data starts below the header.
    pub fn validate(&self) -> Result<()> {
        if self.header_row == 0 {
            return Err(RustyRangeError::InvalidConfig(
                "header row must be 1 or greater".to_owned(),
            ));
        }
        if self.first_row <= self.header_row {
            return Err(RustyRangeError::InvalidConfig(format!(
                "first data row {} must be below header row {}",
                self.first_row, self.header_row
            )));
        }
        Ok(())
    }

    /// Number of data rows in a table whose last row is `last_row`.
    pub(crate) fn data_rows(&self, last_row: usize) -> usize {
        (last_row + 1).saturating_sub(self.first_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.header_row, 1);
        assert_eq!(config.first_row, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validation() {
        assert!(TableConfig::new().with_header_row(3).validate().is_ok());
        assert!(TableConfig::new().with_header_row(0).validate().is_err());
        assert!(TableConfig::new().with_first_row(1).validate().is_err());
        assert!(TableConfig::new().with_header_row(2).with_first_row(4).validate().is_ok());
    }

    #[test]
    fn config_data_rows() {
        let config = TableConfig::default();
        assert_eq!(config.data_rows(0), 0);
        assert_eq!(config.data_rows(1), 0);
        assert_eq!(config.data_rows(4), 3);
    }
}
