use crate::database::config::TableConfig;
use crate::database::range::RangeAddress;
use crate::error::Result;
use crate::error::RustyRangeError;
use crate::spreadsheet::store::TableStore;

/// Column names of a table keyed by 1-based position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderIndex {
    /// Names in column order; position = index + 1
    names: Vec<String>,
}

impl HeaderIndex {
    /// Reads the header row across the table's current last column.
    /// Never cached: every call reflects the sheet as it is now.
    pub fn read<S: TableStore + ?Sized>(store: &S, config: &TableConfig) -> Result<Self> {
        let width = store.last_column()?;
        let cells = store.read_row(&RangeAddress::row(config.header_row, width))?;
        Ok(Self::from_names(cells.iter().map(ToString::to_string)))
    }

    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the column at a 1-based position.
    pub fn name(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.names.get(index))
            .map(String::as_str)
    }

    /// 1-based position of the first column with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|header| header == name).map(|index| index + 1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|header| header == name)
    }

    /// Number of columns sharing this name.
    pub fn occurrences(&self, name: &str) -> usize {
        self.names.iter().filter(|header| *header == name).count()
    }

    /// (position, name) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(index, name)| (index + 1, name.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Fails once, naming every requested column that is not a header.
    pub fn validate<'a, I>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let invalid: Vec<String> = names
            .into_iter()
            .filter(|name| !self.contains(name))
            .map(str::to_owned)
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(RustyRangeError::InvalidColumns(invalid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellValue;
    use crate::spreadsheet::store::MemorySheet;

    #[test]
    fn headers_are_one_based() {
        let sheet = MemorySheet::from_rows("People", vec![
            vec!["id", "name", "age"],
            vec!["1", "ann", "10"],
        ]);
        let headers = HeaderIndex::read(&sheet, &TableConfig::default()).unwrap();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![(1, "id"), (2, "name"), (3, "age")]);
        assert_eq!(headers.name(1), Some("id"));
        assert_eq!(headers.name(0), None);
        assert_eq!(headers.name(4), None);
        assert_eq!(headers.position("age"), Some(3));
    }

    #[test]
    fn headers_follow_configured_row() {
        let sheet = MemorySheet::from_rows("Report", vec![
            vec!["Quarterly", ""],
            vec!["region", "total"],
        ]);
        let headers = HeaderIndex::read(&sheet, &TableConfig::new().with_header_row(2)).unwrap();
        assert_eq!(headers.names().collect::<Vec<_>>(), vec!["region", "total"]);
    }

    #[test]
    fn headers_reflect_current_width() {
        let mut sheet = MemorySheet::from_rows("People", vec![vec!["id", "name"]]);
        let config = TableConfig::default();
        assert_eq!(HeaderIndex::read(&sheet, &config).unwrap().len(), 2);
        sheet.write_row(&RangeAddress::new(1, 3, 1, 1), &[CellValue::from("age")]).unwrap();
        assert_eq!(HeaderIndex::read(&sheet, &config).unwrap().len(), 3);
        assert!(HeaderIndex::read(&MemorySheet::new("Empty"), &config).unwrap().is_empty());
    }

    #[test]
    fn duplicate_headers_resolve_to_first() {
        let headers = HeaderIndex::from_names(["id", "tag", "tag"]);
        assert_eq!(headers.position("tag"), Some(2));
        assert_eq!(headers.occurrences("tag"), 2);
    }

    #[test]
    fn validate_reports_every_invalid_name() {
        let headers = HeaderIndex::from_names(["id", "name"]);
        assert!(headers.validate(["id", "name"]).is_ok());
        let error = headers.validate(["bogus1", "id", "bogus2"]).unwrap_err();
        assert!(matches!(
            &error,
            RustyRangeError::InvalidColumns(names) if names == &["bogus1", "bogus2"]
        ));
    }
}
