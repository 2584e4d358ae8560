//! Conversion between positional rows and header-keyed records.
//!
//! Writing is merge-on-write: a partial record only replaces the cells it
//! names, every other cell keeps its current value.

use crate::database::column::HeaderIndex;
use crate::error::Result;
use crate::spreadsheet::cell::CellValue;
use std::vec::IntoIter;

/// Column name → value pairs, kept in insertion order with unique names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::insert`].
    pub fn with(mut self, name: &str, value: impl Into<CellValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field; an existing field keeps its position.
    pub fn insert(&mut self, name: &str, value: impl Into<CellValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_owned(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field value unless it is blank.
    fn present(&self, name: &str) -> Option<&CellValue> {
        self.get(name).filter(|value| !value.is_blank())
    }
}

impl<K: AsRef<str>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name.as_ref(), value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, CellValue);
    type IntoIter = IntoIter<(String, CellValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Lays a record out in header order.
///
/// Each cell is the record's value when present and not blank, else the
/// current cell at that position, else a blank.
pub fn serialize_row(
    headers: &HeaderIndex,
    record: &Record,
    current_values: &[CellValue],
) -> Vec<CellValue> {
    headers
        .iter()
        .map(|(position, name)| {
            record
                .present(name)
                .or_else(|| current_values.get(position - 1))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}

/// Builds a record from a positional row, overlaid with `record`'s non-blank fields.
///
/// Only columns named in `col_names` are kept (all columns when it is empty),
/// in header order. Fails once, naming every entry of `col_names` that is not
/// a header.
pub fn deserialize_row<C: AsRef<str>>(
    headers: &HeaderIndex,
    record: &Record,
    current_values: &[CellValue],
    col_names: &[C],
) -> Result<Record> {
    headers.validate(col_names.iter().map(AsRef::as_ref))?;
    let selected =
        |name: &str| col_names.is_empty() || col_names.iter().any(|col| col.as_ref() == name);

    let mut output = Record::new();
    for (position, name) in headers.iter().filter(|(_, name)| selected(*name)) {
        let value = record
            .present(name)
            .or_else(|| current_values.get(position - 1))
            .cloned()
            .unwrap_or_default();
        output.insert(name, value);
    }
    Ok(output)
}
