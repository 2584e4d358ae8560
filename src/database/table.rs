use crate::database::column::HeaderIndex;
use crate::database::config::TableConfig;
use crate::database::query::CompiledQuery;
use crate::database::range::RangeAddress;
use crate::database::range::RangeSet;
use crate::database::row::deserialize_row;
use crate::database::row::serialize_row;
use crate::database::row::Record;
use crate::error::Result;
use crate::error::ResultMessage;
use crate::error::RustyRangeError;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::criteria::WhereSpec;
use crate::spreadsheet::store::TableStore;
use crate::spreadsheet::store::Workbook;
use log::debug;

/// Whether a where-spec is currently held.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryState {
    /// No spec, no ranges
    Unqueried,
    /// A spec is held; its ranges may be empty
    Queried,
}

/// Query-then-mutate façade over one sheet.
///
/// Holds the ranges matched by the last [`TableManager::filter`] and the
/// where-spec that produced them. Mutations work on those ranges; `append` and `prepend`
/// do not depend on them. Each store call is its own unit: a failure partway
/// through a multi-row operation leaves earlier rows written.
pub struct TableManager<'a, S: TableStore + ?Sized> {
    store: &'a mut S,
    config: TableConfig,
    ranges: RangeSet,
    where_spec: Option<WhereSpec>,
}

impl<'a, S: TableStore + ?Sized> TableManager<'a, S> {
    /// Manages an already resolved sheet.
    pub fn new(store: &'a mut S, config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            ranges: RangeSet::new(),
            where_spec: None,
        })
    }

    /// Manages the sheet named `name`, failing when the workbook has no such sheet.
    pub fn open<W>(workbook: &'a mut W, name: &str, config: TableConfig) -> Result<Self>
    where
        W: Workbook<Sheet = S>,
    {
        let store = workbook.sheet_mut(name).ok_or_else(|| RustyRangeError::SheetNotFound {
            name: name.to_owned(),
        })?;
        debug!("Opened sheet '{}'", name);
        Self::new(store, config)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Ranges matched by the last query, in ascending row order.
    pub fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    pub fn where_spec(&self) -> Option<&WhereSpec> {
        self.where_spec.as_ref()
    }

    pub fn state(&self) -> QueryState {
        match self.where_spec {
            Some(_) => QueryState::Queried,
            None => QueryState::Unqueried,
        }
    }

    /// Current header row, read fresh from the sheet.
    pub fn headers(&self) -> Result<HeaderIndex> {
        HeaderIndex::read(&*self.store, &self.config)
    }

    /// Runs `spec` against the sheet and keeps both the where-spec and its matches.
    /// On failure the previous spec and ranges are kept.
    pub fn filter(&mut self, spec: WhereSpec) -> Result<&mut Self> {
        let headers = self.headers()?;
        let ranges = CompiledQuery::compile(&headers, &spec)?.execute(&*self.store, &self.config)?;
        self.ranges = ranges;
        self.where_spec = Some(spec);
        Ok(self)
    }

    /// Re-runs the stored spec against the sheet as it is now.
    /// Does nothing while no spec is held.
    pub fn refresh(&mut self) -> Result<&mut Self> {
        if let Some(spec) = self.where_spec.clone() {
            self.filter(spec)?;
        }
        Ok(self)
    }

    /// Drops the stored spec and its ranges.
    pub fn clear(&mut self) -> &mut Self {
        self.ranges.clear();
        self.where_spec = None;
        self
    }

    /// Reads every matched row as a record restricted to `col_names`
    /// (all columns when empty), in range order.
    pub fn fetch<C: AsRef<str>>(&self, col_names: &[C]) -> Result<Vec<Record>> {
        let headers = self.headers()?;
        let empty = Record::new();
        self.ranges
            .iter()
            .map(|address| {
                let values = self.store.read_row(address)?;
                deserialize_row(&headers, &empty, &values, col_names)
            })
            .collect()
    }

    /// Reads every matched row with all columns.
    pub fn fetch_all(&self) -> Result<Vec<Record>> {
        self.fetch::<&str>(&[])
    }

    /// Merges `record` into every matched row, one read-modify-write per row.
    pub fn update(&mut self, record: &Record) -> Result<&mut Self> {
        if self.ranges.is_empty() {
            return Ok(self);
        }
        let headers = self.headers()?;
        let no_columns: &[&str] = &[];
        for address in self.ranges.iter() {
            let values = self.store.read_row(address)?;
            let merged = deserialize_row(&headers, record, &values, no_columns)?;
            let serialized = serialize_row(&headers, &merged, &[]);
            self.store
                .write_row(address, &serialized)
                .map_err(RustyRangeError::from)
                .with_prefix(&format!("Failed to update {}", address))?;
        }
        debug!("Updated {} row(s)", self.ranges.len());
        Ok(self)
    }

    /// Writes `record` to the row after the table's last row.
    pub fn append(&mut self, record: &Record) -> Result<&mut Self> {
        let headers = self.headers()?;
        let row = self.store.last_row()?.max(self.config.header_row) + 1;
        let values = serialize_row(&headers, record, &[]);
        let address = RangeAddress::row(row, values.len());
        self.store
            .write_row(&address, &values)
            .map_err(RustyRangeError::from)
            .with_prefix(&format!("Failed to append {}", address))?;
        debug!("Appended row {}", row);
        Ok(self)
    }

    /// Writes `record` as the first data row, shifting the data block down by one.
    ///
    /// Without native row insertion this reads the whole data block, clears it
    /// and writes it back one row lower, so its cost grows with the table.
    pub fn prepend(&mut self, record: &Record) -> Result<&mut Self> {
        let headers = self.headers()?;
        let first_row = self.config.first_row;
        let width = self.store.last_column()?;
        let data_rows = self.config.data_rows(self.store.last_row()?);
        let mut block = self.store.read_block(first_row, data_rows, width)?;
        let mut values = serialize_row(&headers, record, &[]);
        values.resize(width, CellValue::Empty);
        block.insert(0, values);
        if data_rows > 0 {
            self.store.clear_block(&RangeAddress::new(first_row, 1, data_rows, width))?;
        }
        let address = RangeAddress::new(first_row, 1, data_rows + 1, width);
        self.store
            .write_block(&address, &block)
            .map_err(RustyRangeError::from)
            .with_prefix(&format!("Failed to prepend {}", address))?;
        debug!("Prepended a row above {} existing row(s)", data_rows);
        Ok(self)
    }

    /// Deletes every matched row.
    ///
    /// Each deletion moves the rows below it up by one, so the k-th deletion
    /// targets `row - k`. The stored ranges are stale afterwards until the
    /// next [`TableManager::refresh`].
    pub fn delete_rows(&mut self) -> Result<&mut Self> {
        let targets = self.ranges.deletion_targets()?;
        for row in &targets {
            self.store
                .delete_row(*row)
                .map_err(RustyRangeError::from)
                .with_prefix(&format!("Failed to delete row {}", row))?;
        }
        debug!("Deleted {} row(s)", targets.len());
        Ok(self)
    }

    /// Updates the matched rows, or appends `record` when nothing matched.
    pub fn update_or_append(&mut self, record: &Record) -> Result<&mut Self> {
        if self.ranges.is_empty() {
            self.append(record)
        } else {
            self.update(record)
        }
    }

    /// Updates the matched rows, or prepends `record` when nothing matched.
    pub fn update_or_prepend(&mut self, record: &Record) -> Result<&mut Self> {
        if self.ranges.is_empty() {
            self.prepend(record)
        } else {
            self.update(record)
        }
    }
}

/// Returns `key` of the first row whose `column` loosely equals `value`.
pub fn lookup<S: TableStore + ?Sized>(
    store: &mut S,
    value: impl Into<CellValue>,
    column: &str,
    key: &str,
) -> Result<Option<CellValue>> {
    let mut manager = TableManager::new(store, TableConfig::default())?;
    let records = manager.filter(WhereSpec::new().equals(column, value))?.fetch(&[key])?;
    Ok(records.into_iter().next().and_then(|record| record.get(key).cloned()))
}
