use crate::database::range::RangeAddress;
use crate::spreadsheet::cell::CellValue;
use anyhow::bail;
use anyhow::Result;

/// Range read/write primitives of a spreadsheet host.
///
/// Every address is 1-based. Failures are the host's own and are passed
/// through untouched.
pub trait TableStore {
    /// Reads one contiguous row region.
    fn read_row(&self, address: &RangeAddress) -> Result<Vec<CellValue>>;

    /// Overwrites one contiguous row region; `values` must span the region's width.
    fn write_row(&mut self, address: &RangeAddress, values: &[CellValue]) -> Result<()>;

    /// Reads a block of `num_rows` × `num_columns` cells starting at column 1.
    fn read_block(
        &self,
        row: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Result<Vec<Vec<CellValue>>>;

    /// Overwrites the block addressed by `address` with `values`, row by row.
    fn write_block(&mut self, address: &RangeAddress, values: &[Vec<CellValue>]) -> Result<()>;

    /// Blanks every cell of a region.
    fn clear_block(&mut self, address: &RangeAddress) -> Result<()>;

    /// Removes a row, shifting every row below it up by one.
    fn delete_row(&mut self, row: usize) -> Result<()>;

    /// Last row holding any content, 0 for an empty sheet.
    fn last_row(&self) -> Result<usize>;

    /// Last column holding any content, 0 for an empty sheet.
    fn last_column(&self) -> Result<usize>;

    /// Reads a single cell.
    fn read_cell(&self, row: usize, column: usize) -> Result<CellValue> {
        let values = self.read_row(&RangeAddress::new(row, column, 1, 1))?;
        Ok(values.into_iter().next().unwrap_or_default())
    }
}

/// A collection of named sheets.
pub trait Workbook {
    type Sheet: TableStore;

    /// Looks up a sheet by its exact name.
    fn sheet_mut(&mut self, name: &str) -> Option<&mut Self::Sheet>;
}

/// Dense in-memory sheet; grows on write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySheet {
    /// Sheet name
    pub(crate) name: String,
    /// Cells, row-major, 0-based internally
    cells: Vec<Vec<CellValue>>,
}

impl MemorySheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
        }
    }

    /// Creates a sheet whose first row is `rows[0]`.
    pub fn from_rows<R, V>(name: &str, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            name: name.to_owned(),
            cells: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cell at (row, column) or a blank when outside the stored area.
    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        row.checked_sub(1)
            .zip(column.checked_sub(1))
            .and_then(|(row, column)| self.cells.get(row)?.get(column))
            .cloned()
            .unwrap_or_default()
    }

    /// All rows up to the last non-empty one, each padded to the last non-empty column.
    pub fn rows(&self) -> Vec<Vec<CellValue>> {
        let width = self.content_width();
        (1..=self.content_height())
            .map(|row| (1..=width).map(|column| self.cell(row, column)).collect())
            .collect()
    }

    fn set_cell(&mut self, row: usize, column: usize, value: CellValue) {
        if self.cells.len() < row {
            self.cells.resize_with(row, Vec::new);
        }
        let cells = &mut self.cells[row - 1];
        if cells.len() < column {
            cells.resize_with(column, CellValue::default);
        }
        cells[column - 1] = value;
    }

    fn content_height(&self) -> usize {
        self.cells
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    fn content_width(&self) -> usize {
        self.cells
            .iter()
            .filter_map(|row| row.iter().rposition(|cell| !cell.is_empty()))
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
    }

    fn check_origin(address: &RangeAddress) -> Result<()> {
        if address.row == 0 || address.column == 0 {
            bail!("Range {:?} is outside the sheet", address);
        }
        Ok(())
    }
}

impl TableStore for MemorySheet {
    fn read_row(&self, address: &RangeAddress) -> Result<Vec<CellValue>> {
        Self::check_origin(address)?;
        Ok((address.column..address.column + address.num_columns)
            .map(|column| self.cell(address.row, column))
            .collect())
    }

    fn write_row(&mut self, address: &RangeAddress, values: &[CellValue]) -> Result<()> {
        let block = RangeAddress::new(address.row, address.column, 1, address.num_columns);
        self.write_block(&block, &[values.to_vec()])
    }

    fn read_block(
        &self,
        row: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Result<Vec<Vec<CellValue>>> {
        (row..row + num_rows)
            .map(|row| self.read_row(&RangeAddress::row(row, num_columns)))
            .collect()
    }

    fn write_block(&mut self, address: &RangeAddress, values: &[Vec<CellValue>]) -> Result<()> {
        Self::check_origin(address)?;
        if values.len() != address.num_rows {
            bail!(
                "Data has {} rows but the range {} has {}",
                values.len(),
                address,
                address.num_rows
            );
        }
        if let Some(row) = values.iter().find(|row| row.len() != address.num_columns) {
            bail!(
                "Data has {} columns but the range {} has {}",
                row.len(),
                address,
                address.num_columns
            );
        }
        for (row_offset, row) in values.iter().enumerate() {
            for (column_offset, value) in row.iter().enumerate() {
                self.set_cell(
                    address.row + row_offset,
                    address.column + column_offset,
                    value.clone(),
                );
            }
        }
        Ok(())
    }

    fn clear_block(&mut self, address: &RangeAddress) -> Result<()> {
        Self::check_origin(address)?;
        for row in address.row..address.row + address.num_rows {
            for column in address.column..address.column + address.num_columns {
                let cell = self.cells.get_mut(row - 1).and_then(|cells| cells.get_mut(column - 1));
                if let Some(cell) = cell {
                    *cell = CellValue::Empty;
                }
            }
        }
        Ok(())
    }

    fn delete_row(&mut self, row: usize) -> Result<()> {
        if row == 0 {
            bail!("Row 0 is outside the sheet");
        }
        if row <= self.cells.len() {
            self.cells.remove(row - 1);
        }
        Ok(())
    }

    fn last_row(&self) -> Result<usize> {
        Ok(self.content_height())
    }

    fn last_column(&self) -> Result<usize> {
        Ok(self.content_width())
    }
}

/// Named in-memory sheets, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any sheet with the same name.
    pub fn with_sheet(mut self, sheet: MemorySheet) -> Self {
        self.add_sheet(sheet);
        self
    }

    pub fn add_sheet(&mut self, sheet: MemorySheet) {
        match self.sheets.iter_mut().find(|existing| existing.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str())
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_mut(&mut self, name: &str) -> Option<&mut MemorySheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name == name)
    }
}
