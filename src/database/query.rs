use crate::database::column::HeaderIndex;
use crate::database::config::TableConfig;
use crate::database::range::RangeAddress;
use crate::database::range::RangeSet;
use crate::error::Result;
use crate::spreadsheet::criteria::Condition;
use crate::spreadsheet::criteria::WhereSpec;
use crate::spreadsheet::store::TableStore;
use log::debug;
use log::trace;
use log::warn;

/// Conditions resolved against one header column.
#[derive(Clone, Debug)]
pub struct CompiledColumn {
    /// Column name
    pub name: String,
    /// 1-based column position
    pub position: usize,
    /// Every condition must hold for a row to survive
    pub conditions: Vec<Condition>,
}

/// A where-spec resolved against the current headers, ready to scan.
#[derive(Clone, Debug, Default)]
pub struct CompiledQuery {
    columns: Vec<CompiledColumn>,
}

impl CompiledQuery {
    /// Resolves column names and operators.
    ///
    /// Every unknown column is reported in one error. A name shared by several
    /// headers resolves to its first occurrence.
    pub fn compile(headers: &HeaderIndex, spec: &WhereSpec) -> Result<Self> {
        headers.validate(spec.columns())?;
        let mut columns = Vec::with_capacity(spec.len());
        for (name, filter) in spec.iter() {
            let Some(position) = headers.position(name) else {
                continue;
            };
            if headers.occurrences(name) > 1 {
                warn!(
                    "Column '{}' appears {} times in the header, filtering on column {}",
                    name,
                    headers.occurrences(name),
                    position
                );
            }
            columns.push(CompiledColumn {
                name: name.to_owned(),
                position,
                conditions: filter.compile()?,
            });
        }
        debug!("Compiled where-spec over {} column(s)", columns.len());
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[CompiledColumn] {
        &self.columns
    }

    /// Scans data rows column by column.
    ///
    /// Candidates start as every data row; each column keeps only the rows
    /// satisfying all of its conditions, so later columns read fewer cells.
    /// Results are in ascending row order and span the table's full width.
    pub fn execute<S: TableStore + ?Sized>(
        &self,
        store: &S,
        config: &TableConfig,
    ) -> Result<RangeSet> {
        let last_row = store.last_row()?;
        let width = store.last_column()?;
        let mut candidates: Vec<usize> = (config.first_row..=last_row).collect();
        for column in &self.columns {
            if candidates.is_empty() {
                break;
            }
            let mut survivors = Vec::with_capacity(candidates.len());
            for row in candidates {
                let value = store.read_cell(row, column.position)?;
                if column.conditions.iter().all(|condition| condition.evaluate(&value)) {
                    survivors.push(row);
                }
            }
            trace!("Column '{}' kept {} row(s)", column.name, survivors.len());
            candidates = survivors;
        }
        debug!(
            "Query matched {} row(s) between rows {} and {}",
            candidates.len(),
            config.first_row,
            last_row
        );
        Ok(candidates.into_iter().map(|row| RangeAddress::row(row, width)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RustyRangeError;
    use crate::spreadsheet::cell::CellValue;
    use crate::spreadsheet::criteria::Operand;
    use crate::spreadsheet::store::MemorySheet;
    use regex::Regex;
    use std::cell::Cell;

    fn sheet() -> MemorySheet {
        MemorySheet::from_rows("People", vec![
            vec![CellValue::from("id"), "name".into(), "age".into()],
            vec![1.into(), "ann".into(), 10.into()],
            vec![2.into(), "bob".into(), 20.into()],
            vec![3.into(), "cy".into(), 30.into()],
        ])
    }

    fn run(sheet: &MemorySheet, spec: &WhereSpec) -> Result<Vec<usize>> {
        let config = TableConfig::default();
        let headers = HeaderIndex::read(sheet, &config)?;
        let ranges = CompiledQuery::compile(&headers, spec)?.execute(sheet, &config)?;
        Ok(ranges.rows().collect())
    }

    #[test]
    fn query_gte() {
        let spec = WhereSpec::new().condition("age", "gte", Operand::value(20));
        assert_eq!(run(&sheet(), &spec).unwrap(), vec![3, 4]);
    }

    #[test]
    fn query_empty_spec_matches_every_row() {
        assert_eq!(run(&sheet(), &WhereSpec::new()).unwrap(), vec![2, 3, 4]);
        let header_only = MemorySheet::from_rows("Empty", vec![vec!["id"]]);
        assert!(run(&header_only, &WhereSpec::new()).unwrap().is_empty());
    }

    #[test]
    fn query_scalar_is_loose_equal() {
        assert_eq!(run(&sheet(), &WhereSpec::new().equals("age", "20")).unwrap(), vec![3]);
        let spec = WhereSpec::new().equals("name", "dee");
        assert_eq!(run(&sheet(), &spec).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn query_combines_columns() {
        let spec = WhereSpec::new()
            .condition("age", "between", Operand::list([10, 25]))
            .condition("name", "match", Regex::new("^b").unwrap());
        assert_eq!(run(&sheet(), &spec).unwrap(), vec![3]);
    }

    #[test]
    fn query_between_numeric_text() {
        let sheet = MemorySheet::from_rows("Readings", vec![
            vec![CellValue::from("id"), "value".into()],
            vec![1.into(), "5".into()],
            vec![2.into(), "15".into()],
            vec![3.into(), "100".into()],
            vec![4.into(), 9.5.into()],
        ]);
        let spec = WhereSpec::new().condition("value", "between", Operand::list(["10", "20"]));
        assert_eq!(run(&sheet, &spec).unwrap(), vec![3]);
        let spec = WhereSpec::new().condition("value", "between", Operand::list(["9", "10"]));
        assert_eq!(run(&sheet, &spec).unwrap(), vec![5]);
    }

    #[test]
    fn query_blank_cells_equal_zero() {
        let sheet = MemorySheet::from_rows("Scores", vec![
            vec![CellValue::from("id"), "score".into()],
            vec![1.into(), CellValue::Empty],
            vec![2.into(), "".into()],
            vec![3.into(), 0.into()],
            vec![4.into(), 5.into()],
        ]);
        assert_eq!(run(&sheet, &WhereSpec::new().equals("score", 0)).unwrap(), vec![2, 3, 4]);
        let spec = WhereSpec::new()
            .condition("score", "gte", Operand::value(0))
            .condition("score", "lte", Operand::value(0));
        assert_eq!(run(&sheet, &spec).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn query_spans_full_width() {
        let sheet = sheet();
        let config = TableConfig::default();
        let headers = HeaderIndex::read(&sheet, &config).unwrap();
        let ranges = CompiledQuery::compile(&headers, &WhereSpec::new().equals("id", 1))
            .unwrap()
            .execute(&sheet, &config)
            .unwrap();
        assert_eq!(ranges.iter().collect::<Vec<_>>(), vec![&RangeAddress::row(2, 3)]);
    }

    #[test]
    fn compile_reports_every_unknown_column() {
        let headers = HeaderIndex::from_names(["id", "name"]);
        let spec = WhereSpec::new().equals("bogus1", 1).equals("id", 1).equals("bogus2", 2);
        let error = CompiledQuery::compile(&headers, &spec).unwrap_err();
        assert_eq!(error.to_string(), "Invalid col name(s) found: bogus1,bogus2");
    }

    #[test]
    fn compile_reports_unknown_operator() {
        let headers = HeaderIndex::from_names(["id"]);
        let spec = WhereSpec::new().condition("id", "like", Operand::value(1));
        assert!(matches!(
            CompiledQuery::compile(&headers, &spec),
            Err(RustyRangeError::UnknownOperator(_))
        ));
    }

    #[test]
    fn compile_resolves_first_duplicate() {
        let headers = HeaderIndex::from_names(["id", "tag", "tag"]);
        let query = CompiledQuery::compile(&headers, &WhereSpec::new().equals("tag", "x")).unwrap();
        assert_eq!(query.columns()[0].position, 2);
    }

    /// Counts single-cell reads to observe column-major pruning.
    struct CountingSheet {
        sheet: MemorySheet,
        reads: Cell<usize>,
    }

    impl TableStore for CountingSheet {
        fn read_row(&self, address: &RangeAddress) -> anyhow::Result<Vec<CellValue>> {
            self.reads.set(self.reads.get() + 1);
            self.sheet.read_row(address)
        }

        fn write_row(
            &mut self,
            address: &RangeAddress,
            values: &[CellValue],
        ) -> anyhow::Result<()> {
            self.sheet.write_row(address, values)
        }

        fn read_block(
            &self,
            row: usize,
            num_rows: usize,
            num_columns: usize,
        ) -> anyhow::Result<Vec<Vec<CellValue>>> {
            self.sheet.read_block(row, num_rows, num_columns)
        }

        fn write_block(
            &mut self,
            address: &RangeAddress,
            values: &[Vec<CellValue>],
        ) -> anyhow::Result<()> {
            self.sheet.write_block(address, values)
        }

        fn clear_block(&mut self, address: &RangeAddress) -> anyhow::Result<()> {
            self.sheet.clear_block(address)
        }

        fn delete_row(&mut self, row: usize) -> anyhow::Result<()> {
            self.sheet.delete_row(row)
        }

        fn last_row(&self) -> anyhow::Result<usize> {
            self.sheet.last_row()
        }

        fn last_column(&self) -> anyhow::Result<usize> {
            self.sheet.last_column()
        }
    }

    #[test]
    fn execute_prunes_before_later_columns() {
        let store = CountingSheet {
            sheet: sheet(),
            reads: Cell::new(0),
        };
        let headers = HeaderIndex::from_names(["id", "name", "age"]);
        let spec = WhereSpec::new()
            .condition("age", "gt", Operand::value(15))
            .equals("name", "cy");
        let ranges = CompiledQuery::compile(&headers, &spec)
            .unwrap()
            .execute(&store, &TableConfig::default())
            .unwrap();
        assert_eq!(ranges.rows().collect::<Vec<_>>(), vec![4]);
        // 3 reads for age, 2 for the surviving names
        assert_eq!(store.reads.get(), 5);
    }
}
