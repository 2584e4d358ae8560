//! # Rusty Range
//!
//! A query and mutation layer over a header-labelled sheet. Rows are selected
//! with declarative per-column predicates, read back as header-keyed records
//! and changed in batches without tracking row or column coordinates.
//!
//! ## Features
//!
//! - **Where-specs**: per-column scalar equality or named operators
//!   (`equal`, `deepEqual`, `gt`, `gte`, `lt`, `lte`, `includes`, `excludes`,
//!   `between`, `match`, `matchAny`), all of which must hold
//! - **Column-major pruning**: each filtered column only reads rows that
//!   survived the previous ones
//! - **Merge-on-write**: updates only touch the fields a record names
//! - **Batched mutations**: update, append, prepend, delete and upserts over
//!   the matched rows
//! - **Pluggable storage**: any host implementing [`TableStore`]; an
//!   in-memory [`MemorySheet`] is included
//!
//! ```
//! use rusty_range::{MemorySheet, Operand, Record, TableConfig, TableManager, WhereSpec};
//!
//! let mut sheet = MemorySheet::from_rows("People", vec![
//!     vec!["id", "name", "age"],
//!     vec!["1", "ann", "10"],
//!     vec!["2", "bob", "20"],
//! ]);
//! let mut people = TableManager::new(&mut sheet, TableConfig::default())?;
//! let adults = people
//!     .filter(WhereSpec::new().condition("age", "gte", Operand::value(18)))?
//!     .fetch(&["name"])?;
//! assert_eq!(adults, vec![Record::new().with("name", "bob")]);
//! # Ok::<(), rusty_range::RustyRangeError>(())
//! ```
mod database;
mod error;
mod spreadsheet;

pub use crate::database::column::HeaderIndex;
pub use crate::database::config::TableConfig;
pub use crate::database::query::CompiledColumn;
pub use crate::database::query::CompiledQuery;
pub use crate::database::range::RangeAddress;
pub use crate::database::range::RangeError;
pub use crate::database::range::RangeSet;
pub use crate::database::row::deserialize_row;
pub use crate::database::row::serialize_row;
pub use crate::database::row::Record;
pub use crate::database::table::lookup;
pub use crate::database::table::QueryState;
pub use crate::database::table::TableManager;
pub use crate::error::Result;
pub use crate::error::RustyRangeError;
pub use crate::spreadsheet::cell::CellValue;
pub use crate::spreadsheet::criteria::Condition;
pub use crate::spreadsheet::criteria::Filter;
pub use crate::spreadsheet::criteria::Operand;
pub use crate::spreadsheet::criteria::Operator;
pub use crate::spreadsheet::criteria::WhereSpec;
pub use crate::spreadsheet::store::MemorySheet;
pub use crate::spreadsheet::store::MemoryWorkbook;
pub use crate::spreadsheet::store::TableStore;
pub use crate::spreadsheet::store::Workbook;
