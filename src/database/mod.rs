//! # Table Module
//!
//! Treats a header-labelled sheet as a table: header lookup, row/record
//! conversion, where-spec execution and the [`table::TableManager`] façade.
pub mod column;
pub mod config;
pub mod query;
pub mod range;
pub mod row;
pub mod table;
