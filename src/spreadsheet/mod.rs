//! # Spreadsheet Module
//!
//! Cell values, the range read/write contract a spreadsheet host has to
//! provide, in-memory sheets implementing it, and the per-column filter
//! criteria evaluated against cell values.
pub mod cell;
pub mod criteria;
pub(crate) mod reference;
pub mod store;
