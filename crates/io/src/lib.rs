// File I/O operations

pub mod csv;
pub mod document;

pub use document::{ColumnSpec, DocumentError, GridDocument};
