pub mod cell_key;
pub mod error;
pub mod selection;

pub use cell_key::{CellKey, ColumnId, ColumnOrder, KEY_SEPARATOR};
pub use error::CoreError;
pub use selection::{CellSelection, Gesture, Range, RowSelection, SelectMode, SelectionState};
