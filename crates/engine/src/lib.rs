pub mod clipboard;
pub mod codec;
pub mod column;
pub mod edit;
pub mod editing;
pub mod events;
pub mod grid;
pub mod input;
pub mod navigation;
pub mod record;
pub mod rows;
pub mod value;

pub use gridkit_core::{CellKey, ColumnId, ColumnOrder, CoreError, Range, SelectMode, SelectionState};

pub use clipboard::{ClipboardError, ClipboardProvider, MemoryClipboard, PendingPaste};
pub use codec::{DisplayLocale, EditValue, ValueCodec};
pub use column::{ColumnDescriptor, SelectOption, ValueKind};
pub use edit::{EditSession, EditState};
pub use events::{CellsChangedEvent, EventCollector, GridEvent, SubscriptionId};
pub use grid::{CellView, Grid, RowFactory, RowView};
pub use input::{GridCommand, Key, KeyEvent, KeyOutcome, Modifiers};
pub use record::{Record, Row};
pub use value::Value;
