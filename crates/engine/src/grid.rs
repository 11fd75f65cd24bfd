//! Grid-instance controller.
//!
//! `Grid` owns the row data, column descriptors, selection, and edit state of
//! one grid. Nothing is shared between instances, so several grids can live
//! side by side. Behavior is split across modules the same way the state is:
//!
//! - `editing`: edit-mode entry and exit
//! - `navigation`: pointer and keyboard input
//! - `clipboard`: copy and paste
//! - `rows`: structural row mutations

use gridkit_core::{CellKey, ColumnOrder, SelectionState};

use crate::codec::{EditValue, ValueCodec};
use crate::column::ColumnDescriptor;
use crate::edit::EditState;
use crate::events::{DataChangeCallback, GridEvent, Subscribers, SubscriptionId};
use crate::record::Record;
use crate::value::Value;

/// Row factory used by the insert operations.
pub type RowFactory<R> = Box<dyn FnMut() -> R>;

/// Everything the presentation layer needs to render one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub key: CellKey,
    pub value: Value,
    pub display: String,
    pub editable: bool,
    pub multiline: bool,
    pub selected: bool,
    pub active: bool,
    pub editing: bool,
    /// Staged input while `editing`
    pub staged: Option<EditValue>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub id: String,
    pub selected: bool,
}

pub struct Grid<R: Record> {
    pub(crate) rows: Vec<R>,
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) order: ColumnOrder,
    pub(crate) factory: RowFactory<R>,
    pub(crate) codec: ValueCodec,
    pub(crate) selection: SelectionState,
    pub(crate) edit: EditState,
    /// Last cell processed by a drag gesture
    pub(crate) drag_cell: Option<CellKey>,
    subscribers: Subscribers,
    on_data_change: Option<DataChangeCallback<R>>,
}

impl<R: Record> Grid<R> {
    pub fn new(rows: Vec<R>, columns: Vec<ColumnDescriptor>, factory: impl FnMut() -> R + 'static) -> Self {
        let order = ColumnOrder::new(columns.iter().map(|c| c.id().clone()));
        if order.len() != columns.len() {
            log::warn!("Duplicate column ids; later duplicates are unreachable by key");
        }

        Self {
            rows,
            columns,
            order,
            factory: Box::new(factory),
            codec: ValueCodec::default(),
            selection: SelectionState::new(),
            edit: EditState::default(),
            drag_cell: None,
            subscribers: Subscribers::default(),
            on_data_change: None,
        }
    }

    pub fn with_codec(mut self, codec: ValueCodec) -> Self {
        self.codec = codec;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_order(&self) -> &ColumnOrder {
        &self.order
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor> {
        let index = self.order.index_of(id).ok()?;
        self.columns.get(index)
    }

    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn active_cell(&self) -> Option<&CellKey> {
        self.selection.cells.active()
    }

    pub fn anchor_cell(&self) -> Option<&CellKey> {
        self.selection.cells.anchor()
    }

    /// Key of the cell at a row and column position.
    pub fn key_at(&self, row: usize, col: usize) -> Option<CellKey> {
        if row >= self.rows.len() {
            return None;
        }
        self.order.id_at(col).map(|id| CellKey::new(row, id))
    }

    pub fn value_at(&self, key: &CellKey) -> Option<Value> {
        if !self.order.contains(key.column.as_str()) {
            return None;
        }
        self.rows.get(key.row).map(|row| row.value(&key.column))
    }

    pub fn display_at(&self, key: &CellKey) -> Option<String> {
        let column = self.column(key.column.as_str())?;
        let value = self.value_at(key)?;
        Some(self.codec.to_display(&value, column))
    }

    // =========================================================================
    // Rendering contract
    // =========================================================================

    pub fn cell_view(&self, row: usize, col: usize) -> Option<CellView> {
        let key = self.key_at(row, col)?;
        let column = self.columns.get(col)?;
        let value = self.rows.get(row)?.value(column.id());
        let editing = self.edit.is_editing_cell(&key);

        Some(CellView {
            display: self.codec.to_display(&value, column),
            value,
            editable: column.is_editable(),
            multiline: column.is_multiline(),
            selected: self.selection.cells.contains(&key),
            active: self.selection.cells.active() == Some(&key),
            editing,
            staged: if editing { self.edit.staged().cloned() } else { None },
            placeholder: column.placeholder_text().map(str::to_string),
            key,
        })
    }

    pub fn row_view(&self, row: usize) -> Option<RowView> {
        let record = self.rows.get(row)?;
        Some(RowView {
            index: row,
            id: record.id().to_string(),
            selected: self.selection.rows.contains(row),
        })
    }

    /// Whether the host should have global pointer-move/up listeners
    /// registered. True only while a drag gesture is armed.
    pub fn wants_pointer_tracking(&self) -> bool {
        self.selection.cells.is_selecting() && !self.edit.is_editing()
    }

    // =========================================================================
    // Row data
    // =========================================================================

    /// Replace the row data from outside (the host owns the canonical rows).
    ///
    /// Selection entries past the new row count are purged. An edit whose
    /// row no longer exists is discarded. If any retained index now holds a
    /// different record (reorder, mid-list delete), all interaction state is
    /// reset instead, since index-based keys would point at other records.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        let moved = self.rows.iter().zip(&rows).any(|(old, new)| old.id() != new.id());
        self.rows = rows;
        if moved {
            log::debug!("Row identities moved; resetting selection");
            self.reset_interaction_state();
            return;
        }

        let count = self.rows.len();
        if self.edit.editing_key().is_some_and(|key| key.row >= count) {
            self.discard_edit();
        }
        if self.drag_cell.as_ref().is_some_and(|key| key.row >= count) {
            self.drag_cell = None;
        }
        self.selection.purge_rows_beyond(count);
        self.emit(GridEvent::SelectionChanged);
    }

    /// Index of the row whose identity is `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// Write one cell. Returns whether the stored value changed.
    pub(crate) fn write_cell(&mut self, key: &CellKey, value: Value) -> bool {
        let Some(row) = self.rows.get_mut(key.row) else {
            return false;
        };
        if row.value(&key.column) == value {
            return false;
        }
        row.set_value(&key.column, value);
        true
    }

    pub(crate) fn is_valid_key(&self, key: &CellKey) -> bool {
        key.row < self.rows.len() && self.order.contains(key.column.as_str())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn subscribe(&mut self, callback: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Register the external data-change callback. It receives the full row
    /// sequence after every committed mutation.
    pub fn on_data_change(&mut self, callback: impl FnMut(&[R]) + 'static) {
        self.on_data_change = Some(Box::new(callback));
    }

    /// Drop every listener this grid registered and disarm any drag.
    pub fn teardown(&mut self) {
        log::debug!("Grid teardown: {} subscriber(s)", self.subscribers.len());
        self.subscribers.clear();
        self.on_data_change = None;
        self.selection.cells.end_gesture();
        self.drag_cell = None;
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        self.subscribers.emit(&event);
    }

    pub(crate) fn notify_data_changed(&mut self) {
        if let Some(callback) = self.on_data_change.as_mut() {
            callback(&self.rows);
        }
        self.emit(GridEvent::DataChanged);
    }
}
