//! Edit-mode operations
//!
//! Contains:
//! - Entering edit mode (double-click, Enter, type-to-edit)
//! - Staged input updates
//! - Commit and cancel

use gridkit_core::CellKey;

use crate::codec::EditValue;
use crate::column::ValueKind;
use crate::edit::EditSession;
use crate::events::{CellsChangedEvent, GridEvent};
use crate::grid::Grid;
use crate::record::Record;

impl<R: Record> Grid<R> {
    // =========================================================================
    // Enter edit mode
    // =========================================================================

    /// Start editing `key` with its current value as the staged input.
    ///
    /// Returns false when another cell is already being edited, the key is
    /// out of bounds, or the column is not editable.
    pub fn begin_edit(&mut self, key: CellKey) -> bool {
        let Some(staged) = self.editable_value(&key) else {
            return false;
        };
        self.start_session(key, staged)
    }

    /// Type-to-edit: start editing `key` with `seed` replacing the content.
    pub fn begin_edit_with(&mut self, key: CellKey, seed: char) -> bool {
        let Some(mut staged) = self.editable_value(&key) else {
            return false;
        };

        match staged {
            EditValue::Checked(_) => staged.push_char(seed),
            EditValue::Text(_) => staged = EditValue::Text(seed.to_string()),
        }
        self.start_session(key, staged)
    }

    fn editable_value(&self, key: &CellKey) -> Option<EditValue> {
        if self.edit.is_editing() || !self.is_valid_key(key) {
            return None;
        }
        let column = self.column(key.column.as_str())?;
        if !column.is_editable() {
            return None;
        }
        let value = self.value_at(key)?;
        Some(self.codec.to_editable(&value, column))
    }

    fn start_session(&mut self, key: CellKey, staged: EditValue) -> bool {
        let Some(column) = self.column(key.column.as_str()) else {
            return false;
        };
        let multiline = column.is_multiline() && column.kind() == ValueKind::Text;
        let original = self.value_at(&key).unwrap_or_default();

        let session = EditSession { key: key.clone(), staged, original, multiline };
        if !self.edit.begin(session) {
            return false;
        }

        if self.selection.cells.active() != Some(&key) {
            self.selection.cells.collapse_to(key.clone());
            self.emit(GridEvent::SelectionChanged);
        }
        self.selection.cells.end_gesture();
        self.drag_cell = None;

        log::debug!("Editing {}", key);
        self.emit(GridEvent::EditStarted(key));
        true
    }

    // =========================================================================
    // Staged input
    // =========================================================================

    /// Replace the staged input (hosts with a native input control).
    pub fn set_staged(&mut self, value: EditValue) -> bool {
        match self.edit.staged_mut() {
            Some(staged) => {
                *staged = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn push_staged_char(&mut self, c: char) {
        if let Some(staged) = self.edit.staged_mut() {
            staged.push_char(c);
        }
    }

    pub(crate) fn pop_staged_char(&mut self) {
        if let Some(staged) = self.edit.staged_mut() {
            staged.pop_char();
        }
    }

    // =========================================================================
    // Leave edit mode
    // =========================================================================

    /// Convert the staged input and store it. Input that doesn't parse keeps
    /// the previous value. Returns the key that was being edited.
    pub fn commit_edit(&mut self) -> Option<CellKey> {
        let session = self.edit.finish()?;
        let key = session.key;

        let Some(column) = self.column(key.column.as_str()) else {
            log::warn!("Commit for unknown column {}", key.column);
            return None;
        };
        let Some(previous) = self.value_at(&key) else {
            log::warn!("Commit for missing row {}", key.row);
            return None;
        };

        let stored = self.codec.to_stored(&session.staged, column, &previous);
        let changed = self.write_cell(&key, stored);
        log::debug!("Committed {} (changed: {})", key, changed);

        if changed {
            self.emit(GridEvent::CellsChanged(CellsChangedEvent { cells: vec![key.clone()] }));
            self.notify_data_changed();
        }
        self.emit(GridEvent::EditCommitted(key.clone()));
        Some(key)
    }

    /// Leave edit mode without storing the staged input.
    pub fn cancel_edit(&mut self) -> Option<CellKey> {
        let key = self.discard_edit()?;
        log::debug!("Cancelled edit of {}", key);
        Some(key)
    }

    /// Focus left the input; commits like Enter.
    pub fn blur(&mut self) -> Option<CellKey> {
        self.commit_edit()
    }

    pub(crate) fn discard_edit(&mut self) -> Option<CellKey> {
        let session = self.edit.finish()?;
        self.emit(GridEvent::EditCancelled(session.key.clone()));
        Some(session.key)
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::EditValue;
    use crate::column::ColumnDescriptor;
    use crate::events::{EventCollector, GridEvent};
    use crate::grid::Grid;
    use crate::record::Row;
    use crate::value::Value;
    use gridkit_core::CellKey;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn grid() -> Grid<Row> {
        Grid::new(
            vec![
                Row::new("a").with("n", 1.0).with("ok", true).with("id", "x"),
                Row::new("b").with("n", 2.0),
            ],
            vec![
                ColumnDescriptor::number("n"),
                ColumnDescriptor::boolean("ok"),
                ColumnDescriptor::text("id").read_only(),
            ],
            || Row::new("new"),
        )
    }

    #[test]
    fn test_begin_edit_stages_editable_value() {
        let mut g = grid();
        assert!(g.begin_edit(CellKey::new(0, "n")));
        assert_eq!(g.edit_state().staged(), Some(&EditValue::text("1")));
        assert_eq!(g.active_cell(), Some(&CellKey::new(0, "n")));
    }

    #[test]
    fn test_read_only_column_never_edits() {
        let mut g = grid();
        assert!(!g.begin_edit(CellKey::new(0, "id")));
        assert!(!g.begin_edit_with(CellKey::new(0, "id"), 'z'));
        assert!(!g.is_editing());
    }

    #[test]
    fn test_only_one_cell_edits() {
        let mut g = grid();
        assert!(g.begin_edit(CellKey::new(0, "n")));
        assert!(!g.begin_edit(CellKey::new(1, "n")));
        assert_eq!(g.edit_state().editing_key(), Some(&CellKey::new(0, "n")));
    }

    #[test]
    fn test_type_to_edit_replaces_content() {
        let mut g = grid();
        assert!(g.begin_edit_with(CellKey::new(1, "n"), '7'));
        assert_eq!(g.edit_state().staged(), Some(&EditValue::text("7")));
        g.commit_edit();
        assert_eq!(g.value_at(&CellKey::new(1, "n")), Some(Value::Number(7.0)));
    }

    #[test]
    fn test_commit_unparseable_keeps_previous() {
        let mut g = grid();
        g.begin_edit(CellKey::new(0, "n"));
        g.set_staged(EditValue::text("abc"));
        assert_eq!(g.commit_edit(), Some(CellKey::new(0, "n")));
        assert_eq!(g.value_at(&CellKey::new(0, "n")), Some(Value::Number(1.0)));
        assert!(!g.is_editing());
    }

    #[test]
    fn test_cancel_restores_value() {
        let mut g = grid();
        g.begin_edit(CellKey::new(0, "n"));
        g.set_staged(EditValue::text("42"));
        assert_eq!(g.cancel_edit(), Some(CellKey::new(0, "n")));
        assert_eq!(g.value_at(&CellKey::new(0, "n")), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_checkbox_edit() {
        let mut g = grid();
        assert!(g.begin_edit(CellKey::new(0, "ok")));
        assert_eq!(g.edit_state().staged(), Some(&EditValue::Checked(true)));
        g.set_staged(EditValue::Checked(false));
        g.blur();
        assert_eq!(g.value_at(&CellKey::new(0, "ok")), Some(Value::Bool(false)));
    }

    #[test]
    fn test_data_change_only_on_real_change() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let mut g = grid();

        let sink = calls.clone();
        g.on_data_change(move |rows: &[Row]| sink.borrow_mut().push(rows.len()));
        let collector = events.clone();
        g.subscribe(move |e| collector.borrow_mut().push(e.clone()));

        g.begin_edit(CellKey::new(0, "n"));
        g.commit_edit();
        assert!(calls.borrow().is_empty());

        g.begin_edit(CellKey::new(0, "n"));
        g.set_staged(EditValue::text("5"));
        g.commit_edit();
        assert_eq!(*calls.borrow(), vec![2]);

        let events = events.borrow();
        assert_eq!(events.cells_changed().len(), 1);
        assert_eq!(events.data_changes(), 1);
        assert_eq!(
            events.edit_events(),
            vec![
                &GridEvent::EditStarted(CellKey::new(0, "n")),
                &GridEvent::EditCommitted(CellKey::new(0, "n")),
                &GridEvent::EditStarted(CellKey::new(0, "n")),
                &GridEvent::EditCommitted(CellKey::new(0, "n")),
            ]
        );
    }
}
