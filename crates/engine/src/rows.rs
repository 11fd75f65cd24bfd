//! Structural row mutations
//!
//! Cell keys and row selection are positional. Inserting or deleting shifts
//! every index below the mutation point, so these operations drop all
//! selection state and any in-progress edit.

use crate::events::GridEvent;
use crate::grid::Grid;
use crate::record::Record;

impl<R: Record> Grid<R> {
    /// Append a row built by the row factory. Selection is kept since no
    /// existing index moves. Returns the new row's index.
    pub fn append_row(&mut self) -> usize {
        let index = self.rows.len();
        self.rows.push((self.factory)());
        log::debug!("Appended row {}", index);

        self.emit(GridEvent::RowsInserted { index });
        self.notify_data_changed();
        index
    }

    /// Insert above the lowest selected row, or append with no row selected.
    pub fn insert_above(&mut self) -> usize {
        match self.selection.rows.min() {
            Some(index) => self.insert_at(index),
            None => self.append_row(),
        }
    }

    /// Insert below the highest selected row, or append with no row selected.
    pub fn insert_below(&mut self) -> usize {
        match self.selection.rows.max() {
            Some(index) => self.insert_at(index + 1),
            None => self.append_row(),
        }
    }

    fn insert_at(&mut self, index: usize) -> usize {
        let index = index.min(self.rows.len());
        let row = (self.factory)();
        self.rows.insert(index, row);
        log::debug!("Inserted row at {}", index);

        self.reset_interaction_state();
        self.emit(GridEvent::RowsInserted { index });
        self.notify_data_changed();
        index
    }

    /// Remove every selected row. Returns the number removed.
    pub fn delete_selected_rows(&mut self) -> usize {
        if self.selection.rows.is_empty() {
            return 0;
        }

        // Highest first so earlier removals don't shift later targets
        let mut indices: Vec<usize> = self.selection.rows.rows().iter().rev().copied().collect();
        indices.retain(|&i| i < self.rows.len());
        for &index in &indices {
            self.rows.remove(index);
        }
        log::debug!("Deleted {} row(s)", indices.len());

        let removed = indices.len();
        self.reset_interaction_state();
        self.emit(GridEvent::RowsDeleted { indices });
        self.notify_data_changed();
        removed
    }

    /// Drop selection, drag tracking, and any in-progress edit.
    pub fn reset_interaction_state(&mut self) {
        self.discard_edit();
        self.selection.clear_all();
        self.drag_cell = None;
        self.emit(GridEvent::SelectionChanged);
    }
}
