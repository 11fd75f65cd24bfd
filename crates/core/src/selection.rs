use std::collections::BTreeSet;

use crate::cell_key::{CellKey, ColumnOrder};
use crate::error::CoreError;

/// A rectangular range of cells in index space, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// The rectangle spanned by two cell keys.
    pub fn spanning(a: &CellKey, b: &CellKey, columns: &ColumnOrder) -> Result<Self, CoreError> {
        let a_col = columns.index_of(a.column.as_str())?;
        let b_col = columns.index_of(b.column.as_str())?;
        Ok(Self::new(a.row, a_col, b.row, b_col))
    }

    /// Grow to include a cell.
    pub fn include(&mut self, row: usize, col: usize) {
        self.start_row = self.start_row.min(row);
        self.start_col = self.start_col.min(col);
        self.end_row = self.end_row.max(row);
        self.end_col = self.end_col.max(col);
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let start_col = self.start_col;
        let end_col = self.end_col;

        (self.start_row..=self.end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// Pointer gesture state of a cell selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// A pointer drag is armed and extends the selection as it moves.
    Selecting,
}

/// How a click on a row header combines with the existing row selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Replace,
    Extend,
    Toggle,
}

/// The cell selection: selected keys plus the active and anchor cells.
///
/// The active cell carries keyboard focus. The anchor is fixed when a new
/// selection gesture starts and is the reference corner for every range
/// extension (shift+click, shift+arrow, drag).
#[derive(Debug, Clone, Default)]
pub struct CellSelection {
    selected: BTreeSet<CellKey>,
    active: Option<CellKey>,
    anchor: Option<CellKey>,
    gesture: Gesture,
}

impl CellSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<CellKey> {
        &self.selected
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.selected.contains(key)
    }

    pub fn active(&self) -> Option<&CellKey> {
        self.active.as_ref()
    }

    pub fn anchor(&self) -> Option<&CellKey> {
        self.anchor.as_ref()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_selecting(&self) -> bool {
        self.gesture == Gesture::Selecting
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Select one cell and arm drag-extension (click).
    pub fn select_single(&mut self, key: CellKey) {
        self.collapse_to(key);
        self.gesture = Gesture::Selecting;
    }

    /// Replace the selection with one cell without arming a drag (arrow keys, Tab).
    pub fn collapse_to(&mut self, key: CellKey) {
        self.selected.clear();
        self.selected.insert(key.clone());
        self.anchor = Some(key.clone());
        self.active = Some(key);
    }

    /// Add or remove one cell (ctrl/cmd+click). The toggled cell becomes the anchor.
    ///
    /// Removing the active cell leaves no active cell.
    pub fn toggle(&mut self, key: CellKey) {
        if self.selected.remove(&key) {
            if self.active.as_ref() == Some(&key) {
                self.active = None;
            }
        } else {
            self.selected.insert(key.clone());
            self.active = Some(key.clone());
        }
        self.anchor = Some(key);
    }

    /// Rebuild the selection as the rectangle between the anchor and `key`.
    ///
    /// The anchor stays put and `key` becomes active. Without an anchor the
    /// selection collapses to `key`.
    pub fn extend_range_to(&mut self, key: CellKey, columns: &ColumnOrder) -> Result<(), CoreError> {
        let Some(anchor) = self.anchor.as_ref() else {
            self.collapse_to(key);
            return Ok(());
        };

        let range = Range::spanning(anchor, &key, columns)?;
        let mut selected = BTreeSet::new();
        for (row, col) in range.cells() {
            if let Some(id) = columns.id_at(col) {
                selected.insert(CellKey::new(row, id));
            }
        }

        self.selected = selected;
        self.active = Some(key);
        Ok(())
    }

    /// Pointer released: stop drag-extension.
    pub fn end_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Replace the selected set, keeping anchor and active cell.
    pub fn replace_with(&mut self, keys: impl IntoIterator<Item = CellKey>) {
        self.selected = keys.into_iter().collect();
        self.gesture = Gesture::Idle;
    }

    /// Bounding rectangle of the selected cells in index space.
    pub fn bounds(&self, columns: &ColumnOrder) -> Result<Option<Range>, CoreError> {
        let mut bounds: Option<Range> = None;
        for key in &self.selected {
            let col = columns.index_of(key.column.as_str())?;
            match bounds.as_mut() {
                Some(range) => range.include(key.row, col),
                None => bounds = Some(Range::single(key.row, col)),
            }
        }
        Ok(bounds)
    }

    /// Drop keys that reference rows at or past `row_count`.
    pub fn retain_rows_below(&mut self, row_count: usize) {
        self.selected.retain(|key| key.row < row_count);
        if self.active.as_ref().is_some_and(|key| key.row >= row_count) {
            self.active = None;
        }
        if self.anchor.as_ref().is_some_and(|key| key.row >= row_count) {
            self.anchor = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Whole-row selection, independent of the cell selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: BTreeSet<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a row-header click.
    ///
    /// `Extend` spans from the current min/max selected row to `row`; with
    /// nothing selected it behaves as `Replace`.
    pub fn apply(&mut self, row: usize, mode: SelectMode) {
        match mode {
            SelectMode::Extend if !self.rows.is_empty() => {
                let (min, max) = (self.min().unwrap_or(row), self.max().unwrap_or(row));
                self.rows = (min.min(row)..=max.max(row)).collect();
            }
            SelectMode::Toggle => {
                if !self.rows.remove(&row) {
                    self.rows.insert(row);
                }
            }
            _ => {
                self.rows.clear();
                self.rows.insert(row);
            }
        }
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn rows(&self) -> &BTreeSet<usize> {
        &self.rows
    }

    pub fn min(&self) -> Option<usize> {
        self.rows.first().copied()
    }

    pub fn max(&self) -> Option<usize> {
        self.rows.last().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn retain_rows_below(&mut self, row_count: usize) {
        self.rows.retain(|&row| row < row_count);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Cell and row selection of one grid instance.
///
/// Both tracks index rows positionally, so any structural row mutation
/// clears them together.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub cells: CellSelection,
    pub rows: RowSelection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.cells.clear();
        self.rows.clear();
    }

    /// Purge every reference to rows at or past `row_count`.
    pub fn purge_rows_beyond(&mut self, row_count: usize) {
        self.cells.retain_rows_below(row_count);
        self.rows.retain_rows_below(row_count);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.rows.is_empty() && self.cells.active().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> ColumnOrder {
        ColumnOrder::new(["a", "b", "c", "d"])
    }

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_multi() {
        let r = Range::new(1, 1, 3, 2);
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(r.contains(3, 1));
        assert!(!r.contains(0, 0));
        assert!(!r.is_single());
        assert_eq!(r.cell_count(), 6); // 3 rows x 2 cols
    }

    #[test]
    fn test_range_normalizes() {
        let r = Range::new(5, 5, 1, 1);
        assert_eq!(r.start_row, 1);
        assert_eq!(r.start_col, 1);
        assert_eq!(r.end_row, 5);
        assert_eq!(r.end_col, 5);
    }

    #[test]
    fn test_select_single_arms_drag() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(1, "b"));
        assert!(sel.is_selecting());
        assert_eq!(sel.anchor(), Some(&CellKey::new(1, "b")));
        assert_eq!(sel.active(), Some(&CellKey::new(1, "b")));
        assert_eq!(sel.len(), 1);

        sel.end_gesture();
        assert!(!sel.is_selecting());
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_selection_extend() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(2, "b"));
        sel.extend_range_to(CellKey::new(4, "d"), &order()).unwrap();

        assert_eq!(sel.anchor(), Some(&CellKey::new(2, "b")));
        assert_eq!(sel.active(), Some(&CellKey::new(4, "d")));
        assert_eq!(sel.len(), 9);
        assert!(sel.contains(&CellKey::new(3, "c")));
        assert!(!sel.contains(&CellKey::new(1, "a")));
        assert!(!sel.contains(&CellKey::new(3, "a")));
    }

    #[test]
    fn test_extend_shrinks_back() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(0, "a"));
        sel.extend_range_to(CellKey::new(3, "c"), &order()).unwrap();
        sel.extend_range_to(CellKey::new(1, "a"), &order()).unwrap();
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn test_extend_without_anchor_collapses() {
        let mut sel = CellSelection::new();
        sel.extend_range_to(CellKey::new(2, "c"), &order()).unwrap();
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.anchor(), Some(&CellKey::new(2, "c")));
        assert_eq!(sel.active(), Some(&CellKey::new(2, "c")));
    }

    #[test]
    fn test_extend_unknown_column_is_error() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(0, "a"));
        let err = sel.extend_range_to(CellKey::new(1, "nope"), &order()).unwrap_err();
        assert_eq!(err, CoreError::UnknownColumn("nope".into()));
        // Selection untouched
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.active(), Some(&CellKey::new(0, "a")));
    }

    #[test]
    fn test_toggle() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(0, "a"));
        sel.end_gesture();

        sel.toggle(CellKey::new(2, "c"));
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.anchor(), Some(&CellKey::new(2, "c")));
        assert_eq!(sel.active(), Some(&CellKey::new(2, "c")));
        assert!(!sel.is_selecting());

        sel.toggle(CellKey::new(2, "c"));
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.active(), None);
        assert_eq!(sel.anchor(), Some(&CellKey::new(2, "c")));
    }

    #[test]
    fn test_bounds_of_scattered_cells() {
        let mut sel = CellSelection::new();
        sel.select_single(CellKey::new(3, "b"));
        sel.toggle(CellKey::new(1, "d"));
        let bounds = sel.bounds(&order()).unwrap().unwrap();
        assert_eq!(bounds, Range::new(1, 1, 3, 3));
        assert_eq!(CellSelection::new().bounds(&order()).unwrap(), None);
    }

    #[test]
    fn test_row_selection_modes() {
        let mut rows = RowSelection::new();
        rows.apply(4, SelectMode::Replace);
        rows.apply(2, SelectMode::Extend);
        assert_eq!(rows.rows().iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        // Extend grows from the existing min/max, not from the last click
        rows.apply(6, SelectMode::Extend);
        assert_eq!(rows.len(), 5);

        rows.apply(3, SelectMode::Toggle);
        assert!(!rows.contains(3));
        rows.apply(9, SelectMode::Toggle);
        assert!(rows.contains(9));

        rows.apply(0, SelectMode::Replace);
        assert_eq!(rows.len(), 1);
        assert!(rows.contains(0));
    }

    #[test]
    fn test_row_extend_with_empty_selection_replaces() {
        let mut rows = RowSelection::new();
        rows.apply(5, SelectMode::Extend);
        assert_eq!(rows.len(), 1);
        assert!(rows.contains(5));
    }

    #[test]
    fn test_purge_rows_beyond() {
        let mut state = SelectionState::new();
        state.cells.select_single(CellKey::new(0, "a"));
        state.cells.extend_range_to(CellKey::new(3, "a"), &order()).unwrap();
        state.rows.apply(1, SelectMode::Replace);
        state.rows.apply(3, SelectMode::Extend);

        state.purge_rows_beyond(2);
        assert_eq!(state.cells.len(), 2);
        assert_eq!(state.cells.active(), None);
        assert_eq!(state.cells.anchor(), Some(&CellKey::new(0, "a")));
        assert_eq!(state.rows.rows().iter().copied().collect::<Vec<_>>(), vec![1]);

        state.clear_all();
        assert!(state.is_empty());
    }
}
