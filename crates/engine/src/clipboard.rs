//! Clipboard operations
//!
//! Plain text only: columns separated by `\t`, rows by `\n`. Cell text is the
//! display text, so a copied block pastes back into the same columns
//! unchanged. Tabs or newlines inside a value are not escaped and split the
//! cell on paste.
//!
//! Reading the system clipboard is asynchronous for most hosts, so paste is
//! two-phase: `begin_paste` captures where the paste should land, the host
//! reads the clipboard, and `complete_paste` applies the text after checking
//! that the target row still exists.

use gridkit_core::CellKey;
use thiserror::Error;

use crate::codec::EditValue;
use crate::events::{CellsChangedEvent, GridEvent};
use crate::grid::Grid;
use crate::input::GridCommand;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    PermissionDenied,

    #[error("clipboard is empty")]
    Empty,

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous access to a plain-text clipboard.
pub trait ClipboardProvider {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { contents: Some(text.into()), denied: false }
    }

    /// A clipboard whose reads fail with `PermissionDenied`.
    pub fn denied() -> Self {
        Self { contents: None, denied: true }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into());
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        if self.denied {
            return Err(ClipboardError::PermissionDenied);
        }
        self.contents.clone().ok_or(ClipboardError::Empty)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// A paste waiting for the clipboard read to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPaste {
    /// Anchor cell when the paste was requested
    pub anchor: CellKey,
    /// Identity of the anchor's row, used to re-locate it on completion
    pub row_id: String,
}

/// Join a block of cell texts into clipboard text.
pub fn format_tsv(block: &[Vec<String>]) -> String {
    block
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split clipboard text into rows of cells.
///
/// One trailing line break is dropped (spreadsheets append one). A `\r`
/// before each `\n` is ignored.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.split('\t').map(str::to_string).collect()
        })
        .collect()
}

impl<R: Record> Grid<R> {
    // =========================================================================
    // Copy
    // =========================================================================

    /// Display text of the bounding rectangle of the selected cells.
    /// Unselected cells inside the rectangle are emitted empty.
    pub fn serialize_selection(&self) -> Option<String> {
        let bounds = match self.selection.cells.bounds(&self.order) {
            Ok(Some(bounds)) => bounds,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("Cannot serialize selection: {}", err);
                return None;
            }
        };

        let mut block = Vec::with_capacity(bounds.row_count());
        for row in bounds.start_row..=bounds.end_row {
            let mut line = Vec::with_capacity(bounds.col_count());
            for col in bounds.start_col..=bounds.end_col {
                let text = self
                    .key_at(row, col)
                    .filter(|key| self.selection.cells.contains(key))
                    .and_then(|key| self.display_at(&key))
                    .unwrap_or_default();
                line.push(text);
            }
            block.push(line);
        }
        Some(format_tsv(&block))
    }

    /// Copy command for the host, or `None` with nothing selected.
    pub fn copy_selection(&self) -> Option<GridCommand> {
        let text = self.serialize_selection()?;
        log::debug!("Copy {} cell(s)", self.selection.cells.len());
        Some(GridCommand::WriteClipboard(text))
    }

    /// Copy straight into a synchronous clipboard. Returns whether anything was written.
    pub fn copy_to(&self, clipboard: &mut impl ClipboardProvider) -> Result<bool, ClipboardError> {
        match self.serialize_selection() {
            Some(text) => clipboard.write_text(&text).map(|()| true),
            None => Ok(false),
        }
    }

    // =========================================================================
    // Paste
    // =========================================================================

    /// Capture the paste target: the anchor cell, falling back to the active cell.
    pub fn begin_paste(&self) -> Option<PendingPaste> {
        if self.edit.is_editing() {
            return None;
        }
        let anchor = self.selection.cells.anchor().or(self.selection.cells.active())?;
        let row = self.rows.get(anchor.row)?;
        Some(PendingPaste {
            anchor: anchor.clone(),
            row_id: row.id().to_string(),
        })
    }

    /// Apply a resolved clipboard read. A failed read aborts without any
    /// change. Returns the number of cells written.
    pub fn complete_paste(&mut self, pending: PendingPaste, read: Result<String, ClipboardError>) -> usize {
        let text = match read {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Paste aborted: {}", err);
                return 0;
            }
        };

        let Some(row) = self.position_of(&pending.row_id) else {
            log::warn!("Paste aborted: row {} no longer exists", pending.row_id);
            return 0;
        };
        let anchor = CellKey::new(row, pending.anchor.column.clone());
        if self.selection.cells.anchor() != Some(&anchor) {
            log::debug!("Paste anchor moved {} -> {}", pending.anchor, anchor);
            self.selection.cells.collapse_to(anchor.clone());
        }
        self.paste_text(&anchor, &text)
    }

    /// Write a tab/newline block starting at `anchor`.
    ///
    /// Cells past the last row or column and cells in read-only columns are
    /// skipped. Text that doesn't parse keeps the cell's previous value. The
    /// selection becomes exactly the cells written.
    pub fn paste_text(&mut self, anchor: &CellKey, text: &str) -> usize {
        if self.edit.is_editing() {
            log::debug!("Paste ignored while editing");
            return 0;
        }
        let block = parse_tsv(text);
        if block.is_empty() {
            return 0;
        }
        let Ok(start_col) = self.order.index_of(anchor.column.as_str()) else {
            log::warn!("Paste anchor has unknown column {}", anchor.column);
            return 0;
        };

        let mut written = Vec::new();
        for (i, line) in block.iter().enumerate() {
            let row = anchor.row + i;
            if row >= self.rows.len() {
                break;
            }
            for (j, cell) in line.iter().enumerate() {
                let Some(column) = self.columns.get(start_col + j) else {
                    break;
                };
                if !column.is_editable() {
                    continue;
                }

                let record = &mut self.rows[row];
                let previous = record.value(column.id());
                let stored = self.codec.to_stored(&EditValue::text(cell.as_str()), column, &previous);
                record.set_value(column.id(), stored);
                written.push(CellKey::new(row, column.id()));
            }
        }

        if written.is_empty() {
            return 0;
        }

        log::debug!("Pasted {} cell(s) at {}", written.len(), anchor);
        let count = written.len();
        self.selection.cells.replace_with(written.iter().cloned());
        self.emit(GridEvent::CellsChanged(CellsChangedEvent { cells: written }));
        self.emit(GridEvent::SelectionChanged);
        self.notify_data_changed();
        count
    }

    /// Paste from a synchronous clipboard in one step.
    pub fn paste_from(&mut self, clipboard: &mut impl ClipboardProvider) -> usize {
        let Some(pending) = self.begin_paste() else {
            return 0;
        };
        let read = clipboard.read_text();
        self.complete_paste(pending, read)
    }
}
