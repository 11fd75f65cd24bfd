//! Pointer and keyboard input
//!
//! Contains:
//! - Cell clicks (plain, shift, ctrl/cmd) and drag selection
//! - Row header clicks
//! - Arrow and Tab movement
//! - Edit-mode keys (Enter, Escape, Tab, typing)
//! - Copy/paste shortcuts
//!
//! Every range extension goes through `CellSelection::extend_range_to`.

use gridkit_core::CellKey;

use crate::edit::{enter_action, EnterAction};
use crate::events::GridEvent;
use crate::grid::Grid;
use crate::input::{GridCommand, Key, KeyEvent, KeyOutcome, Modifiers};
use crate::record::Record;

impl<R: Record> Grid<R> {
    // =========================================================================
    // Pointer
    // =========================================================================

    /// Pointer pressed on a cell. Ignored while a cell is being edited.
    pub fn pointer_down(&mut self, key: CellKey, modifiers: Modifiers) -> bool {
        if self.edit.is_editing() || !self.is_valid_key(&key) {
            return false;
        }

        if modifiers.shift && self.selection.cells.anchor().is_some() {
            if !self.extend_to(key.clone()) {
                return false;
            }
        } else if modifiers.is_command() {
            self.selection.cells.toggle(key.clone());
        } else {
            self.selection.cells.select_single(key.clone());
        }

        self.drag_cell = Some(key);
        self.emit(GridEvent::SelectionChanged);
        true
    }

    /// Pointer moved over a cell. Extends the selection while a drag is armed.
    pub fn pointer_move(&mut self, key: CellKey) -> bool {
        if !self.wants_pointer_tracking() || !self.is_valid_key(&key) {
            return false;
        }
        if self.drag_cell.as_ref() == Some(&key) {
            return false;
        }

        if !self.extend_to(key.clone()) {
            return false;
        }
        self.drag_cell = Some(key);
        self.emit(GridEvent::SelectionChanged);
        true
    }

    pub fn pointer_up(&mut self) {
        self.selection.cells.end_gesture();
        self.drag_cell = None;
    }

    /// Enter edit mode on an editable cell.
    pub fn double_click(&mut self, key: CellKey) -> bool {
        self.begin_edit(key)
    }

    pub fn row_header_click(&mut self, row: usize, modifiers: Modifiers) -> bool {
        if row >= self.rows.len() {
            return false;
        }
        self.selection.rows.apply(row, modifiers.select_mode());
        self.emit(GridEvent::SelectionChanged);
        true
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    pub fn key_down(&mut self, event: KeyEvent) -> KeyOutcome {
        if self.edit.is_editing() {
            return self.edit_mode_key(event);
        }

        let mods = event.modifiers;
        match event.key {
            Key::Char(c) if mods.is_command() && c.eq_ignore_ascii_case(&'c') => {
                match self.copy_selection() {
                    Some(command) => KeyOutcome::Command(command),
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Char(c) if mods.is_command() && c.eq_ignore_ascii_case(&'v') => match self.begin_paste() {
                Some(pending) => KeyOutcome::Command(GridCommand::ReadClipboard(pending)),
                None => KeyOutcome::Ignored,
            },
            _ if mods.is_command() || mods.alt => KeyOutcome::Ignored,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                let Some((dr, dc)) = event.key.arrow_delta() else {
                    return KeyOutcome::Ignored;
                };
                self.move_active(dr, dc, mods.shift)
            }
            Key::Tab => {
                let Some(target) = self.active_cell().and_then(|key| self.tab_target(key, mods.shift)) else {
                    return KeyOutcome::Ignored;
                };
                self.selection.cells.collapse_to(target);
                self.emit(GridEvent::SelectionChanged);
                KeyOutcome::Handled
            }
            Key::Enter => {
                let started = self.active_cell().cloned().is_some_and(|key| self.begin_edit(key));
                handled_if(started)
            }
            Key::Char(c) if c.is_alphanumeric() => {
                let started = self.active_cell().cloned().is_some_and(|key| self.begin_edit_with(key, c));
                handled_if(started)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn edit_mode_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let mods = event.modifiers;
        match event.key {
            Key::Escape => {
                self.cancel_edit();
                KeyOutcome::Handled
            }
            Key::Enter => {
                let multiline = self.edit.session().is_some_and(|s| s.multiline);
                match enter_action(multiline, mods) {
                    EnterAction::NewLine => self.push_staged_char('\n'),
                    EnterAction::Commit => {
                        self.commit_edit();
                    }
                }
                KeyOutcome::Handled
            }
            Key::Tab => {
                let Some(key) = self.commit_edit() else {
                    return KeyOutcome::Handled;
                };
                if let Some(target) = self.tab_target(&key, mods.shift) {
                    log::debug!("Tab {} -> {}", key, target);
                    self.selection.cells.collapse_to(target.clone());
                    self.emit(GridEvent::SelectionChanged);
                    if self.column(target.column.as_str()).is_some_and(|c| c.is_editable()) {
                        self.begin_edit(target);
                    }
                }
                KeyOutcome::Handled
            }
            // Shortcuts belong to the input control while editing
            _ if mods.is_command() => KeyOutcome::Ignored,
            Key::Char(c) => {
                self.push_staged_char(c);
                KeyOutcome::Handled
            }
            Key::Backspace => {
                self.pop_staged_char();
                KeyOutcome::Handled
            }
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => KeyOutcome::Ignored,
        }
    }

    // =========================================================================
    // Movement helpers
    // =========================================================================

    /// Move the active cell by one step, clamped to the grid. With `extend`
    /// the anchor stays put and the range is rebuilt.
    fn move_active(&mut self, dr: isize, dc: isize, extend: bool) -> KeyOutcome {
        let Some(active) = self.active_cell().or_else(|| self.anchor_cell()).cloned() else {
            return KeyOutcome::Ignored;
        };
        let Ok(col) = self.order.index_of(active.column.as_str()) else {
            log::warn!("Active cell has unknown column {}", active.column);
            return KeyOutcome::Ignored;
        };
        if self.rows.is_empty() {
            return KeyOutcome::Ignored;
        }

        let row = clamp_step(active.row, dr, self.rows.len());
        let col = clamp_step(col, dc, self.order.len());
        let Some(target) = self.key_at(row, col) else {
            return KeyOutcome::Ignored;
        };

        if extend {
            if !self.extend_to(target) {
                return KeyOutcome::Ignored;
            }
        } else {
            self.selection.cells.collapse_to(target);
        }
        self.emit(GridEvent::SelectionChanged);
        KeyOutcome::Handled
    }

    /// Next (or previous) cell in reading order. Wraps across rows, stops at
    /// the grid edges.
    pub fn tab_target(&self, from: &CellKey, backward: bool) -> Option<CellKey> {
        let col = self.order.index_of(from.column.as_str()).ok()?;
        let last_col = self.order.len().checked_sub(1)?;

        let (row, col) = if backward {
            match (from.row, col) {
                (0, 0) => return None,
                (row, 0) => (row - 1, last_col),
                (row, col) => (row, col - 1),
            }
        } else if col < last_col {
            (from.row, col + 1)
        } else {
            (from.row + 1, 0)
        };

        self.key_at(row, col)
    }

    fn extend_to(&mut self, key: CellKey) -> bool {
        match self.selection.cells.extend_range_to(key, &self.order) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Range extension failed: {}", err);
                false
            }
        }
    }
}

fn handled_if(handled: bool) -> KeyOutcome {
    if handled {
        KeyOutcome::Handled
    } else {
        KeyOutcome::Ignored
    }
}

fn clamp_step(index: usize, delta: isize, len: usize) -> usize {
    index.saturating_add_signed(delta).min(len.saturating_sub(1))
}
