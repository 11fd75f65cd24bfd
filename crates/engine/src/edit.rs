//! Edit-mode state.
//!
//! At most one cell is in edit mode. The staged value lives here, outside
//! the row model, until the session is committed or cancelled.

use gridkit_core::CellKey;

use crate::codec::EditValue;
use crate::input::Modifiers;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub key: CellKey,
    pub staged: EditValue,
    /// Stored value when editing began
    pub original: Value,
    pub multiline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EditState {
    session: Option<EditSession>,
}

impl EditState {
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_editing_cell(&self, key: &CellKey) -> bool {
        self.session.as_ref().is_some_and(|s| &s.key == key)
    }

    pub fn editing_key(&self) -> Option<&CellKey> {
        self.session.as_ref().map(|s| &s.key)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn staged(&self) -> Option<&EditValue> {
        self.session.as_ref().map(|s| &s.staged)
    }

    /// Enter edit mode. Refused while another session is open.
    pub(crate) fn begin(&mut self, session: EditSession) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(session);
        true
    }

    pub(crate) fn staged_mut(&mut self) -> Option<&mut EditValue> {
        self.session.as_mut().map(|s| &mut s.staged)
    }

    /// Leave edit mode, handing back the session.
    pub(crate) fn finish(&mut self) -> Option<EditSession> {
        self.session.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    Commit,
    NewLine,
}

/// In a multi-line input plain Enter is a line break and only a modified Enter commits.
pub fn enter_action(multiline: bool, modifiers: Modifiers) -> EnterAction {
    let modified = modifiers.shift || modifiers.ctrl || modifiers.meta || modifiers.alt;
    if multiline && !modified {
        EnterAction::NewLine
    } else {
        EnterAction::Commit
    }
}
