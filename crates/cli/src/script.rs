//! Interaction scripts.
//!
//! One step per line; blank lines and `#` comments are skipped. Cells are
//! written `row:column` (0-based row).
//!
//! ```text
//! click 0:name
//! shift-click 2:age
//! ctrl-click 1:name
//! drag 0:name 2:age
//! dblclick 0:age
//! key Enter
//! key shift+Tab
//! type Ada
//! blur
//! clipboard 1\t2\n3\t4
//! copy
//! paste
//! row 1 shift
//! append
//! insert-above
//! insert-below
//! delete-rows
//! ```

use gridkit_engine::{
    CellKey, ClipboardProvider, Grid, GridCommand, Key, KeyEvent, KeyOutcome, MemoryClipboard, Modifiers, Record,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: {message}")]
    BadArgument { line: usize, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Click(CellKey, Modifiers),
    Drag(CellKey, CellKey),
    DoubleClick(CellKey),
    Key(KeyEvent),
    Type(String),
    Blur,
    SetClipboard(String),
    Copy,
    Paste,
    RowHeader(usize, Modifiers),
    Append,
    InsertAbove,
    InsertBelow,
    DeleteRows,
}

pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (command, rest) = match text.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (text, ""),
        };
        let bad = |message: String| ScriptError::BadArgument { line, message };
        let cell = |arg: &str| CellKey::parse(arg).map_err(|e| bad(e.to_string()));

        let step = match command {
            "click" => Step::Click(cell(rest)?, Modifiers::NONE),
            "shift-click" => Step::Click(cell(rest)?, Modifiers::shift()),
            "ctrl-click" => Step::Click(cell(rest)?, Modifiers::ctrl()),
            "drag" => {
                let (from, to) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| bad("drag needs two cells".to_string()))?;
                Step::Drag(cell(from)?, cell(to.trim())?)
            }
            "dblclick" => Step::DoubleClick(cell(rest)?),
            "key" => Step::Key(parse_key_event(rest).ok_or_else(|| bad(format!("unknown key {:?}", rest)))?),
            "type" => Step::Type(unescape(rest)),
            "blur" => Step::Blur,
            "clipboard" => Step::SetClipboard(unescape(rest)),
            "copy" => Step::Copy,
            "paste" => Step::Paste,
            "row" => {
                let mut parts = rest.split_whitespace();
                let index = parts
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| bad(format!("bad row index {:?}", rest)))?;
                let modifiers = match parts.next() {
                    None => Modifiers::NONE,
                    Some("shift") => Modifiers::shift(),
                    Some("ctrl") => Modifiers::ctrl(),
                    Some(other) => return Err(bad(format!("unknown row modifier {:?}", other))),
                };
                Step::RowHeader(index, modifiers)
            }
            "append" => Step::Append,
            "insert-above" => Step::InsertAbove,
            "insert-below" => Step::InsertBelow,
            "delete-rows" => Step::DeleteRows,
            other => {
                return Err(ScriptError::UnknownCommand { line, command: other.to_string() });
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

/// `shift+Tab`, `ctrl+c`, `Enter`.
pub fn parse_key_event(spec: &str) -> Option<KeyEvent> {
    let mut modifiers = Modifiers::NONE;
    let mut parts: Vec<&str> = spec.split('+').collect();
    // A literal plus: `key +` or `key shift++`
    if spec.ends_with("++") || spec == "+" {
        parts.retain(|p| !p.is_empty());
        parts.push("+");
    }
    let name = parts.pop()?;
    for modifier in parts {
        match modifier.to_ascii_lowercase().as_str() {
            "shift" => modifiers.shift = true,
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "meta" | "cmd" => modifiers.meta = true,
            _ => return None,
        }
    }
    Key::parse(name).map(|key| KeyEvent::new(key, modifiers))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A grid plus the host services a script needs (an in-memory clipboard).
pub struct Session<R: Record> {
    pub grid: Grid<R>,
    pub clipboard: MemoryClipboard,
    /// Modifier of the copy/paste shortcuts
    pub command: Modifiers,
}

impl<R: Record> Session<R> {
    pub fn new(grid: Grid<R>) -> Self {
        Self { grid, clipboard: MemoryClipboard::new(), command: Modifiers::ctrl() }
    }

    pub fn with_command_modifiers(mut self, command: Modifiers) -> Self {
        self.command = command;
        self
    }

    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            log::debug!("step: {:?}", step);
            self.apply(step);
        }
    }

    pub fn apply(&mut self, step: &Step) {
        match step {
            Step::Click(key, modifiers) => {
                self.grid.pointer_down(key.clone(), *modifiers);
                self.grid.pointer_up();
            }
            Step::Drag(from, to) => {
                self.grid.pointer_down(from.clone(), Modifiers::NONE);
                self.grid.pointer_move(to.clone());
                self.grid.pointer_up();
            }
            Step::DoubleClick(key) => {
                self.grid.double_click(key.clone());
            }
            Step::Key(event) => self.key(*event),
            Step::Type(text) => {
                for c in text.chars() {
                    self.key(KeyEvent::plain(Key::Char(c)));
                }
            }
            Step::Blur => {
                self.grid.blur();
            }
            Step::SetClipboard(text) => self.clipboard.set_text(text.as_str()),
            Step::Copy => self.key(KeyEvent::new(Key::Char('c'), self.command)),
            Step::Paste => self.key(KeyEvent::new(Key::Char('v'), self.command)),
            Step::RowHeader(row, modifiers) => {
                self.grid.row_header_click(*row, *modifiers);
            }
            Step::Append => {
                self.grid.append_row();
            }
            Step::InsertAbove => {
                self.grid.insert_above();
            }
            Step::InsertBelow => {
                self.grid.insert_below();
            }
            Step::DeleteRows => {
                self.grid.delete_selected_rows();
            }
        }
    }

    /// Deliver a key and carry out any clipboard command it yields.
    fn key(&mut self, event: KeyEvent) {
        match self.grid.key_down(event) {
            KeyOutcome::Command(GridCommand::WriteClipboard(text)) => {
                if let Err(e) = self.clipboard.write_text(&text) {
                    log::warn!("Clipboard write failed: {}", e);
                }
            }
            KeyOutcome::Command(GridCommand::ReadClipboard(pending)) => {
                let read = self.clipboard.read_text();
                self.grid.complete_paste(pending, read);
            }
            KeyOutcome::Handled | KeyOutcome::Ignored => {}
        }
    }

    /// One-line description of the selection state.
    pub fn selection_summary(&self) -> String {
        let selection = self.grid.selection();
        let active = self
            .grid
            .active_cell()
            .map(CellKey::encode)
            .unwrap_or_else(|| "-".to_string());
        let rows: Vec<String> = selection.rows.rows().iter().map(usize::to_string).collect();
        format!(
            "cells: {}  active: {}  rows: [{}]  editing: {}",
            selection.cells.len(),
            active,
            rows.join(","),
            self.grid.edit_state().editing_key().map(CellKey::encode).unwrap_or_else(|| "-".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_engine::{ColumnDescriptor, Row, Value};

    fn session() -> Session<Row> {
        Session::new(Grid::new(
            vec![Row::new("a").with("n", 1.0), Row::new("b").with("n", 2.0)],
            vec![ColumnDescriptor::number("n"), ColumnDescriptor::text("note")],
            || Row::new("new"),
        ))
    }

    #[test]
    fn test_parse_script() {
        let steps = parse_script("# setup\nclick 0:n\n\nkey shift+ArrowDown\ndrag 0:n 1:note\nrow 1 ctrl\n").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Click(CellKey::new(0, "n"), Modifiers::NONE),
                Step::Key(KeyEvent::shifted(Key::ArrowDown)),
                Step::Drag(CellKey::new(0, "n"), CellKey::new(1, "note")),
                Step::RowHeader(1, Modifiers::ctrl()),
            ]
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        assert_eq!(
            parse_script("click 0:n\nfrobnicate"),
            Err(ScriptError::UnknownCommand { line: 2, command: "frobnicate".into() })
        );
        assert!(matches!(parse_script("click zero"), Err(ScriptError::BadArgument { line: 1, .. })));
        assert!(matches!(parse_script("key hyper+x"), Err(ScriptError::BadArgument { .. })));
    }

    #[test]
    fn test_parse_key_event() {
        assert_eq!(parse_key_event("ctrl+c"), Some(KeyEvent::command(Key::Char('c'))));
        assert_eq!(parse_key_event("Tab"), Some(KeyEvent::plain(Key::Tab)));
        assert_eq!(parse_key_event("+"), Some(KeyEvent::plain(Key::Char('+'))));
        assert_eq!(parse_key_event("shift++"), Some(KeyEvent::shifted(Key::Char('+'))));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"1\t2\n3"), "1\t2\n3");
        assert_eq!(unescape(r"a\\b\q"), "a\\b\\q");
    }

    #[test]
    fn test_copy_paste_through_session_clipboard() {
        let mut s = session();
        let steps = parse_script("click 1:n\ncopy\nclick 0:n\npaste").unwrap();
        s.run(&steps);
        assert_eq!(s.clipboard.contents(), Some("2"));
        assert_eq!(s.grid.value_at(&CellKey::new(0, "n")), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_type_and_commit() {
        let mut s = session();
        s.run(&parse_script("click 0:note\ntype hi there\nkey Enter").unwrap());
        assert_eq!(s.grid.value_at(&CellKey::new(0, "note")), Some(Value::Text("hi there".into())));
        assert_eq!(s.selection_summary(), "cells: 1  active: 0:note  rows: []  editing: -");
    }
}
