//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use gridkit_core::ColumnId;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Custom display formatter: stored value to display/clipboard text.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Custom parser: (edited text, previous stored value) to stored value.
pub type Parser = Arc<dyn Fn(&str, &Value) -> Value + Send + Sync>;

/// Kind of value a column holds; selects the input and the default codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Enum,
    Composite,
}

/// One choice of an enum column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { label: value.clone(), value }
    }
}

/// Static metadata for one column. Immutable once the grid is built.
#[derive(Clone)]
pub struct ColumnDescriptor {
    id: ColumnId,
    label: String,
    kind: ValueKind,
    editable: bool,
    multiline: bool,
    options: Vec<SelectOption>,
    placeholder: Option<String>,
    formatter: Option<Formatter>,
    parser: Option<Parser>,
}

impl ColumnDescriptor {
    pub fn new(id: impl Into<ColumnId>, kind: ValueKind) -> Self {
        let id = id.into();
        Self {
            label: id.to_string(),
            id,
            kind,
            // Composite values have no input representation
            editable: kind != ValueKind::Composite,
            multiline: false,
            options: Vec::new(),
            placeholder: None,
            formatter: None,
            parser: None,
        }
    }

    pub fn text(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::Text)
    }

    pub fn number(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::Number)
    }

    pub fn boolean(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::Boolean)
    }

    pub fn date(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::Date)
    }

    pub fn datetime(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::DateTime)
    }

    pub fn enumeration(id: impl Into<ColumnId>, options: Vec<SelectOption>) -> Self {
        Self::new(id, ValueKind::Enum).with_options(options)
    }

    pub fn composite(id: impl Into<ColumnId>) -> Self {
        Self::new(id, ValueKind::Composite)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn read_only(self) -> Self {
        self.editable(false)
    }

    /// Multi-line text input: plain Enter inserts a line break, Shift+Enter commits.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_formatter(mut self, formatter: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_parser(mut self, parser: impl Fn(&str, &Value) -> Value + Send + Sync + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    pub fn parser(&self) -> Option<&Parser> {
        self.parser.as_ref()
    }

    /// Find the option shown as `text`: exact label first, so displayed text
    /// reads back as the same option, then exact value, then either ignoring case.
    pub fn option_for(&self, text: &str) -> Option<&SelectOption> {
        let text = text.trim();
        self.options
            .iter()
            .find(|o| o.label == text)
            .or_else(|| self.options.iter().find(|o| o.value == text))
            .or_else(|| self.options.iter().find(|o| o.label.eq_ignore_ascii_case(text)))
            .or_else(|| self.options.iter().find(|o| o.value.eq_ignore_ascii_case(text)))
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("editable", &self.editable)
            .field("multiline", &self.multiline)
            .field("options", &self.options.len())
            .field("formatter", &self.formatter.is_some())
            .field("parser", &self.parser.is_some())
            .finish()
    }
}
