//! Row records.
//!
//! A record's identity is its `id`, which survives insertion and deletion.
//! Its positional index does not and is always read from the current row
//! order.

use std::collections::BTreeMap;

use gridkit_core::ColumnId;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A row shape the grid can read and write by column id.
pub trait Record {
    /// Stable identity, distinct from the row's position.
    fn id(&self) -> &str;

    /// Current value of a column (`Value::Null` when absent).
    fn value(&self, column: &ColumnId) -> Value;

    fn set_value(&mut self, column: &ColumnId, value: Value);
}

/// Map-backed record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub values: BTreeMap<ColumnId, Value>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), values: BTreeMap::new() }
    }

    /// Builder-style setter.
    pub fn with(mut self, column: impl Into<ColumnId>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

impl Record for Row {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, column: &ColumnId) -> Value {
        self.values.get(column).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, column: &ColumnId, value: Value) {
        self.values.insert(column.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let mut row = Row::new("a").with("n", 1.0).with("name", "Ada");
        assert_eq!(row.id(), "a");
        assert_eq!(row.value(&ColumnId::from("n")), Value::Number(1.0));
        assert_eq!(row.value(&ColumnId::from("missing")), Value::Null);

        row.set_value(&ColumnId::from("n"), Value::Number(2.0));
        assert_eq!(row.get("n"), Some(&Value::Number(2.0)));
    }
}
