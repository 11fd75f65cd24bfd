//! Cell addressing.
//!
//! A cell is addressed by its row's current positional index and its
//! column's stable id. Keys are derived values: they must be rebuilt after
//! any row insertion or deletion, never carried across one.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Separator between the row and column parts of an encoded key.
///
/// The row part is decimal digits only, so the first separator always ends
/// it and column ids may contain the separator freely.
pub const KEY_SEPARATOR: char = ':';

/// Stable identifier of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ColumnId> for ColumnId {
    fn from(id: &ColumnId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Address of a single cell: (row index, column id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    /// Current positional index of the row (0-based)
    pub row: usize,
    /// Stable id of the column
    pub column: ColumnId,
}

impl CellKey {
    #[inline]
    pub fn new(row: usize, column: impl Into<ColumnId>) -> Self {
        Self { row, column: column.into() }
    }

    /// Encode as `<row>:<column>`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a key produced by [`CellKey::encode`].
    pub fn parse(encoded: &str) -> Result<Self, CoreError> {
        encoded.parse()
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.row, KEY_SEPARATOR, self.column)
    }
}

impl FromStr for CellKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedKey(s.to_string());

        let (row, column) = s.split_once(KEY_SEPARATOR).ok_or_else(malformed)?;
        if row.is_empty() || !row.bytes().all(|b| b.is_ascii_digit()) || column.is_empty() {
            return Err(malformed());
        }
        let row = row.parse::<usize>().map_err(|_| malformed())?;

        Ok(Self::new(row, column))
    }
}

/// The active left-to-right column ordering.
///
/// Defines tab order and the column axis of range math. Fixed for the
/// lifetime of a grid instance.
#[derive(Debug, Clone, Default)]
pub struct ColumnOrder {
    ids: Vec<ColumnId>,
    positions: FxHashMap<ColumnId, usize>,
}

impl ColumnOrder {
    pub fn new<I, C>(ids: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnId>,
    {
        let ids: Vec<ColumnId> = ids.into_iter().map(Into::into).collect();
        let mut positions = FxHashMap::default();
        for (index, id) in ids.iter().enumerate() {
            // First occurrence wins for duplicate ids
            positions.entry(id.clone()).or_insert(index);
        }
        Self { ids, positions }
    }

    /// Positional index of a column.
    pub fn index_of(&self, id: &str) -> Result<usize, CoreError> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| CoreError::UnknownColumn(id.to_string()))
    }

    pub fn id_at(&self, index: usize) -> Option<&ColumnId> {
        self.ids.get(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnId> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parse() {
        let key = CellKey::new(12, "age");
        assert_eq!(key.encode(), "12:age");
        assert_eq!(CellKey::parse("12:age").unwrap(), key);
    }

    #[test]
    fn test_column_id_containing_separator() {
        let key = CellKey::new(3, "ns:field:x");
        let encoded = key.encode();
        assert_eq!(encoded, "3:ns:field:x");
        assert_eq!(CellKey::parse(&encoded).unwrap(), key);
    }

    #[test]
    fn test_malformed_keys() {
        for bad in ["", "12", ":age", "12:", "-1:age", "x1:age", "1 :age", "99999999999999999999999:a"] {
            assert_eq!(
                CellKey::parse(bad),
                Err(CoreError::MalformedKey(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_column_order_lookup() {
        let order = ColumnOrder::new(["a", "b", "c"]);
        assert_eq!(order.len(), 3);
        assert_eq!(order.index_of("b"), Ok(1));
        assert_eq!(order.id_at(2), Some(&ColumnId::from("c")));
        assert_eq!(order.id_at(3), None);
        assert_eq!(order.index_of("zz"), Err(CoreError::UnknownColumn("zz".into())));
    }

    #[test]
    fn test_duplicate_column_keeps_first_position() {
        let order = ColumnOrder::new(["a", "b", "a"]);
        assert_eq!(order.index_of("a"), Ok(0));
    }
}
