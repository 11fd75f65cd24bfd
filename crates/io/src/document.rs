// Grid documents: column schema plus row data, stored as JSON or TOML.
//
// {
//   "columns": [{ "id": "n", "label": "Count", "kind": "number" }],
//   "rows": [{ "id": "a", "n": 1 }]
// }

use std::fs;
use std::path::{Path, PathBuf};

use gridkit_engine::{ColumnDescriptor, Record, Row, SelectOption, Value, ValueKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row field holding the record identity.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported document extension: {0}")]
    UnsupportedFormat(String),
}

/// Column schema entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
    /// Defaults to editable for every kind except composite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ColumnSpec {
    pub fn to_descriptor(&self) -> ColumnDescriptor {
        let mut column = ColumnDescriptor::new(self.id.as_str(), self.kind).with_options(self.options.clone());
        if let Some(label) = &self.label {
            column = column.label(label.as_str());
        }
        if let Some(editable) = self.editable {
            column = column.editable(editable);
        }
        if self.multiline {
            column = column.multiline();
        }
        if let Some(placeholder) = &self.placeholder {
            column = column.placeholder(placeholder.as_str());
        }
        column
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridDocument {
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl GridDocument {
    /// Load by extension: `.toml` as TOML, `.json` (or no extension) as JSON.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match extension(path).as_deref() {
            Some("toml") => Self::from_toml(&contents),
            Some("json") | None => Self::from_json(&contents),
            Some(other) => Err(DocumentError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns.iter().map(ColumnSpec::to_descriptor).collect()
    }

    /// Rows coerced per column kind. Rows without an `id` field get a
    /// positional one (`row-<n>`, 1-based). A declared `id` column also keeps
    /// the field as a cell value so it can be shown and edited.
    pub fn records(&self) -> Vec<Row> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, fields)| {
                let mut row = Row::new(row_id(fields).unwrap_or_else(|| format!("row-{}", i + 1)));
                for spec in &self.columns {
                    if let Some(json) = fields.get(&spec.id) {
                        row.values.insert(spec.id.as_str().into(), Value::from_json(json, spec.kind));
                    }
                }
                row
            })
            .collect()
    }

    /// Column descriptors and rows ready for `Grid::new`.
    pub fn into_grid_parts(self) -> (Vec<ColumnDescriptor>, Vec<Row>) {
        (self.descriptors(), self.records())
    }

    /// Replace the row data from grid records.
    pub fn set_rows(&mut self, rows: &[Row]) {
        self.rows = rows.iter().map(|row| row_to_json(&self.columns, row)).collect();
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write `rows` under the given schema as a JSON document.
pub fn save_rows(path: &Path, columns: &[ColumnSpec], rows: &[Row]) -> Result<(), DocumentError> {
    let mut document = GridDocument { columns: columns.to_vec(), rows: Vec::new() };
    document.set_rows(rows);
    document.save(path)?;
    log::debug!("Saved {} row(s) to {}", rows.len(), path.display());
    Ok(())
}

/// An edited `id` cell wins over the record identity; a cleared one falls
/// back to it.
fn row_to_json(columns: &[ColumnSpec], row: &Row) -> serde_json::Map<String, serde_json::Value> {
    let mut fields = serde_json::Map::new();
    fields.insert(ID_FIELD.to_string(), serde_json::Value::String(row.id().to_string()));
    for spec in columns {
        let value = row.get(&spec.id).cloned().unwrap_or_default();
        if spec.id == ID_FIELD && matches!(&value, Value::Text(s) if s.trim().is_empty()) {
            continue;
        }
        if !value.is_null() {
            fields.insert(spec.id.clone(), value.to_json());
        }
    }
    fields
}

fn row_id(fields: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    match fields.get(ID_FIELD)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
