// Output rendering for `show` and `run`

use gridkit_engine::{Grid, Row};
use gridkit_io::{ColumnSpec, GridDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Display text, tab separated, header row first
    #[default]
    Tsv,
    /// Display text, comma separated
    Csv,
    /// Grid document with stored values
    Json,
}

pub fn render(grid: &Grid<Row>, columns: &[ColumnSpec], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Tsv => render_delimited(grid, b'\t'),
        OutputFormat::Csv => render_delimited(grid, b','),
        OutputFormat::Json => {
            let mut document = GridDocument { columns: columns.to_vec(), rows: Vec::new() };
            document.set_rows(grid.rows());
            document.to_json_string().map_err(|e| e.to_string())
        }
    }
}

fn render_delimited(grid: &Grid<Row>, delimiter: u8) -> Result<String, String> {
    let mut out = Vec::new();
    gridkit_io::csv::write_display(grid, &mut out, delimiter)?;
    String::from_utf8(out).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_engine::ColumnDescriptor;

    #[test]
    fn test_render_tsv_and_json() {
        let document = GridDocument::from_json(
            r#"{ "columns": [{ "id": "n", "label": "Count", "kind": "number" }], "rows": [{ "id": "a", "n": 1200 }] }"#,
        )
        .unwrap();
        let columns = document.columns.clone();
        let (descriptors, rows) = document.into_grid_parts();
        let grid = Grid::new(rows, descriptors, || Row::new("new"));

        assert_eq!(render(&grid, &columns, OutputFormat::Tsv).unwrap(), "Count\n1,200\n");

        let json: serde_json::Value = serde_json::from_str(&render(&grid, &columns, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["rows"][0]["n"], serde_json::json!(1200.0));
        assert_eq!(json["rows"][0]["id"], "a");

        let plain = Grid::new(vec![Row::new("x").with("t", "a,b")], vec![ColumnDescriptor::text("t")], || Row::new("new"));
        assert_eq!(render(&plain, &[], OutputFormat::Csv).unwrap(), "t\n\"a,b\"\n");
    }
}
