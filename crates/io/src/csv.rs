// Display-text export (CSV and TSV)
//
// Unlike clipboard text, exported fields are quoted, so values containing
// delimiters or line breaks survive.

use std::io::Write;
use std::path::Path;

use gridkit_engine::{Grid, Record};

pub fn export<R: Record>(grid: &Grid<R>, path: &Path) -> Result<(), String> {
    export_with_delimiter(grid, path, b',')
}

pub fn export_tsv<R: Record>(grid: &Grid<R>, path: &Path) -> Result<(), String> {
    export_with_delimiter(grid, path, b'\t')
}

fn export_with_delimiter<R: Record>(grid: &Grid<R>, path: &Path, delimiter: u8) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    write_display(grid, file, delimiter)
}

/// Header row of column labels, then one record per row.
pub fn write_display<R: Record, W: Write>(grid: &Grid<R>, out: W, delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    let header: Vec<&str> = grid.columns().iter().map(|c| c.header()).collect();
    writer.write_record(&header).map_err(|e| e.to_string())?;

    for row in 0..grid.row_count() {
        let record: Vec<String> = (0..grid.column_count())
            .map(|col| grid.cell_view(row, col).map(|view| view.display).unwrap_or_default())
            .collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_engine::{ColumnDescriptor, Row};
    use std::fs;
    use tempfile::tempdir;

    fn grid() -> Grid<Row> {
        Grid::new(
            vec![
                Row::new("a").with("name", "Ada, Countess").with("n", 1500.0),
                Row::new("b").with("name", "line\nbreak").with("ok", true),
            ],
            vec![
                ColumnDescriptor::text("name").label("Name"),
                ColumnDescriptor::number("n"),
                ColumnDescriptor::boolean("ok"),
            ],
            || Row::new("new"),
        )
    }

    #[test]
    fn test_csv_export_quotes_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        export(&grid(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Name,n,ok\n\"Ada, Countess\",\"1,500\",\n\"line\nbreak\",,Yes\n");
    }

    #[test]
    fn test_tsv_export_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.tsv");
        export_tsv(&grid(), &path).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(&path)
            .unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "Ada, Countess");
        assert_eq!(&records[1][0], "line\nbreak");
    }
}
