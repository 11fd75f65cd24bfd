// Property-based tests for the value codec and paste bounds.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use chrono::NaiveDate;
use gridkit_engine::{CellKey, ColumnDescriptor, Grid, Row, SelectOption, Value, ValueCodec};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("draft", "Draft"),
        SelectOption::new("live", "Live"),
        SelectOption::plain("archived"),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Editing without changing the input stores the same value.
fn assert_round_trip(codec: &ValueCodec, column: &ColumnDescriptor, value: Value) -> Result<(), TestCaseError> {
    let editable = codec.to_editable(&value, column);
    let stored = codec.to_stored(&editable, column, &value);
    prop_assert_eq!(stored, value);
    Ok(())
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn number_round_trip(n in -1.0e12f64..1.0e12) {
        assert_round_trip(&ValueCodec::default(), &ColumnDescriptor::number("n"), Value::Number(n))?;
    }

    #[test]
    fn text_round_trip(s in "[^\t\n]{1,24}") {
        assert_round_trip(&ValueCodec::default(), &ColumnDescriptor::text("t"), Value::Text(s))?;
    }

    #[test]
    fn bool_round_trip(b in any::<bool>()) {
        assert_round_trip(&ValueCodec::default(), &ColumnDescriptor::boolean("b"), Value::Bool(b))?;
    }

    #[test]
    fn date_round_trip(d in arb_date()) {
        assert_round_trip(&ValueCodec::default(), &ColumnDescriptor::date("d"), Value::Date(d))?;
    }

    #[test]
    fn datetime_round_trip(d in arb_date(), h in 0u32..24, m in 0u32..60, s in 0u32..60) {
        let dt = d.and_hms_opt(h, m, s).unwrap();
        assert_round_trip(&ValueCodec::default(), &ColumnDescriptor::datetime("dt"), Value::DateTime(dt))?;
    }

    #[test]
    fn enum_round_trip(i in 0usize..3) {
        let column = ColumnDescriptor::enumeration("e", options());
        let value = Value::Text(options()[i].value.clone());
        assert_round_trip(&ValueCodec::default(), &column, value)?;
    }

    /// Display text parses back to the same value, which is what makes copy/paste lossless.
    #[test]
    fn display_round_trip_for_rounded_numbers(n in -1_000_000_000i64..1_000_000_000, frac in 0u32..1000) {
        let value = n as f64 + f64::from(frac) / 1000.0 * n.signum() as f64;
        let codec = ValueCodec::default();
        let column = ColumnDescriptor::number("n");
        let display = codec.to_display(&Value::Number(value), &column);
        let parsed = codec.parse_number(&display).unwrap();
        prop_assert!((parsed - value).abs() < 1e-6, "{} -> {} -> {}", value, display, parsed);
    }

    /// A pasted block never writes outside the grid or into read-only columns.
    #[test]
    fn paste_stays_in_bounds(
        anchor_row in 0usize..4,
        anchor_col in 0usize..3,
        block in prop::collection::vec(prop::collection::vec("[a-z0-9]{1,4}", 1..6), 1..6),
    ) {
        let ids = ["a", "locked", "c"];
        let rows: Vec<Row> = (0..4)
            .map(|r| Row::new(format!("r{r}")).with("locked", format!("L{r}")))
            .collect();
        let columns = vec![
            ColumnDescriptor::text("a"),
            ColumnDescriptor::text("locked").read_only(),
            ColumnDescriptor::text("c"),
        ];
        let mut grid = Grid::new(rows, columns, || Row::new("new"));

        let text = block.iter().map(|line| line.join("\t")).collect::<Vec<_>>().join("\n");
        let anchor = CellKey::new(anchor_row, ids[anchor_col]);
        let written = grid.paste_text(&anchor, &text);

        prop_assert_eq!(grid.row_count(), 4);
        for (r, row) in grid.rows().iter().enumerate() {
            prop_assert_eq!(row.get("locked"), Some(&Value::Text(format!("L{r}"))));
            prop_assert!(row.values.len() <= 3);
        }

        let mut expected = 0;
        for (i, line) in block.iter().enumerate() {
            for j in 0..line.len() {
                let (row, col) = (anchor_row + i, anchor_col + j);
                if row < 4 && col < 3 && col != 1 {
                    expected += 1;
                }
            }
        }
        prop_assert_eq!(written, expected);
        prop_assert_eq!(grid.selection().cells.len(), expected);
        for key in grid.selection().cells.selected() {
            prop_assert!(key.row < 4);
            prop_assert_ne!(key.column.as_str(), "locked");
        }
    }
}
