use chart_dash::ChartError;
use chart_dash::core::{CellValue, ColumnKind, Dataset};

#[test]
fn csv_upload_infers_column_kinds() {
    let dataset = Dataset::from_csv_bytes(
        b"region,sales,active,notes\nNorth,10,True,ok\nSouth,2.5,False,\nEast,-4,True,late\n",
    )
    .expect("parse csv");

    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.column_count(), 4);
    let kinds: Vec<ColumnKind> = dataset.columns().iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Text,
            ColumnKind::Numeric,
            ColumnKind::Boolean,
            ColumnKind::Text
        ]
    );
    let numeric: Vec<&str> = dataset.numeric_column_names().collect();
    assert_eq!(numeric, vec!["sales"]);

    let notes = dataset.column("notes").expect("notes column");
    assert_eq!(notes.cells()[1], CellValue::Missing);
}

#[test]
fn na_markers_keep_a_column_numeric() {
    let dataset =
        Dataset::from_csv_bytes(b"name,score\na,1\nb,NA\nc,\nd,n/a\ne,3.5\n").expect("parse csv");
    let score = dataset.require_numeric_column("score").expect("numeric score");
    let values: Vec<Option<f64>> = score.numbers().collect();
    assert_eq!(values, vec![Some(1.0), None, None, None, Some(3.5)]);
}

#[test]
fn short_rows_are_padded_with_missing_cells() {
    let dataset = Dataset::from_csv_bytes(b"a,b,c\n1,2,3\n4\n").expect("parse csv");
    assert_eq!(dataset.row_count(), 2);
    let c = dataset.column("c").expect("column c");
    assert_eq!(c.cells()[1], CellValue::Missing);
    assert!(c.is_numeric());
}

#[test]
fn rows_longer_than_the_header_fail_to_parse() {
    let err = Dataset::from_csv_bytes(b"a,b\n1,2\n3,4,5\n").expect_err("ragged row must fail");
    match err {
        ChartError::Parse(message) => {
            assert!(message.contains("expected 2 fields"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_upload_is_a_parse_failure() {
    let err = Dataset::from_csv_bytes(b"").expect_err("empty upload must fail");
    assert!(matches!(err, ChartError::Parse(_)));
}

#[test]
fn duplicate_headers_get_suffixes() {
    let dataset = Dataset::from_csv_bytes(b"x,x,\n1,2,3\n").expect("parse csv");
    let names: Vec<&str> = dataset.column_names().collect();
    assert_eq!(names, vec!["x", "x.1", "Unnamed: 2"]);
}

#[test]
fn missing_columns_are_reported_in_request_order() {
    let dataset = Dataset::from_csv_bytes(b"source,weight\nA,1\n").expect("parse csv");
    let missing = dataset.missing_columns(&["source", "target", "value"]);
    assert_eq!(missing.as_slice(), ["target".to_owned(), "value".to_owned()]);
}

#[test]
fn require_numeric_column_distinguishes_unknown_from_text() {
    let dataset = Dataset::from_csv_bytes(b"label,amount\nA,1\n").expect("parse csv");
    assert!(matches!(
        dataset.require_numeric_column("label"),
        Err(ChartError::NonNumericColumn(name)) if name == "label"
    ));
    assert!(matches!(
        dataset.require_numeric_column("nope"),
        Err(ChartError::UnknownColumn(name)) if name == "nope"
    ));
}

#[test]
fn preview_shows_first_rows_with_index() {
    let csv = b"category,amount\nA,10\nB,20\nC,30\nD,40\nE,50\nF,60\n";
    let dataset = Dataset::from_csv_bytes(csv).expect("parse csv");
    let preview = dataset.head(5);

    assert_eq!(preview.total_rows, 6);
    assert_eq!(preview.rows.len(), 5);
    assert_eq!(preview.rows[0], vec!["A".to_owned(), "10".to_owned()]);

    let rendered = preview.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "   category  amount");
    assert_eq!(lines[1], "0         A      10");
}
