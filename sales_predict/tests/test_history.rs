use chrono::NaiveDate;
use rstest::rstest;
use sales_predict::error::PredictError;
use sales_predict::history::{
    parse_client_date, sort_rows_by_date, to_series_rows, HistoryLoader, HistoryRecord, SeriesRow,
};
use std::io::Write;

#[rstest]
#[case("2024-01-05")]
#[case("05-01-2024")]
#[case("05/01/2024")]
#[case("2024/01/05")]
#[case("2024-01-05T00:00:00")]
#[case("2024-01-05 12:30:00")]
#[case("  2024-01-05  ")]
fn test_parse_supported_formats(#[case] raw: &str) {
    assert_eq!(
        parse_client_date(raw),
        Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    );
}

#[rstest]
#[case("")]
#[case("not a date")]
#[case("13/13/2024")]
#[case("2024-02-30")]
#[case("tomorrow")]
fn test_parse_garbage_is_missing(#[case] raw: &str) {
    assert_eq!(parse_client_date(raw), None);
}

#[test]
fn test_day_first_ambiguity() {
    // Day-first wins for slash dates, matching the upstream convention
    assert_eq!(
        parse_client_date("03/04/2024"),
        Some(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap())
    );
}

#[test]
fn test_to_series_rows_counts_dropped_dates() {
    let history = vec![
        HistoryRecord {
            date: "2024-01-01".to_string(),
            sales: 100.0,
        },
        HistoryRecord {
            date: "garbage".to_string(),
            sales: 50.0,
        },
        HistoryRecord {
            date: "2024-01-02".to_string(),
            sales: 110.0,
        },
    ];

    let (rows, dropped) = to_series_rows(&history);
    assert_eq!(rows.len(), 3);
    assert_eq!(dropped, 1);

    // The unparseable date keeps its sales value
    assert_eq!(rows[1].date, None);
    assert_eq!(rows[1].sales, Some(50.0));
}

#[test]
fn test_sort_orders_missing_dates_last() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let mut rows = vec![
        SeriesRow {
            date: Some(day(3)),
            sales: Some(3.0),
        },
        SeriesRow {
            date: None,
            sales: Some(99.0),
        },
        SeriesRow {
            date: Some(day(1)),
            sales: Some(1.0),
        },
    ];

    sort_rows_by_date(&mut rows);

    assert_eq!(rows[0].date, Some(day(1)));
    assert_eq!(rows[1].date, Some(day(3)));
    assert_eq!(rows[2].date, None);
}

#[test]
fn test_sort_is_stable_for_equal_dates() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut rows = vec![
        SeriesRow {
            date: Some(day),
            sales: Some(1.0),
        },
        SeriesRow {
            date: Some(day),
            sales: None,
        },
    ];

    sort_rows_by_date(&mut rows);

    // The target-style row arrived second and stays second
    assert_eq!(rows[0].sales, Some(1.0));
    assert_eq!(rows[1].sales, None);
}

#[test]
fn test_csv_loader_detects_columns() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Order Date,Total Sales").unwrap();
    writeln!(file, "2024-01-01,100.5").unwrap();
    writeln!(file, "2024-01-02,98.25").unwrap();

    let records = HistoryLoader::from_csv(file.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, "2024-01-01");
    assert_eq!(records[1].sales, 98.25);
}

#[test]
fn test_csv_loader_rejects_unknown_headers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "foo,bar").unwrap();
    writeln!(file, "a,b").unwrap();

    let result = HistoryLoader::from_csv(file.path());
    assert!(matches!(result, Err(PredictError::InvalidInput(_))));
}

#[test]
fn test_csv_loader_rejects_non_numeric_sales() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Orderdate,Sales").unwrap();
    writeln!(file, "2024-01-01,lots").unwrap();

    let result = HistoryLoader::from_csv(file.path());
    assert!(matches!(result, Err(PredictError::InvalidInput(_))));
}
