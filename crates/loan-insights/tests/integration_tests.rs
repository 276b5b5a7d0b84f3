//! Integration tests for the loader and the analyzer.
//!
//! These tests run the public API end to end against the fixture files and
//! temporary directories.

use loan_insights::{
    AnalyzerConfig, CleanOptions, ColumnKind, DataLoader, FileFormat, InsightsError, LoadOptions,
    LoanAnalyzer, LoaderConfig, MissingPolicy, SampleOptions, SaveOptions, SyntheticOptions,
    Table,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> Table {
    DataLoader::default()
        .load(fixtures_path().join(filename), &LoadOptions::default())
        .expect("Failed to load fixture")
}

fn loans() -> Table {
    load_fixture("loan_applications.csv")
}

fn roundtrip(table: &Table, filename: &str) -> Table {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(filename);
    let loader = DataLoader::default();
    loader.save(table, &path, &SaveOptions::default()).unwrap();
    loader.load(&path, &LoadOptions::default()).unwrap()
}

// ============================================================================
// Loading and Describing
// ============================================================================

#[test]
fn test_load_fixture_types() {
    let table = loans();
    assert_eq!(table.shape(), (10, 11));
    assert_eq!(table.kind("APPLICATION_ID"), Some(ColumnKind::Integer));
    assert_eq!(table.kind("GENDER"), Some(ColumnKind::Text));
    assert_eq!(table.kind("MONTHLY_INCOME"), Some(ColumnKind::Float));
    assert_eq!(table.kind("LOAN_AMOUNT"), Some(ColumnKind::Integer));
    assert_eq!(table.kind("APPLIED_ON"), Some(ColumnKind::Date));
}

#[test]
fn test_describe_fixture() {
    let info = DataLoader::default().describe(&loans()).unwrap();

    assert_eq!(info.rows, 10);
    assert_eq!(info.columns, 11);
    assert_eq!(info.duplicate_rows, 1);
    assert_eq!(info.total_missing, 4);
    assert_eq!(info.date_columns, vec!["APPLIED_ON"]);
    assert!(info.numeric_columns.contains(&"INTEREST_RATE".to_string()));

    let gender = info
        .column_info
        .iter()
        .find(|c| c.name == "GENDER")
        .unwrap();
    assert_eq!(gender.missing, 1);
    assert_eq!(gender.missing_pct, 10.0);
    assert_eq!(gender.distinct, 2);
}

#[test]
fn test_missing_file_is_not_found() {
    let err = DataLoader::default()
        .load("missing.csv", &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, InsightsError::NotFound(_)));
    assert_eq!(err.http_status(), 404);
}

#[test]
fn test_malformed_csv_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "a,b\n1,2\n3,4,5,6\n\"unterminated").unwrap();

    let err = DataLoader::default()
        .load(&path, &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, InsightsError::Parse { .. }));
}

#[test]
fn test_csv_null_markers_are_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markers.csv");
    std::fs::write(
        &path,
        "INCOME,RATE,CITY\n100,1.5,Lagos\nNA,NaN,N/A\n300,2.5,null\n",
    )
    .unwrap();

    let loader = DataLoader::default();
    let table = loader.load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.kind("INCOME"), Some(ColumnKind::Integer));
    assert_eq!(table.kind("RATE"), Some(ColumnKind::Float));
    assert_eq!(loader.describe(&table).unwrap().total_missing, 4);

    let income = LoanAnalyzer::default()
        .numeric_distribution(&table, "INCOME")
        .unwrap();
    assert_eq!(income.count, 2);
    assert_eq!(income.missing, 1);
    assert_eq!(income.mean, 200.0);
}

#[test]
fn test_csv_nan_literal_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.csv");
    std::fs::write(&path, "RATE\n1.5\nNaN\n2.5\n").unwrap();

    // No markers configured: the reader yields a float NaN
    let config = LoaderConfig::builder()
        .null_values(Vec::<String>::new())
        .build()
        .unwrap();
    let loader = DataLoader::new(config);
    let table = loader.load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(table.kind("RATE"), Some(ColumnKind::Float));

    let summary = LoanAnalyzer::default()
        .numeric_distribution(&table, "RATE")
        .unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.missing, 1);
    assert_eq!(summary.mean, 2.0);
    assert_eq!(summary.max, 2.5);

    assert_eq!(loader.describe(&table).unwrap().total_missing, 1);
    let cleaned = loader.clean(&table, &CleanOptions::default()).unwrap();
    assert_eq!(cleaned.height(), 2);
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_roundtrip_csv() {
    let table = loans();
    assert_eq!(roundtrip(&table, "loans.csv"), table);
}

#[test]
fn test_roundtrip_json() {
    let table = loans();
    assert_eq!(roundtrip(&table, "loans.json"), table);
}

#[test]
fn test_roundtrip_json_lines() {
    let table = loans();
    assert_eq!(roundtrip(&table, "loans.jsonl"), table);
}

#[test]
fn test_roundtrip_parquet() {
    let table = loans();
    assert_eq!(roundtrip(&table, "loans.parquet"), table);
}

#[test]
fn test_roundtrip_spreadsheet() {
    let table = loans();
    assert_eq!(roundtrip(&table, "loans.xlsx"), table);
}

#[test]
fn test_roundtrip_spreadsheet_whole_floats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incomes.csv");
    std::fs::write(&path, "ID,INCOME\n1,50000.0\n2,60000.0\n3,\n").unwrap();
    let table = DataLoader::default()
        .load(&path, &LoadOptions::default())
        .unwrap();
    assert_eq!(table.kind("INCOME"), Some(ColumnKind::Float));

    let loaded = roundtrip(&table, "incomes.xlsx");
    assert_eq!(loaded.kind("INCOME"), Some(ColumnKind::Float));
    assert_eq!(loaded, table);
}

#[test]
fn test_roundtrip_spreadsheet_datetimes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stamps.csv");
    std::fs::write(
        &path,
        "ID,SUBMITTED_AT\n1,2024-01-05 10:30:00\n2,2024-02-11 08:15:45\n",
    )
    .unwrap();
    let table = DataLoader::default()
        .load(&path, &LoadOptions::default())
        .unwrap();
    assert_eq!(table.kind("SUBMITTED_AT"), Some(ColumnKind::Date));

    let loaded = roundtrip(&table, "stamps.xlsx");
    assert_eq!(
        loaded.frame().column("SUBMITTED_AT").unwrap().dtype(),
        table.frame().column("SUBMITTED_AT").unwrap().dtype()
    );
    assert_eq!(loaded, table);
}

#[test]
fn test_spreadsheet_sheet_selection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    let loader = DataLoader::default();
    let table = loans();
    loader.save(&table, &path, &SaveOptions::default()).unwrap();

    let by_name = loader
        .load(&path, &LoadOptions::default().with_sheet("Sheet1"))
        .unwrap();
    let by_index = loader
        .load(&path, &LoadOptions::default().with_sheet("0"))
        .unwrap();
    assert_eq!(by_name, table);
    assert_eq!(by_index, table);

    let err = loader
        .load(&path, &LoadOptions::default().with_sheet("7"))
        .unwrap_err();
    assert!(matches!(err, InsightsError::Parse { .. }));
}

#[test]
fn test_save_with_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::default()
        .save(&loans(), dir.path().join("loans.pickle"), &SaveOptions::default())
        .unwrap_err();
    assert!(matches!(err, InsightsError::UnsupportedFormat(_)));

    DataLoader::default()
        .save(
            &loans(),
            dir.path().join("loans.pickle"),
            &SaveOptions::with_format(FileFormat::Csv),
        )
        .unwrap();
}

// ============================================================================
// Cleaning and Sampling
// ============================================================================

#[test]
fn test_clean_drop_fixture() {
    let cleaned = DataLoader::default()
        .clean(&loans(), &CleanOptions::default())
        .unwrap();
    // Four rows have a gap and one row repeats another
    assert_eq!(cleaned.height(), 5);
    assert_eq!(cleaned.missing_count(), 0);
}

#[test]
fn test_clean_fill_fixture() {
    let loader = DataLoader::default();
    let cleaned = loader
        .clean(&loans(), &CleanOptions::new(true, MissingPolicy::Fill))
        .unwrap();
    assert_eq!(cleaned.height(), 9);
    assert_eq!(cleaned.missing_count(), 0);

    let genders = LoanAnalyzer::default()
        .categorical_distribution(&cleaned, "GENDER")
        .unwrap();
    assert_eq!(genders.get("Unknown").unwrap().count, 1);
}

#[test]
fn test_clean_is_idempotent() {
    let loader = DataLoader::default();
    for policy in [
        MissingPolicy::Drop,
        MissingPolicy::Fill,
        MissingPolicy::Interpolate,
    ] {
        let options = CleanOptions::new(true, policy);
        let once = loader.clean(&loans(), &options).unwrap();
        let twice = loader.clean(&once, &options).unwrap();
        assert_eq!(once, twice, "policy {}", policy);
    }
}

#[test]
fn test_sample_is_reproducible() {
    let loader = DataLoader::default();
    let table = loans();
    let options = SampleOptions::size(5).with_seed(11);

    let first = loader.sample(&table, &options).unwrap();
    let second = loader.sample(&table, &options).unwrap();
    assert_eq!(first.height(), 5);
    assert_eq!(first, second);

    let other_seed = loader
        .sample(&table, &SampleOptions::size(5).with_seed(12))
        .unwrap();
    assert_eq!(other_seed.height(), 5);
    assert_eq!(other_seed.width(), table.width());
}

#[test]
fn test_sample_size_and_fraction_conflict() {
    let options = SampleOptions {
        size: Some(3),
        fraction: Some(0.5),
        ..SampleOptions::default()
    };
    let err = DataLoader::default()
        .sample(&loans(), &options)
        .unwrap_err();
    assert!(matches!(err, InsightsError::InvalidArgument(_)));
    assert_eq!(err.http_status(), 400);
}

#[test]
fn test_sample_larger_than_table() {
    let err = DataLoader::default()
        .sample(&loans(), &SampleOptions::size(11))
        .unwrap_err();
    assert!(matches!(err, InsightsError::InvalidArgument(_)));
}

#[test]
fn test_synthetic_roundtrip_parquet() {
    let loader = DataLoader::default();
    let options = SyntheticOptions {
        rows: 200,
        ..SyntheticOptions::default()
    };
    let table = loader.generate_synthetic(&options).unwrap();
    assert_eq!(roundtrip(&table, "synthetic.parquet"), table);
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn test_gender_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gender.csv");
    std::fs::write(&path, "Gender\nMale\nFemale\nMale\nMale\n").unwrap();

    let table = DataLoader::default()
        .load(&path, &LoadOptions::default())
        .unwrap();
    let dist = LoanAnalyzer::default()
        .categorical_distribution(&table, "Gender")
        .unwrap();

    assert_eq!(
        serde_json::to_value(&dist).unwrap(),
        serde_json::json!({
            "Male": {"count": 3, "pct": 75.0},
            "Female": {"count": 1, "pct": 25.0}
        })
    );
}

#[test]
fn test_fixture_percentages_sum_to_hundred() {
    let table = loans();
    let analyzer = LoanAnalyzer::default();
    for column in ["GENDER", "STATUS", "ADDRESS_STATE_CODE", "EMPLOYMENT_TYPE"] {
        let dist = analyzer.categorical_distribution(&table, column).unwrap();
        let sum: f64 = dist.entries().iter().map(|(_, share)| share.pct).sum();
        assert!((sum - 100.0).abs() <= 1.0, "{}: {}", column, sum);
    }
}

#[test]
fn test_numeric_view_on_text_column() {
    let err = LoanAnalyzer::default()
        .numeric_distribution(&loans(), "GENDER")
        .unwrap_err();
    assert!(matches!(err, InsightsError::NonNumericColumn { .. }));
}

#[test]
fn test_identical_values_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.csv");
    std::fs::write(&path, "RATE\n4.2\n4.2\n4.2\n4.2\n").unwrap();

    let table = DataLoader::default()
        .load(&path, &LoadOptions::default())
        .unwrap();
    let summary = LoanAnalyzer::default()
        .numeric_distribution(&table, "RATE")
        .unwrap();
    assert_eq!(summary.std, 0.0);
    assert_eq!(summary.min, 4.2);
    assert_eq!(summary.max, 4.2);
    assert_eq!(summary.mean, 4.2);
}

#[test]
fn test_summary_metrics_fixture() {
    let metrics = LoanAnalyzer::default().summary_metrics(&loans()).unwrap();

    assert_eq!(metrics.total_rows, 10);
    assert_eq!(metrics.category_column.as_deref(), Some("GENDER"));
    assert_eq!(metrics.top_status.as_deref(), Some("Approved"));
    assert_eq!(metrics.approval_rate, Some(60.0));
    assert_eq!(metrics.total_amount, Some(1_260_000.0));
    // The default numeric column INCOME is absent from this table
    assert!(metrics.numeric_mean.is_none());
    assert_eq!(metrics.warnings.len(), 1);
}

#[test]
fn test_summary_metrics_with_custom_columns() {
    let config = AnalyzerConfig::builder()
        .numeric_column("MONTHLY_INCOME")
        .build()
        .unwrap();
    let metrics = LoanAnalyzer::new(config).summary_metrics(&loans()).unwrap();
    assert!(metrics.numeric_mean.is_some());
    assert!(metrics.warnings.is_empty());
}

#[test]
fn test_cross_distribution_fixture() {
    let cross = LoanAnalyzer::default()
        .cross_distribution(&loans(), "GENDER", "STATUS")
        .unwrap();
    assert_eq!(cross["Female"]["Approved"], 4);
    assert_eq!(cross["Male"]["Rejected"], 2);
    assert!(!cross["Female"].contains_key("Rejected"));
}

#[test]
fn test_analyze_fixture() {
    let report = LoanAnalyzer::default().analyze(&loans()).unwrap();

    assert_eq!(report.gender_distribution.as_ref().unwrap().total(), 9);
    assert_eq!(report.income_stats["MONTHLY_INCOME"].count, 9);
    assert_eq!(report.income_stats["MONTHLY_INCOME"].missing, 1);
    assert_eq!(report.loan_amount_stats["LOAN_AMOUNT"].sum, 1_260_000.0);
    assert_eq!(report.status_counts.as_ref().unwrap().total(), 10);

    let states = report.geographic.states.as_ref().unwrap();
    assert_eq!(states.distinct, 4);
    assert_eq!(states.top.mode(), Some("LA"));

    assert_eq!(report.column_groups.employment, vec!["EMPLOYMENT_TYPE"]);
}

#[test]
fn test_error_serializes_for_api_layers() {
    let err = LoanAnalyzer::default()
        .categorical_distribution(&loans(), "SEX")
        .unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "COLUMN_NOT_FOUND");
    assert_eq!(err.http_status(), 404);
}
