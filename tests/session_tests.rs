//! End-to-end tests driving a `Session` over CSV fixtures.

use pretty_assertions::assert_eq;
use stat_explorer::charts::ChartData;
use stat_explorer::data::ColumnKind;
use stat_explorer::messages;
use stat_explorer::stats::{TTestVariant, TestMethod, TestResult, Verdict};
use stat_explorer::{AppConfig, LoadedView, Session, SessionView};
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn open(filename: &str) -> Session {
    let mut session = Session::new(&AppConfig::default());
    session.upload_path(&fixtures_path().join(filename));
    session
}

fn loaded(session: &Session) -> LoadedView {
    match session.render() {
        SessionView::Loaded(view) => view,
        other => panic!("expected a loaded view, got {other:?}"),
    }
}

// ============================================================================
// Upload and imputation
// ============================================================================

#[test]
fn test_city_age_example() {
    let mut session = open("people.csv");
    session.select_second("age").unwrap();

    let view = loaded(&session);
    assert_eq!(view.source, "people.csv");
    assert_eq!(view.rows, 8);
    assert_eq!(view.columns, vec!["city", "age", "income", "smoker"]);

    // Missing age and income are filled with their medians
    let dataset = session.dataset().unwrap();
    assert_eq!(dataset.frame().column("age").unwrap().null_count(), 0);
    assert_eq!(dataset.frame().column("income").unwrap().null_count(), 0);
    assert_eq!(dataset.numeric_values("age").unwrap()[2], 34.0);
    assert_eq!(dataset.numeric_values("income").unwrap()[4], 47000.0);
    assert_eq!(view.imputation.total_filled(), 2);

    let analysis = view.analysis.unwrap();
    assert_eq!(analysis.selection.first(), "city");
    assert_eq!(analysis.selection.second(), "age");

    let [first, second] = &analysis.charts;
    match first {
        ChartData::Pie(pie) => {
            assert_eq!(pie.title, "Распределение city");
            let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
            assert_eq!(labels, vec!["Moscow", "Kazan", "Omsk"]);
            let total: f64 = pie.slices.iter().map(|s| s.percent).sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
        other => panic!("expected pie chart for city, got {other:?}"),
    }
    match second {
        ChartData::Box(data) => {
            let summary = data.summary.as_ref().unwrap();
            assert_eq!(summary.count, 8);
            assert_eq!(summary.median, 34.0);
        }
        other => panic!("expected box plot for age, got {other:?}"),
    }
    assert!(analysis.outcome.is_none());
}

#[test]
fn test_na_tokens_are_imputed() {
    let mut session = open("na_tokens.csv");
    session.select_second("age").unwrap();

    let dataset = session.dataset().unwrap();
    assert_eq!(dataset.column_kind("age"), Some(ColumnKind::Numeric));
    assert_eq!(
        dataset.numeric_values("age").unwrap(),
        vec![30.0, 35.0, 40.0, 35.0, 35.0]
    );

    let view = loaded(&session);
    assert_eq!(view.imputation.total_filled(), 2);
    let analysis = view.analysis.unwrap();
    assert!(matches!(analysis.charts[1], ChartData::Box(_)));

    session.set_method(TestMethod::TTest);
    session.select_first("age").unwrap();
    session.select_second("city").unwrap();
    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap();
    assert!(outcome.is_err());
}

#[test]
fn test_malformed_file_stops_pipeline() {
    let session = open("malformed.csv");

    assert!(session.dataset().is_none());
    match session.render() {
        SessionView::LoadFailed { source, message } => {
            assert_eq!(source, "malformed.csv");
            assert_eq!(message, messages::PARSE_ERROR);
            assert!(message.starts_with("Ошибка: Неверный формат CSV-файла"));
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn test_reupload_after_failure_recovers() {
    let mut session = open("malformed.csv");
    session.upload_path(&fixtures_path().join("survey.csv"));

    let view = loaded(&session);
    assert_eq!(view.columns, vec!["gender", "preference"]);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_second_options_always_exclude_first() {
    let mut session = open("people.csv");
    for column in ["city", "age", "income", "smoker"] {
        session.select_first(column).unwrap();
        let analysis = loaded(&session).analysis.unwrap();
        assert_eq!(analysis.selection.first(), column);
        assert_ne!(analysis.selection.second(), column);
        assert_eq!(analysis.second_options.len(), 3);
        assert!(!analysis.second_options.iter().any(|c| c == column));
    }
}

#[test]
fn test_alpha_stays_in_range() {
    let mut session = open("people.csv");
    for raw in [-5.0, 0.0, 0.009, 0.031, 0.099, 0.2, f64::INFINITY] {
        session.set_alpha(raw);
        let alpha = session.alpha().value();
        assert!((0.01..=0.1).contains(&alpha), "{raw} gave {alpha}");
    }
}

// ============================================================================
// Hypothesis tests
// ============================================================================

#[test]
fn test_chi_square_on_survey() {
    let mut session = open("survey.csv");
    session.set_method(TestMethod::ChiSquare);

    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap().unwrap();
    let TestResult::ChiSquare(result) = &outcome else {
        panic!("expected chi-square result");
    };
    assert_eq!(result.degrees_of_freedom, 1);
    assert!((result.statistic - 5.0).abs() < 1e-9);
    assert_eq!(result.table.row_labels, vec!["female", "male"]);
    assert_eq!(result.table.col_labels, vec!["coffee", "tea"]);
    assert_eq!(result.table.counts, vec![vec![8, 2], vec![2, 8]]);
    assert_eq!(outcome.verdict(), Verdict::Significant);
    assert_eq!(
        outcome.summary_lines().last().unwrap(),
        messages::CHI_SQUARE_SIGNIFICANT
    );

    // p is about 0.025, so a stricter alpha flips the verdict
    session.set_alpha(0.01);
    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap().unwrap();
    assert_eq!(outcome.verdict(), Verdict::NotSignificant);
    assert_eq!(
        outcome.summary_lines().last().unwrap(),
        messages::CHI_SQUARE_NOT_SIGNIFICANT
    );
}

#[test]
fn test_verdict_matches_p_value() {
    let mut session = open("people.csv");
    session.select_first("age").unwrap();
    session.select_second("income").unwrap();

    for method in [TestMethod::ChiSquare, TestMethod::TTest] {
        session.set_method(method);
        for raw in [0.01, 0.05, 0.1] {
            session.set_alpha(raw);
            let outcome = loaded(&session).analysis.unwrap().outcome.unwrap().unwrap();
            assert_eq!(
                outcome.verdict().is_significant(),
                outcome.p_value() < session.alpha().value()
            );
        }
    }
}

#[test]
fn test_t_test_on_numeric_pair() {
    let mut session = open("people.csv");
    session.select_first("age").unwrap();
    session.select_second("income").unwrap();
    session.set_method(TestMethod::TTest);

    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap().unwrap();
    let TestResult::TTest(result) = &outcome else {
        panic!("expected t-test result");
    };
    assert_eq!(result.sizes, (8, 8));
    assert_eq!(result.variant, TTestVariant::Student);
    assert_eq!(result.degrees_of_freedom, 14.0);
    assert!(result.statistic < 0.0);
    assert_eq!(result.verdict, Verdict::Significant);

    session.set_variant(TTestVariant::Welch);
    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap().unwrap();
    let TestResult::TTest(welch) = outcome else {
        panic!("expected t-test result");
    };
    assert_eq!(welch.variant, TTestVariant::Welch);
    assert!(welch.degrees_of_freedom < 14.0);
}

#[test]
fn test_t_test_on_text_column_reports_error() {
    let mut session = open("people.csv");
    session.set_method(TestMethod::TTest);

    let outcome = loaded(&session).analysis.unwrap().outcome.unwrap();
    assert!(outcome.is_err());
}
