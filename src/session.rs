//! Interactive session state.
//!
//! Holds the user's current inputs and recomputes every visible output from
//! them. The GUI owns one `Session`, forwards widget changes to it and calls
//! [`Session::render`] whenever [`Session::revision`] moves.

use crate::charts::ChartData;
use crate::config::AppConfig;
use crate::data::{
    second_choices, ColumnSelection, DataLoader, Dataset, ImputationReport, ImputerError,
    LoaderError, MedianImputer, SelectionError,
};
use crate::messages;
use crate::stats::{Alpha, HypothesisError, HypothesisTester, TTestVariant, TestMethod, TestResult};
use std::path::Path;
use tracing::{debug, info, warn};

/// Current user inputs plus the imputed dataset.
#[derive(Debug)]
pub struct Session {
    loader: DataLoader,
    dataset: Option<Dataset>,
    imputation: ImputationReport,
    load_error: Option<LoadFailure>,
    selection: Option<ColumnSelection>,
    alpha: Alpha,
    method: TestMethod,
    variant: TTestVariant,
    revision: u64,
}

/// Upload that produced no usable dataset.
#[derive(Debug, Clone)]
struct LoadFailure {
    source: String,
    message: &'static str,
}

/// Everything the results area shows for one state of the session.
#[derive(Debug, Clone)]
pub enum SessionView {
    AwaitingUpload,
    LoadFailed { source: String, message: String },
    Loaded(LoadedView),
}

#[derive(Debug, Clone)]
pub struct LoadedView {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub imputation: ImputationReport,
    /// `None` when the dataset has fewer than two columns.
    pub analysis: Option<AnalysisView>,
}

#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub selection: ColumnSelection,
    pub second_options: Vec<String>,
    pub charts: [ChartData; 2],
    pub alpha: Alpha,
    pub method: TestMethod,
    /// `None` until a test method is chosen.
    pub outcome: Option<Result<TestResult, HypothesisError>>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            loader: DataLoader::new(config.infer_schema_length),
            dataset: None,
            imputation: ImputationReport::default(),
            load_error: None,
            selection: None,
            alpha: config.alpha(),
            method: TestMethod::None,
            variant: config.t_test_variant,
            revision: 0,
        }
    }

    /// Bumped on every input change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Read and load a file picked by the user.
    pub fn upload_path(&mut self, path: &Path) {
        let result = self.loader.load_path(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.finish_upload(&name, result);
    }

    /// Load an uploaded byte stream, replacing the current dataset.
    pub fn upload_bytes(&mut self, name: &str, bytes: Vec<u8>) {
        let result = self.loader.load_bytes(name, bytes);
        self.finish_upload(name, result);
    }

    fn finish_upload(&mut self, name: &str, result: Result<Dataset, LoaderError>) {
        match result {
            Ok(mut dataset) => {
                let imputation = MedianImputer::apply(&mut dataset);
                self.accept_dataset(name, dataset, imputation);
            }
            Err(err) => {
                warn!("Upload of {} rejected: {}", name, err);
                self.reject_upload(name, err.user_message());
            }
        }
    }

    /// Drop the current dataset and show `message` instead.
    fn reject_upload(&mut self, name: &str, message: &'static str) {
        self.touch();
        self.dataset = None;
        self.imputation = ImputationReport::default();
        self.selection = None;
        self.load_error = Some(LoadFailure {
            source: name.to_string(),
            message,
        });
    }

    fn accept_dataset(
        &mut self,
        name: &str,
        dataset: Dataset,
        imputation: Result<ImputationReport, ImputerError>,
    ) {
        // Nothing may read a dataset whose imputation did not complete
        self.imputation = match imputation {
            Ok(report) => report,
            Err(err) => {
                warn!("Imputation failed for {}: {}", name, err);
                self.reject_upload(name, messages::IMPUTE_ERROR);
                return;
            }
        };
        self.touch();

        info!(
            "Session dataset {}: {} rows, {} cells imputed",
            name,
            dataset.get_row_count(),
            self.imputation.total_filled()
        );

        let columns = dataset.get_columns();
        self.selection = match &self.selection {
            Some(previous)
                if columns.iter().any(|c| c == previous.first())
                    && columns.iter().any(|c| c == previous.second()) =>
            {
                Some(previous.clone())
            }
            _ => ColumnSelection::default_for(&columns).ok(),
        };
        self.load_error = None;
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn columns(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(Dataset::get_columns)
            .unwrap_or_default()
    }

    pub fn selection(&self) -> Option<&ColumnSelection> {
        self.selection.as_ref()
    }

    pub fn select_first(&mut self, column: &str) -> Result<(), SelectionError> {
        let columns = self.columns();
        let current = self
            .selection
            .as_ref()
            .ok_or(SelectionError::NotEnoughColumns)?;
        let next = current.with_first(&columns, column)?;
        debug!("First column -> {} (second {})", next.first(), next.second());
        self.selection = Some(next);
        self.touch();
        Ok(())
    }

    pub fn select_second(&mut self, column: &str) -> Result<(), SelectionError> {
        let columns = self.columns();
        let current = self
            .selection
            .as_ref()
            .ok_or(SelectionError::NotEnoughColumns)?;
        let next = current.with_second(&columns, column)?;
        debug!("Second column -> {}", next.second());
        self.selection = Some(next);
        self.touch();
        Ok(())
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    /// Set alpha from a raw slider value; it is clamped and snapped.
    pub fn set_alpha(&mut self, raw: f64) {
        let alpha = Alpha::from_slider(raw);
        if alpha != self.alpha {
            self.alpha = alpha;
            self.touch();
        }
    }

    pub fn method(&self) -> TestMethod {
        self.method
    }

    pub fn set_method(&mut self, method: TestMethod) {
        if method != self.method {
            self.method = method;
            self.touch();
        }
    }

    pub fn variant(&self) -> TTestVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: TTestVariant) {
        if variant != self.variant {
            self.variant = variant;
            self.touch();
        }
    }

    /// Recompute every output from the current inputs.
    pub fn render(&self) -> SessionView {
        if let Some(failure) = &self.load_error {
            return SessionView::LoadFailed {
                source: failure.source.clone(),
                message: failure.message.to_string(),
            };
        }
        let Some(dataset) = &self.dataset else {
            return SessionView::AwaitingUpload;
        };

        let columns = dataset.get_columns();
        let analysis = self.selection.as_ref().and_then(|selection| {
            let charts = ChartData::for_selection(dataset, selection)?;
            let outcome =
                HypothesisTester::run(self.method, dataset, selection, self.alpha, self.variant);
            Some(AnalysisView {
                selection: selection.clone(),
                second_options: second_choices(&columns, selection.first())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                charts,
                alpha: self.alpha,
                method: self.method,
                outcome,
            })
        });

        SessionView::Loaded(LoadedView {
            source: dataset.source().to_string(),
            rows: dataset.get_row_count(),
            columns,
            imputation: self.imputation.clone(),
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::PolarsError;

    fn session_with(csv: &str) -> Session {
        let mut session = Session::new(&AppConfig::default());
        session.upload_bytes("data.csv", csv.as_bytes().to_vec());
        session
    }

    #[test]
    fn test_starts_awaiting_upload() {
        let session = Session::new(&AppConfig::default());
        assert!(matches!(session.render(), SessionView::AwaitingUpload));
        assert_eq!(session.alpha().value(), 0.05);
        assert_eq!(session.method(), TestMethod::None);
    }

    #[test]
    fn test_revision_moves_on_changes_only() {
        let mut session = session_with("a,b\n1,2\n3,4\n");
        let rev = session.revision();

        session.set_alpha(0.05);
        session.set_method(TestMethod::None);
        assert_eq!(session.revision(), rev);

        session.set_alpha(0.08);
        assert_eq!(session.revision(), rev + 1);
        session.set_method(TestMethod::TTest);
        assert_eq!(session.revision(), rev + 2);
    }

    #[test]
    fn test_failed_upload_discards_dataset() {
        let mut session = session_with("a,b\n1,2\n");
        assert!(session.dataset().is_some());

        session.upload_bytes("bad.csv", b"a,b\n1,2,3,4\n".to_vec());

        assert!(session.dataset().is_none());
        assert!(session.selection().is_none());
        match session.render() {
            SessionView::LoadFailed { source, message } => {
                assert_eq!(source, "bad.csv");
                assert_eq!(message, messages::PARSE_ERROR);
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_imputation_rejects_dataset() {
        let mut session = session_with("a,b\n1,\n3,4\n");
        let dataset = session.dataset().cloned().unwrap();

        let err = ImputerError::PolarsError(PolarsError::ComputeError("cast failed".into()));
        session.accept_dataset("broken.csv", dataset, Err(err));

        assert!(session.dataset().is_none());
        assert!(session.selection().is_none());
        match session.render() {
            SessionView::LoadFailed { source, message } => {
                assert_eq!(source, "broken.csv");
                assert_eq!(message, messages::IMPUTE_ERROR);
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn test_single_column_has_no_analysis() {
        let session = session_with("only\n1\n2\n");
        let SessionView::Loaded(view) = session.render() else {
            panic!("expected loaded view");
        };
        assert!(view.analysis.is_none());
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_selection_survives_reupload_when_valid() {
        let mut session = session_with("a,b,c\n1,2,3\n");
        session.select_first("c").unwrap();
        session.upload_bytes("again.csv", b"c,a,b\n1,2,3\n".to_vec());
        let selection = session.selection().unwrap();
        assert_eq!((selection.first(), selection.second()), ("c", "b"));

        session.upload_bytes("other.csv", b"x,y\n1,2\n".to_vec());
        let selection = session.selection().unwrap();
        assert_eq!((selection.first(), selection.second()), ("x", "y"));
    }

    #[test]
    fn test_select_same_column_twice_rejected() {
        let mut session = session_with("a,b\n1,2\n");
        assert!(session.select_second("a").is_err());
        assert_eq!(session.selection().unwrap().second(), "b");
    }
}
