//! Application state for the HTTP server

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use vicinity_core::Dataset;

use crate::config::AnalysisDefaults;

/// Shared by all handlers; the dataset is read-only after startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub defaults: Arc<AnalysisDefaults>,
    /// Upper bound for one analysis even if its request is never dropped
    pub analysis_timeout: Duration,
    running: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(dataset: Dataset, defaults: AnalysisDefaults, analysis_timeout: Duration) -> Self {
        Self {
            dataset: Arc::new(dataset),
            defaults: Arc::new(defaults),
            analysis_timeout,
            running: Arc::default(),
        }
    }

    /// Analyses whose blocking work has not returned yet, including ones
    /// whose request is already gone
    pub fn running_analyses(&self) -> usize {
        self.running.load(Ordering::Acquire)
    }

    /// Counts an analysis as running until the returned ticket is dropped
    pub(crate) fn start_analysis(&self) -> RunningAnalysis {
        self.running.fetch_add(1, Ordering::AcqRel);
        RunningAnalysis {
            running: self.running.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct RunningAnalysis {
    running: Arc<AtomicUsize>,
}

impl Drop for RunningAnalysis {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::AcqRel);
    }
}
