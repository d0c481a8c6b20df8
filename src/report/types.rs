use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::BackendOutcome;
use crate::compare::ComparisonOutcome;
use crate::fixture::TestCase;

/// One backend's outcome for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendRunEntry {
    pub test_case: TestCase,
    pub result: BackendOutcome,
}

/// A backend's outcomes keyed by test-case name.
pub type BackendRun = BTreeMap<String, BackendRunEntry>;

/// Both backends' outcomes and their comparison for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub test_case: TestCase,
    pub served: BackendOutcome,
    pub reference: BackendOutcome,
    pub comparison: ComparisonOutcome,
}

impl ComparisonEntry {
    /// Both backends succeeded.
    pub fn is_successful(&self) -> bool {
        self.served.is_success() && self.reference.is_success()
    }
}

/// Comparison entries keyed by test-case name.
pub type ComparisonReport = BTreeMap<String, ComparisonEntry>;

/// Aggregate figures over a comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub total_tests: usize,
    /// Test cases where both backends succeeded.
    pub successful_tests: usize,
    pub ranking_matches: usize,
    /// `successful_tests / total_tests`, 0 for an empty report.
    pub success_rate: f64,
    /// `ranking_matches / successful_tests`; `None` without successful tests.
    pub ranking_match_rate: Option<f64>,
    /// Mean similarity over successful tests; `None` without successful tests.
    pub mean_score_similarity: Option<f64>,
}

impl RunSummary {
    pub fn from_report(report: &ComparisonReport) -> Self {
        let total_tests = report.len();
        let successful: Vec<&ComparisonEntry> =
            report.values().filter(|e| e.is_successful()).collect();
        let successful_tests = successful.len();
        let ranking_matches = report
            .values()
            .filter(|e| e.comparison.ranking_match)
            .count();

        let success_rate = if total_tests > 0 {
            successful_tests as f64 / total_tests as f64
        } else {
            0.0
        };

        let (ranking_match_rate, mean_score_similarity) = if successful_tests > 0 {
            let similarity_sum: f64 = successful
                .iter()
                .map(|e| e.comparison.score_similarity)
                .sum();
            (
                Some(ranking_matches as f64 / successful_tests as f64),
                Some(similarity_sum / successful_tests as f64),
            )
        } else {
            (None, None)
        };

        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_tests,
            successful_tests,
            ranking_matches,
            success_rate,
            ranking_match_rate,
            mean_score_similarity,
        }
    }
}

/// Success figures for a single backend run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendRunStats {
    pub total_tests: usize,
    pub successful_tests: usize,
}

impl BackendRunStats {
    pub fn from_run(run: &BackendRun) -> Self {
        Self {
            total_tests: run.len(),
            successful_tests: run.values().filter(|e| e.result.is_success()).count(),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            self.successful_tests as f64 / self.total_tests as f64
        }
    }
}
