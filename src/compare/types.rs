use serde::{Deserialize, Serialize};

/// Wall-clock time each backend spent on the test case, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Performance {
    pub served_time: f64,
    pub reference_time: f64,
}

/// Error messages captured from failed backend calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendErrors {
    pub served: Option<String>,
    pub reference: Option<String>,
}

/// Outcome of comparing two backends on one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    /// Both backends returned the same documents in the same order.
    pub ranking_match: bool,
    /// Agreement of the normalized score curves, in `[0, 1]`.
    pub score_similarity: f64,
    pub served_ranking: Vec<String>,
    pub reference_ranking: Vec<String>,
    pub performance: Performance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BackendErrors>,
}

impl ComparisonOutcome {
    /// Returns `true` if either backend failed.
    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}

impl std::fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(errors) = &self.errors {
            return write!(
                f,
                "FAILED (served: {}, reference: {})",
                errors.served.as_deref().unwrap_or("ok"),
                errors.reference.as_deref().unwrap_or("ok")
            );
        }

        write!(
            f,
            "ranking_match={} score_similarity={:.3}",
            if self.ranking_match { "YES" } else { "NO" },
            self.score_similarity
        )
    }
}
