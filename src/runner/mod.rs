//! Drives backends over the test cases and joins their runs.

#[cfg(test)]
mod tests;

use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{BackendOutcome, RerankBackend};
use crate::compare::compare;
use crate::fixture::TestCase;
use crate::report::{BackendRun, BackendRunEntry, ComparisonEntry, ComparisonReport};

/// Runs `backend` over every test case in order.
pub async fn run_backend<B>(backend: &B, cases: &[TestCase]) -> BackendRun
where
    B: RerankBackend + ?Sized,
{
    let mut run = BackendRun::new();

    for case in cases {
        let outcome = backend.rerank(case).await;

        info!(
            backend = backend.name(),
            test_case = %case.name,
            success = outcome.is_success(),
            elapsed_ms = outcome.elapsed().as_millis() as u64,
            "Backend call finished"
        );

        run.insert(
            case.name.clone(),
            BackendRunEntry {
                test_case: case.clone(),
                result: outcome,
            },
        );
    }

    run
}

/// A run in which every test case failed with `error` (e.g. the model never loaded).
pub fn failed_run(cases: &[TestCase], error: &str) -> BackendRun {
    cases
        .iter()
        .map(|case| {
            (
                case.name.clone(),
                BackendRunEntry {
                    test_case: case.clone(),
                    result: BackendOutcome::failure(error, Duration::ZERO),
                },
            )
        })
        .collect()
}

/// Compares the two runs for every test case present in both.
pub fn compare_runs(
    cases: &[TestCase],
    served: &BackendRun,
    reference: &BackendRun,
) -> ComparisonReport {
    let mut report = ComparisonReport::new();

    for case in cases {
        let (Some(served_entry), Some(reference_entry)) =
            (served.get(&case.name), reference.get(&case.name))
        else {
            warn!(test_case = %case.name, "Missing from a backend run, not compared");
            continue;
        };

        let comparison = compare(&served_entry.result, &reference_entry.result);

        report.insert(
            case.name.clone(),
            ComparisonEntry {
                test_case: case.clone(),
                served: served_entry.result.clone(),
                reference: reference_entry.result.clone(),
                comparison,
            },
        );
    }

    report
}
