//! Human-readable progress output on stdout.

use crate::backend::BackendOutcome;
use crate::fixture::TestCase;

use super::types::{BackendRunStats, ComparisonEntry, RunSummary};

const RULE_WIDTH: usize = 50;

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn print_header(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_test_case(case: &TestCase) {
    println!();
    println!("Test case: {}", case.name);
    println!("Query: {}", case.query);
    println!("Documents: {}", case.documents.len());
}

pub fn print_backend_outcome(label: &str, outcome: &BackendOutcome) {
    println!(
        "{}: {} ({:.3}s)",
        label,
        outcome.status_label(),
        outcome.elapsed().as_secs_f64()
    );

    match outcome {
        BackendOutcome::Failure { error, .. } => println!("{label} error: {error}"),
        BackendOutcome::Success { result, .. } if !result.is_empty() => {
            println!("Rankings:");
            for (rank, doc) in result.documents.iter().enumerate() {
                println!(
                    "  {}. {} (score: {:.4})",
                    rank + 1,
                    preview(&doc.document, 50),
                    doc.relevance_score
                );
            }
        }
        BackendOutcome::Success { .. } => {}
    }
}

pub fn print_comparison(entry: &ComparisonEntry) {
    print_test_case(&entry.test_case);
    println!(
        "Served: {} ({:.3}s)",
        entry.served.status_label(),
        entry.served.elapsed().as_secs_f64()
    );
    println!(
        "Reference: {} ({:.3}s)",
        entry.reference.status_label(),
        entry.reference.elapsed().as_secs_f64()
    );

    if entry.is_successful() {
        let comparison = &entry.comparison;
        println!(
            "Ranking match: {}",
            if comparison.ranking_match { "YES" } else { "NO" }
        );
        println!("Score similarity: {:.3}", comparison.score_similarity);
        println!("Served:    {}", numbered(&comparison.served_ranking));
        println!("Reference: {}", numbered(&comparison.reference_ranking));
    }

    if let Some(error) = entry.served.error() {
        println!("Served error: {error}");
    }
    if let Some(error) = entry.reference.error() {
        println!("Reference error: {error}");
    }
}

pub fn print_backend_summary(stats: &BackendRunStats) {
    println!();
    print_header("SUMMARY");
    println!("Total tests: {}", stats.total_tests);
    println!("Successful tests: {}", stats.successful_tests);
    println!("Success rate: {:.1}%", stats.success_rate() * 100.0);
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    print_header("SUMMARY");
    println!("Total tests: {}", summary.total_tests);
    println!("Successful tests: {}", summary.successful_tests);
    println!("Ranking matches: {}", summary.ranking_matches);
    println!("Success rate: {:.1}%", summary.success_rate * 100.0);
    match summary.ranking_match_rate {
        Some(rate) => println!("Ranking match rate: {:.1}%", rate * 100.0),
        None => println!("Ranking match rate: N/A"),
    }
    if let Some(similarity) = summary.mean_score_similarity {
        println!("Mean score similarity: {similarity:.3}");
    }
}

fn numbered(ranking: &[String]) -> String {
    ranking
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("{}. {}", i + 1, preview(doc, 30)))
        .collect::<Vec<_>>()
        .join(" | ")
}
