//! Result comparison between the served and reference rerankers.
//!
//! Two outcomes for the same test case are compared on two axes:
//!
//! - **ranking match**: the document orderings are element-wise equal;
//! - **score similarity**: each score sequence is min-max normalized on its own,
//!   then compared position by position (`1 - mean absolute difference`).
//!
//! Scores from different backends live on different scales (logits vs.
//! probabilities), so only the normalized curve shapes are compared. The
//! similarity figure ignores document identity; only the ranking match does not.

pub mod comparator;
pub mod types;


pub use comparator::{compare, min_max_normalize, rankings_match, score_similarity};
pub use types::{BackendErrors, ComparisonOutcome, Performance};
