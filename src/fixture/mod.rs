//! Test-case fixtures.
//!
//! A fixture is a `test_*.json` file holding one rerank request:
//!
//! ```json
//! { "query": "...", "documents": ["...", "..."], "top_n": 2 }
//! ```
//!
//! `instruction`, `top_n` and `model` are optional. The fixture's file stem
//! (`test_basic`) becomes the test-case name used to key every report.

pub mod error;


pub use error::FixtureError;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// File-name prefix a fixture must carry to be picked up.
pub const FIXTURE_PREFIX: &str = "test_";

/// File extension a fixture must carry to be picked up.
pub const FIXTURE_EXTENSION: &str = "json";

/// One rerank request shared by both backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub file: PathBuf,
    pub query: String,
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    query: String,
    #[serde(default)]
    documents: Vec<String>,
    instruction: Option<String>,
    top_n: Option<usize>,
    model: Option<String>,
}

impl TestCase {
    /// Builds an in-memory test case (not backed by a file).
    pub fn new(name: impl Into<String>, query: impl Into<String>, documents: Vec<String>) -> Self {
        Self {
            name: name.into(),
            file: PathBuf::new(),
            query: query.into(),
            documents,
            instruction: None,
            top_n: None,
            model: None,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Loads a single fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FixtureError::InvalidName {
                path: path.to_path_buf(),
            })?
            .to_string();

        let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let fixture: FixtureFile =
            serde_json::from_str(&content).map_err(|e| FixtureError::Malformed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            name,
            file: path.to_path_buf(),
            query: fixture.query,
            documents: fixture.documents,
            instruction: fixture.instruction,
            top_n: fixture.top_n,
            model: fixture.model,
        })
    }
}

/// Returns `true` for `test_*.json` file names.
pub fn is_fixture_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FIXTURE_PREFIX));
    let has_extension = path
        .extension()
        .is_some_and(|e| e == std::ffi::OsStr::new(FIXTURE_EXTENSION));

    has_prefix && has_extension && path.is_file()
}

/// Loads every fixture in `dir`, sorted by file name.
///
/// Fixtures that fail to load are logged and skipped.
pub fn load_test_cases(dir: &Path) -> Result<Vec<TestCase>, FixtureError> {
    if !dir.is_dir() {
        return Err(FixtureError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| FixtureError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_fixture_file(path))
        .collect();
    paths.sort();

    let mut cases = Vec::with_capacity(paths.len());
    for path in &paths {
        match TestCase::load(path) {
            Ok(case) => {
                debug!(
                    name = %case.name,
                    documents = case.documents.len(),
                    "Loaded fixture"
                );
                cases.push(case);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping fixture");
            }
        }
    }

    info!(
        dir = %dir.display(),
        loaded = cases.len(),
        skipped = paths.len() - cases.len(),
        "Loaded test cases"
    );

    Ok(cases)
}
