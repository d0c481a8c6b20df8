//! JSON reports written by the harness.
//!
//! | File | Content |
//! |------|---------|
//! | `{backend}_results.json` | [`BackendRun`]: `{name: {test_case, result}}` |
//! | `comparison_results.json` | [`ComparisonReport`]: `{name: {test_case, served, reference, comparison}}` |
//! | `summary.json` | [`RunSummary`] |

pub mod console;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use types::{
    BackendRun, BackendRunEntry, BackendRunStats, ComparisonEntry, ComparisonReport, RunSummary,
};

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| ReportError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::write(path, json).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), "Report written");
    Ok(())
}

/// Reads a JSON report, returning `Ok(None)` if the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ReportError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Report not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(ReportError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| ReportError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

pub fn load_backend_run(path: &Path) -> Result<Option<BackendRun>, ReportError> {
    read_json(path)
}

pub fn load_comparison_report(path: &Path) -> Result<Option<ComparisonReport>, ReportError> {
    read_json(path)
}
