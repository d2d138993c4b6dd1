//! # History Document
//!
//! The company history timeline is a single JSON document kept on disk and
//! served verbatim by `/api/history`. Writes replace the whole document; the
//! last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize history document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<HistoryError> for ApiError {
    fn from(error: HistoryError) -> Self {
        tracing::error!(error = %error, "history document unavailable");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "History document unavailable",
        )
    }
}

/// File-backed JSON document.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored document, or an empty array if nothing was saved yet.
    pub async fn load(&self) -> Result<Value, HistoryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Value::Array(Vec::new())),
            Err(source) => {
                return Err(HistoryError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the document, written with two-space indentation.
    ///
    /// The file is written next to the target and renamed into place, so
    /// readers never see a partial document.
    pub async fn save(&self, document: &Value) -> Result<(), HistoryError> {
        let pretty = serde_json::to_string_pretty(document)?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, pretty)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::info!(path = %self.path.display(), "history document saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
