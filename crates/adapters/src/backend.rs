// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blob storage for full memo text.
//!
//! The memo written onto an alert is size-capped; the untrimmed text is
//! uploaded here and linked from the memo.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Result of an upload. A backend that stores nothing reports
/// `uploaded == false` and an empty URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadOutcome {
    pub url: String,
    pub uploaded: bool,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid object key {0:?}")]
    InvalidKey(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn upload(&self, key: &str, body: &str) -> Result<UploadOutcome, BackendError>;
}

/// Backend used when none is configured
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledBackend;

#[async_trait]
impl Backend for DisabledBackend {
    async fn upload(&self, _key: &str, _body: &str) -> Result<UploadOutcome, BackendError> {
        Ok(UploadOutcome::default())
    }
}

/// Writes objects under a local directory served at `base_url`.
#[derive(Clone, Debug)]
pub struct LocalBackend {
    dir: PathBuf,
    base_url: String,
}

impl LocalBackend {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self { dir: dir.into(), base_url: base_url.into() }
    }

    /// Path an object key is stored at. Keys are relative and may not
    /// climb out of the directory.
    pub fn object_path(&self, key: &str) -> Result<PathBuf, BackendError> {
        let rel = Path::new(key);
        let valid = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(BackendError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(rel))
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn upload(&self, key: &str, body: &str) -> Result<UploadOutcome, BackendError> {
        let path = self.object_path(key)?;
        let io_err = |source| BackendError::Io { path: path.clone(), source };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, body).await.map_err(io_err)?;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), key);
        tracing::debug!(key, bytes = body.len(), %url, "uploaded full text");
        Ok(UploadOutcome { url, uploaded: true })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Backend, BackendError, UploadOutcome};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Keeps uploads in memory and serves them from `https://backend.test/`
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        uploads: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every `(key, body)` uploaded, in order
        pub fn uploads(&self) -> Vec<(String, String)> {
            self.uploads.lock().clone()
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn upload(&self, key: &str, body: &str) -> Result<UploadOutcome, BackendError> {
            self.uploads.lock().push((key.to_string(), body.to_string()));
            Ok(UploadOutcome { url: format!("https://backend.test/{key}"), uploaded: true })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBackend;

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
