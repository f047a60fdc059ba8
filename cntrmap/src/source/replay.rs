use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use common::error::ReportError;

use crate::source::{ClusterSource, Query};

/// Serves documents captured earlier, one file per query (see
/// [`Query::replay_file_name`]).
pub struct ReplayDir {
    root: PathBuf,
}

impl ReplayDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ReplayDir { root: root.into() }
    }
}

#[async_trait]
impl ClusterSource for ReplayDir {
    async fn fetch(&self, query: &Query) -> Result<Value, ReportError> {
        let path = self.root.join(query.replay_file_name());
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| ReportError::transport(format!("{query}: cannot read {}: {e}", path.display())))?;
        serde_json::from_slice(&raw)
            .map_err(|e| ReportError::transport(format!("{query}: cannot parse {}: {e}", path.display())))
    }
}
