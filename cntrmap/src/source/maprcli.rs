use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use common::error::ReportError;

use crate::source::{ClusterSource, Query};

/// Runs the cluster-management command and parses its stdout.
///
/// Each call waits for the process to finish; there is no timeout.
pub struct MaprCli {
    program: PathBuf,
}

impl MaprCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        MaprCli { program: program.into() }
    }
}

#[async_trait]
impl ClusterSource for MaprCli {
    async fn fetch(&self, query: &Query) -> Result<Value, ReportError> {
        let output = Command::new(&self.program)
            .args(query.command_args())
            .output()
            .await
            .map_err(|e| ReportError::transport(format!("cannot run {}: {e}", self.program.display())))?;

        serde_json::from_slice(&output.stdout).map_err(|e| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ReportError::transport(format!(
                "{query}: unparsable output ({e}), {}, stderr: {}",
                output.status,
                stderr.trim()
            ))
        })
    }
}
