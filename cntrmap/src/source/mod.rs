//! Access to the cluster-management command's JSON documents.

pub mod maprcli;
pub mod replay;

use std::fmt::Display;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use common::constants::{STATUS_NOT_OK, STATUS_OK};
use common::error::ReportError;
use common::schemas::Envelope;

pub use maprcli::MaprCli;
pub use replay::ReplayDir;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Query {
    ClusterInfo,
    NodeList,
    VolumeDump { volume: String },
    VolumeInfo { volume: String },
}

impl Query {
    pub fn command_args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Query::ClusterInfo => vec!["dashboard", "info", "-json"],
            Query::NodeList => vec!["node", "list", "-filter", "[svc==fileserver]", "-json"],
            Query::VolumeDump { volume } => vec!["dump", "volumeinfo", "-volumename", volume.as_str(), "-json"],
            Query::VolumeInfo { volume } => vec!["volume", "info", "-name", volume.as_str(), "-json"],
        };
        args.into_iter().map(String::from).collect()
    }

    /// File holding a captured copy of this document.
    pub fn replay_file_name(&self) -> String {
        match self {
            Query::ClusterInfo => "dashboard_info.json".to_string(),
            Query::NodeList => "node_list.json".to_string(),
            Query::VolumeDump { volume } => format!("dump_volumeinfo.{volume}.json"),
            Query::VolumeInfo { volume } => format!("volume_info.{volume}.json"),
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::ClusterInfo => write!(f, "dashboard info"),
            Query::NodeList => write!(f, "node list"),
            Query::VolumeDump { volume } => write!(f, "dump volumeinfo {volume}"),
            Query::VolumeInfo { volume } => write!(f, "volume info {volume}"),
        }
    }
}

/// Something that can answer a [`Query`] with a JSON document.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<Value, ReportError>;
}

/// Rejects documents whose status is not `OK` or that carry an `errors`
/// list; the first error description becomes the diagnostic.
pub fn check_status(doc: Value) -> Result<Envelope, ReportError> {
    let envelope: Envelope = serde_json::from_value(doc)?;

    let status = envelope.status.clone().unwrap_or_else(|| STATUS_NOT_OK.to_string());
    let first_error = envelope.errors.as_ref().and_then(|errs| errs.first());

    if status != STATUS_OK || first_error.is_some() {
        let desc = first_error.map(|e| e.desc.clone()).unwrap_or_else(|| status.clone());
        return Err(ReportError::UpstreamStatus { status, desc });
    }

    Ok(envelope)
}

pub async fn fetch_checked(source: &dyn ClusterSource, query: &Query) -> Result<Envelope, ReportError> {
    debug!(%query, "fetching");
    let doc = source.fetch(query).await?;
    check_status(doc)
}
