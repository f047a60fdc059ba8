//! Shapes of the JSON documents returned by the cluster-management command.
//!
//! Only the fields the report reads are modelled; everything else in the
//! documents is ignored by serde.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field the upstream emits as a bare value when there is one element and
/// as an array otherwise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v),
            OneOrMany::Many(vs) => vs,
        }
    }
}

/// Numbers that some versions quote as strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LooseCount {
    Number(u64),
    Text(String),
}

impl LooseCount {
    pub fn value(&self) -> Option<u64> {
        match self {
            LooseCount::Number(n) => Some(*n),
            LooseCount::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub desc: String,
}

/// Outer wrapper shared by every document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterInfoData {
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeEntry {
    pub ip: OneOrMany<String>,
    #[serde(rename = "numInstances", default)]
    pub num_instances: Option<LooseCount>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerEntry {
    #[serde(rename = "ContainerId")]
    pub container_id: u64,
    #[serde(rename = "Master")]
    pub master: String,
    #[serde(rename = "ActiveServers")]
    pub active_servers: HashMap<String, OneOrMany<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(rename = "ContainerId")]
    pub container_id: u64,
    #[serde(rename = "Master")]
    pub master: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerGroup {
    #[serde(rename = "ContainerGroupId")]
    pub group_id: u64,
    #[serde(rename = "ECGContainers")]
    pub members: BTreeMap<String, GroupMember>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeInfoData {
    #[serde(default)]
    pub ecstorevolume: Option<String>,
}
