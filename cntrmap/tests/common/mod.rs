#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use cntrmap::core::hosts::HostResolver;
use cntrmap::source::{ClusterSource, Query};
use ::common::error::ReportError;

/// In-memory stand-in for maprcli.
pub struct FixtureSource {
    docs: HashMap<Query, Value>,
    calls: Mutex<Vec<Query>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        FixtureSource {
            docs: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, query: Query, doc: Value) -> Self {
        self.docs.insert(query, doc);
        self
    }

    pub fn with_volume(self, volume: &str, dump: Value, info: Value) -> Self {
        self.with(Query::VolumeDump { volume: volume.to_string() }, dump)
            .with(Query::VolumeInfo { volume: volume.to_string() }, info)
    }

    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterSource for FixtureSource {
    async fn fetch(&self, query: &Query) -> Result<Value, ReportError> {
        self.calls.lock().unwrap().push(query.clone());
        self.docs
            .get(query)
            .cloned()
            .ok_or_else(|| ReportError::transport(format!("no fixture for {query}")))
    }
}

/// Resolves from a fixed table; unknown addresses fail like a DNS miss.
pub struct StaticResolver(pub HashMap<String, String>);

impl StaticResolver {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        StaticResolver(pairs.iter().map(|(a, h)| (a.to_string(), h.to_string())).collect())
    }
}

impl HostResolver for StaticResolver {
    fn hostname(&self, addr: &str) -> Result<String, ReportError> {
        self.0.get(addr).cloned().ok_or_else(|| ReportError::HostResolution {
            addr: addr.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "unknown host"),
        })
    }
}

pub fn loc(instance: &str) -> String {
    format!("{instance}--3-VALID")
}

pub fn cluster_info(version: &str) -> Value {
    json!({
        "timestamp": 1506700000000u64,
        "status": "OK",
        "total": 1,
        "data": [{ "version": version, "cluster": { "name": "demo.cluster.com" } }]
    })
}

pub fn node_list(nodes: &[(Value, Value)]) -> Value {
    let data: Vec<Value> = nodes
        .iter()
        .map(|(ip, n)| json!({ "ip": ip, "numInstances": n, "service": "fileserver" }))
        .collect();
    json!({ "status": "OK", "total": data.len(), "data": data })
}

pub fn container(id: u64, master: &str, key: &str, active: Value) -> Value {
    json!({
        "ContainerId": id,
        "Epoch": 3,
        "Master": loc(master),
        "ActiveServers": { key: active },
        "InactiveServers": {}
    })
}

pub fn volume_dump(entries: Vec<Value>) -> Value {
    let mut data = vec![json!({ "VolumeName": "vol", "VolumeId": 1 })];
    data.extend(entries);
    json!({ "status": "OK", "total": data.len(), "data": data })
}

pub fn group(id: u64, members: &[(u64, &str)]) -> Value {
    let mut cids = serde_json::Map::new();
    for (i, (cid, instance)) in members.iter().enumerate() {
        cids.insert(
            format!("cid{i}"),
            json!({ "ContainerId": cid, "Master": loc(instance), "ActiveServers": { "IP": loc(instance) } }),
        );
    }
    json!({ "ContainerGroupId": id, "ECGContainers": cids })
}

pub fn volume_info(ecstore: Option<&str>) -> Value {
    match ecstore {
        Some(name) => json!({ "status": "OK", "data": [{ "volumename": "vol", "ecstorevolume": name }] }),
        None => json!({ "status": "OK", "data": [{ "volumename": "vol" }] }),
    }
}

pub fn error_doc(desc: &str) -> Value {
    json!({ "status": "ERROR", "errors": [{ "id": 10003, "desc": desc }] })
}

/// Three single-homed nodes, two instances each, running 6.x.
pub fn three_node_cluster() -> FixtureSource {
    FixtureSource::new()
        .with(Query::ClusterInfo, cluster_info("6.1.0.20180926230239.GA"))
        .with(
            Query::NodeList,
            node_list(&[
                (json!("10.0.0.2"), json!("2")),
                (json!("10.0.0.3"), json!(2)),
                (json!("10.0.0.4"), json!("1")),
            ]),
        )
}

pub fn three_node_hosts() -> StaticResolver {
    StaticResolver::new(&[("10.0.0.2", "node-a"), ("10.0.0.3", "node-b"), ("10.0.0.4", "node-c")])
}
