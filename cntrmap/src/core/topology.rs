use std::collections::BTreeSet;
use std::ops::Range;

use common::constants::{
    ACTIVE_SERVERS_IP_SINCE_MAJOR, ACTIVE_SERVERS_KEY_IP, ACTIVE_SERVERS_KEY_IP_PORT, BASE_PORT, MIN_INSTANCES,
};
use common::error::ReportError;
use common::schemas::{ClusterInfoData, Envelope, NodeEntry};

/// Name of the `ActiveServers` sub-key holding a container's replica locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveServersKey {
    IpPort,
    Ip,
}

// Highest threshold first.
const ACTIVE_SERVERS_KEYS: &[(u32, ActiveServersKey)] = &[
    (ACTIVE_SERVERS_IP_SINCE_MAJOR, ActiveServersKey::Ip),
    (0, ActiveServersKey::IpPort),
];

impl ActiveServersKey {
    pub fn for_major(major: u32) -> Self {
        ACTIVE_SERVERS_KEYS
            .iter()
            .find(|(since, _)| major >= *since)
            .map(|(_, key)| *key)
            .unwrap_or(ActiveServersKey::IpPort)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveServersKey::IpPort => ACTIVE_SERVERS_KEY_IP_PORT,
            ActiveServersKey::Ip => ACTIVE_SERVERS_KEY_IP,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClusterTopology {
    /// One canonical address per fileserver node, sorted.
    pub nodes: Vec<String>,
    pub ports: Vec<u16>,
    pub major_version: u32,
    pub active_servers_key: ActiveServersKey,
}

impl ClusterTopology {
    /// Builds the topology from already status-checked `dashboard info` and
    /// `node list` documents.
    pub fn from_envelopes(cluster_info: Envelope, node_list: Envelope) -> Result<Self, ReportError> {
        let info_value = cluster_info
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::data_shape("cluster info has no data entry"))?;
        let info: ClusterInfoData = serde_json::from_value(info_value)?;

        let nodes = node_list
            .data
            .into_iter()
            .map(serde_json::from_value::<NodeEntry>)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(&info, nodes)
    }

    pub fn from_records(info: &ClusterInfoData, nodes: Vec<NodeEntry>) -> Result<Self, ReportError> {
        let major_version = parse_major_version(&info.version)?;

        let mut max_instances = MIN_INSTANCES;
        let mut addresses = BTreeSet::new();
        for node in nodes {
            if let Some(count) = &node.num_instances {
                let n = count
                    .value()
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(|| ReportError::data_shape(format!("bad numInstances {count:?}")))?;
                max_instances = max_instances.max(n);
            }
            addresses.insert(canonical_address(node.ip.into_vec())?);
        }

        let ports = port_range(max_instances)?.collect();

        Ok(ClusterTopology {
            nodes: addresses.into_iter().collect(),
            ports,
            major_version,
            active_servers_key: ActiveServersKey::for_major(major_version),
        })
    }
}

/// Integer prefix of a version string such as `6.1.0.20180926230239.GA`.
pub fn parse_major_version(version: &str) -> Result<u32, ReportError> {
    let major = version.trim().split('.').next().unwrap_or_default();
    major
        .parse()
        .map_err(|_| ReportError::data_shape(format!("cannot read major version from {version:?}")))
}

/// A multi-homed node is reported under its lexicographically smallest address.
///
/// Container locations name one of the node's addresses; nothing upstream
/// promises it is this one; a mismatch shows up later as an unknown node.
pub fn canonical_address(mut candidates: Vec<String>) -> Result<String, ReportError> {
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::data_shape("node has no ip address"))
}

fn port_range(max_instances: u16) -> Result<Range<u16>, ReportError> {
    let end = BASE_PORT
        .checked_add(max_instances)
        .ok_or_else(|| ReportError::data_shape(format!("numInstances {max_instances} overflows the port range")))?;
    Ok(BASE_PORT..end)
}
