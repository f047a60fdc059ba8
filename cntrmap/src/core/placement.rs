use serde_json::Value;

use common::error::ReportError;
use common::schemas::{ContainerEntry, ContainerGroup};

use crate::core::endpoint::Endpoint;
use crate::core::topology::ActiveServersKey;

const GROUP_MEMBER_PREFIX: &str = "cid";

/// Where one container (or one erasure-coded group member) lives.
///
/// `members` never contains `master` nor the same endpoint twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementRecord {
    pub container_id: u64,
    pub master: Endpoint,
    pub members: Vec<Endpoint>,
    pub erasure_coded: bool,
}

/// Decodes the container entries of a `dump volumeinfo` document. The first
/// data entry describes the volume itself and is skipped.
pub fn decode_containers(data: Vec<Value>) -> Result<Vec<ContainerEntry>, ReportError> {
    data.into_iter()
        .skip(1)
        .map(|v| serde_json::from_value::<ContainerEntry>(v).map_err(ReportError::from))
        .collect()
}

/// Same as [`decode_containers`] for an erasure-coded backing volume.
pub fn decode_groups(data: Vec<Value>) -> Result<Vec<ContainerGroup>, ReportError> {
    data.into_iter()
        .skip(1)
        .map(|v| serde_json::from_value::<ContainerGroup>(v).map_err(ReportError::from))
        .collect()
}

pub fn normalize_container(entry: &ContainerEntry, key: ActiveServersKey) -> Result<PlacementRecord, ReportError> {
    let master = Endpoint::parse_location(&entry.master)?;

    let active = entry.active_servers.get(key.as_str()).ok_or_else(|| {
        ReportError::data_shape(format!(
            "container {} has no ActiveServers[{:?}]",
            entry.container_id,
            key.as_str()
        ))
    })?;

    let mut members: Vec<Endpoint> = Vec::new();
    for raw in active.as_slice() {
        let ep = Endpoint::parse_location(raw)?;
        if ep == master || members.contains(&ep) {
            continue;
        }
        members.push(ep);
    }

    Ok(PlacementRecord {
        container_id: entry.container_id,
        master,
        members,
        erasure_coded: false,
    })
}

/// One record per group member, in `cid0, cid1, ...` order.
pub fn normalize_group(group: &ContainerGroup) -> Result<Vec<PlacementRecord>, ReportError> {
    let mut indexed = Vec::with_capacity(group.members.len());
    for (slot, member) in &group.members {
        let index = slot
            .strip_prefix(GROUP_MEMBER_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| {
                ReportError::data_shape(format!("group {} has unexpected member slot {slot:?}", group.group_id))
            })?;
        indexed.push((index, member));
    }
    indexed.sort_by_key(|(index, _)| *index);

    indexed
        .into_iter()
        .map(|(_, member)| {
            Ok(PlacementRecord {
                container_id: member.container_id,
                master: Endpoint::parse_location(&member.master)?,
                members: Vec::new(),
                erasure_coded: true,
            })
        })
        .collect()
}
