use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::warn;

use common::constants::{INVALID_MARKER, MASTER_MARKER};
use common::error::ReportError;

use crate::core::endpoint::Endpoint;
use crate::core::placement::PlacementRecord;
use crate::core::topology::ClusterTopology;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeInstanceCounters {
    pub master: u64,
    pub replica: u64,
    pub total: u64,
    pub ecstore: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterKind {
    Master,
    Replica,
    Total,
    ErasureStore,
}

impl CounterKind {
    pub const PLAIN: [CounterKind; 3] = [CounterKind::Master, CounterKind::Replica, CounterKind::Total];
    pub const ERASURE_CODED: [CounterKind; 1] = [CounterKind::ErasureStore];

    pub fn label(&self) -> &'static str {
        match self {
            CounterKind::Master => "master",
            CounterKind::Replica => "replica",
            CounterKind::Total => "total",
            CounterKind::ErasureStore => "ecstore",
        }
    }

    pub fn read(&self, c: &NodeInstanceCounters) -> u64 {
        match self {
            CounterKind::Master => c.master,
            CounterKind::Replica => c.replica,
            CounterKind::Total => c.total,
            CounterKind::ErasureStore => c.ecstore,
        }
    }
}

/// Formats a container for the per-instance listing: `'` marks the master
/// copy, `*` a copy not known to be valid. Erasure-coded members are bare.
pub fn container_label(container_id: u64, is_master: bool, is_valid: bool, erasure_coded: bool) -> String {
    let mut label = String::new();
    if !erasure_coded {
        if is_master {
            label.push(MASTER_MARKER);
        }
        if !is_valid {
            label.push(INVALID_MARKER);
        }
    }
    label.push_str(&container_id.to_string());
    label
}

/// Node x port accounting for one report pass. Build a fresh one per pass.
#[derive(Clone, Debug)]
pub struct AggregationState {
    nodes: Vec<String>,
    ports: Vec<u16>,
    counters: HashMap<Endpoint, NodeInstanceCounters>,
    instance_containers: HashMap<Endpoint, Vec<String>>,
    known_instances: BTreeSet<Endpoint>,
    seen_containers: HashSet<u64>,
}

impl AggregationState {
    /// Every node/port slot starts at zero so empty slots still render.
    pub fn new(topology: &ClusterTopology) -> Self {
        let mut counters = HashMap::with_capacity(topology.nodes.len() * topology.ports.len());
        for node in &topology.nodes {
            for port in &topology.ports {
                counters.insert(Endpoint::new(node.clone(), *port), NodeInstanceCounters::default());
            }
        }

        AggregationState {
            nodes: topology.nodes.clone(),
            ports: topology.ports.clone(),
            counters,
            instance_containers: HashMap::new(),
            known_instances: BTreeSet::new(),
            seen_containers: HashSet::new(),
        }
    }

    /// Adds one record. Returns `Ok(false)` when the container was already
    /// counted in this pass. Nothing is counted if any endpoint is outside
    /// the resolved topology.
    pub fn accumulate(&mut self, record: &PlacementRecord) -> Result<bool, ReportError> {
        self.check_slot(record.container_id, &record.master)?;
        for member in &record.members {
            self.check_slot(record.container_id, member)?;
        }

        if !self.seen_containers.insert(record.container_id) {
            warn!(container_id = record.container_id, "container listed more than once, counted once");
            return Ok(false);
        }

        // Validity is not read from the location suffix; every copy counts as valid.
        let is_valid = true;

        if record.erasure_coded {
            self.slot_mut(&record.master).ecstore += 1;
            self.push_label(&record.master, container_label(record.container_id, false, is_valid, true));
            return Ok(true);
        }

        let master = self.slot_mut(&record.master);
        master.master += 1;
        master.total += 1;
        self.push_label(&record.master, container_label(record.container_id, true, is_valid, false));

        for member in record.members.iter().filter(|m| **m != record.master) {
            let replica = self.slot_mut(member);
            replica.replica += 1;
            replica.total += 1;
            self.push_label(member, container_label(record.container_id, false, is_valid, false));
        }

        Ok(true)
    }

    fn check_slot(&self, container_id: u64, ep: &Endpoint) -> Result<(), ReportError> {
        if self.counters.contains_key(ep) {
            return Ok(());
        }
        if !self.nodes.iter().any(|n| *n == ep.node) {
            return Err(ReportError::data_shape(format!(
                "container {container_id} is on node {} which is not a known fileserver address",
                ep.node
            )));
        }
        Err(ReportError::data_shape(format!(
            "container {container_id} is on port {} outside the instance range of node {}",
            ep.port, ep.node
        )))
    }

    fn slot_mut(&mut self, ep: &Endpoint) -> &mut NodeInstanceCounters {
        self.counters.entry(ep.clone()).or_default()
    }

    fn push_label(&mut self, ep: &Endpoint, label: String) {
        self.instance_containers.entry(ep.clone()).or_default().push(label);
        self.known_instances.insert(ep.clone());
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn counters(&self, node: &str, port: u16) -> NodeInstanceCounters {
        self.counters
            .get(&Endpoint::new(node, port))
            .copied()
            .unwrap_or_default()
    }

    pub fn known_instances(&self) -> impl Iterator<Item = &Endpoint> {
        self.known_instances.iter()
    }

    pub fn containers_of(&self, ep: &Endpoint) -> &[String] {
        self.instance_containers.get(ep).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct containers (or group members) counted so far.
    pub fn containers_counted(&self) -> usize {
        self.seen_containers.len()
    }

    pub fn sum(&self, kind: CounterKind) -> u64 {
        self.counters.values().map(|c| kind.read(c)).sum()
    }
}
