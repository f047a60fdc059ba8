use cntrmap::core::endpoint::Endpoint;
use cntrmap::core::hosts::{HostNames, NumericResolver};
use cntrmap::core::matrix::{AggregationState, CounterKind};
use cntrmap::core::placement::PlacementRecord;
use cntrmap::core::render::{Heatmap, InstanceListing};
use cntrmap::core::topology::{ActiveServersKey, ClusterTopology};

mod common;
use crate::common::StaticResolver;

fn two_by_two() -> ClusterTopology {
    ClusterTopology {
        nodes: vec!["10.0.0.2".to_string(), "10.0.0.3".to_string()],
        ports: vec![5660, 5661],
        major_version: 6,
        active_servers_key: ActiveServersKey::Ip,
    }
}

fn record(id: u64, master: (&str, u16), replica: (&str, u16)) -> PlacementRecord {
    PlacementRecord {
        container_id: id,
        master: Endpoint::new(master.0, master.1),
        members: vec![Endpoint::new(replica.0, replica.1)],
        erasure_coded: false,
    }
}

fn populated() -> anyhow::Result<AggregationState> {
    let mut state = AggregationState::new(&two_by_two());
    state.accumulate(&record(1, ("10.0.0.2", 5660), ("10.0.0.3", 5661)))?;
    state.accumulate(&record(2, ("10.0.0.3", 5660), ("10.0.0.2", 5660)))?;
    Ok(state)
}

fn hosts(state: &AggregationState) -> anyhow::Result<HostNames> {
    // Hostnames sort opposite to the addresses.
    let resolver = StaticResolver::new(&[("10.0.0.2", "node-b"), ("10.0.0.3", "node-a")]);
    Ok(HostNames::resolve(state.nodes(), &resolver)?)
}

#[test]
fn test_total_heatmap_layout() -> anyhow::Result<()> {
    let state = populated()?;
    let heatmap = Heatmap::build(&state, &hosts(&state)?, CounterKind::Total);

    let expected = [
        "total containers:".to_string(),
        format!("{}  5660  5661  Total", " ".repeat(16)),
        format!("node-a{}     1     1      2", " ".repeat(10)),
        format!("node-b{}     2     0      2", " ".repeat(10)),
        format!("Total{}     3     1      4", " ".repeat(11)),
    ];
    let rendered = heatmap.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, expected);
    Ok(())
}

#[test]
fn test_master_and_replica_heatmaps() -> anyhow::Result<()> {
    let state = populated()?;
    let names = hosts(&state)?;

    let master = Heatmap::build(&state, &names, CounterKind::Master);
    assert_eq!(master.rows[0].host, "node-a");
    assert_eq!(master.rows[0].cells, vec![1, 0]);
    assert_eq!(master.rows[1].cells, vec![1, 0]);
    assert_eq!(master.column_totals, vec![2, 0]);
    assert_eq!(master.grand_total, 2);

    let replica = Heatmap::build(&state, &names, CounterKind::Replica);
    assert_eq!(replica.rows[0].cells, vec![0, 1]);
    assert_eq!(replica.rows[1].cells, vec![1, 0]);
    assert_eq!(replica.grand_total, 2);
    assert!(replica.to_string().starts_with("replica containers:\n"));
    Ok(())
}

#[test]
fn test_heatmap_totals_are_consistent() -> anyhow::Result<()> {
    let topo = ClusterTopology {
        nodes: (2..7).map(|i| format!("10.0.1.{i}")).collect(),
        ports: (5660..5664).collect(),
        major_version: 7,
        active_servers_key: ActiveServersKey::Ip,
    };
    let mut state = AggregationState::new(&topo);
    let slots: Vec<(String, u16)> = topo
        .nodes
        .iter()
        .flat_map(|n| topo.ports.iter().map(move |p| (n.clone(), *p)))
        .collect();
    for id in 0..97u64 {
        let i = (id * 7) as usize;
        let m = &slots[i % slots.len()];
        let r = &slots[(i + 5) % slots.len()];
        state.accumulate(&record(id, (m.0.as_str(), m.1), (r.0.as_str(), r.1)))?;
    }

    let names = HostNames::resolve(state.nodes(), &NumericResolver)?;
    for kind in CounterKind::PLAIN {
        let heatmap = Heatmap::build(&state, &names, kind);
        for row in &heatmap.rows {
            assert_eq!(row.total, row.cells.iter().sum::<u64>());
        }
        for (col, total) in heatmap.column_totals.iter().enumerate() {
            let sum: u64 = heatmap.rows.iter().map(|r| r.cells[col]).sum();
            assert_eq!(*total, sum);
        }
        let all_cells: u64 = heatmap.rows.iter().flat_map(|r| r.cells.iter()).sum();
        assert_eq!(heatmap.grand_total, all_cells);
        assert_eq!(heatmap.grand_total, state.sum(kind));
    }
    Ok(())
}

#[test]
fn test_long_hostnames_widen_label_column() -> anyhow::Result<()> {
    let state = populated()?;
    let long = "fileserver-node-01.example.com";
    let resolver = StaticResolver::new(&[("10.0.0.2", long), ("10.0.0.3", "short")]);
    let names = HostNames::resolve(state.nodes(), &resolver)?;

    let heatmap = Heatmap::build(&state, &names, CounterKind::Master);
    assert_eq!(heatmap.label_width, long.len());

    let rendered = heatmap.to_string();
    let short_row = rendered.lines().find(|l| l.starts_with("short")).unwrap();
    assert_eq!(short_row.len(), long.len() + 6 * 2 + 7);
    Ok(())
}

#[test]
fn test_instance_listing_sorted_by_hostname() -> anyhow::Result<()> {
    let state = populated()?;
    let listing = InstanceListing::build(&state, &hosts(&state)?);

    assert_eq!(
        listing.to_string(),
        "node-a:5660 :: '2\nnode-a:5661 :: 1\nnode-b:5660 :: '1 2\n"
    );
    Ok(())
}

#[test]
fn test_numeric_listing_shows_addresses() -> anyhow::Result<()> {
    let state = populated()?;
    let names = HostNames::resolve(state.nodes(), &NumericResolver)?;
    let listing = InstanceListing::build(&state, &names);

    let lines: Vec<String> = listing.to_string().lines().map(String::from).collect();
    assert_eq!(
        lines,
        vec!["10.0.0.2:5660 :: '1 2", "10.0.0.3:5660 :: '2", "10.0.0.3:5661 :: 1"]
    );
    Ok(())
}

#[test]
fn test_unresolvable_node_is_an_error() {
    let resolver = StaticResolver::new(&[("10.0.0.2", "node-b")]);
    let nodes = vec!["10.0.0.2".to_string(), "10.0.0.3".to_string()];
    assert!(HostNames::resolve(&nodes, &resolver).is_err());
}
