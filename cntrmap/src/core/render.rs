use std::fmt::Display;

use crate::core::endpoint::Endpoint;
use crate::core::hosts::HostNames;
use crate::core::matrix::{AggregationState, CounterKind};

pub struct ListingEntry {
    pub host: String,
    pub endpoint: Endpoint,
    pub labels: Vec<String>,
}

/// One line per instance that holds at least one container.
pub struct InstanceListing {
    pub entries: Vec<ListingEntry>,
}

impl InstanceListing {
    pub fn build(state: &AggregationState, hosts: &HostNames) -> Self {
        let mut entries: Vec<ListingEntry> = state
            .known_instances()
            .map(|ep| ListingEntry {
                host: hosts.name(&ep.node).to_string(),
                endpoint: ep.clone(),
                labels: state.containers_of(ep).to_vec(),
            })
            .collect();
        entries.sort_by_cached_key(|e| (e.host.clone(), e.endpoint.to_string()));
        InstanceListing { entries }
    }
}

impl Display for InstanceListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for e in &self.entries {
            writeln!(f, "{}:{} :: {}", e.host, e.endpoint.port, e.labels.join(" "))?;
        }
        Ok(())
    }
}

pub struct HeatmapRow {
    pub host: String,
    pub cells: Vec<u64>,
    pub total: u64,
}

/// Node x port grid for one counter, with row, column and grand totals.
pub struct Heatmap {
    pub kind: CounterKind,
    pub label_width: usize,
    pub ports: Vec<u16>,
    pub rows: Vec<HeatmapRow>,
    pub column_totals: Vec<u64>,
    pub grand_total: u64,
}

impl Heatmap {
    pub fn build(state: &AggregationState, hosts: &HostNames, kind: CounterKind) -> Self {
        let ports = state.ports().to_vec();
        let mut column_totals = vec![0u64; ports.len()];
        let mut grand_total = 0u64;

        let mut nodes: Vec<&String> = state.nodes().iter().collect();
        nodes.sort_by(|a, b| hosts.name(a).cmp(hosts.name(b)).then_with(|| a.cmp(b)));

        let mut rows = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let cells: Vec<u64> = ports
                .iter()
                .map(|port| kind.read(&state.counters(node, *port)))
                .collect();
            for (col, n) in column_totals.iter_mut().zip(&cells) {
                *col += n;
            }
            let total: u64 = cells.iter().sum();
            grand_total += total;
            rows.push(HeatmapRow {
                host: hosts.name(node).to_string(),
                cells,
                total,
            });
        }

        Heatmap {
            kind,
            label_width: hosts.label_width(nodes.iter().copied()),
            ports,
            rows,
            column_totals,
            grand_total,
        }
    }
}

impl Display for Heatmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let w = self.label_width;
        writeln!(f, "{} containers:", self.kind.label())?;

        write!(f, "{:<w$}", "")?;
        for port in &self.ports {
            write!(f, " {port:>5}")?;
        }
        writeln!(f, " {:>6}", "Total")?;

        for row in &self.rows {
            write!(f, "{:<w$}", row.host)?;
            for n in &row.cells {
                write!(f, "{n:>6}")?;
            }
            writeln!(f, "{:>7}", row.total)?;
        }

        write!(f, "{:<w$}", "Total")?;
        for n in &self.column_totals {
            write!(f, " {n:>5}")?;
        }
        writeln!(f, " {:>6}", self.grand_total)
    }
}
