use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use common::constants::DEFAULT_MAPRCLI;
use common::error::ReportError;
use common::schemas::VolumeInfoData;

use crate::core::hosts::{HostNames, HostResolver, NumericResolver, SystemResolver};
use crate::core::matrix::{AggregationState, CounterKind};
use crate::core::placement::{decode_containers, decode_groups, normalize_container, normalize_group};
use crate::core::render::{Heatmap, InstanceListing};
use crate::core::topology::ClusterTopology;
use crate::source::{ClusterSource, MaprCli, Query, ReplayDir, fetch_checked};

pub const USAGE_ARGS: &str = "<Comma separated list of volume names>";

#[derive(Parser, Debug, Clone)]
#[command(name = "cntrmap", version, about)]
pub struct ReportArgs {
    /// Comma separated list of volume names
    #[arg(value_name = "VOLUMES")]
    pub volumes: String,

    /// Path of the maprcli command
    #[arg(long, default_value = DEFAULT_MAPRCLI)]
    pub maprcli: PathBuf,

    /// Read captured JSON documents from this directory instead of running maprcli
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Print node addresses instead of resolved hostnames
    #[arg(long, default_value_t = false)]
    pub numeric: bool,
}

impl ReportArgs {
    pub fn volume_names(&self) -> Result<Vec<String>, ReportError> {
        let names: Vec<String> = self
            .volumes
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        if names.is_empty() {
            return Err(ReportError::Usage("no volume names given".to_string()));
        }
        Ok(names)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    Plain,
    ErasureCoded,
}

impl PassKind {
    fn heatmaps(&self) -> &'static [CounterKind] {
        match self {
            PassKind::Plain => &CounterKind::PLAIN,
            PassKind::ErasureCoded => &CounterKind::ERASURE_CODED,
        }
    }
}

/// Outcome of one aggregation pass, kept for the caller after rendering.
#[derive(Clone, Debug)]
pub struct PassReport {
    pub kind: PassKind,
    pub volumes: Vec<String>,
    pub state: AggregationState,
}

pub async fn report(args: &ReportArgs, volumes: &[String]) -> anyhow::Result<()> {
    let source: Box<dyn ClusterSource> = match &args.replay {
        Some(dir) => Box::new(ReplayDir::new(dir)),
        None => Box::new(MaprCli::new(&args.maprcli)),
    };
    let resolver: Box<dyn HostResolver> = if args.numeric {
        Box::new(NumericResolver)
    } else {
        Box::new(SystemResolver)
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let passes = run(volumes, source.as_ref(), resolver.as_ref(), &mut out).await?;
    out.flush()?;

    for pass in &passes {
        info!(
            pass = ?pass.kind,
            volumes = pass.volumes.len(),
            containers = pass.state.containers_counted(),
            "report done"
        );
    }
    Ok(())
}

/// Plain pass over `volumes`, then an erasure-coded pass over the backing
/// volumes they name, if any. Each pass starts from a zeroed state.
pub async fn run(
    volumes: &[String],
    source: &dyn ClusterSource,
    resolver: &dyn HostResolver,
    out: &mut dyn Write,
) -> Result<Vec<PassReport>, ReportError> {
    let topology = resolve_topology(source).await?;

    let (plain, backing) = aggregate_pass(PassKind::Plain, volumes, &topology, source, out).await?;
    let hosts = HostNames::resolve(&topology.nodes, resolver)?;
    render_pass(&plain, &hosts, out)?;

    let mut passes = vec![plain];
    if !backing.is_empty() {
        info!(volumes = ?backing, "erasure-coded backing volumes found");
        let (ec, _) = aggregate_pass(PassKind::ErasureCoded, &backing, &topology, source, out).await?;
        render_pass(&ec, &hosts, out)?;
        passes.push(ec);
    }

    Ok(passes)
}

pub async fn resolve_topology(source: &dyn ClusterSource) -> Result<ClusterTopology, ReportError> {
    let cluster_info = fetch_checked(source, &Query::ClusterInfo).await?;
    let node_list = fetch_checked(source, &Query::NodeList).await?;
    let topology = ClusterTopology::from_envelopes(cluster_info, node_list)?;

    info!(
        nodes = topology.nodes.len(),
        ports = ?topology.ports,
        major_version = topology.major_version,
        active_servers_key = topology.active_servers_key.as_str(),
        "topology resolved"
    );
    Ok(topology)
}

async fn aggregate_pass(
    kind: PassKind,
    volumes: &[String],
    topology: &ClusterTopology,
    source: &dyn ClusterSource,
    out: &mut dyn Write,
) -> Result<(PassReport, Vec<String>), ReportError> {
    let mut state = AggregationState::new(topology);
    let mut backing: Vec<String> = Vec::new();

    match kind {
        PassKind::Plain => writeln!(out, "Gather container information for volumes:")?,
        PassKind::ErasureCoded => {
            writeln!(out)?;
            writeln!(out, "Gather Erasure Code Storage (ecstore) container information for volumes:")?;
        }
    }

    for volume in volumes {
        writeln!(out, "   {volume}")?;
        let dump = fetch_checked(source, &Query::VolumeDump { volume: volume.clone() }).await?;

        match kind {
            PassKind::Plain => {
                for entry in decode_containers(dump.data)? {
                    let record = normalize_container(&entry, topology.active_servers_key)?;
                    state.accumulate(&record)?;
                }
                if let Some(name) = backing_volume(source, volume).await? {
                    if !backing.contains(&name) {
                        backing.push(name);
                    }
                }
            }
            PassKind::ErasureCoded => {
                writeln!(out, "     Group   Containers")?;
                for group in decode_groups(dump.data)? {
                    let records = normalize_group(&group)?;
                    let ids: Vec<String> = records.iter().map(|r| r.container_id.to_string()).collect();
                    writeln!(out, "     {} :: {}", group.group_id, ids.join(" "))?;
                    for record in &records {
                        state.accumulate(record)?;
                    }
                }
            }
        }
    }
    writeln!(out)?;

    info!(
        pass = ?kind,
        volumes = volumes.len(),
        containers = state.containers_counted(),
        "pass aggregated"
    );

    let report = PassReport {
        kind,
        volumes: volumes.to_vec(),
        state,
    };
    Ok((report, backing))
}

async fn backing_volume(source: &dyn ClusterSource, volume: &str) -> Result<Option<String>, ReportError> {
    let info = fetch_checked(source, &Query::VolumeInfo { volume: volume.to_string() }).await?;
    let first = info
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::data_shape(format!("volume info for {volume} has no data entry")))?;
    let data: VolumeInfoData = serde_json::from_value(first)?;
    Ok(data.ecstorevolume.filter(|name| !name.is_empty()))
}

fn render_pass(pass: &PassReport, hosts: &HostNames, out: &mut dyn Write) -> Result<(), ReportError> {
    write!(out, "{}", InstanceListing::build(&pass.state, hosts))?;
    for kind in pass.kind.heatmaps() {
        writeln!(out)?;
        write!(out, "{}", Heatmap::build(&pass.state, hosts, *kind))?;
    }
    Ok(())
}
