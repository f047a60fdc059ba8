use std::collections::HashMap;
use std::io;
use std::net::IpAddr;

use tracing::debug;

use common::constants::MIN_HOSTNAME_WIDTH;
use common::error::ReportError;

/// Turns a node address into the name shown in the report.
pub trait HostResolver {
    fn hostname(&self, addr: &str) -> Result<String, ReportError>;
}

/// Reverse lookup through the system resolver.
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn hostname(&self, addr: &str) -> Result<String, ReportError> {
        let ip: IpAddr = addr.parse().map_err(|e| ReportError::HostResolution {
            addr: addr.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, e),
        })?;
        dns_lookup::lookup_addr(&ip).map_err(|source| ReportError::HostResolution {
            addr: addr.to_string(),
            source,
        })
    }
}

/// Shows addresses as they are.
pub struct NumericResolver;

impl HostResolver for NumericResolver {
    fn hostname(&self, addr: &str) -> Result<String, ReportError> {
        Ok(addr.to_string())
    }
}

/// Display names for every node of a topology, resolved once.
#[derive(Clone, Debug, Default)]
pub struct HostNames {
    names: HashMap<String, String>,
}

impl HostNames {
    pub fn resolve(nodes: &[String], resolver: &dyn HostResolver) -> Result<Self, ReportError> {
        let mut names = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let name = resolver.hostname(node)?;
            debug!(addr = %node, name = %name, "resolved node");
            names.insert(node.clone(), name);
        }
        Ok(HostNames { names })
    }

    pub fn name<'a>(&'a self, addr: &'a str) -> &'a str {
        self.names.get(addr).map(String::as_str).unwrap_or(addr)
    }

    /// Width of the host column for the given nodes.
    pub fn label_width<'a>(&self, nodes: impl IntoIterator<Item = &'a String>) -> usize {
        nodes
            .into_iter()
            .map(|n| self.name(n).len())
            .fold(MIN_HOSTNAME_WIDTH, usize::max)
    }
}
