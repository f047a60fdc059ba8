use std::fmt::Display;

use common::error::ReportError;

/// One fileserver instance: node address plus instance port.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    pub node: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(node: impl Into<String>, port: u16) -> Self {
        Endpoint { node: node.into(), port }
    }

    /// Parses a placement location such as `10.0.0.2:5660--3-VALID` or, on
    /// multi-homed nodes, `172.18.0.111:5660-172.19.0.111:5660--3-VALID`.
    /// Everything from the first `-` on is dropped, the rest is split at the
    /// first `:`.
    pub fn parse_location(raw: &str) -> Result<Self, ReportError> {
        let (instance, _) = raw
            .split_once('-')
            .ok_or_else(|| ReportError::data_shape(format!("location {raw:?} has no '-' separator")))?;
        let (node, port) = instance
            .split_once(':')
            .ok_or_else(|| ReportError::data_shape(format!("location {raw:?} has no ':' separator")))?;
        if node.is_empty() {
            return Err(ReportError::data_shape(format!("location {raw:?} has an empty node address")));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| ReportError::data_shape(format!("location {raw:?} has a bad port: {e}")))?;

        Ok(Endpoint::new(node, port))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}
