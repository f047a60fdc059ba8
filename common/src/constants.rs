pub const BASE_PORT: u16 = 5660;
pub const MIN_INSTANCES: u16 = 1;

pub const DEFAULT_MAPRCLI: &str = "/opt/mapr/bin/maprcli";

pub const STATUS_OK: &str = "OK";
pub const STATUS_NOT_OK: &str = "NOT_OK";

// ActiveServers sub-key, renamed in 6.0
pub const ACTIVE_SERVERS_KEY_IP_PORT: &str = "IP:Port";
pub const ACTIVE_SERVERS_KEY_IP: &str = "IP";
pub const ACTIVE_SERVERS_IP_SINCE_MAJOR: u32 = 6;

pub const MASTER_MARKER: char = '\'';
pub const INVALID_MARKER: char = '*';

pub const MIN_HOSTNAME_WIDTH: usize = 16;
