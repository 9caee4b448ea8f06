use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_METRICS_ENABLED: bool = false;
pub const DEFAULT_METRICS_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
pub const DEFAULT_METRICS_PORT: u16 = 8080;
pub const DEFAULT_VERBOSITY: &str = "3";
