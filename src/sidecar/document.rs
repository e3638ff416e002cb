use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

pub const MEMCACHED_PORT: u16 = 11211;
pub const DEFAULT_POOL: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub servers: Vec<String>,
}

impl Pool {
    pub fn new(servers: Vec<String>) -> Pool {
        Pool {
            servers,
        }
    }
}

/// Root of the mcrouter config file.
///
/// Field order here is the field order on disk, and pools live in a `BTreeMap`, so the same
/// document always serializes to the same bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub pools: BTreeMap<String, Pool>,
    pub route: String,
}

impl ConfigDocument {
    /// Builds a single pool routed with `PoolRoute`.
    ///
    /// Anything not representable as IPv4 is dropped. Servers are sorted so that the resolver
    /// returning the same set in a different order produces an identical document.
    pub fn build(addresses: &[IpAddr]) -> ConfigDocument {
        let mut servers: Vec<String> = addresses.iter()
            .filter_map(as_ipv4)
            .map(|ip| format!("{}:{}", ip, MEMCACHED_PORT))
            .collect();
        servers.sort();

        let mut pools = BTreeMap::new();
        pools.insert(DEFAULT_POOL.to_owned(), Pool::new(servers));

        ConfigDocument {
            pools,
            route: format!("PoolRoute|{}", DEFAULT_POOL),
        }
    }

    /// Compact JSON, no trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

// IPv4-mapped IPv6 addresses count as IPv4
fn as_ipv4(addr: &IpAddr) -> Option<Ipv4Addr> {
    match addr {
        IpAddr::V4(ip) => Some(*ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}
