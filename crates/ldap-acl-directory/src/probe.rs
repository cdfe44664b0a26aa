//! Reachability probing of the directory host.

use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use ldap_acl_core::ServerRecord;

use crate::error::{DirectoryError, Result};

/// Standard LDAP port.
pub const LDAP_PORT: u16 = 389;

/// What a successful probe learned about the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Every resolved address, in resolver order, without duplicates.
    pub addresses: Vec<String>,
    pub host_name: String,
}

impl ProbeReport {
    pub fn into_record(self) -> ServerRecord {
        ServerRecord::new(self.addresses, self.host_name)
    }
}

/// Checks that a host answers and resolves its addresses.
pub trait ReachabilityProbe: Send + Sync {
    fn probe(&self, host: &str) -> Result<ProbeReport>;
}

/// Reverse resolution of an address to its DNS name.
pub type ReverseLookup = fn(&IpAddr) -> io::Result<String>;

/// Probe that resolves the host and opens a TCP connection to it.
///
/// The reported host name is the DNS name of the first address that
/// answered. When reverse resolution fails the name the caller typed is
/// kept, unless that was itself an address, in which case the name is left
/// empty and recorded as `N/A`.
#[derive(Clone)]
pub struct TcpProbe {
    port: u16,
    timeout: Duration,
    reverse: ReverseLookup,
}

impl TcpProbe {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            port,
            timeout,
            reverse: dns_lookup::lookup_addr,
        }
    }

    /// Replaces the reverse resolver.
    pub fn with_reverse_lookup(mut self, reverse: ReverseLookup) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(LDAP_PORT, timeout)
    }

    fn resolve(&self, host: &str) -> Result<Vec<SocketAddr>> {
        let resolved = (host, self.port).to_socket_addrs().map_err(|e| {
            tracing::debug!(host, error = %e, "address resolution failed");
            DirectoryError::ProbeFailed {
                host: host.to_string(),
            }
        })?;
        Ok(resolved.collect())
    }

    fn host_name(&self, host: &str, answered: IpAddr) -> String {
        let typed_address = host.parse::<IpAddr>().is_ok();
        match (self.reverse)(&answered) {
            Ok(name) if !name.is_empty() && name.parse::<IpAddr>().is_err() => name,
            _ if typed_address => {
                tracing::debug!(host, "no DNS name for address");
                String::new()
            }
            _ => host.to_string(),
        }
    }
}

impl fmt::Debug for TcpProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpProbe")
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(3))
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe(&self, host: &str) -> Result<ProbeReport> {
        let host = host.trim();
        let sockets = self.resolve(host)?;

        let answered = sockets
            .iter()
            .find(|addr| TcpStream::connect_timeout(addr, self.timeout).is_ok())
            .ok_or_else(|| {
                tracing::warn!(host, port = self.port, "host did not respond");
                DirectoryError::ProbeFailed {
                    host: host.to_string(),
                }
            })?;
        let host_name = self.host_name(host, answered.ip());

        let mut addresses: Vec<String> = Vec::with_capacity(sockets.len());
        for ip in sockets.iter().map(|s| s.ip().to_string()) {
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }

        Ok(ProbeReport { addresses, host_name })
    }
}

/// A scripted probe for testing.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    /// Answers only for hosts it has been told about.
    #[derive(Debug, Default)]
    pub struct MemoryProbe {
        hosts: RwLock<HashMap<String, ProbeReport>>,
        calls: AtomicUsize,
    }

    impl MemoryProbe {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builder form of [`add_host`](Self::add_host).
        pub fn with_host(self, host: &str, addresses: &[&str], host_name: &str) -> Self {
            self.add_host(host, addresses, host_name);
            self
        }

        pub fn add_host(&self, host: &str, addresses: &[&str], host_name: &str) {
            let report = ProbeReport {
                addresses: addresses.iter().map(|a| a.to_string()).collect(),
                host_name: host_name.to_string(),
            };
            self.hosts
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .insert(host.to_string(), report);
        }

        pub fn remove_host(&self, host: &str) {
            self.hosts
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .remove(host);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ReachabilityProbe for MemoryProbe {
        fn probe(&self, host: &str) -> Result<ProbeReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.hosts
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .get(host)
                .cloned()
                .ok_or_else(|| DirectoryError::ProbeFailed {
                    host: host.to_string(),
                })
        }
    }
}
