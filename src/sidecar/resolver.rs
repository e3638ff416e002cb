use futures::future::BoxFuture;
use std::io;
use std::net::IpAddr;

/// Resolves a host name to the addresses currently behind it.
///
/// Implementations do not retry; any failure is handed straight back to the caller.
pub trait Resolver: Send + Sync + 'static {
    fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>>;
}

/// Uses the system resolver (getaddrinfo) through tokio.
#[derive(Clone, Debug, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve<'a>(&'a self, name: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
        Box::pin(async move {
            let addrs = tokio::net::lookup_host((name, 0)).await?;
            Ok(addrs.map(|addr| addr.ip()).collect())
        })
    }
}
