use crate::sidecar::{ConfigStore, Resolver, Sidecar};
use crate::{Result, SidecarError};
use std::net::IpAddr;

impl<R: Resolver, S: ConfigStore> Sidecar<R, S> {
    pub(super) async fn resolve_addresses(&self) -> Result<Vec<IpAddr>> {
        let name = &self.config.service_name[..];
        let lookup = self.resolver.resolve(name);

        let resolved = match self.config.resolve_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, lookup).await {
                Ok(resolved) => resolved,
                Err(_) => {
                    return Err(SidecarError::ResolutionTimeout {
                        name: name.to_owned(),
                        timeout,
                    });
                }
            },
            None => lookup.await,
        };

        resolved.map_err(|source| SidecarError::Resolution {
            name: name.to_owned(),
            source,
        })
    }
}
