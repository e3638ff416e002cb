use crate::sidecar::{ConfigStore, Resolver, Sidecar};
use crate::{PersistMode, Result, SidecarError};
use log::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persisted {
    Written,
    Unchanged,
}

impl<R: Resolver, S: ConfigStore> Sidecar<R, S> {
    pub(super) async fn persist(&self, contents: &[u8]) -> Result<Persisted> {
        if self.config.mode == PersistMode::ChangeDetecting {
            // Missing or unreadable file counts as empty
            let current = self.store.load().await.unwrap_or_default();
            if current == contents {
                debug!("{} is up to date", self.store.location());
                return Ok(Persisted::Unchanged);
            }
        }

        self.store.save(contents).await.map_err(|source| SidecarError::Persistence {
            path: self.store.location(),
            source,
        })?;

        if self.config.debug {
            info!("Wrote '{}' to '{}'.", String::from_utf8_lossy(contents), self.store.location());
        } else {
            debug!("Wrote {} bytes to {}", contents.len(), self.store.location());
        }

        Ok(Persisted::Written)
    }
}
