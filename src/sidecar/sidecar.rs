use crate::{Config, Result};
use crate::sidecar::{ConfigDocument, ConfigStore, FileStore, Persisted, Resolver, SystemResolver};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

pub struct Sidecar<R = SystemResolver, S = FileStore> {
    pub config: Arc<Config>,
    pub(super) resolver: R,
    pub(super) store: S,
}

impl Sidecar {
    pub fn new(config: Arc<Config>) -> Sidecar {
        let store = FileStore::new(config.output.clone());
        Sidecar::with_parts(config, SystemResolver, store)
    }
}

impl<R: Resolver, S: ConfigStore> Sidecar<R, S> {
    pub fn with_parts(config: Arc<Config>, resolver: R, store: S) -> Sidecar<R, S> {
        Sidecar {
            config,
            resolver,
            store,
        }
    }

    /// Resolve, build and persist every `refresh` until `shutdown` flips to true.
    ///
    /// The first error from any stage is returned as is; the caller is expected to exit.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            "Syncing {} into {} every {:?} ({:?})",
            self.config.service_name, self.store.location(), self.config.refresh, self.config.mode
        );

        loop {
            if *shutdown.borrow() {
                info!("Shutdown requested, stopping");
                return Ok(());
            }

            self.run_once().await?;

            let sleep = tokio::time::sleep(self.config.refresh);
            tokio::pin!(sleep);

            tokio::select! {
                _ = &mut sleep => {}
                changed = shutdown.changed() => {
                    // Sender gone or flipped back: nothing to stop for, finish the wait
                    if changed.is_err() || !*shutdown.borrow() {
                        sleep.await;
                    }
                }
            }
        }
    }

    pub async fn run_once(&self) -> Result<Persisted> {
        let addresses = self.resolve_addresses().await?;
        debug!("{} resolved to {:?}", self.config.service_name, addresses);

        let contents = ConfigDocument::build(&addresses).to_bytes()?;
        self.persist(&contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PersistMode, SidecarError};
    use futures::future::BoxFuture;
    use std::io;
    use std::net::IpAddr;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StaticResolver(Vec<IpAddr>);

    impl Resolver for StaticResolver {
        fn resolve<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
            let addrs = self.0.clone();
            Box::pin(async move { Ok(addrs) })
        }
    }

    struct FailingResolver;

    impl Resolver for FailingResolver {
        fn resolve<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
            Box::pin(async { Err(io::Error::new(io::ErrorKind::NotFound, "no such host")) })
        }
    }

    struct HangingResolver;

    impl Resolver for HangingResolver {
        fn resolve<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, io::Result<Vec<IpAddr>>> {
            Box::pin(futures::future::pending())
        }
    }

    /// In-memory store counting every save.
    #[derive(Default)]
    struct MemoryStore {
        contents: Mutex<Option<Vec<u8>>>,
        saves: Arc<AtomicUsize>,
    }

    impl MemoryStore {
        fn seeded(contents: &[u8]) -> MemoryStore {
            MemoryStore {
                contents: Mutex::new(Some(contents.to_vec())),
                saves: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn contents(&self) -> Option<Vec<u8>> {
            self.contents.lock().unwrap().clone()
        }
    }

    impl ConfigStore for MemoryStore {
        fn load(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
            let contents = self.contents();
            Box::pin(async move {
                contents.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
            })
        }

        fn save<'a>(&'a self, contents: &'a [u8]) -> BoxFuture<'a, io::Result<()>> {
            *self.contents.lock().unwrap() = Some(contents.to_vec());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        }

        fn location(&self) -> String {
            "memory".to_owned()
        }
    }

    fn config(mode: PersistMode) -> Arc<Config> {
        Arc::new(Config {
            service_name: "memcached".to_owned(),
            refresh: Duration::from_secs(3600),
            output: PathBuf::from("unused"),
            mode,
            debug: true,
            resolve_timeout: Some(Duration::from_millis(100)),
        })
    }

    fn ten_zero_zero_one() -> Vec<IpAddr> {
        vec!["10.0.0.1".parse().unwrap()]
    }

    fn expected_bytes() -> Vec<u8> {
        ConfigDocument::build(&ten_zero_zero_one()).to_bytes().unwrap()
    }

    #[tokio::test]
    async fn identical_contents_are_not_rewritten() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            StaticResolver(ten_zero_zero_one()),
            MemoryStore::seeded(&expected_bytes()),
        );

        assert_eq!(sidecar.run_once().await.unwrap(), Persisted::Unchanged);
        assert_eq!(sidecar.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_contents_are_replaced() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            StaticResolver(ten_zero_zero_one()),
            MemoryStore::seeded(b"stale"),
        );

        assert_eq!(sidecar.run_once().await.unwrap(), Persisted::Written);
        assert_eq!(sidecar.store.contents(), Some(expected_bytes()));
    }

    #[tokio::test]
    async fn missing_contents_are_written() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            StaticResolver(ten_zero_zero_one()),
            MemoryStore::default(),
        );

        assert_eq!(sidecar.run_once().await.unwrap(), Persisted::Written);
        assert_eq!(sidecar.store.contents(), Some(expected_bytes()));
    }

    #[tokio::test]
    async fn unconditional_mode_writes_every_cycle() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::Unconditional),
            StaticResolver(ten_zero_zero_one()),
            MemoryStore::default(),
        );

        sidecar.run_once().await.unwrap();
        sidecar.run_once().await.unwrap();

        assert_eq!(sidecar.store.saves.load(Ordering::SeqCst), 2);
        assert_eq!(sidecar.store.contents(), Some(expected_bytes()));
    }

    #[tokio::test]
    async fn resolution_failure_is_returned() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            FailingResolver,
            MemoryStore::seeded(b"untouched"),
        );

        match sidecar.run_once().await {
            Err(SidecarError::Resolution { name, .. }) => assert_eq!(name, "memcached"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(sidecar.store.contents(), Some(b"untouched".to_vec()));
    }

    #[tokio::test]
    async fn hanging_resolution_times_out() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            HangingResolver,
            MemoryStore::default(),
        );

        match sidecar.run_once().await {
            Err(SidecarError::ResolutionTimeout { timeout, .. }) => assert_eq!(timeout, Duration::from_millis(100)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn run_stops_before_resolving_when_already_shut_down() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::Unconditional),
            FailingResolver,
            MemoryStore::default(),
        );
        let (_tx, rx) = watch::channel(true);

        sidecar.run(rx).await.unwrap();
        assert_eq!(sidecar.store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shutdown_interrupts_sleep() {
        let store = MemoryStore::default();
        let saves = Arc::clone(&store.saves);
        let sidecar = Sidecar::with_parts(
            config(PersistMode::Unconditional),
            StaticResolver(ten_zero_zero_one()),
            store,
        );
        let (tx, rx) = watch::channel(false);

        let stop = async move {
            while saves.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            tx.send(true).unwrap();
        };

        // refresh is an hour, so returning at all means the sleep was cut short
        let (result, _) = tokio::time::timeout(Duration::from_secs(5), async { tokio::join!(sidecar.run(rx), stop) })
            .await
            .unwrap();
        result.unwrap();
        assert_eq!(sidecar.store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn run_returns_first_error() {
        let sidecar = Sidecar::with_parts(
            config(PersistMode::ChangeDetecting),
            FailingResolver,
            MemoryStore::default(),
        );
        let (_tx, rx) = watch::channel(false);

        assert!(matches!(sidecar.run(rx).await, Err(SidecarError::Resolution { .. })));
    }
}
