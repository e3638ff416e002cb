mod sidecar;
pub use sidecar::Sidecar;

mod resolve;
mod persist;
pub use persist::Persisted;

mod resolver;
pub use resolver::{Resolver, SystemResolver};

mod store;
pub use store::{ConfigStore, FileStore};

mod document;
pub use document::{ConfigDocument, Pool, DEFAULT_POOL, MEMCACHED_PORT};
