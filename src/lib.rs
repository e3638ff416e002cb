mod error;
pub use error::{SidecarError, Result};

mod config;
pub use config::{Config, PersistMode};

pub mod cli;
pub mod shutdown;
pub mod sidecar;
