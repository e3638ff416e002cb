use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistMode {
    /// Only write when the built config differs from what is on disk
    ChangeDetecting,
    /// Write every cycle
    Unconditional,
}

/// Built once at startup and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    pub service_name: String,
    pub refresh: Duration,
    pub output: PathBuf,
    pub mode: PersistMode,
    pub debug: bool,
    pub resolve_timeout: Option<Duration>,
}
