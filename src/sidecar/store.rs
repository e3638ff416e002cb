use futures::future::BoxFuture;
use std::io;
use std::path::{Path, PathBuf};

/// Whole-file storage for the generated config.
pub trait ConfigStore: Send + Sync + 'static {
    fn load(&self) -> BoxFuture<'_, io::Result<Vec<u8>>>;

    fn save<'a>(&'a self, contents: &'a [u8]) -> BoxFuture<'a, io::Result<()>>;

    /// Human readable location, used in logs and errors
    fn location(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> FileStore {
        FileStore {
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        Box::pin(tokio::fs::read(&self.path))
    }

    // Overwrites in place, mcrouter picks the change up on its own
    fn save<'a>(&'a self, contents: &'a [u8]) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(tokio::fs::write(&self.path, contents))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
