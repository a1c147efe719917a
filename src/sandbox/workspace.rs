use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "codejudge-";

/// An exclusively owned temporary directory for one compiled submission
///
/// The directory gets a random suffix so concurrent submissions never
/// collide. It is removed when the workspace is dropped, on every exit path;
/// a failed removal is logged and otherwise ignored.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
}

impl Workspace {
    pub fn acquire() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()?;
        log::debug!("Acquired workspace {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        // Only `drop` takes the directory out
        self.dir.as_ref().map(TempDir::path).unwrap_or(Path::new(""))
    }

    /// Writes `content` to `name` inside the workspace
    pub fn write_file(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => log::debug!("Removed workspace {}", path.display()),
                Err(e) => log::debug!("Failed to remove workspace {}: {e}", path.display()),
            }
        }
    }
}
