use std::io;
use std::path::{Path, PathBuf};

/// A local file owned by the current run.  The file need not exist yet; whatever is at the path
/// is removed by [`ScratchFile::remove`] or, failing that, when the guard is dropped.
#[derive(Debug)]
pub(crate) struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now.  Returns whether there was anything to remove.
    pub(crate) fn remove(mut self) -> io::Result<bool> {
        self.armed = false;
        remove_if_exists(&self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = remove_if_exists(&self.path) {
                log::warn!("could not remove {}: {}", self.path.display(), err);
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
