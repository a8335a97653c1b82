use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// A directory in the source root representing one series.
///
/// The directory's base name doubles as the catalog search query and as the
/// path segment the series is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: String,
    pub path: PathBuf,
}

impl LibraryEntry {
    /// Open a series directory.
    ///
    /// The path must point at a directory whose name is valid UTF-8; anything
    /// else is an [`Io`](ErrorKind::Io) error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await.or_raise(|| ErrorKind::Io(path.clone()))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::Io(path));
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            exn::bail!(ErrorKind::Io(path));
        };
        Ok(Self { name, path })
    }

    /// Location of the series' local metadata file.
    pub fn nfo_path(&self) -> PathBuf {
        self.path.join(crate::resolve::NFO_FILE_NAME)
    }

    /// Where the series lives once registered beneath `target_root`.
    pub fn target_path(&self, target_root: impl AsRef<Path>) -> PathBuf {
        target_root.as_ref().join(&self.name)
    }
}
