//! Archive extraction.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};

/// Expands an EPUB archive onto the filesystem.
pub trait ArchiveService: Send + Sync {
    /// Extract `archive` and return the directory holding its contents.
    fn unarchive(&self, archive: &Path) -> Result<PathBuf>;
}

/// [`ArchiveService`] backed by the `zip` crate.
///
/// Each archive is extracted to `<root>/<archive file stem>`. Two parses of
/// the same archive with the same root share that directory, so they must not
/// run at the same time.
#[derive(Debug, Clone)]
pub struct ZipExtractor {
    root: PathBuf,
}

impl ZipExtractor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory `archive` is extracted to.
    pub fn destination(&self, archive: &Path) -> PathBuf {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "book".to_string());
        self.root.join(stem)
    }
}

impl Default for ZipExtractor {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("epub-outline"))
    }
}

impl ArchiveService for ZipExtractor {
    fn unarchive(&self, archive: &Path) -> Result<PathBuf> {
        let fail = |source: ZipError| Error::Archive {
            path: archive.to_path_buf(),
            source,
        };

        let file = File::open(archive).map_err(|e| fail(e.into()))?;
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(fail)?;

        let destination = self.destination(archive);
        fs::create_dir_all(&destination).map_err(|e| fail(e.into()))?;

        // Entry names are sanitised by `extract`; nothing lands outside `destination`.
        zip.extract(&destination).map_err(fail)?;

        tracing::debug!(
            archive = %archive.display(),
            entries = zip.len(),
            destination = %destination.display(),
            "extracted archive"
        );
        Ok(destination)
    }
}
