//! Lifecycle notifications emitted while parsing.

use std::path::Path;

use crate::error::{Error, Stage};
use crate::model::{Document, Manifest, Metadata, Spine, TocNode};

/// Receives pipeline lifecycle events, in order.
///
/// Notifications are advisory. Every method has an empty default and none of
/// them can fail, so an observer cannot change the outcome of a parse.
pub trait ParseObserver {
    fn begin_parsing(&self, _path: &Path) {}

    /// `directory` is either the extraction target or the input directory itself.
    fn archive_extracted(&self, _directory: &Path) {}

    fn content_located(&self, _content_directory: &Path) {}

    fn spine_parsed(&self, _spine: &Spine) {}

    fn metadata_parsed(&self, _metadata: &Metadata) {}

    fn manifest_parsed(&self, _manifest: &Manifest) {}

    fn table_of_contents_parsed(&self, _toc: &TocNode) {}

    fn parsing_finished(&self, _path: &Path, _document: &Document) {}

    /// `stage` is the stage that failed; the pipeline itself is then `Failed`.
    fn parsing_failed(&self, _path: &Path, _stage: Stage, _error: &Error) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

/// Observer that forwards every notification to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn begin_parsing(&self, path: &Path) {
        tracing::info!(path = %path.display(), "parsing EPUB");
    }

    fn archive_extracted(&self, directory: &Path) {
        tracing::debug!(directory = %directory.display(), "archive ready");
    }

    fn content_located(&self, content_directory: &Path) {
        tracing::debug!(content = %content_directory.display(), "content located");
    }

    fn spine_parsed(&self, spine: &Spine) {
        tracing::debug!(items = spine.len(), toc = ?spine.toc, "spine parsed");
    }

    fn metadata_parsed(&self, metadata: &Metadata) {
        tracing::debug!(title = ?metadata.title, "metadata parsed");
    }

    fn manifest_parsed(&self, manifest: &Manifest) {
        tracing::debug!(items = manifest.len(), "manifest parsed");
    }

    fn table_of_contents_parsed(&self, toc: &TocNode) {
        tracing::debug!(
            path = %toc.path,
            entries = toc.node_count() - 1,
            "table of contents parsed"
        );
    }

    fn parsing_finished(&self, path: &Path, document: &Document) {
        tracing::info!(
            path = %path.display(),
            title = document.title().unwrap_or_default(),
            "finished parsing"
        );
    }

    fn parsing_failed(&self, path: &Path, stage: Stage, error: &Error) {
        tracing::error!(path = %path.display(), %stage, "parsing failed: {}", error);
    }
}

impl<T: ParseObserver + ?Sized> ParseObserver for &T {
    fn begin_parsing(&self, path: &Path) {
        (**self).begin_parsing(path)
    }

    fn archive_extracted(&self, directory: &Path) {
        (**self).archive_extracted(directory)
    }

    fn content_located(&self, content_directory: &Path) {
        (**self).content_located(content_directory)
    }

    fn spine_parsed(&self, spine: &Spine) {
        (**self).spine_parsed(spine)
    }

    fn metadata_parsed(&self, metadata: &Metadata) {
        (**self).metadata_parsed(metadata)
    }

    fn manifest_parsed(&self, manifest: &Manifest) {
        (**self).manifest_parsed(manifest)
    }

    fn table_of_contents_parsed(&self, toc: &TocNode) {
        (**self).table_of_contents_parsed(toc)
    }

    fn parsing_finished(&self, path: &Path, document: &Document) {
        (**self).parsing_finished(path, document)
    }

    fn parsing_failed(&self, path: &Path, stage: Stage, error: &Error) {
        (**self).parsing_failed(path, stage, error)
    }
}
