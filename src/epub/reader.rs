use std::path::Path;

use super::archive::{ArchiveService, ZipExtractor};
use super::content::ContentLocator;
use super::observer::{NoopObserver, ParseObserver};
use super::parser::{parse_manifest, parse_metadata, parse_spine, parse_table_of_contents};
use super::toc;
use crate::error::{Result, Stage};
use crate::model::Document;

/// Read an EPUB archive or extracted directory into a [`Document`].
///
/// Archives are extracted with the default [`ZipExtractor`].
///
/// # Example
///
/// ```no_run
/// use epub_outline::read_epub;
///
/// let document = read_epub("path/to/book.epub")?;
/// println!("Title: {:?}", document.title());
/// # Ok::<(), epub_outline::Error>(())
/// ```
pub fn read_epub<P: AsRef<Path>>(path: P) -> Result<Document> {
    EpubParser::new().parse(path)
}

/// Drives the parsing pipeline and reports progress to an observer.
///
/// Stages run strictly in order: locate content, spine, metadata, manifest,
/// table-of-contents resolution, table-of-contents parsing. The first error
/// stops the run; no partial document is ever returned.
pub struct EpubParser<O = NoopObserver> {
    archive: Box<dyn ArchiveService>,
    observer: O,
}

impl EpubParser<NoopObserver> {
    pub fn new() -> Self {
        Self {
            archive: Box::new(ZipExtractor::default()),
            observer: NoopObserver,
        }
    }
}

impl Default for EpubParser<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ParseObserver> EpubParser<O> {
    pub fn with_archive_service(mut self, archive: impl ArchiveService + 'static) -> Self {
        self.archive = Box::new(archive);
        self
    }

    pub fn with_observer<P: ParseObserver>(self, observer: P) -> EpubParser<P> {
        EpubParser {
            archive: self.archive,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Parse an archive file or an already-extracted directory.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        self.observer.begin_parsing(path);

        let mut stage = Stage::NotStarted;
        match self.run(path, &mut stage) {
            Ok(document) => {
                self.observer.parsing_finished(path, &document);
                Ok(document)
            }
            Err(error) => {
                let failed_at = fail(&mut stage);
                self.observer.parsing_failed(path, failed_at, &error);
                Err(error)
            }
        }
    }

    fn run(&self, path: &Path, stage: &mut Stage) -> Result<Document> {
        advance(stage, Stage::LocatingContent);
        let directory = if path.is_dir() {
            path.to_path_buf()
        } else {
            self.archive.unarchive(path)?
        };
        self.observer.archive_extracted(&directory);

        let content = ContentLocator::new(directory)?;
        self.observer.content_located(content.content_directory());

        advance(stage, Stage::ParsingSpine);
        let spine = parse_spine(content.spine());
        self.observer.spine_parsed(&spine);

        advance(stage, Stage::ParsingMetadata);
        let metadata = parse_metadata(content.metadata(), content.unique_identifier());
        self.observer.metadata_parsed(&metadata);

        advance(stage, Stage::ParsingManifest);
        let manifest = parse_manifest(content.manifest());
        self.observer.manifest_parsed(&manifest);

        advance(stage, Stage::ResolvingToc);
        let toc_path = toc::resolve(&spine, &manifest, |href| content.contains(href))?
            .path
            .clone();

        advance(stage, Stage::ParsingToc);
        let toc_element = content.resource(&toc_path)?;
        let table_of_contents = parse_table_of_contents(&toc_element, &toc_path);
        self.observer.table_of_contents_parsed(&table_of_contents);

        advance(stage, Stage::Completed);
        Ok(Document::new(
            content.root_directory().to_path_buf(),
            content.content_directory().to_path_buf(),
            metadata,
            manifest,
            spine,
            table_of_contents,
        ))
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert_eq!(stage.next(), next, "pipeline stages must run in order");
    tracing::debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

/// Move to `Failed`, returning the stage that failed.
fn fail(stage: &mut Stage) -> Stage {
    let failed_at = std::mem::replace(stage, Stage::Failed);
    tracing::debug!(from = %failed_at, to = %Stage::Failed, "stage transition");
    failed_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: impl Into<String>) {
            self.events.borrow_mut().push(event.into());
        }
    }

    impl ParseObserver for Recorder {
        fn begin_parsing(&self, _path: &Path) {
            self.push("begin");
        }
        fn archive_extracted(&self, _directory: &Path) {
            self.push("extracted");
        }
        fn content_located(&self, _content_directory: &Path) {
            self.push("located");
        }
        fn spine_parsed(&self, spine: &crate::model::Spine) {
            self.push(format!("spine:{}", spine.len()));
        }
        fn metadata_parsed(&self, _metadata: &crate::model::Metadata) {
            self.push("metadata");
        }
        fn manifest_parsed(&self, manifest: &crate::model::Manifest) {
            self.push(format!("manifest:{}", manifest.len()));
        }
        fn table_of_contents_parsed(&self, toc: &crate::model::TocNode) {
            self.push(format!("toc:{}", toc.children.len()));
        }
        fn parsing_finished(&self, _path: &Path, _document: &Document) {
            self.push("finished");
        }
        fn parsing_failed(&self, _path: &Path, stage: Stage, _error: &Error) {
            self.push(format!("failed:{stage:?}"));
        }
    }

    struct PanickingArchive;

    impl ArchiveService for PanickingArchive {
        fn unarchive(&self, _archive: &Path) -> Result<PathBuf> {
            panic!("directories must not be extracted");
        }
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn book(manifest: &str, spine_attrs: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "META-INF/container.xml",
            r#"<container><rootfiles><rootfile full-path="OPS/package.opf"/></rootfiles></container>"#,
        );
        write(
            dir.path(),
            "OPS/package.opf",
            &format!(
                r#"<package xmlns:dc="http://purl.org/dc/elements/1.1/">
  <metadata><dc:title>Observed</dc:title></metadata>
  <manifest>{manifest}</manifest>
  <spine {spine_attrs}><itemref idref="ch1"/></spine>
</package>"#
            ),
        );
        write(dir.path(), "OPS/ch1.xhtml", "<html/>");
        dir
    }

    const NCX: &str = r#"<ncx><navMap>
  <navPoint><navLabel><text>One</text></navLabel><content src="ch1.xhtml"/></navPoint>
</navMap></ncx>"#;

    #[test]
    fn test_notifications_in_order() {
        let dir = book(
            r#"<item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
               <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#,
            r#"toc="ncx""#,
        );
        write(dir.path(), "OPS/toc.ncx", NCX);

        let recorder = Recorder::default();
        let parser = EpubParser::new()
            .with_archive_service(PanickingArchive)
            .with_observer(&recorder);
        let document = parser.parse(dir.path()).unwrap();

        assert_eq!(document.title(), Some("Observed"));
        assert_eq!(
            recorder.events.borrow().as_slice(),
            [
                "begin",
                "extracted",
                "located",
                "spine:1",
                "metadata",
                "manifest:2",
                "toc:1",
                "finished"
            ]
        );
    }

    #[test]
    fn test_missing_toc_notifies_failure() {
        let dir = book(
            r#"<item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>"#,
            "",
        );

        let recorder = Recorder::default();
        let err = EpubParser::new()
            .with_observer(&recorder)
            .parse(dir.path())
            .unwrap_err();

        assert!(matches!(err, Error::TableOfContentsMissing));
        let events = recorder.events.borrow();
        assert_eq!(events.last().map(String::as_str), Some("failed:ResolvingToc"));
        assert!(!events.iter().any(|e| e == "finished"));
        assert!(events.iter().any(|e| e == "manifest:1"));
    }

    #[test]
    fn test_unreadable_fallback_toc_fails_in_parsing_stage() {
        let dir = book(
            r#"<item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
               <item id="toc" href="missing.xhtml" media-type="application/xhtml+xml"/>"#,
            "",
        );

        let recorder = Recorder::default();
        let err = EpubParser::new()
            .with_observer(&recorder)
            .parse(dir.path())
            .unwrap_err();

        assert!(matches!(err, Error::ContentLocation { stage: Stage::ParsingToc, .. }));
        assert_eq!(
            recorder.events.borrow().last().map(String::as_str),
            Some("failed:ParsingToc")
        );
    }

    #[test]
    fn test_failure_enters_failed_stage() {
        let mut stage = Stage::ResolvingToc;
        assert_eq!(fail(&mut stage), Stage::ResolvingToc);
        assert_eq!(stage, Stage::Failed);
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_locating_failure() {
        let dir = TempDir::new().unwrap();
        let recorder = Recorder::default();
        let err = EpubParser::new()
            .with_observer(&recorder)
            .parse(dir.path())
            .unwrap_err();

        assert_eq!(err.stage(), Stage::LocatingContent);
        assert_eq!(
            recorder.events.borrow().as_slice(),
            ["begin", "extracted", "failed:LocatingContent"]
        );
    }
}
