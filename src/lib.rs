//! # epub-outline
//!
//! Parse an EPUB container into a structured document model: metadata,
//! manifest, spine and a table-of-contents tree.
//!
//! ## Features
//!
//! - Reads zipped `.epub` files or already-extracted directories
//! - EPUB 2 (NCX) and EPUB 3 (navigation document) tables of contents
//! - Lenient stage parsers: unknown elements and missing optional fields are ignored
//! - Lifecycle notifications through [`ParseObserver`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use epub_outline::read_epub;
//!
//! let document = read_epub("book.epub").unwrap();
//! println!("{:?} by {:?}", document.title(), document.metadata().author());
//!
//! for (itemref, item) in document.spine_items() {
//!     println!("{} -> {}", itemref.idref, item.path);
//! }
//!
//! for node in document.table_of_contents().iter().skip(1) {
//!     println!("{} ({})", node.label, node.path);
//! }
//! ```
//!
//! ## Observing progress
//!
//! ```no_run
//! use epub_outline::{EpubParser, TracingObserver, ZipExtractor};
//!
//! let parser = EpubParser::new()
//!     .with_archive_service(ZipExtractor::new("/tmp/books"))
//!     .with_observer(TracingObserver);
//! let document = parser.parse("book.epub")?;
//! # Ok::<(), epub_outline::Error>(())
//! ```

pub mod epub;
pub mod error;
pub mod model;
pub(crate) mod util;
pub mod xml;

pub use epub::{
    ArchiveService, ContentLocator, EpubParser, NoopObserver, ParseObserver, TracingObserver,
    ZipExtractor, read_epub,
};
pub use error::{Error, Result, Stage};
pub use model::{
    Creator, Document, Identifier, Manifest, ManifestItem, MediaType, Metadata,
    PageProgressionDirection, Spine, SpineItemRef, TocNode,
};
