//! EPUB container parsing: archive extraction, package location, stage
//! parsers and the pipeline that ties them together.

pub mod archive;
pub mod content;
pub mod observer;
pub mod parser;
mod reader;
pub mod toc;

pub use archive::{ArchiveService, ZipExtractor};
pub use content::ContentLocator;
pub use observer::{NoopObserver, ParseObserver, TracingObserver};
pub use reader::{EpubParser, read_epub};
