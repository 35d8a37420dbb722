//! Data model populated by the parsing pipeline.
//!
//! Every value here is produced once by a stage parser and never mutated
//! afterwards; [`Document`] only aggregates them.

mod document;
mod manifest;
mod media_type;
mod metadata;
mod spine;
mod toc;

pub use document::Document;
pub use manifest::{Manifest, ManifestItem};
pub use media_type::MediaType;
pub use metadata::{Creator, Identifier, Metadata};
pub use spine::{PageProgressionDirection, Spine, SpineItemRef};
pub use toc::{TocIter, TocNode};
