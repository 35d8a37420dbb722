//! The aggregate produced by a successful parse.

use std::path::{Path, PathBuf};

use super::{Manifest, ManifestItem, Metadata, Spine, SpineItemRef, TocNode};
use crate::util::resolve_href;

/// A fully parsed EPUB.
///
/// Built once at the end of a successful parse; the document owns every
/// nested model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    root_directory: PathBuf,
    content_directory: PathBuf,
    metadata: Metadata,
    manifest: Manifest,
    spine: Spine,
    table_of_contents: TocNode,
}

impl Document {
    pub(crate) fn new(
        root_directory: PathBuf,
        content_directory: PathBuf,
        metadata: Metadata,
        manifest: Manifest,
        spine: Spine,
        table_of_contents: TocNode,
    ) -> Self {
        Self {
            root_directory,
            content_directory,
            metadata,
            manifest,
            spine,
            table_of_contents,
        }
    }

    /// Directory the archive was extracted to (or the directory that was parsed).
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Directory holding the package document; manifest paths are relative to it.
    pub fn content_directory(&self) -> &Path {
        &self.content_directory
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn spine(&self) -> &Spine {
        &self.spine
    }

    pub fn table_of_contents(&self) -> &TocNode {
        &self.table_of_contents
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.as_deref()
    }

    /// Filesystem path of a manifest item.
    pub fn resource_path(&self, item: &ManifestItem) -> PathBuf {
        resolve_href(&self.root_directory, &self.content_directory, &item.path)
    }

    /// Spine entries joined to their manifest items, in reading order.
    ///
    /// References to ids missing from the manifest are skipped.
    pub fn spine_items(&self) -> impl Iterator<Item = (&SpineItemRef, &ManifestItem)> {
        self.spine
            .iter()
            .filter_map(|itemref| self.manifest.get(&itemref.idref).map(|item| (itemref, item)))
    }

    /// The cover image: EPUB 3 `cover-image` property first, then EPUB 2 `<meta name="cover">`.
    pub fn cover(&self) -> Option<&ManifestItem> {
        self.manifest.cover_image().or_else(|| {
            self.metadata
                .cover_id
                .as_deref()
                .and_then(|id| self.manifest.get(id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(metadata: Metadata, manifest: Manifest, spine: Spine) -> Document {
        Document::new(
            PathBuf::from("/book"),
            PathBuf::from("/book/OEBPS"),
            metadata,
            manifest,
            spine,
            TocNode::default(),
        )
    }

    #[test]
    fn test_spine_items_skip_dangling_refs() {
        let manifest = Manifest::from_items(
            None,
            vec![
                ManifestItem::new("ch1", "text/ch1.xhtml", "application/xhtml+xml", None),
                ManifestItem::new("ch2", "text/ch2.xhtml", "application/xhtml+xml", None),
            ],
        );
        let spine = Spine {
            items: vec![
                SpineItemRef::new("ch2"),
                SpineItemRef::new("ghost"),
                SpineItemRef::new("ch1"),
            ],
            ..Spine::default()
        };
        let doc = document(Metadata::default(), manifest, spine);

        let paths: Vec<_> = doc.spine_items().map(|(_, item)| item.path.as_str()).collect();
        assert_eq!(paths, vec!["text/ch2.xhtml", "text/ch1.xhtml"]);
    }

    #[test]
    fn test_resource_path_decodes_href() {
        let item = ManifestItem::new("c", "text/My%20Chapter.xhtml", "application/xhtml+xml", None);
        let doc = document(Metadata::default(), Manifest::default(), Spine::default());
        assert_eq!(
            doc.resource_path(&item),
            PathBuf::from("/book/OEBPS/text/My Chapter.xhtml")
        );
    }

    #[test]
    fn test_resource_path_resolves_parent_segments() {
        let item = ManifestItem::new("img", "../images/cover.jpg", "image/jpeg", None);
        let doc = document(Metadata::default(), Manifest::default(), Spine::default());
        assert_eq!(doc.resource_path(&item), PathBuf::from("/book/images/cover.jpg"));

        let item = ManifestItem::new("img", "../../../cover.jpg", "image/jpeg", None);
        assert_eq!(doc.resource_path(&item), PathBuf::from("/book/cover.jpg"));
    }

    #[test]
    fn test_cover_prefers_epub3_property() {
        let manifest = Manifest::from_items(
            None,
            vec![
                ManifestItem::new("old-cover", "cover.png", "image/png", None),
                ManifestItem::new("new-cover", "cover.jpg", "image/jpeg", Some("cover-image".into())),
            ],
        );
        let metadata = Metadata {
            cover_id: Some("old-cover".into()),
            ..Metadata::default()
        };
        let doc = document(metadata.clone(), manifest, Spine::default());
        assert_eq!(doc.cover().unwrap().id, "new-cover");

        let manifest = Manifest::from_items(
            None,
            vec![ManifestItem::new("old-cover", "cover.png", "image/png", None)],
        );
        let doc = document(metadata, manifest, Spine::default());
        assert_eq!(doc.cover().unwrap().id, "old-cover");
    }
}
