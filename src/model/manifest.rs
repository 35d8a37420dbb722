//! Manifest: the registry of publication resources.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use super::MediaType;

/// A resource declared in the package manifest.
///
/// Two items are the same resource when their ids match; the other fields do
/// not take part in equality or hashing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ManifestItem {
    pub id: String,
    /// Href relative to the content directory, as written in the package.
    pub path: String,
    pub media_type: MediaType,
    /// Raw `properties` attribute (e.g. `nav`, `cover-image scripted`).
    pub property: Option<String>,
    pub fallback: Option<String>,
}

impl ManifestItem {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        media_type: &str,
        property: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            media_type: MediaType::from_mime(media_type),
            property,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Whether the whitespace-separated `properties` list contains `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.property
            .as_deref()
            .is_some_and(|props| props.split_ascii_whitespace().any(|p| p == name))
    }
}

impl PartialEq for ManifestItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ManifestItem {}

impl Hash for ManifestItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Manifest items keyed by id, iterated in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Manifest {
    id: Option<String>,
    items: Vec<ManifestItem>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: BTreeMap<String, usize>,
}

impl Manifest {
    /// Build a manifest from items in document order.
    ///
    /// A repeated id replaces the earlier item but keeps its position.
    pub fn from_items(id: Option<String>, items: impl IntoIterator<Item = ManifestItem>) -> Self {
        let mut manifest = Manifest {
            id,
            items: Vec::new(),
            index: BTreeMap::new(),
        };

        for item in items {
            match manifest.index.get(&item.id) {
                Some(&pos) => {
                    tracing::warn!(id = %item.id, "duplicate manifest id, keeping the later item");
                    manifest.items[pos] = item;
                }
                None => {
                    manifest.index.insert(item.id.clone(), manifest.items.len());
                    manifest.items.push(item);
                }
            }
        }

        manifest
    }

    /// The manifest element's own `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Items in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestItem> {
        self.items.iter()
    }

    /// `(key, item)` pairs in document order. The key always equals `item.id`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ManifestItem)> {
        self.items.iter().map(|item| (item.id.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item whose `properties` list contains `name`.
    pub fn find_by_property(&self, name: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.has_property(name))
    }

    /// The EPUB 3 navigation document, if declared.
    pub fn nav(&self) -> Option<&ManifestItem> {
        self.find_by_property("nav")
    }

    /// The EPUB 3 cover image, if declared.
    pub fn cover_image(&self) -> Option<&ManifestItem> {
        self.find_by_property("cover-image")
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestItem;
    type IntoIter = std::slice::Iter<'a, ManifestItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
