//! Package metadata (Dublin Core + a few OPF extensions).

/// A `dc:creator` or `dc:contributor` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Creator {
    pub name: String,
    /// MARC relator code such as `aut` or `edt`.
    pub role: Option<String>,
    pub file_as: Option<String>,
}

impl Creator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A `dc:identifier` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Identifier {
    pub value: String,
    pub id: Option<String>,
    /// `opf:scheme` (e.g. `ISBN`, `UUID`).
    pub scheme: Option<String>,
}

/// Flat record of package metadata. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    pub title: Option<String>,
    pub creators: Vec<Creator>,
    pub contributors: Vec<Creator>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    /// The package's unique identifier, or the first identifier.
    pub identifier: Option<String>,
    pub identifiers: Vec<Identifier>,
    pub date: Option<String>,
    /// `dcterms:modified`
    pub modified: Option<String>,
    pub rights: Option<String>,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub source: Option<String>,
    /// `dc:type`
    pub kind: Option<String>,
    pub format: Option<String>,
    pub coverage: Option<String>,
    pub relation: Option<String>,
    /// Manifest id named by an EPUB 2 `<meta name="cover">`.
    pub cover_id: Option<String>,
}

impl Metadata {
    /// Name of the first creator.
    pub fn author(&self) -> Option<&str> {
        self.creators.first().map(|c| c.name.as_str())
    }

    /// All creator names, in document order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.creators.iter().map(|c| c.name.as_str())
    }
}
