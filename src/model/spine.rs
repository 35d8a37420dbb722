//! Spine: the default reading order.

/// Direction in which content flows from one spine item to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PageProgressionDirection {
    #[default]
    Default,
    LeftToRight,
    RightToLeft,
}

impl PageProgressionDirection {
    pub fn from_attr(value: &str) -> Self {
        match value.trim() {
            "ltr" => PageProgressionDirection::LeftToRight,
            "rtl" => PageProgressionDirection::RightToLeft,
            _ => PageProgressionDirection::Default,
        }
    }
}

/// An `itemref` in the spine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpineItemRef {
    /// Id of the referenced manifest item.
    pub idref: String,
    pub id: Option<String>,
    /// `false` only when the package says `linear="no"`.
    pub linear: bool,
    pub properties: Option<String>,
}

impl SpineItemRef {
    pub fn new(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
            id: None,
            linear: true,
            properties: None,
        }
    }
}

/// Reading order plus the spine-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Spine {
    pub id: Option<String>,
    /// Manifest id of the EPUB 2 NCX document.
    pub toc: Option<String>,
    pub page_progression_direction: PageProgressionDirection,
    pub items: Vec<SpineItemRef>,
}

impl Spine {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpineItemRef> {
        self.items.iter()
    }

    /// Items that belong to the primary reading order.
    pub fn linear_items(&self) -> impl Iterator<Item = &SpineItemRef> {
        self.items.iter().filter(|item| item.linear)
    }

    /// Position of the first reference to `idref`.
    pub fn position(&self, idref: &str) -> Option<usize> {
        self.items.iter().position(|item| item.idref == idref)
    }
}

impl<'a> IntoIterator for &'a Spine {
    type Item = &'a SpineItemRef;
    type IntoIter = std::slice::Iter<'a, SpineItemRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_progression_direction() {
        assert_eq!(PageProgressionDirection::from_attr("rtl"), PageProgressionDirection::RightToLeft);
        assert_eq!(PageProgressionDirection::from_attr("ltr"), PageProgressionDirection::LeftToRight);
        assert_eq!(PageProgressionDirection::from_attr("sideways"), PageProgressionDirection::Default);
    }

    #[test]
    fn test_linear_items_and_position() {
        let mut aside = SpineItemRef::new("notes");
        aside.linear = false;
        let spine = Spine {
            items: vec![SpineItemRef::new("ch1"), aside, SpineItemRef::new("ch2")],
            ..Spine::default()
        };

        let linear: Vec<_> = spine.linear_items().map(|i| i.idref.as_str()).collect();
        assert_eq!(linear, vec!["ch1", "ch2"]);
        assert_eq!(spine.position("ch2"), Some(2));
        assert_eq!(spine.position("missing"), None);
    }
}
