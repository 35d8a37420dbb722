//! Owned XML element tree built from `quick-xml` events.
//!
//! The stage parsers walk this tree instead of the raw event stream, so each
//! of them stays a plain function from an element to a model value.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::util::{decode_text, extract_xml_encoding};

/// Errors produced while building an element tree.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

/// A parsed XML element with its attributes, child elements and text.
///
/// `text` holds every direct text run of the element. Each child also keeps
/// its `tail`, the text between its end tag and the next sibling, so mixed
/// content can be put back together in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
    tail: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Qualified name as written in the document (e.g. `dc:title`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without namespace prefix (e.g. `title`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up an attribute by qualified name, falling back to its local name.
    ///
    /// `attr("role")` therefore also finds `opf:role`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .or_else(|| self.attributes.iter().find(|(k, _)| local_name(k) == name))
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.local_name() == name)
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.local_name() == name)
    }

    /// First descendant (depth-first, pre-order) with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.local_name() == name)
    }

    /// All descendants in depth-first pre-order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text of this element and all descendants, concatenated and trimmed.
    pub fn all_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        // `text` is the leading run followed by every child's tail.
        let tails: usize = self.children.iter().map(|c| c.tail.len()).sum();
        out.push_str(&self.text[..self.text.len() - tails]);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(last) = self.children.last_mut() {
            last.tail.push_str(text);
        }
        self.text.push_str(text);
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push_str(&text.into());
        self
    }
}

/// Depth-first iterator over an element's descendants.
#[derive(Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parse raw bytes, honouring a BOM or the encoding named in the XML declaration.
pub fn parse(bytes: &[u8]) -> Result<XmlElement, XmlError> {
    let content = decode_text(bytes, extract_xml_encoding(bytes));
    parse_str(&content)
}

/// Parse a document already decoded to a string.
pub fn parse_str(content: &str) -> Result<XmlElement, XmlError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from(&e)),
            Event::Empty(e) => attach(element_from(&e), &mut stack, &mut root),
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut root);
                }
            }
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.push_text(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.push_text(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(top) = stack.last_mut() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    // Unknown references stay in the text as written.
                    match resolve_entity(&entity) {
                        Some(resolved) => top.push_text(&resolved),
                        None => top.push_text(&format!("&{entity};")),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn attach(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        // Anything after the first top-level element is ignored.
        None if root.is_none() => *root = Some(element),
        None => {}
    }
}

fn element_from(start: &BytesStart<'_>) -> XmlElement {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let attributes = start
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = match unescape_with(&raw, resolve_html5_entity) {
                Ok(Cow::Borrowed(_)) | Err(_) => raw.to_string(),
                Ok(Cow::Owned(unescaped)) => unescaped,
            };
            (key, value)
        })
        .collect();

    XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    }
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Resolve XML, HTML5 named and numeric entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    if let Some(resolved) = resolve_html5_entity(entity) {
        return Some(resolved.to_string());
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
