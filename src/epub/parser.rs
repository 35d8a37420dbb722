//! Stage parsers: pure transforms from parsed XML to the data model.
//!
//! None of these fail. Missing optional elements leave fields empty and
//! unrecognised elements or attributes are ignored.

use std::collections::HashMap;

use crate::model::{
    Creator, Identifier, Manifest, ManifestItem, Metadata, PageProgressionDirection, Spine,
    SpineItemRef, TocNode,
};
use crate::xml::XmlElement;

/// Parse the OPF `<spine>` element.
pub fn parse_spine(spine: &XmlElement) -> Spine {
    let items = spine
        .children_named("itemref")
        .filter_map(|itemref| {
            let idref = itemref.attr("idref")?;
            Some(SpineItemRef {
                idref: idref.to_string(),
                id: itemref.attr("id").map(str::to_string),
                linear: itemref.attr("linear").map(str::trim) != Some("no"),
                properties: itemref.attr("properties").map(str::to_string),
            })
        })
        .collect();

    Spine {
        id: spine.attr("id").map(str::to_string),
        toc: non_empty(spine.attr("toc")),
        page_progression_direction: spine
            .attr("page-progression-direction")
            .map(PageProgressionDirection::from_attr)
            .unwrap_or_default(),
        items,
    }
}

/// Parse the OPF `<manifest>` element. Items without an `id` are skipped.
pub fn parse_manifest(manifest: &XmlElement) -> Manifest {
    let items = manifest.children_named("item").filter_map(|item| {
        let id = non_empty(item.attr("id"))?;
        let mut parsed = ManifestItem::new(
            id,
            item.attr("href").unwrap_or_default(),
            item.attr("media-type").unwrap_or_default(),
            non_empty(item.attr("properties")),
        );
        if let Some(fallback) = non_empty(item.attr("fallback")) {
            parsed = parsed.with_fallback(fallback);
        }
        Some(parsed)
    });

    Manifest::from_items(manifest.attr("id").map(str::to_string), items)
}

/// Parse the OPF `<metadata>` element.
///
/// `unique_identifier` is the package's `unique-identifier` attribute; it picks
/// which `dc:identifier` becomes [`Metadata::identifier`].
pub fn parse_metadata(metadata: &XmlElement, unique_identifier: Option<&str>) -> Metadata {
    let refinements = collect_refinements(metadata);
    let mut result = Metadata::default();

    // Descendants rather than children: OEBPS 1.x nests entries in dc-metadata.
    for element in metadata.descendants() {
        let text = element.text();
        match element.local_name() {
            "meta" => {
                if element.attr("name") == Some("cover") {
                    result.cover_id = non_empty(element.attr("content"));
                } else if element.attr("property") == Some("dcterms:modified")
                    && element.attr("refines").is_none()
                    && !text.is_empty()
                {
                    result.modified = Some(text.to_string());
                }
            }
            _ if text.is_empty() => {}
            "title" => set_first(&mut result.title, text),
            "creator" => result.creators.push(creator_from(element, &refinements)),
            "contributor" => result.contributors.push(creator_from(element, &refinements)),
            "language" => set_first(&mut result.language, text),
            "publisher" => set_first(&mut result.publisher, text),
            "date" => set_first(&mut result.date, text),
            "rights" => set_first(&mut result.rights, text),
            "description" => set_first(&mut result.description, text),
            "subject" => result.subjects.push(text.to_string()),
            "source" => set_first(&mut result.source, text),
            "type" => set_first(&mut result.kind, text),
            "format" => set_first(&mut result.format, text),
            "coverage" => set_first(&mut result.coverage, text),
            "relation" => set_first(&mut result.relation, text),
            "identifier" => result.identifiers.push(Identifier {
                value: text.to_string(),
                id: element.attr("id").map(str::to_string),
                scheme: element.attr("scheme").map(str::to_string),
            }),
            _ => {}
        }
    }

    result.identifier = unique_identifier
        .and_then(|uid| result.identifiers.iter().find(|i| i.id.as_deref() == Some(uid)))
        .or_else(|| result.identifiers.first())
        .map(|i| i.value.clone());

    result
}

/// Parse a table-of-contents document: an NCX file or an EPUB 3 navigation document.
///
/// The returned root is synthetic: its label is the document title, its path
/// is `toc_path`, and its children are the top-level entries.
pub fn parse_table_of_contents(document: &XmlElement, toc_path: &str) -> TocNode {
    if document.local_name() == "ncx" || document.child("navMap").is_some() {
        parse_ncx(document, toc_path)
    } else {
        parse_nav(document, toc_path)
    }
}

fn parse_ncx(ncx: &XmlElement, toc_path: &str) -> TocNode {
    let label = ncx
        .child("docTitle")
        .map(XmlElement::all_text)
        .unwrap_or_default();
    let children = ncx
        .child("navMap")
        .map(|nav_map| nav_map.children_named("navPoint").map(nav_point).collect())
        .unwrap_or_default();

    TocNode::new(label, toc_path).with_children(children)
}

fn nav_point(point: &XmlElement) -> TocNode {
    TocNode {
        id: point.attr("id").map(str::to_string),
        label: point
            .child("navLabel")
            .map(XmlElement::all_text)
            .unwrap_or_default(),
        path: point
            .child("content")
            .and_then(|content| content.attr("src"))
            .unwrap_or_default()
            .to_string(),
        play_order: point.attr("playOrder").and_then(|o| o.trim().parse().ok()),
        children: point.children_named("navPoint").map(nav_point).collect(),
    }
}

fn parse_nav(document: &XmlElement, toc_path: &str) -> TocNode {
    let mut navs = document.descendants().filter(|e| e.local_name() == "nav");
    let toc_nav = navs
        .clone()
        .find(|nav| {
            nav.attr("type")
                .is_some_and(|types| types.split_ascii_whitespace().any(|t| t == "toc"))
        })
        .or_else(|| navs.next());

    let Some(nav) = toc_nav else {
        return TocNode::new("", toc_path);
    };

    let label = nav
        .children()
        .iter()
        .find(|c| matches!(c.local_name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
        .map(XmlElement::all_text)
        .unwrap_or_default();
    let children = nav.child("ol").map(nav_list).unwrap_or_default();

    TocNode::new(label, toc_path).with_children(children)
}

fn nav_list(list: &XmlElement) -> Vec<TocNode> {
    list.children_named("li")
        .map(|li| {
            let anchor = li.child("a").or_else(|| li.child("span"));
            TocNode {
                id: li.attr("id").map(str::to_string),
                label: anchor.map(XmlElement::all_text).unwrap_or_default(),
                path: anchor
                    .and_then(|a| a.attr("href"))
                    .unwrap_or_default()
                    .to_string(),
                play_order: None,
                children: li.child("ol").map(nav_list).unwrap_or_default(),
            }
        })
        .collect()
}

/// EPUB 3 `<meta refines="#id" property="...">` values, keyed by (id, property).
fn collect_refinements(metadata: &XmlElement) -> HashMap<(&str, &str), &str> {
    metadata
        .descendants()
        .filter(|e| e.local_name() == "meta")
        .filter_map(|meta| {
            let target = meta.attr("refines")?.strip_prefix('#')?;
            let property = meta.attr("property")?;
            Some(((target, property), meta.text()))
        })
        .collect()
}

fn creator_from<'a>(
    element: &'a XmlElement,
    refinements: &HashMap<(&'a str, &'a str), &'a str>,
) -> Creator {
    let refined = |property: &'static str| {
        element
            .attr("id")
            .and_then(|id| refinements.get(&(id, property)))
            .map(|value| value.to_string())
    };

    Creator {
        name: element.text().to_string(),
        role: element.attr("role").map(str::to_string).or_else(|| refined("role")),
        file_as: element
            .attr("file-as")
            .map(str::to_string)
            .or_else(|| refined("file-as")),
    }
}

fn set_first(field: &mut Option<String>, value: &str) {
    if field.is_none() {
        *field = Some(value.to_string());
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
