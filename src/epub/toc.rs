//! Locating the table-of-contents document among the manifest items.
//!
//! EPUB 2 books point at an NCX file through the spine's `toc` attribute,
//! EPUB 3 books ship a navigation document, and real files register either
//! under unpredictable ids. Resolution probes a fixed list of manifest ids
//! first and falls back to an item registered as `toc`.

use crate::error::{Error, Result};
use crate::model::{Manifest, ManifestItem, Spine};

/// Manifest id probed when the spine has no `toc` attribute.
pub const DEFAULT_NCX_ID: &str = "toc.ncx";

/// Manifest ids probed after the spine-declared one, in order.
pub const NAV_CANDIDATE_IDS: [&str; 2] = ["_nav.xhtml", "_toc.xhtml"];

/// Id accepted by the last-resort scan.
pub const FALLBACK_ID: &str = "toc";

/// Candidate manifest ids in probing order.
pub fn candidate_ids(spine: &Spine) -> [&str; 3] {
    let declared = spine.toc.as_deref().unwrap_or(DEFAULT_NCX_ID);
    [declared, NAV_CANDIDATE_IDS[0], NAV_CANDIDATE_IDS[1]]
}

/// Pick the manifest item holding the table of contents.
///
/// Each candidate id is looked up in the manifest and accepted only if
/// `exists` confirms its file is present. Failing that, the first item keyed
/// or identified as `toc` is accepted without an existence check.
pub fn resolve<'m>(
    spine: &Spine,
    manifest: &'m Manifest,
    exists: impl Fn(&str) -> bool,
) -> Result<&'m ManifestItem> {
    let probed = candidate_ids(spine).into_iter().find_map(|id| {
        let item = manifest.get(id)?;
        let found = exists(&item.path);
        tracing::trace!(id, path = %item.path, found, "probing table of contents candidate");
        found.then_some(item)
    });

    if let Some(item) = probed {
        return Ok(item);
    }

    // Unlike the probes above, this match is not checked against the filesystem.
    let fallback = manifest
        .entries()
        .find(|(key, item)| *key == FALLBACK_ID || item.id == FALLBACK_ID)
        .map(|(_, item)| item);

    match fallback {
        Some(item) => {
            tracing::warn!(path = %item.path, "using manifest item `toc` without checking it exists");
            Ok(item)
        }
        None => Err(Error::TableOfContentsMissing),
    }
}
