//! Locates the package document inside an extracted EPUB and exposes its parts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Stage};
use crate::util::{is_contained, resolve_href};
use crate::xml::{self, XmlElement};

/// Location of the OCF container descriptor inside every EPUB.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Parsed view of an extracted EPUB directory.
///
/// Construction reads `META-INF/container.xml`, follows its first rootfile to
/// the OPF package document and parses it. The package's `metadata`,
/// `manifest` and `spine` elements are then available as XML subtrees.
#[derive(Debug)]
pub struct ContentLocator {
    root_directory: PathBuf,
    content_directory: PathBuf,
    package_path: PathBuf,
    package: XmlElement,
    empty: XmlElement,
}

impl ContentLocator {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root_directory = root.into();

        let container_path = root_directory.join(CONTAINER_PATH);
        let container = read_xml(&container_path, Stage::LocatingContent)?;
        let full_path = find_rootfile(&container).ok_or_else(|| {
            Error::content(
                Stage::LocatingContent,
                &container_path,
                "no rootfile with a full-path in container.xml",
            )
        })?;

        let relative = PathBuf::from(&full_path);
        if !is_contained(&relative) {
            return Err(Error::content(
                Stage::LocatingContent,
                &container_path,
                format!("rootfile path escapes the archive: {full_path}"),
            ));
        }

        let package_path = resolve_href(&root_directory, &root_directory, &full_path);
        if !package_path.is_file() {
            return Err(Error::content(
                Stage::LocatingContent,
                &package_path,
                "rootfile declared in container.xml does not exist",
            ));
        }

        let content_directory = package_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root_directory.clone());
        let package = read_xml(&package_path, Stage::LocatingContent)?;

        tracing::debug!(
            package = %package_path.display(),
            version = package.attr("version").unwrap_or("?"),
            "located package document"
        );

        Ok(Self {
            root_directory,
            content_directory,
            package_path,
            package,
            empty: XmlElement::default(),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Directory of the package document; manifest hrefs are relative to it.
    pub fn content_directory(&self) -> &Path {
        &self.content_directory
    }

    pub fn package_path(&self) -> &Path {
        &self.package_path
    }

    /// The package's `unique-identifier` attribute.
    pub fn unique_identifier(&self) -> Option<&str> {
        self.package.attr("unique-identifier")
    }

    /// The `<metadata>` subtree, or an empty element when absent.
    pub fn metadata(&self) -> &XmlElement {
        self.section("metadata")
    }

    /// The `<manifest>` subtree, or an empty element when absent.
    pub fn manifest(&self) -> &XmlElement {
        self.section("manifest")
    }

    /// The `<spine>` subtree, or an empty element when absent.
    pub fn spine(&self) -> &XmlElement {
        self.section("spine")
    }

    fn section(&self, name: &str) -> &XmlElement {
        self.package.child(name).unwrap_or(&self.empty)
    }

    /// Filesystem path of a content-relative href.
    ///
    /// `..` segments may leave the content directory but never the root.
    pub fn resolve(&self, href: &str) -> PathBuf {
        resolve_href(&self.root_directory, &self.content_directory, href)
    }

    /// Whether a content-relative href names an existing file.
    pub fn contains(&self, href: &str) -> bool {
        self.resolve(href).is_file()
    }

    /// Read and parse a file inside the content directory.
    pub fn resource(&self, href: &str) -> Result<XmlElement> {
        read_xml(&self.resolve(href), Stage::ParsingToc)
    }
}

/// `full-path` of the first `rootfile` in a container descriptor.
fn find_rootfile(container: &XmlElement) -> Option<String> {
    let rootfile = if container.local_name() == "rootfile" {
        Some(container)
    } else {
        container.find("rootfile")
    }?;

    rootfile
        .attr("full-path")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

fn read_xml(path: &Path, stage: Stage) -> Result<XmlElement> {
    let bytes = fs::read(path).map_err(|e| Error::content(stage, path, e.to_string()))?;
    xml::parse(&bytes).map_err(|source| Error::MalformedXml {
        stage,
        path: path.to_path_buf(),
        source,
    })
}
