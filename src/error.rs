//! Error types for EPUB parsing.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::xml::XmlError;

/// Pipeline stage, in the order the parser walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stage {
    NotStarted,
    LocatingContent,
    ParsingSpine,
    ParsingMetadata,
    ParsingManifest,
    ResolvingToc,
    ParsingToc,
    Completed,
    Failed,
}

impl Stage {
    /// The stage that follows a successful `self`.
    ///
    /// `Completed` and `Failed` are absorbing.
    pub fn next(self) -> Stage {
        match self {
            Stage::NotStarted => Stage::LocatingContent,
            Stage::LocatingContent => Stage::ParsingSpine,
            Stage::ParsingSpine => Stage::ParsingMetadata,
            Stage::ParsingMetadata => Stage::ParsingManifest,
            Stage::ParsingManifest => Stage::ResolvingToc,
            Stage::ResolvingToc => Stage::ParsingToc,
            Stage::ParsingToc => Stage::Completed,
            Stage::Completed => Stage::Completed,
            Stage::Failed => Stage::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not started",
            Stage::LocatingContent => "locating content",
            Stage::ParsingSpine => "parsing spine",
            Stage::ParsingMetadata => "parsing metadata",
            Stage::ParsingManifest => "parsing manifest",
            Stage::ResolvingToc => "resolving table of contents",
            Stage::ParsingToc => "parsing table of contents",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while parsing an EPUB.
#[derive(Error, Debug)]
pub enum Error {
    #[error("archive error at {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot locate content ({stage}) at {}: {reason}", path.display())]
    ContentLocation {
        stage: Stage,
        path: PathBuf,
        reason: String,
    },

    #[error("table of contents missing: no candidate resolved to a manifest item")]
    TableOfContentsMissing,

    #[error("malformed XML ({stage}) in {}: {source}", path.display())]
    MalformedXml {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: XmlError,
    },
}

impl Error {
    pub(crate) fn content(stage: Stage, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::ContentLocation {
            stage,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The stage in which the error arose.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Archive { .. } => Stage::LocatingContent,
            Error::ContentLocation { stage, .. } | Error::MalformedXml { stage, .. } => *stage,
            Error::TableOfContentsMissing => Stage::ResolvingToc,
        }
    }

    /// The filesystem path involved, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Archive { path, .. }
            | Error::ContentLocation { path, .. }
            | Error::MalformedXml { path, .. } => Some(path),
            Error::TableOfContentsMissing => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
