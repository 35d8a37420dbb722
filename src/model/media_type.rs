//! Media types of EPUB publication resources.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Known EPUB resource media types, with an `Unknown` catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MediaType {
    Gif,
    Jpeg,
    Png,
    Svg,
    Webp,
    Xhtml,
    Javascript,
    Ncx,
    OpenType,
    Woff,
    Woff2,
    FontOtf,
    FontTtf,
    MediaOverlays,
    Pls,
    Mp3,
    Mp4Audio,
    Css,
    Unknown,
}

impl MediaType {
    /// Resolve a MIME string. Never fails: anything unrecognised is `Unknown`.
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the comparison is
    /// case-insensitive.
    pub fn from_mime(mime: &str) -> MediaType {
        let essence = mime.split(';').next().unwrap_or(mime).trim();

        match essence.to_ascii_lowercase().as_str() {
            "image/gif" => MediaType::Gif,
            "image/jpeg" | "image/jpg" => MediaType::Jpeg,
            "image/png" => MediaType::Png,
            "image/svg+xml" => MediaType::Svg,
            "image/webp" => MediaType::Webp,
            "application/xhtml+xml" => MediaType::Xhtml,
            "application/javascript" | "text/javascript" | "application/ecmascript" => {
                MediaType::Javascript
            }
            "application/x-dtbncx+xml" => MediaType::Ncx,
            "application/font-sfnt" | "application/vnd.ms-opentype" => MediaType::OpenType,
            "application/font-woff" | "font/woff" => MediaType::Woff,
            "font/woff2" => MediaType::Woff2,
            "font/otf" => MediaType::FontOtf,
            "font/ttf" | "application/x-font-ttf" => MediaType::FontTtf,
            "application/smil+xml" => MediaType::MediaOverlays,
            "application/pls+xml" => MediaType::Pls,
            "audio/mpeg" => MediaType::Mp3,
            "audio/mp4" => MediaType::Mp4Audio,
            "text/css" => MediaType::Css,
            _ => MediaType::Unknown,
        }
    }

    /// Canonical MIME string, or `None` for `Unknown`.
    pub fn mime(self) -> Option<&'static str> {
        Some(match self {
            MediaType::Gif => "image/gif",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Svg => "image/svg+xml",
            MediaType::Webp => "image/webp",
            MediaType::Xhtml => "application/xhtml+xml",
            MediaType::Javascript => "application/javascript",
            MediaType::Ncx => "application/x-dtbncx+xml",
            MediaType::OpenType => "application/font-sfnt",
            MediaType::Woff => "application/font-woff",
            MediaType::Woff2 => "font/woff2",
            MediaType::FontOtf => "font/otf",
            MediaType::FontTtf => "font/ttf",
            MediaType::MediaOverlays => "application/smil+xml",
            MediaType::Pls => "application/pls+xml",
            MediaType::Mp3 => "audio/mpeg",
            MediaType::Mp4Audio => "audio/mp4",
            MediaType::Css => "text/css",
            MediaType::Unknown => return None,
        })
    }

    pub fn is_image(self) -> bool {
        matches!(
            self,
            MediaType::Gif | MediaType::Jpeg | MediaType::Png | MediaType::Svg | MediaType::Webp
        )
    }

    pub fn is_font(self) -> bool {
        matches!(
            self,
            MediaType::OpenType
                | MediaType::Woff
                | MediaType::Woff2
                | MediaType::FontOtf
                | MediaType::FontTtf
        )
    }

    pub fn is_audio(self) -> bool {
        matches!(self, MediaType::Mp3 | MediaType::Mp4Audio)
    }
}

impl From<&str> for MediaType {
    fn from(mime: &str) -> Self {
        MediaType::from_mime(mime)
    }
}

impl FromStr for MediaType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MediaType::from_mime(s))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime().unwrap_or("unknown"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_types() {
        assert_eq!(MediaType::from_mime("image/gif"), MediaType::Gif);
        assert_eq!(MediaType::from_mime("application/xhtml+xml"), MediaType::Xhtml);
        assert_eq!(MediaType::from_mime("application/x-dtbncx+xml"), MediaType::Ncx);
        assert_eq!(MediaType::from_mime("text/css"), MediaType::Css);
        assert_eq!(MediaType::from_mime("font/woff2"), MediaType::Woff2);
        assert_eq!(MediaType::from_mime("audio/mpeg"), MediaType::Mp3);
    }

    #[test]
    fn test_mime_normalisation() {
        assert_eq!(MediaType::from_mime("Image/JPEG"), MediaType::Jpeg);
        assert_eq!(MediaType::from_mime("text/css; charset=utf-8"), MediaType::Css);
        assert_eq!(MediaType::from_mime("  image/png "), MediaType::Png);
    }

    #[test]
    fn test_mime_roundtrip_for_canonical_names() {
        for ty in [MediaType::Gif, MediaType::Xhtml, MediaType::Ncx, MediaType::Pls] {
            assert_eq!(MediaType::from_mime(ty.mime().unwrap()), ty);
        }
        assert_eq!(MediaType::Unknown.mime(), None);
        assert_eq!(MediaType::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_classification() {
        assert!(MediaType::Png.is_image());
        assert!(!MediaType::Css.is_image());
        assert!(MediaType::Woff.is_font());
        assert!(MediaType::Mp4Audio.is_audio());
    }

    proptest! {
        #[test]
        fn unregistered_mime_is_unknown(subtype in "[a-z]{1,12}") {
            let mime = format!("x-unregistered/{subtype}");
            prop_assert_eq!(MediaType::from_mime(&mime), MediaType::Unknown);
        }

        #[test]
        fn from_mime_never_panics(s in ".*") {
            let _ = MediaType::from_mime(&s);
        }
    }
}
