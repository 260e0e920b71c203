//! Extension-based file classification and MIME lookup.
//!
//! Classification walks fixed extension tables in priority order: the
//! special-case tables (document types, text, code, archive, media, fonts)
//! are consulted before the general extension to MIME map, and anything left
//! over is [`Category::Unknown`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Fallback MIME type.
pub const DEFAULT_MIME: &str = "*/*";

pub const APK: &str = "apk";
pub const RAR: &str = "rar";
pub const PDF: &str = "pdf";
pub const JAVA: &str = "java";
pub const KOTLIN: &str = "kt";
pub const XML: &str = "xml";
pub const AI: &str = "ai";
pub const SQL: &str = "sql";
pub const SVG: &str = "svg";

pub const FONT_TYPES: &[&str] = &["ttf", "otf"];
pub const AUDIO_TYPES: &[&str] = &["mp3", "4mp", "aup", "ogg", "3ga", "m4b", "wav", "acc", "m4a"];
pub const VIDEO_TYPES: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv", "m4v", "3gp", "webm"];
pub const ARCHIVE_TYPES: &[&str] = &["zip", "7z", "tar", "jar", "gz", "xz", "xapk", "obb", APK];
pub const TEXT_TYPES: &[&str] = &["txt", "text", "log", "dsc", "apt", "rtf", "rtx"];
pub const CODE_TYPES: &[&str] = &[JAVA, XML, "py", "css", KOTLIN, "cs", "json"];
pub const IMAGE_TYPES: &[&str] = &["png", "jpeg", "jpg", "heic", "tiff", "gif", "webp", SVG, "bmp"];

/// Extension to MIME type table used when no special-case table matches.
const MIME_TYPES: &[(&str, &str)] = &[
    ("asm", "text/x-asm"),
    ("def", "text/plain"),
    ("in", "text/plain"),
    ("rc", "text/plain"),
    ("list", "text/plain"),
    ("log", "text/plain"),
    ("pl", "text/plain"),
    ("prop", "text/plain"),
    ("properties", "text/plain"),
    ("epub", "application/epub+zip"),
    ("ibooks", "application/x-ibooks+zip"),
    ("ifb", "text/calendar"),
    ("eml", "message/rfc822"),
    ("msg", "application/vnd.ms-outlook"),
    ("ace", "application/x-ace-compressed"),
    ("bz", "application/x-bzip"),
    ("bz2", "application/x-bzip2"),
    ("cab", "application/vnd.ms-cab-compressed"),
    ("gz", "application/x-gzip"),
    ("lrf", "application/octet-stream"),
    ("jar", "application/java-archive"),
    ("xz", "application/x-xz"),
    ("Z", "application/x-compress"),
    ("bat", "application/x-msdownload"),
    ("ksh", "text/plain"),
    ("sh", "application/x-sh"),
    ("db", "application/octet-stream"),
    ("db3", "application/octet-stream"),
    ("otf", "application/x-font-otf"),
    ("ttf", "application/x-font-ttf"),
    ("psf", "application/x-font-linux-psf"),
    ("cgm", "image/cgm"),
    ("btif", "image/prs.btif"),
    ("dwg", "image/vnd.dwg"),
    ("dxf", "image/vnd.dxf"),
    ("fbs", "image/vnd.fastbidsheet"),
    ("fpx", "image/vnd.fpx"),
    ("fst", "image/vnd.fst"),
    ("mdi", "image/vnd.ms-mdi"),
    ("npx", "image/vnd.net-fpx"),
    ("xif", "image/vnd.xiff"),
    ("pct", "image/x-pict"),
    ("pic", "image/x-pict"),
    ("adp", "audio/adpcm"),
    ("au", "audio/basic"),
    ("snd", "audio/basic"),
    ("m2a", "audio/mpeg"),
    ("m3a", "audio/mpeg"),
    ("oga", "audio/ogg"),
    ("spx", "audio/ogg"),
    ("aac", "audio/x-aac"),
    ("mka", "audio/x-matroska"),
    ("jpgv", "video/jpeg"),
    ("jpgm", "video/jpm"),
    ("jpm", "video/jpm"),
    ("mj2", "video/mj2"),
    ("mjp2", "video/mj2"),
    ("mpa", "video/mpeg"),
    ("ogv", "video/ogg"),
    ("flv", "video/x-flv"),
    ("mkv", "video/x-matroska"),
];

const ARCHIVE_MIME_TYPES: &[&str] = &[
    "application/x-ace-compressed",
    "application/x-bzip",
    "application/x-bzip2",
    "application/vnd.ms-cab-compressed",
    "application/x-gzip",
    "application/java-archive",
    "application/x-xz",
    "application/x-compress",
];

/// Display category of a file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Directory,
    Pdf,
    Text,
    Java,
    Kotlin,
    Xml,
    Code,
    Archive,
    Video,
    Audio,
    Font,
    Sql,
    Vector,
    Svg,
    Image,
    Word,
    Spreadsheet,
    Presentation,
    Unknown,
}

/// Coarse family a [`Category`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Directory,
    Text,
    Code,
    Archive,
    Image,
    Audio,
    Video,
    Document,
    Font,
    Sql,
    Vector,
    Unknown,
}

impl Category {
    /// Collapse to the coarse family.
    pub fn family(&self) -> Family {
        match self {
            Self::Directory => Family::Directory,
            Self::Text => Family::Text,
            Self::Java | Self::Kotlin | Self::Xml | Self::Code => Family::Code,
            Self::Archive => Family::Archive,
            Self::Video => Family::Video,
            Self::Audio => Family::Audio,
            Self::Font => Family::Font,
            Self::Sql => Family::Sql,
            Self::Vector | Self::Svg => Family::Vector,
            Self::Image => Family::Image,
            Self::Pdf | Self::Word | Self::Spreadsheet | Self::Presentation => Family::Document,
            Self::Unknown => Family::Unknown,
        }
    }
}

/// Classify a file by extension. Directories always yield [`Category::Directory`].
///
/// Matching is case-insensitive; the extension is given without its dot.
pub fn classify(extension: &str, is_directory: bool) -> Category {
    if is_directory {
        return Category::Directory;
    }

    let ext = extension.to_lowercase();
    let ext = ext.as_str();
    let is_in = |table: &[&str]| table.contains(&ext);

    if ext == PDF {
        Category::Pdf
    } else if is_in(TEXT_TYPES) {
        Category::Text
    } else if ext == JAVA {
        Category::Java
    } else if ext == KOTLIN {
        Category::Kotlin
    } else if ext == XML {
        Category::Xml
    } else if is_in(CODE_TYPES) {
        Category::Code
    } else if is_in(ARCHIVE_TYPES) || ext == RAR {
        Category::Archive
    } else if is_in(VIDEO_TYPES) {
        Category::Video
    } else if is_in(AUDIO_TYPES) {
        Category::Audio
    } else if is_in(FONT_TYPES) {
        Category::Font
    } else if ext == SQL {
        Category::Sql
    } else if ext == AI {
        Category::Vector
    } else if ext == SVG {
        Category::Svg
    } else if is_in(IMAGE_TYPES) {
        Category::Image
    } else if ext == "doc" || ext == "docx" {
        Category::Word
    } else if ext == "xls" || ext == "xlsx" {
        Category::Spreadsheet
    } else if ext == "ppt" || ext == "pptx" {
        Category::Presentation
    } else {
        classify_mime(ext)
    }
}

fn classify_mime(ext: &str) -> Category {
    let Some(mime) = MIME_TYPES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
    else {
        return Category::Unknown;
    };

    if ARCHIVE_MIME_TYPES.contains(&mime) {
        Category::Archive
    } else if mime.starts_with("application/x-font") {
        Category::Font
    } else if mime.starts_with("text/") {
        Category::Text
    } else if mime.starts_with("image/") {
        Category::Image
    } else if mime.starts_with("audio/") {
        Category::Audio
    } else if mime.starts_with("video/") {
        Category::Video
    } else {
        Category::Unknown
    }
}

/// Look up the MIME type for an extension, falling back to [`DEFAULT_MIME`].
///
/// The lookup is exact (case-sensitive).
pub fn mime_type(extension: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(key, _)| *key == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

/// Check whether an extension belongs to the archive table (case-insensitive).
pub fn is_archive_extension(extension: &str) -> bool {
    let ext = extension.to_lowercase();
    ARCHIVE_TYPES.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_directory_dominates() {
        for ext in ["zip", "txt", "", "pdf"] {
            assert_eq!(classify(ext, true), Category::Directory);
        }
    }

    #[test]
    fn test_archive_set() {
        assert_eq!(classify("zip", false), Category::Archive);
        assert_eq!(classify("RAR", false), Category::Archive);
        assert_eq!(classify("7z", false), Category::Archive);
        assert_eq!(classify("apk", false), Category::Archive);
        assert_eq!(classify("APK", false).family(), Family::Archive);
    }

    #[test]
    fn test_priority_order() {
        // svg is in the image table but resolves to its own category first
        assert_eq!(classify("svg", false), Category::Svg);
        // xml is in the code table but resolves to its own category first
        assert_eq!(classify("XML", false), Category::Xml);
        assert_eq!(classify("json", false), Category::Code);
        assert_eq!(classify("log", false), Category::Text);
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(classify("bz2", false), Category::Archive);
        assert_eq!(classify("z", false), Category::Archive);
        assert_eq!(classify("psf", false), Category::Font);
        assert_eq!(classify("flv", false), Category::Video);
        assert_eq!(classify("aac", false), Category::Audio);
        assert_eq!(classify("dwg", false), Category::Image);
        assert_eq!(classify("sh", false), Category::Unknown);
        assert_eq!(classify("", false), Category::Unknown);
        assert_eq!(classify("qwerty", false), Category::Unknown);
    }

    #[test]
    fn test_mime_type_lookup() {
        assert_eq!(mime_type("epub"), "application/epub+zip");
        assert_eq!(mime_type("Z"), "application/x-compress");
        assert_eq!(mime_type("z"), DEFAULT_MIME);
        assert_eq!(mime_type("unknown"), DEFAULT_MIME);
    }

    #[test]
    fn test_every_category_has_a_family() {
        for category in Category::iter() {
            let _ = category.family();
        }
        assert_eq!(Category::Word.to_string(), "word");
        assert_eq!(Category::Pdf.family(), Family::Document);
    }
}
