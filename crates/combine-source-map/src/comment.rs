//! `sourceMappingURL` pragma handling
//!
//! Recognizes the two spellings of the pragma (`//# ...` and `/*# ... */`,
//! plus the legacy `@` marker) in both inline form, where the map is
//! embedded as a base64 `data:` URL, and external form, where the pragma
//! names a separate map file.

use std::path::PathBuf;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use sourcemap::SourceMap;

/// Prefix of the inline comment written for a combined map
pub const INLINE_COMMENT_PREFIX: &str =
    "//# sourceMappingURL=data:application/json;charset=utf-8;base64,";

/// Inline pragma carrying a base64 encoded JSON map.
///
/// The `payload` group holds everything after the comma, including a
/// closing `*/` for the block spelling.
pub static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mR)^[ \t]*/[/*][@#][ \t]+sourceMappingURL=data:(?:application|text)/json;(?:charset[:=][^;\s]+?;)?base64,(?P<payload>.*)$",
    )
    .unwrap()
});

/// External pragma naming a map file, in either comment spelling
pub static MAP_FILE_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?mR)(?://[@#][ \t]+sourceMappingURL=(?P<line>[^\s'"`]+?)[ \t]*$)|(?:/\*[@#][ \t]+sourceMappingURL=(?P<block>[^*]+?)[ \t]*\*/[ \t]*$)"#,
    )
    .unwrap()
});

/// Accepts payloads with or without trailing `=` padding
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Resolves the URL of an external pragma to the map's JSON text
pub trait MapFileReader {
    fn read_map_file(&self, url: &str) -> Option<String>;
}

impl<F> MapFileReader for F
where
    F: Fn(&str) -> Option<String>,
{
    fn read_map_file(&self, url: &str) -> Option<String> {
        self(url)
    }
}

/// Reads external maps from disk, relative to a base directory
#[derive(Debug, Clone)]
pub struct FsMapReader {
    base_dir: PathBuf,
}

impl FsMapReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FsMapReader {
            base_dir: base_dir.into(),
        }
    }
}

impl MapFileReader for FsMapReader {
    fn read_map_file(&self, url: &str) -> Option<String> {
        let path = self.base_dir.join(url);
        match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::trace!(path = %path.display(), error = %err, "Referenced map file unreadable");
                None
            }
        }
    }
}

/// Parse the map embedded by the last inline pragma in `source`
///
/// Returns `None` when there is no inline pragma or its payload does not
/// decode to a source map.
pub fn from_source(source: &str) -> Option<SourceMap> {
    let json = inline_map_json(source)?;
    match SourceMap::from_slice(&json) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::trace!(error = %err, "Inline source map is not a valid map");
            None
        }
    }
}

/// JSON text embedded by the last inline pragma in `source`
pub fn inline_map_json(source: &str) -> Option<Vec<u8>> {
    let captures = COMMENT_REGEX.captures_iter(source).last()?;
    let payload = captures.name("payload")?.as_str().trim_end();
    let payload = payload.strip_suffix("*/").unwrap_or(payload).trim();

    match PAYLOAD_ENGINE.decode(payload) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::trace!(error = %err, "Inline source map is not valid base64");
            None
        }
    }
}

/// URL named by the last external pragma in `source`
///
/// Inline `data:` URLs are not map files and are never returned.
pub fn map_file_url(source: &str) -> Option<String> {
    let captures = MAP_FILE_COMMENT_REGEX.captures_iter(source).last()?;
    let url = captures
        .name("line")
        .or_else(|| captures.name("block"))?
        .as_str()
        .trim();
    if url.is_empty() || url.starts_with("data:") {
        return None;
    }
    Some(url.to_string())
}

/// JSON text of the map file named by the last external pragma in `source`
pub fn map_file_json(source: &str, reader: &dyn MapFileReader) -> Option<String> {
    let url = map_file_url(source)?;
    reader.read_map_file(&url)
}

/// Remove every inline pragma from `source`
///
/// Line breaks around a removed pragma are kept.
pub fn remove_comments(source: &str) -> String {
    COMMENT_REGEX.replace_all(source, "").into_owned()
}

/// Remove every external pragma from `source`
pub fn remove_map_file_comments(source: &str) -> String {
    MAP_FILE_COMMENT_REGEX.replace_all(source, "").into_owned()
}

/// Pragma pointing at an external map file
pub fn map_file_comment(url: &str) -> String {
    format!("//# sourceMappingURL={url}")
}
