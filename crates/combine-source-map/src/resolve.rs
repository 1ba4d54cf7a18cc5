//! Finding a file's existing source map and deciding whether to trust it

use sourcemap::SourceMap;

use crate::comment::{self, MapFileReader};
use crate::error::Result;

/// What a file's text says about its own source map
#[derive(Debug, Clone)]
pub enum ExistingMap {
    /// No pragma, or one that could not be parsed
    None,
    /// A decoded map whose first source has its original text embedded
    WithInlineSource(SourceMap),
    /// A map that only names its sources
    WithoutInlineSource(SourceMap),
}

impl ExistingMap {
    /// Resolve, decode and classify the map attached to `source`
    ///
    /// An inline pragma takes precedence over an external one, and external
    /// pragmas are only followed when a `reader` is given. A map that embeds
    /// its source but fails to decode is an error; any other unusable map
    /// counts as no map.
    pub fn resolve(source: &str, reader: Option<&dyn MapFileReader>) -> Result<Self> {
        if let Some(json) = comment::inline_map_json(source)
            && let Some(existing) = classify(&json)?
        {
            return Ok(existing);
        }
        if let Some(json) = reader.and_then(|reader| comment::map_file_json(source, reader))
            && let Some(existing) = classify(json.as_bytes())?
        {
            return Ok(existing);
        }
        Ok(ExistingMap::None)
    }
}

fn classify(json: &[u8]) -> Result<Option<ExistingMap>> {
    match SourceMap::from_slice(json) {
        Ok(map) if has_inlined_source(&map) => Ok(Some(ExistingMap::WithInlineSource(map))),
        Ok(map) => Ok(Some(ExistingMap::WithoutInlineSource(map))),
        Err(err) if declares_inlined_source(json) => Err(err.into()),
        Err(err) => {
            tracing::trace!(error = %err, "Existing source map is not usable");
            Ok(None)
        }
    }
}

/// True when the map's first source has non-empty embedded text
pub fn has_inlined_source(map: &SourceMap) -> bool {
    map.get_source_contents(0)
        .is_some_and(|content| !content.is_empty())
}

/// Same check on JSON that did not decode as a source map
fn declares_inlined_source(json: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(json).is_ok_and(|value| {
        value
            .get("sourcesContent")
            .and_then(|contents| contents.get(0))
            .and_then(serde_json::Value::as_str)
            .is_some_and(|content| !content.is_empty())
    })
}
