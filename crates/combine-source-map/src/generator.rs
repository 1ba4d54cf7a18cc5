//! Append-only builder for the combined source map
//!
//! Segments are collected with combined source and name indices, then
//! handed to a [`SourceMapBuilder`] each time the map is serialized, so
//! serializing never consumes the accumulated state.

use std::collections::HashMap;

use base64::prelude::*;
use sourcemap::{SourceMap, SourceMapBuilder};

use crate::comment::INLINE_COMMENT_PREFIX;
use crate::error::{CombineError, Result};
use crate::types::{Offset, OriginalPosition, Position, Segment};

/// Accumulates sources, their contents and segments for one output
///
/// Nothing is ever removed or rewritten; every append extends the next
/// serialization. Appends either register everything they were given or,
/// on error, nothing.
#[derive(Debug, Clone, Default)]
pub struct SourceMapGenerator {
    source_root: String,
    sources: Vec<String>,
    source_indices: HashMap<String, u32>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    name_indices: HashMap<String, u32>,
    segments: Vec<Segment>,
}

/// Position from the 0-based lines used by decoded maps
fn one_based(line: u32, column: u32) -> Result<Position> {
    Offset::lines(1).apply(Position::new(line, column))
}

impl SourceMapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_root(&self) -> &str {
        &self.source_root
    }

    /// Set the source root unless one is already set
    pub fn ensure_source_root(&mut self, source_root: &str) {
        if self.source_root.is_empty() {
            self.source_root = source_root.to_string();
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Segments in the order they were added, with combined indices
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Registered content for `source`, if any
    pub fn source_content(&self, source: &str) -> Option<&str> {
        let index = *self.source_indices.get(source)?;
        self.sources_content[index as usize].as_deref()
    }

    fn source_index(&mut self, source: &str) -> u32 {
        if let Some(&index) = self.source_indices.get(source) {
            return index;
        }
        let index = self.sources.len() as u32;
        self.sources.push(source.to_string());
        self.sources_content.push(None);
        self.source_indices.insert(source.to_string(), index);
        index
    }

    fn name_index(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.name_indices.get(name) {
            return index;
        }
        let index = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_indices.insert(name.to_string(), index);
        index
    }

    /// Append every token of a decoded map, attributed to `source`
    ///
    /// The offset shifts generated positions only. Tokens without an
    /// original side stay unattributed, whatever source they named in
    /// `map` is replaced by `source`.
    pub fn add_mappings(&mut self, source: &str, map: &SourceMap, offset: Offset) -> Result<&mut Self> {
        let mut shifted = Vec::with_capacity(map.get_token_count() as usize);
        for token in map.tokens() {
            let generated = offset.apply(one_based(token.get_dst_line(), token.get_dst_col())?)?;
            let original = match token.get_source() {
                Some(_) => Some((
                    one_based(token.get_src_line(), token.get_src_col())?,
                    token.get_name(),
                )),
                None => None,
            };
            shifted.push((generated, original));
        }

        let source = self.source_index(source);
        for (generated, original) in shifted {
            let original = original.map(|(position, name)| OriginalPosition {
                source,
                position,
                name: name.map(|name| self.name_index(name)),
            });
            self.segments.push(Segment { generated, original });
        }
        Ok(self)
    }

    /// Append a line-granular identity mapping for `text`
    ///
    /// Each line of `text` maps column 0 of the same line in `source`. The
    /// column offset only applies to the first line, since later lines
    /// start at column 0 of the output.
    pub fn add_generated_mappings(&mut self, source: &str, text: &str, offset: Offset) -> Result<&mut Self> {
        let line_count = u32::try_from(text.lines().count()).map_err(|_| CombineError::TooManyLines {
            source_file: source.to_string(),
        })?;
        let generated = (1..=line_count)
            .map(|line| {
                let column = if line == 1 { offset.column } else { 0 };
                Offset::new(offset.line, column).apply(Position::new(line, 0))
            })
            .collect::<Result<Vec<_>>>()?;

        let index = self.source_index(source);
        for (line, generated) in (1..).zip(generated) {
            self.segments
                .push(Segment::mapped(generated, index, Position::new(line, 0)));
        }
        Ok(self)
    }

    /// Register `content` as the text of `source`, replacing earlier content
    pub fn add_source_content(&mut self, source: &str, content: &str) -> &mut Self {
        let index = self.source_index(source);
        self.sources_content[index as usize] = Some(content.to_string());
        self
    }

    /// Build the combined map with segments ordered by generated position
    ///
    /// Segments at the same generated position keep the order they were
    /// added in. An empty source root is left out of the map.
    pub fn to_source_map(&self) -> SourceMap {
        let mut builder = SourceMapBuilder::new(None);
        if !self.source_root.is_empty() {
            builder.set_source_root(Some(self.source_root.as_str()));
        }
        for (source, content) in self.sources.iter().zip(&self.sources_content) {
            let id = builder.add_source(source);
            builder.set_source_contents(id, content.as_deref());
        }
        for name in &self.names {
            builder.add_name(name);
        }

        let mut segments = self.segments.clone();
        segments.sort_by_key(|segment| segment.generated);
        for segment in &segments {
            let dst_line = segment.generated.line.saturating_sub(1);
            let dst_col = segment.generated.column;
            match segment.original {
                Some(original) => {
                    let source = self.sources.get(original.source as usize).map(String::as_str);
                    let name = original
                        .name
                        .and_then(|name| self.names.get(name as usize))
                        .map(String::as_str);
                    builder.add(
                        dst_line,
                        dst_col,
                        original.position.line.saturating_sub(1),
                        original.position.column,
                        source,
                        name,
                        false,
                    );
                }
                None => {
                    builder.add(dst_line, dst_col, u32::MAX, u32::MAX, None, None, false);
                }
            }
        }
        builder.into_sourcemap()
    }

    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.to_source_map().to_writer(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn base64_encode(&self) -> Result<String> {
        Ok(BASE64_STANDARD.encode(self.to_json()?))
    }

    /// Inline `sourceMappingURL` comment embedding the combined map
    pub fn inline_mapping_url(&self) -> Result<String> {
        Ok(format!("{}{}", INLINE_COMMENT_PREFIX, self.base64_encode()?))
    }
}
