//! Combining the source maps of concatenated files

use std::borrow::Cow;
use std::fmt;

use sourcemap::SourceMap;

use crate::comment::MapFileReader;
use crate::error::Result;
use crate::generator::SourceMapGenerator;
use crate::resolve::ExistingMap;
use crate::types::Offset;

/// One file being appended to the bundle
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOptions<'a> {
    /// Root for all source names; only the first non-empty one is kept
    pub source_root: Option<&'a str>,
    /// Name the file is registered under when it has no usable map
    pub source_file: &'a str,
    /// The file's text as it appears in the bundle
    pub source: &'a str,
}

impl<'a> FileOptions<'a> {
    pub fn new(source_file: &'a str, source: &'a str) -> Self {
        FileOptions {
            source_root: None,
            source_file,
            source,
        }
    }

    pub fn with_source_root(mut self, source_root: &'a str) -> Self {
        self.source_root = Some(source_root);
        self
    }
}

/// Builds one source map for a bundle from the files appended to it
///
/// Files must be added in the order they appear in the bundle. If a file
/// carries a map whose first source has embedded text, that map is shifted
/// by the file's offset and attributed to the original source. Otherwise
/// the file gets a line-by-line identity mapping onto its own text.
#[derive(Default)]
pub struct Combiner {
    generator: Option<SourceMapGenerator>,
    map_reader: Option<Box<dyn MapFileReader>>,
}

impl fmt::Debug for Combiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combiner")
            .field("generator", &self.generator)
            .field("map_reader", &self.map_reader.is_some())
            .finish()
    }
}

/// Create an empty combiner
pub fn create() -> Combiner {
    Combiner::new()
}

impl Combiner {
    pub fn new() -> Self {
        Combiner::default()
    }

    /// Follow external `sourceMappingURL` pragmas through `reader`
    pub fn with_map_reader(mut self, reader: impl MapFileReader + 'static) -> Self {
        self.set_map_reader(reader);
        self
    }

    /// Replace the reader used for external pragmas in later `add_file` calls
    pub fn set_map_reader(&mut self, reader: impl MapFileReader + 'static) -> &mut Self {
        self.map_reader = Some(Box::new(reader));
        self
    }

    /// Append one file's mappings, shifted by `offset`
    ///
    /// A file whose own map embeds its source but does not decode is an
    /// error, as is an offset that pushes positions out of range. Every
    /// other problem with an existing map falls back to generated mappings.
    /// A failed call leaves the combiner as it was, source root included.
    pub fn add_file(&mut self, options: FileOptions<'_>, offset: Offset) -> Result<&mut Self> {
        let existing = ExistingMap::resolve(options.source, self.map_reader.as_deref())?;

        let generator = self.generator.get_or_insert_with(SourceMapGenerator::new);
        match existing {
            ExistingMap::WithInlineSource(map) => {
                add_existing_map(generator, options.source_file, &map, offset)?;
            }
            ExistingMap::WithoutInlineSource(_) => {
                tracing::debug!(
                    source_file = options.source_file,
                    "Existing source map has no inlined source, generating mappings"
                );
                add_generated_map(generator, options.source_file, options.source, offset)?;
            }
            ExistingMap::None => {
                add_generated_map(generator, options.source_file, options.source, offset)?;
            }
        }

        if let Some(root) = options.source_root.filter(|root| !root.is_empty()) {
            generator.ensure_source_root(root);
        }
        Ok(self)
    }

    fn finalized(&self) -> Cow<'_, SourceMapGenerator> {
        match &self.generator {
            Some(generator) => Cow::Borrowed(generator),
            None => Cow::Owned(SourceMapGenerator::default()),
        }
    }

    /// The combined map so far
    ///
    /// With no files added this is an empty but valid map.
    pub fn to_source_map(&self) -> SourceMap {
        self.finalized().to_source_map()
    }

    pub fn to_json(&self) -> Result<String> {
        self.finalized().to_json()
    }

    /// Base64 encoded JSON of the combined map
    pub fn base64(&self) -> Result<String> {
        self.finalized().base64_encode()
    }

    /// Inline `sourceMappingURL` comment embedding the combined map
    pub fn comment(&self) -> Result<String> {
        self.finalized().inline_mapping_url()
    }
}

fn add_generated_map(
    generator: &mut SourceMapGenerator,
    source_file: &str,
    source: &str,
    offset: Offset,
) -> Result<()> {
    tracing::trace!(
        source_file,
        line = offset.line,
        column = offset.column,
        "Generating line mappings"
    );
    generator
        .add_generated_mappings(source_file, source, offset)?
        .add_source_content(source_file, source);
    Ok(())
}

fn add_existing_map(
    generator: &mut SourceMapGenerator,
    source_file: &str,
    map: &SourceMap,
    offset: Offset,
) -> Result<()> {
    // Only the first source is carried over
    let original_file = map
        .get_source(0)
        .filter(|name| !name.is_empty())
        .unwrap_or(source_file);
    let original_source = map.get_source_contents(0).unwrap_or_default();

    tracing::debug!(
        source_file,
        original_file,
        tokens = map.get_token_count(),
        line = offset.line,
        column = offset.column,
        "Rebasing existing source map"
    );
    generator
        .add_mappings(original_file, map, offset)?
        .add_source_content(original_file, original_source);
    Ok(())
}
