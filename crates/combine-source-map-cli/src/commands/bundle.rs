//! Bundle command implementation.
//!
//! Concatenates the inputs in order, one file per block of lines, and
//! appends a `sourceMappingURL` comment for the combined map. Pragmas
//! already present in the inputs are stripped from the bundle; their maps
//! are folded into the combined one instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use combine_source_map::{
    Combiner, FileOptions, FsMapReader, Offset, map_file_comment, remove_comments,
    remove_map_file_comments,
};

/// Arguments for the bundle command
#[derive(Debug)]
pub struct BundleArgs {
    /// Files to concatenate, in bundle order
    pub inputs: Vec<PathBuf>,
    /// Output file path (stdout when absent)
    pub output: Option<PathBuf>,
    /// Source root for the combined map
    pub source_root: Option<String>,
    /// Separate map file to write
    pub map_file: Option<PathBuf>,
    /// Follow external map references next to each input
    pub resolve_map_files: bool,
}

/// Execute the bundle command
pub fn execute(args: BundleArgs) -> Result<()> {
    let (mut code, combiner) = build_bundle(
        &args.inputs,
        args.source_root.as_deref(),
        args.resolve_map_files,
    )?;

    let trailer = match &args.map_file {
        Some(map_path) => {
            fs::write(map_path, combiner.to_json()?)
                .with_context(|| format!("Failed to write map file {}", map_path.display()))?;
            info!(path = %map_path.display(), "Wrote source map");
            map_file_comment(&map_url(map_path))
        }
        None => combiner.comment()?,
    };
    code.push_str(&trailer);
    code.push('\n');

    match &args.output {
        Some(path) => {
            fs::write(path, &code)
                .with_context(|| format!("Failed to write bundle {}", path.display()))?;
            info!(path = %path.display(), files = args.inputs.len(), "Wrote bundle");
        }
        None => print!("{code}"),
    }
    Ok(())
}

/// Concatenate `inputs` and combine their maps
///
/// Returns the bundle text without a trailing pragma.
pub fn build_bundle(
    inputs: &[PathBuf],
    source_root: Option<&str>,
    resolve_map_files: bool,
) -> Result<(String, Combiner)> {
    let mut combiner = Combiner::new();
    let mut code = String::new();

    for input in inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        if resolve_map_files {
            let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
            combiner.set_map_reader(FsMapReader::new(base_dir));
        }

        let lines = u32::try_from(code.lines().count()).context("Bundle has too many lines")?;
        let offset = Offset::lines(lines);
        let source_file = input.to_string_lossy();
        let mut options = FileOptions::new(&source_file, &text);
        if let Some(root) = source_root {
            options = options.with_source_root(root);
        }
        combiner
            .add_file(options, offset)
            .with_context(|| format!("Failed to combine source map of {}", input.display()))?;
        debug!(file = %input.display(), line = offset.line, "Added file to bundle");

        code.push_str(&remove_map_file_comments(&remove_comments(&text)));
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }
    }

    Ok((code, combiner))
}

/// URL for a map file written next to the bundle
fn map_url(map_path: &Path) -> String {
    map_path.file_name().map_or_else(
        || map_path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}
