//! Strip command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use combine_source_map::{remove_comments, remove_map_file_comments};

/// Arguments for the strip command
#[derive(Debug)]
pub struct StripArgs {
    pub inputs: Vec<PathBuf>,
    /// Also remove external map references
    pub map_files: bool,
    /// Rewrite inputs instead of printing them
    pub in_place: bool,
}

/// Execute the strip command
pub fn execute(args: StripArgs) -> Result<()> {
    for input in &args.inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let stripped = strip(&text, args.map_files);

        if args.in_place {
            if stripped != text {
                fs::write(input, &stripped)
                    .with_context(|| format!("Failed to write {}", input.display()))?;
                info!(file = %input.display(), "Removed source map comments");
            }
        } else {
            print!("{stripped}");
        }
    }
    Ok(())
}

fn strip(text: &str, map_files: bool) -> String {
    let stripped = remove_comments(text);
    if map_files {
        remove_map_file_comments(&stripped)
    } else {
        stripped
    }
}
