//! Integration tests for combining the maps of concatenated files.
//!
//! Covers the public surface end to end:
//! - Plain files get a line mapping onto their own text
//! - Files with an inlined original are rebased onto that original
//! - Serialization is repeatable and depends on the order files were added
//! - Pragmas written by the combiner can be read back and stripped

use base64::prelude::*;
use combine_source_map::comment::{INLINE_COMMENT_PREFIX, from_source, inline_map_json};
use combine_source_map::{Combiner, FileOptions, Offset, create, remove_comments};
use serde_json::{Value, json};

fn with_inline_map(code: &str, json: &str) -> String {
    format!("{code}\n{}{}", INLINE_COMMENT_PREFIX, BASE64_STANDARD.encode(json))
}

const TRANSPILED_B: &str = r#"{"version":3,"sources":["orig.js"],"sourcesContent":["let x = 1;"],"names":[],"mappings":"AAAA"}"#;

/// Concatenate files the way a bundler would, one file per block of lines
fn bundle(files: &[(&str, &str)]) -> (String, Combiner) {
    let mut combiner = create();
    let mut output = String::new();
    for (name, text) in files {
        let offset = Offset::lines(u32::try_from(output.lines().count()).unwrap());
        combiner
            .add_file(FileOptions::new(name, text), offset)
            .unwrap();
        output.push_str(&remove_comments(text));
        if !output.ends_with('\n') {
            output.push('\n');
        }
    }
    (output, combiner)
}

fn combined_json(combiner: &Combiner) -> Value {
    serde_json::from_str(&combiner.to_json().unwrap()).unwrap()
}

/// The fields a combined map is judged by, one per line
fn summary(combiner: &Combiner) -> String {
    let map = combined_json(combiner);
    format!(
        "sources: {}\nsourcesContent: {}\nmappings: {}",
        map["sources"], map["sourcesContent"], map["mappings"]
    )
}

/// (generated line, original line) per token, 0-based
fn token_lines(combiner: &Combiner) -> Vec<(u32, Option<u32>)> {
    combiner
        .to_source_map()
        .tokens()
        .map(|token| {
            (
                token.get_dst_line(),
                token.get_source().map(|_| token.get_src_line()),
            )
        })
        .collect()
}

#[test]
fn plain_file_snapshot() {
    let mut combiner = create();
    combiner
        .add_file(
            FileOptions::new("a.js", "var a=1;\nvar b=2;"),
            Offset::default(),
        )
        .unwrap();

    insta::assert_snapshot!(summary(&combiner), @r#"
    sources: ["a.js"]
    sourcesContent: ["var a=1;\nvar b=2;"]
    mappings: "AAAA;AACA"
    "#);
}

#[test]
fn plain_and_rebased_files_snapshot() {
    let b = with_inline_map("var x = 1;", TRANSPILED_B);
    let (_, combiner) = bundle(&[("a.js", "var a=1;\nvar b=2;"), ("b.js", &b)]);

    insta::assert_snapshot!(summary(&combiner), @r#"
    sources: ["a.js","orig.js"]
    sourcesContent: ["var a=1;\nvar b=2;","let x = 1;"]
    mappings: "AAAA;AACA;ACDA"
    "#);
}

#[test]
fn rebased_segments_shift_by_offset_and_point_at_original() {
    let b = with_inline_map("var x = 1;", TRANSPILED_B);
    let mut combiner = create();
    combiner
        .add_file(FileOptions::new("b.js", &b), Offset::lines(10))
        .unwrap();

    let map = combined_json(&combiner);
    assert_eq!(map["sources"], json!(["orig.js"]));
    assert_eq!(map["sourcesContent"], json!(["let x = 1;"]));

    let map = combiner.to_source_map();
    let token = map.get_token(0).unwrap();
    assert_eq!((token.get_dst_line(), token.get_dst_col()), (10, 0));
    assert_eq!((token.get_src_line(), token.get_src_col()), (0, 0));
    assert_eq!(token.get_source(), Some("orig.js"));
}

#[test]
fn synthesized_segments_one_per_line() {
    let text = "line one\nline two\nline three\nline four";
    let mut combiner = create();
    combiner
        .add_file(FileOptions::new("four.js", text), Offset::lines(5))
        .unwrap();

    assert_eq!(
        token_lines(&combiner),
        vec![(5, Some(0)), (6, Some(1)), (7, Some(2)), (8, Some(3))]
    );
    for token in combiner.to_source_map().tokens() {
        assert_eq!(token.get_source(), Some("four.js"));
        assert_eq!((token.get_dst_col(), token.get_src_col()), (0, 0));
    }
    assert_eq!(combined_json(&combiner)["sourcesContent"], json!([text]));
}

#[test]
fn empty_file_registers_source_without_segments() {
    let mut combiner = create();
    combiner
        .add_file(FileOptions::new("empty.js", ""), Offset::default())
        .unwrap();

    let map = combined_json(&combiner);
    assert_eq!(map["sources"], json!(["empty.js"]));
    assert_eq!(map["sourcesContent"], json!([""]));
    assert_eq!(map["mappings"], "");
}

#[test]
fn serialization_is_idempotent() {
    let (_, combiner) = bundle(&[("a.js", "a\nb"), ("c.js", "c")]);
    assert_eq!(combiner.base64().unwrap(), combiner.base64().unwrap());
    assert_eq!(combiner.comment().unwrap(), combiner.comment().unwrap());
}

#[test]
fn addition_order_matters() {
    let mut ab = create();
    ab.add_file(FileOptions::new("a.js", "a"), Offset::default())
        .unwrap()
        .add_file(FileOptions::new("b.js", "b"), Offset::lines(1))
        .unwrap();

    let mut ba = create();
    ba.add_file(FileOptions::new("b.js", "b"), Offset::lines(1))
        .unwrap()
        .add_file(FileOptions::new("a.js", "a"), Offset::default())
        .unwrap();

    assert_ne!(ab.to_json().unwrap(), ba.to_json().unwrap());
    assert_eq!(combined_json(&ab)["sources"], json!(["a.js", "b.js"]));
    assert_eq!(combined_json(&ba)["sources"], json!(["b.js", "a.js"]));
    assert_eq!(combined_json(&ab)["mappings"], "AAAA;ACAA");
    assert_eq!(combined_json(&ba)["mappings"], "ACAA;ADAA");
}

#[test]
fn comment_reads_back_as_the_combined_map() {
    let b = with_inline_map("var x = 1;", TRANSPILED_B);
    let (output, combiner) = bundle(&[("a.js", "var a=1;\nvar b=2;"), ("b.js", &b)]);

    let with_comment = format!("{output}{}\n", combiner.comment().unwrap());
    assert_eq!(
        inline_map_json(&with_comment).unwrap(),
        combiner.to_json().unwrap().into_bytes()
    );
    let parsed = from_source(&with_comment).unwrap();
    assert_eq!(parsed.get_token_count(), 3);
    assert_eq!(parsed.get_source_contents(1), Some("let x = 1;"));

    // The bundle itself no longer carries b.js's own pragma
    assert_eq!(output, "var a=1;\nvar b=2;\nvar x = 1;\n");
    assert_eq!(remove_comments(&with_comment), format!("{output}\n"));
}

#[test]
fn bundled_output_can_be_combined_again() {
    let (output, inner) = bundle(&[("a.js", "var a=1;\nvar b=2;"), ("c.js", "var c=3;")]);
    let inner_bundle = format!("{output}{}", inner.comment().unwrap());

    let mut outer = create();
    outer
        .add_file(FileOptions::new("inner.js", &inner_bundle), Offset::lines(1))
        .unwrap();

    // Only the first source of the inner bundle survives the collapse
    let map = combined_json(&outer);
    assert_eq!(map["sources"], json!(["a.js"]));
    assert_eq!(map["sourcesContent"], json!(["var a=1;\nvar b=2;"]));
    assert_eq!(
        token_lines(&outer),
        vec![(1, Some(0)), (2, Some(1)), (3, Some(0))]
    );
}
