//! Cross-references inside lexicon text
//!
//! Derivation and notes fields point at other entries in three notations:
//! `[[H8130]]`, `<H8130>` and `(H8130)`. This module only splits the text;
//! resolving identifiers to lemmas happens in the resolver.

use std::sync::LazyLock;

use regex::Regex;

static CROSS_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([A-Za-z]\d+)\]\]|<([A-Za-z]\d+)>|\(([A-Za-z]\d+)\)")
        .expect("cross-reference pattern is valid")
});

/// A piece of lexicon text before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSegment<'a> {
    Text(&'a str),
    /// Identifier exactly as written, without its delimiters
    Reference(&'a str),
}

/// Split text into plain runs and cross-reference identifiers, in order
pub fn split_cross_references(text: &str) -> Vec<RawSegment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in CROSS_REFERENCE.captures_iter(text) {
        let id = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str());
        let (Some(whole), Some(id)) = (caps.get(0), id) else {
            continue;
        };

        if whole.start() > cursor {
            segments.push(RawSegment::Text(&text[cursor..whole.start()]));
        }
        segments.push(RawSegment::Reference(id));
        cursor = whole.end();
    }

    if cursor < text.len() {
        segments.push(RawSegment::Text(&text[cursor..]));
    }

    segments
}

/// First identifier of a comma-separated list (`"H85, H87"` -> `"H85"`)
pub fn first_identifier(raw: &str) -> Option<&str> {
    raw.split(',').map(str::trim).find(|id| !id.is_empty())
}
