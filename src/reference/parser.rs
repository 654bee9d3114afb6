//! Bible-reference parser
//!
//! Turns free text such as `1.Joh.1:2-5`, `1 Joh. 2-5` or `Matt 5:14` into a
//! [`Reference`]. Anything that does not look like a reference yields `None`,
//! which the search dispatcher treats as a request for full-text search.

use std::sync::LazyLock;

use bible_types::Reference;
use regex::Regex;

use super::books::normalize_book_name;

/// Highest chapter number in any book (Psalms)
pub const MAX_CHAPTER: u32 = 150;
/// Highest verse number in any chapter (Psalm 119)
pub const MAX_VERSE: u32 = 176;

// Book token: optional ordinal digit with optional period, then letters,
// spaces and periods ("1.Joh.", "1 Joh.", "I John", "Song of Solomon").
const BOOK_TOKEN: &str = r"(?:\d\.?\s*)?\p{L}[\p{L}\s.]*?";

// Tried first so that "John 3:16" is never read as a chapter range.
static VERSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^({BOOK_TOKEN})\.?\s*(\d+):(\d+)(?:\s*-\s*(\d+))?$"
    ))
    .expect("verse reference pattern is valid")
});

static CHAPTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({BOOK_TOKEN})\.?\s*(\d+)(?:\s*-\s*(\d+))?$"))
        .expect("chapter reference pattern is valid")
});

/// Parse a free-text query into a reference, or `None` when it is not one.
///
/// Reversed ranges (`5-2`), zero and out-of-range chapter or verse numbers
/// are rejected rather than guessed at.
pub fn parse_bible_reference(query: &str) -> Option<Reference> {
    let cleaned = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = VERSE_PATTERN.captures(&cleaned) {
        let book = clean_book_token(&caps[1])?;
        let chapter = bounded(&caps[2], MAX_CHAPTER)?;
        let first = bounded(&caps[3], MAX_VERSE)?;
        let verses = match caps.get(4) {
            Some(end) => expand_range(first, bounded(end.as_str(), MAX_VERSE)?)?,
            None => vec![first],
        };
        return Some(Reference {
            book: normalize_book_name(&book),
            chapter,
            chapter_end: None,
            verses: Some(verses),
        });
    }

    if let Some(caps) = CHAPTER_PATTERN.captures(&cleaned) {
        let book = clean_book_token(&caps[1])?;
        let chapter = bounded(&caps[2], MAX_CHAPTER)?;
        let chapter_end = match caps.get(3) {
            Some(end) => {
                let end = bounded(end.as_str(), MAX_CHAPTER)?;
                if end < chapter {
                    return None;
                }
                (end > chapter).then_some(end)
            }
            None => None,
        };
        return Some(Reference {
            book: normalize_book_name(&book),
            chapter,
            chapter_end,
            verses: None,
        });
    }

    None
}

/// Strip periods and surrounding whitespace: `"1.Joh."` -> `"1Joh"`
fn clean_book_token(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| *c != '.').collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Parse a positive number no greater than `max`
fn bounded(digits: &str, max: u32) -> Option<u32> {
    let value: u32 = digits.parse().ok()?;
    (1..=max).contains(&value).then_some(value)
}

/// `2..=5` -> `[2, 3, 4, 5]`; a reversed range is rejected
fn expand_range(start: u32, end: u32) -> Option<Vec<u32>> {
    (end >= start).then(|| (start..=end).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_finnish_abbreviation_with_verse_range() {
        let reference = parse_bible_reference("1.Joh.1:2-5").unwrap();
        assert_eq!(reference.book, "I John");
        assert_eq!(reference.chapter, 1);
        assert_eq!(reference.verses, Some(vec![2, 3, 4, 5]));
        assert_eq!(reference.chapter_end, None);
    }

    #[test]
    fn english_abbreviation_single_verse() {
        let reference = parse_bible_reference("Matt 5:14").unwrap();
        assert_eq!(reference, Reference::verses("Matthew", 5, vec![14]));
    }

    #[test]
    fn whole_chapter_and_chapter_range() {
        assert_eq!(
            parse_bible_reference("Joh 3").unwrap(),
            Reference::chapter("John", 3)
        );

        let span = parse_bible_reference("1Joh 2-5").unwrap();
        assert_eq!(span.book, "I John");
        assert_eq!(span.chapter, 2);
        assert_eq!(span.chapter_end, Some(5));
        assert_eq!(span.verses, None);
    }

    #[test]
    fn spaced_and_multiword_book_tokens() {
        assert_eq!(parse_bible_reference("1 Joh. 2:1").unwrap().book, "I John");
        assert_eq!(parse_bible_reference("I John 1:9").unwrap().book, "I John");
        assert_eq!(
            parse_bible_reference("Song of Solomon 2:1").unwrap().book,
            "Song of Solomon"
        );
        assert_eq!(
            parse_bible_reference("1. Mooseksen kirja 1:1").unwrap().book,
            "Genesis"
        );
        assert_eq!(
            parse_bible_reference("  John   3:16 ").unwrap(),
            Reference::verses("John", 3, vec![16])
        );
    }

    #[test]
    fn unknown_book_passes_through() {
        let reference = parse_bible_reference("Hezekiah 4:2").unwrap();
        assert_eq!(reference.book, "Hezekiah");
    }

    #[test]
    fn non_references_yield_none() {
        assert_eq!(parse_bible_reference("not a reference at all"), None);
        assert_eq!(parse_bible_reference(""), None);
        assert_eq!(parse_bible_reference("   "), None);
        assert_eq!(parse_bible_reference("3:16"), None);
        assert_eq!(parse_bible_reference("love your neighbour"), None);
    }

    #[test]
    fn reversed_zero_and_oversized_ranges_are_rejected() {
        assert_eq!(parse_bible_reference("John 3:5-2"), None);
        assert_eq!(parse_bible_reference("John 5-2"), None);
        assert_eq!(parse_bible_reference("John 0:1"), None);
        assert_eq!(parse_bible_reference("John 3:0"), None);
        assert_eq!(parse_bible_reference("Ps 119:1-177"), None);
        assert_eq!(parse_bible_reference("Ps 151"), None);
    }

    #[test]
    fn degenerate_ranges_collapse() {
        assert_eq!(
            parse_bible_reference("John 3:16-16").unwrap().verses,
            Some(vec![16])
        );
        assert_eq!(parse_bible_reference("John 3-3").unwrap().chapter_end, None);
    }
}
