//! Strong's numbers and tagged verse text
//!
//! Tagged text attaches lexical tags to words in bracket form
//! (`love<G25> thy<G4675>`), several per word if needed
//! (`beginning<H7225><H430>`). Older data uses a parenthetical form
//! (`love (G25)`), which is rewritten to bracket form before parsing.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use bible_types::TextSpan;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BibleError;

/// A lexical tag: letter prefix plus number, leading zeros insignificant.
///
/// `H0085`, `h85` and `H85` are the same number and all display as `H85`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrongsNumber {
    prefix: char,
    number: u32,
}

impl StrongsNumber {
    pub fn new(prefix: char, number: u32) -> Result<Self, BibleError> {
        if !prefix.is_ascii_alphabetic() {
            return Err(BibleError::InvalidStrongsNumber(format!("{}{}", prefix, number)));
        }
        Ok(Self {
            prefix: prefix.to_ascii_uppercase(),
            number,
        })
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// `G` numbers index the Greek lexicon, `H` numbers the Hebrew one
    pub fn language(&self) -> Option<&'static str> {
        match self.prefix {
            'G' => Some("greek"),
            'H' => Some("hebrew"),
            _ => None,
        }
    }
}

impl fmt::Display for StrongsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.number)
    }
}

impl FromStr for StrongsNumber {
    type Err = BibleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BibleError::InvalidStrongsNumber(s.to_string());
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let prefix = chars.next().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if !prefix.is_ascii_alphabetic()
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let number = digits
            .trim_start_matches('0')
            .parse::<u32>()
            .or_else(|e| if digits.bytes().all(|b| b == b'0') { Ok(0) } else { Err(e) })
            .map_err(|_| invalid())?;
        Self::new(prefix, number)
    }
}

impl TryFrom<String> for StrongsNumber {
    type Error = BibleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrongsNumber> for String {
    fn from(number: StrongsNumber) -> Self {
        number.to_string()
    }
}

/// Canonical form of a raw identifier, or `None` if it is not one
pub fn normalize_strongs(raw: &str) -> Option<String> {
    raw.parse::<StrongsNumber>().ok().map(|n| n.to_string())
}

static LEGACY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(([A-Za-z]\d+)\)").expect("legacy tag pattern is valid")
});

static SPACE_BEFORE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(<[A-Za-z]\d+>)").expect("tag spacing pattern is valid")
});

// Visible text, a trailing run of tags, then optional trailing punctuation.
static TAGGED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)((?:<[A-Za-z]\d+>)+)(\p{P}*)$").expect("tagged token pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z]\d+)>").expect("tag pattern is valid"));

/// Rewrite `(G25)` to `<G25>` and drop whitespace before tag markers, so
/// `word <G25>`, `word (G25)` and `word<G25>` all parse identically.
pub fn normalize_tagged_text(text: &str) -> String {
    let bracketed = LEGACY_TAG.replace_all(text, "<$1>");
    SPACE_BEFORE_TAG.replace_all(&bracketed, "$1").into_owned()
}

/// Split tagged text into renderable spans in original order.
///
/// Runs of untagged words collapse into one plain span; spans are meant to
/// be joined by single spaces (see [`render_plain`]).
pub fn parse_tagged_text(text: &str) -> Vec<TextSpan> {
    let normalized = normalize_tagged_text(text);
    let mut spans = Vec::new();
    let mut plain_run: Vec<String> = Vec::new();

    for token in normalized.split_whitespace() {
        let Some(caps) = TAGGED_TOKEN.captures(token) else {
            plain_run.push(token.to_string());
            continue;
        };
        let text = format!("{}{}", &caps[1], &caps[3]);
        let strongs: Vec<String> = TAG
            .captures_iter(&caps[2])
            .filter_map(|tag| normalize_strongs(&tag[1]))
            .collect();

        // No usable tag left: the word is plain text
        if strongs.is_empty() {
            if !text.is_empty() {
                plain_run.push(text);
            }
            continue;
        }

        if !plain_run.is_empty() {
            spans.push(TextSpan::Plain {
                text: plain_run.join(" "),
            });
            plain_run.clear();
        }
        spans.push(TextSpan::Tagged { text, strongs });
    }

    if !plain_run.is_empty() {
        spans.push(TextSpan::Plain {
            text: plain_run.join(" "),
        });
    }

    spans
}

/// Visible text of a span sequence with all tag markup removed
pub fn render_plain(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(TextSpan::text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every distinct tag in the text, in first-seen order
pub fn tags_in(text: &str) -> Vec<StrongsNumber> {
    let mut seen = Vec::new();
    for caps in TAG.captures_iter(&normalize_tagged_text(text)) {
        if let Ok(number) = caps[1].parse::<StrongsNumber>() {
            if !seen.contains(&number) {
                seen.push(number);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(text: &str, strongs: &[&str]) -> TextSpan {
        TextSpan::Tagged {
            text: text.to_string(),
            strongs: strongs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn plain(text: &str) -> TextSpan {
        TextSpan::Plain {
            text: text.to_string(),
        }
    }

    #[test]
    fn leading_zeros_are_insignificant() {
        let a: StrongsNumber = "H0085".parse().unwrap();
        let b: StrongsNumber = "H85".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "H85");
        assert_eq!("g25".parse::<StrongsNumber>().unwrap().to_string(), "G25");
        assert_eq!("H0".parse::<StrongsNumber>().unwrap().to_string(), "H0");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["H0085", "H85", "G0025", "g4675"] {
            let once = normalize_strongs(raw).unwrap();
            let twice = normalize_strongs(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        for bad in ["", "25", "G", "GG25", "G-25", "G25a", "<G25>", "G99999999999"] {
            assert!(bad.parse::<StrongsNumber>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn language_follows_prefix() {
        assert_eq!("G25".parse::<StrongsNumber>().unwrap().language(), Some("greek"));
        assert_eq!("H85".parse::<StrongsNumber>().unwrap().language(), Some("hebrew"));
        assert_eq!("T1".parse::<StrongsNumber>().unwrap().language(), None);
    }

    #[test]
    fn tagged_words_and_plain_words_keep_order() {
        let spans = parse_tagged_text("love<G25> thy<G4675> neighbour");
        assert_eq!(
            spans,
            vec![tagged("love", &["G25"]), tagged("thy", &["G4675"]), plain("neighbour")]
        );
    }

    #[test]
    fn words_whose_tags_all_fail_to_parse_stay_plain() {
        let spans = parse_tagged_text("love<G25> thy<G99999999999> neighbour <H99999999999>");
        assert_eq!(spans, vec![tagged("love", &["G25"]), plain("thy neighbour")]);

        let spans = parse_tagged_text("God<H99999999999><H430>");
        assert_eq!(spans, vec![tagged("God", &["H430"])]);
    }

    #[test]
    fn multiple_tags_per_word_are_normalized() {
        let spans = parse_tagged_text("In the beginning<H07225><H0430> God");
        assert_eq!(
            spans,
            vec![
                plain("In the"),
                tagged("beginning", &["H7225", "H430"]),
                plain("God"),
            ]
        );
    }

    #[test]
    fn stray_whitespace_and_legacy_form_parse_like_brackets() {
        let expected = vec![tagged("love", &["G25"]), plain("one another")];
        assert_eq!(parse_tagged_text("love <G25> one another"), expected);
        assert_eq!(parse_tagged_text("love (G25) one another"), expected);
        assert_eq!(parse_tagged_text("love<G25> one another"), expected);
    }

    #[test]
    fn trailing_punctuation_stays_visible() {
        let spans = parse_tagged_text("God<H430>, and");
        assert_eq!(spans, vec![tagged("God,", &["H430"]), plain("and")]);
    }

    #[test]
    fn render_plain_strips_all_markup() {
        let spans = parse_tagged_text("love<G25> thy<G4675> neighbour <H853>");
        assert_eq!(render_plain(&spans), "love thy neighbour");
    }

    #[test]
    fn tags_in_deduplicates() {
        let tags = tags_in("a<G25> b<G0025> c (H85)");
        let rendered: Vec<String> = tags.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["G25", "H85"]);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let number: StrongsNumber = serde_json::from_str("\"H0085\"").unwrap();
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"H85\"");
    }
}
