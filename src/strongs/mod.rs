//! Strong's numbers: tagged-text parsing, lexicon cards, verse study and
//! cross-version mapping.

pub mod history;
pub mod lexicon_text;
pub mod resolver;
pub mod tags;

pub use history::{NavigationHistory, DEFAULT_HISTORY_CAPACITY};
pub use resolver::{LexiconNavigator, StrongsResolver};
pub use tags::{
    normalize_strongs, normalize_tagged_text, parse_tagged_text, render_plain, tags_in,
    StrongsNumber,
};
