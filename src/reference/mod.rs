//! Scripture references: free-text parsing, book-name normalization and
//! OSIS verse keys.

pub mod books;
pub mod parser;
pub mod verse_key;

pub use books::{
    all_books, book_info, canonical_from_finnish, find_book, finnish_name, normalize_book_name,
    BookInfo,
};
pub use parser::{parse_bible_reference, MAX_CHAPTER, MAX_VERSE};
pub use verse_key::VerseKey;
