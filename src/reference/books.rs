//! Canonical book catalog and book-name normalization
//!
//! The backend identifies books by their English canonical names
//! (`"I John"`, `"Song of Solomon"`). Users type abbreviations in English or
//! Finnish (`1.Joh.`, `Matt`, `1 Moos`), so every token is reduced to a lookup
//! key (NFC, lowercase, whitespace and periods removed) and matched against an
//! index built from each book's canonical name, Finnish display name, OSIS
//! abbreviation, numeric variant and alias list.

use std::collections::HashMap;
use std::sync::LazyLock;

use bible_types::Testament;
use unicode_normalization::UnicodeNormalization;

/// Static description of one canonical book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    /// Position in the Protestant canon, 1-based
    pub order: u8,
    pub canonical: &'static str,
    pub finnish: &'static str,
    pub osis: &'static str,
    /// Extra lookup keys, already in key form
    pub aliases: &'static [&'static str],
}

impl BookInfo {
    pub fn testament(&self) -> Testament {
        if self.order <= 39 {
            Testament::Old
        } else {
            Testament::New
        }
    }
}

macro_rules! book {
    ($order:expr, $canonical:expr, $finnish:expr, $osis:expr, [$($alias:expr),* $(,)?]) => {
        BookInfo {
            order: $order,
            canonical: $canonical,
            finnish: $finnish,
            osis: $osis,
            aliases: &[$($alias),*],
        }
    };
}

pub static BOOKS: [BookInfo; 66] = [
    // Old Testament
    book!(1, "Genesis", "1. Mooseksen kirja", "Gen", ["ge", "gn", "1moos", "1mooses", "1mos"]),
    book!(2, "Exodus", "2. Mooseksen kirja", "Exod", ["ex", "exo", "2moos", "2mooses", "2mos"]),
    book!(3, "Leviticus", "3. Mooseksen kirja", "Lev", ["lv", "3moos", "3mooses", "3mos"]),
    book!(4, "Numbers", "4. Mooseksen kirja", "Num", ["nu", "nm", "4moos", "4mooses", "4mos"]),
    book!(5, "Deuteronomy", "5. Mooseksen kirja", "Deut", ["dt", "deu", "5moos", "5mooses", "5mos"]),
    book!(6, "Joshua", "Joosuan kirja", "Josh", ["jos", "jsh", "joos", "joosua"]),
    book!(7, "Judges", "Tuomarien kirja", "Judg", ["jdg", "jdgs", "tuom", "tuomarit"]),
    book!(8, "Ruth", "Ruutin kirja", "Ruth", ["ru", "rth", "ruut"]),
    book!(9, "I Samuel", "1. Samuelin kirja", "1Sam", ["1sa", "1sm", "1samuel"]),
    book!(10, "II Samuel", "2. Samuelin kirja", "2Sam", ["2sa", "2sm", "2samuel"]),
    book!(11, "I Kings", "1. Kuningasten kirja", "1Kgs", ["1ki", "1kin", "1kings", "1kun"]),
    book!(12, "II Kings", "2. Kuningasten kirja", "2Kgs", ["2ki", "2kin", "2kings", "2kun"]),
    book!(13, "I Chronicles", "1. Aikakirja", "1Chr", ["1ch", "1chron", "1aik", "1aikak"]),
    book!(14, "II Chronicles", "2. Aikakirja", "2Chr", ["2ch", "2chron", "2aik", "2aikak"]),
    book!(15, "Ezra", "Esran kirja", "Ezra", ["ezr", "esra", "esr"]),
    book!(16, "Nehemiah", "Nehemian kirja", "Neh", ["ne", "nehemia"]),
    book!(17, "Esther", "Esterin kirja", "Esth", ["es", "est", "ester"]),
    book!(18, "Job", "Jobin kirja", "Job", ["jb"]),
    book!(19, "Psalms", "Psalmien kirja", "Ps", ["psa", "pss", "psalm", "psalmit", "psalmi"]),
    book!(20, "Proverbs", "Sananlaskujen kirja", "Prov", ["pr", "prv", "sananl", "snl", "sananlaskut"]),
    book!(21, "Ecclesiastes", "Saarnaajan kirja", "Eccl", ["ecc", "qoh", "saarn", "saarnaaja"]),
    book!(22, "Song of Solomon", "Laulujen laulu", "Song", ["sos", "sng", "songofsongs", "canticles", "laul", "lauluj"]),
    book!(23, "Isaiah", "Jesajan kirja", "Isa", ["is", "jes", "jesaja"]),
    book!(24, "Jeremiah", "Jeremian kirja", "Jer", ["je", "jrm", "jeremia"]),
    book!(25, "Lamentations", "Valitusvirret", "Lam", ["la", "valit", "valitusv"]),
    book!(26, "Ezekiel", "Hesekielin kirja", "Ezek", ["eze", "ezk", "hes", "hesekiel"]),
    book!(27, "Daniel", "Danielin kirja", "Dan", ["da", "dn"]),
    book!(28, "Hosea", "Hoosean kirja", "Hos", ["ho", "hoos", "hoosea"]),
    book!(29, "Joel", "Joelin kirja", "Joel", ["joe", "jl"]),
    book!(30, "Amos", "Aamoksen kirja", "Amos", ["am", "amo", "aam", "aamos"]),
    book!(31, "Obadiah", "Obadjan kirja", "Obad", ["ob", "oba", "obadja"]),
    book!(32, "Jonah", "Jonan kirja", "Jonah", ["jon", "jnh", "joona"]),
    book!(33, "Micah", "Miikan kirja", "Mic", ["mi", "mica", "miika", "miik"]),
    book!(34, "Nahum", "Nahumin kirja", "Nah", ["na", "nam"]),
    book!(35, "Habakkuk", "Habakukin kirja", "Hab", ["hb", "habakuk"]),
    book!(36, "Zephaniah", "Sefanjan kirja", "Zeph", ["zep", "zp", "sef", "sefanja"]),
    book!(37, "Haggai", "Haggain kirja", "Hag", ["hg", "hagg"]),
    book!(38, "Zechariah", "Sakarian kirja", "Zech", ["zec", "zc", "sak", "sakarja"]),
    book!(39, "Malachi", "Malakian kirja", "Mal", ["ml", "malakia"]),
    // New Testament
    book!(40, "Matthew", "Matteus", "Matt", ["mt", "mat", "matteuksenevankeliumi"]),
    book!(41, "Mark", "Markus", "Mark", ["mk", "mrk", "mar", "markuksenevankeliumi"]),
    book!(42, "Luke", "Luukas", "Luke", ["lk", "luk", "luuk", "luukkaanevankeliumi"]),
    book!(43, "John", "Johannes", "John", ["jn", "jhn", "joh", "johanneksenevankeliumi"]),
    book!(44, "Acts", "Apostolien teot", "Acts", ["ac", "act", "apt", "apostolienteot"]),
    book!(45, "Romans", "Kirje roomalaisille", "Rom", ["ro", "rm", "room", "roomalaiset", "roomalaiskirje"]),
    book!(46, "I Corinthians", "1. Kor", "1Cor", ["1co", "1corinthians", "1korinttilaiset", "1korinttilaiskirje"]),
    book!(47, "II Corinthians", "2. Kor", "2Cor", ["2co", "2corinthians", "2korinttilaiset", "2korinttilaiskirje"]),
    book!(48, "Galatians", "Kirje galatalaisille", "Gal", ["ga", "galatalaiset", "galatalaiskirje"]),
    book!(49, "Ephesians", "Kirje efesolaisille", "Eph", ["ephes", "ef", "efesolaiset", "efesolaiskirje"]),
    book!(50, "Philippians", "Kirje filippiläisille", "Phil", ["php", "pp", "fil", "filippiläiset", "filippiläiskirje"]),
    book!(51, "Colossians", "Kirje kolossalaisille", "Col", ["co", "kol", "kolossalaiset", "kolossalaiskirje"]),
    book!(52, "I Thessalonians", "1. Tess", "1Thess", ["1th", "1thes", "1tessalonikalaiset"]),
    book!(53, "II Thessalonians", "2. Tess", "2Thess", ["2th", "2thes", "2tessalonikalaiset"]),
    book!(54, "I Timothy", "1. Tim", "1Tim", ["1ti", "1timothy", "1timoteus"]),
    book!(55, "II Timothy", "2. Tim", "2Tim", ["2ti", "2timothy", "2timoteus"]),
    book!(56, "Titus", "Kirje Titukselle", "Titus", ["tit", "ti"]),
    book!(57, "Philemon", "Kirje Filemonille", "Phlm", ["phm", "philem", "filem", "filemon"]),
    book!(58, "Hebrews", "Kirje heprealaisille", "Heb", ["he", "hebr", "heprealaiset", "heprealaiskirje"]),
    book!(59, "James", "Jaakobin kirje", "Jas", ["jm", "jam", "jaak", "jaakob"]),
    book!(60, "I Peter", "1. Pietarin kirje", "1Pet", ["1pe", "1pt", "1piet", "1pietari"]),
    book!(61, "II Peter", "2. Pietarin kirje", "2Pet", ["2pe", "2pt", "2piet", "2pietari"]),
    book!(62, "I John", "1. Johanneksen kirje", "1John", ["1jn", "1jo", "1joh", "1johannes"]),
    book!(63, "II John", "2. Johanneksen kirje", "2John", ["2jn", "2jo", "2joh", "2johannes"]),
    book!(64, "III John", "3. Johanneksen kirje", "3John", ["3jn", "3jo", "3joh", "3johannes"]),
    book!(65, "Jude", "Juudaan kirje", "Jude", ["jd", "juud", "juuda"]),
    book!(66, "Revelation of John", "Johanneksen ilmestys", "Rev", ["re", "rv", "revelation", "ilm", "ilmestys", "ilmestyskirja"]),
];

/// Reduce a user-typed book token to its lookup key
pub fn lookup_key(token: &str) -> String {
    token
        .nfc()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// `"I John"` -> `Some("1John")`; names without a Roman ordinal yield `None`
fn numeric_variant(canonical: &str) -> Option<String> {
    let (ordinal, rest) = canonical.split_once(' ')?;
    let digit = match ordinal {
        "I" => '1',
        "II" => '2',
        "III" => '3',
        _ => return None,
    };
    Some(format!("{}{}", digit, rest))
}

struct BookIndex {
    by_key: HashMap<String, &'static BookInfo>,
    conflicts: Vec<(String, &'static str, &'static str)>,
}

fn build_index() -> BookIndex {
    let mut by_key: HashMap<String, &'static BookInfo> = HashMap::new();
    let mut conflicts = Vec::new();

    for info in BOOKS.iter() {
        let mut keys = vec![
            lookup_key(info.canonical),
            lookup_key(info.finnish),
            lookup_key(info.osis),
        ];
        keys.extend(numeric_variant(info.canonical).map(|v| lookup_key(&v)));
        keys.extend(info.aliases.iter().map(|alias| lookup_key(alias)));

        for key in keys {
            match by_key.get(&key) {
                Some(existing) if existing.order != info.order => {
                    conflicts.push((key, existing.canonical, info.canonical));
                }
                Some(_) => {}
                None => {
                    by_key.insert(key, info);
                }
            }
        }
    }

    BookIndex { by_key, conflicts }
}

static INDEX: LazyLock<BookIndex> = LazyLock::new(build_index);

/// Resolve any known spelling of a book to its catalog entry
pub fn find_book(token: &str) -> Option<&'static BookInfo> {
    INDEX.by_key.get(&lookup_key(token)).copied()
}

/// Map an abbreviated or localized book token to the canonical identifier.
///
/// Unrecognized tokens come back unchanged; this is best-effort, not an error.
pub fn normalize_book_name(token: &str) -> String {
    match find_book(token) {
        Some(info) => info.canonical.to_string(),
        None => token.to_string(),
    }
}

/// Catalog entry for an exact canonical name
pub fn book_info(canonical: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|info| info.canonical == canonical)
}

/// Finnish display name, falling back to the input
pub fn finnish_name(canonical: &str) -> String {
    book_info(canonical)
        .map(|info| info.finnish.to_string())
        .unwrap_or_else(|| canonical.to_string())
}

/// Canonical name for an exact Finnish display name, falling back to the input
pub fn canonical_from_finnish(finnish: &str) -> String {
    BOOKS
        .iter()
        .find(|info| info.finnish == finnish)
        .map(|info| info.canonical.to_string())
        .unwrap_or_else(|| finnish.to_string())
}

pub fn all_books() -> &'static [BookInfo] {
    &BOOKS
}
