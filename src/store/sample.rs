//! Bundled sample dataset
//!
//! A handful of verses in a Finnish reading version (KR92) and the
//! Strong's-tagged English version (KJV), linked by OSIS keys, plus the
//! lexicon entries their tags point at. Backs `bible --demo` and the
//! integration tests.

use bible_types::{LexiconEntry, TaggedVerse};
use uuid::Uuid;

use super::InMemoryBibleStore;
use crate::reference::book_info;

pub const READING_VERSION: &str = "KR92";
pub const TAGGED_VERSION: &str = "KJV";

type Words = &'static [(&'static str, Option<&'static str>)];

struct SampleVerse {
    book: &'static str,
    chapter: i32,
    verse: i32,
    version: &'static str,
    text: &'static str,
    osis: &'static str,
    /// Tagged words for KJV rows
    words: Words,
}

const fn verse(
    book: &'static str,
    chapter: i32,
    verse: i32,
    version: &'static str,
    text: &'static str,
    osis: &'static str,
    words: Words,
) -> SampleVerse {
    SampleVerse {
        book,
        chapter,
        verse,
        version,
        text,
        osis,
        words,
    }
}

// (book, chapters in book, [(chapter, verses in chapter)])
const BOOKS: &[(&str, i32, &[(i32, i32)])] = &[
    ("Genesis", 50, &[(1, 31)]),
    ("Malachi", 4, &[(3, 24), (4, 6)]),
    ("Matthew", 28, &[(5, 48), (22, 46)]),
    ("John", 21, &[(3, 36)]),
    ("I John", 5, &[(1, 10), (4, 21)]),
];

const VERSES: &[SampleVerse] = &[
    verse("Genesis", 1, 1, "KR92", "Alussa Jumala loi taivaan ja maan.", "Genesis.1.1", &[]),
    verse(
        "Genesis", 1, 1, "KJV",
        "In the beginning God created the heaven and the earth.",
        "Genesis.1.1",
        &[
            ("In", None),
            ("the beginning", Some("H07225")),
            ("God", Some("H0430")),
            ("created", Some("H01254")),
            ("the heaven", Some("H08064")),
            ("and", None),
            ("the earth.", Some("H0776")),
        ],
    ),
    // KR92 numbers this verse Mal 3:19, KJV Mal 4:1; the key follows KJV.
    verse(
        "Malachi", 3, 19, "KR92",
        "Katso, se päivä tulee, ja se polttaa kuin uuni.",
        "Malachi.4.1",
        &[],
    ),
    verse(
        "Malachi", 4, 1, "KJV",
        "For, behold, the day cometh, that shall burn as an oven.",
        "Malachi.4.1",
        &[
            ("For,", None),
            ("behold,", Some("H2009")),
            ("the day", Some("H3117")),
            ("cometh,", Some("H935")),
            ("that shall burn", Some("H1197")),
            ("as an oven.", Some("H8574")),
        ],
    ),
    verse(
        "Matthew", 5, 14, "KR92",
        "Te olette maailman valo. Ei voi kaupunki, joka on vuorella, olla kätkössä.",
        "Matthew.5.14",
        &[],
    ),
    verse(
        "Matthew", 5, 14, "KJV",
        "Ye are the light of the world. A city that is set on an hill cannot be hid.",
        "Matthew.5.14",
        &[
            ("Ye", Some("G5210")),
            ("are", Some("G2075")),
            ("the light", Some("G5457")),
            ("of the world.", Some("G2889")),
            ("A city", Some("G4172")),
            ("that is set", Some("G2749")),
            ("on", Some("G1883")),
            ("an hill", Some("G3735")),
            ("cannot", None),
            ("be hid.", Some("G2928")),
        ],
    ),
    verse(
        "Matthew", 22, 39, "KR92",
        "Toinen yhtä tärkeä on tämä: rakasta lähimmäistäsi niin kuin itseäsi.",
        "Matthew.22.39",
        &[],
    ),
    verse(
        "Matthew", 22, 39, "KJV",
        "And the second is like unto it, Thou shalt love thy neighbour as thyself.",
        "Matthew.22.39",
        &[
            ("And", Some("G1161")),
            ("the second", Some("G1208")),
            ("is like", Some("G3664")),
            ("unto it,", Some("G846")),
            ("Thou shalt love", Some("G25")),
            ("thy", Some("G4675")),
            ("neighbour", Some("G4139")),
            ("as", Some("G5613")),
            ("thyself.", Some("G4572")),
        ],
    ),
    verse(
        "John", 3, 16, "KR92",
        "Sillä niin on Jumala rakastanut maailmaa, että antoi ainoan Poikansa, jottei yksikään, joka häneen uskoo, joutuisi kadotukseen, vaan saisi iankaikkisen elämän.",
        "John.3.16",
        &[],
    ),
    verse(
        "John", 3, 16, "KJV",
        "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
        "John.3.16",
        &[
            ("For", Some("G1063")),
            ("God", Some("G2316")),
            ("so", Some("G3779")),
            ("loved", Some("G25")),
            ("the world,", Some("G2889")),
            ("that", Some("G5620")),
            ("he gave", Some("G1325")),
            ("his", Some("G846")),
            ("only begotten", Some("G3439")),
            ("Son,", Some("G5207")),
            ("that whosoever", Some("G3956")),
            ("believeth", Some("G4100")),
            ("in", Some("G1519")),
            ("him", Some("G846")),
            ("should not", Some("G3361")),
            ("perish,", Some("G622")),
            ("but", Some("G235")),
            ("have", Some("G2192")),
            ("everlasting", Some("G166")),
            ("life.", Some("G2222")),
        ],
    ),
    verse(
        "John", 3, 17, "KR92",
        "Jumala ei lähettänyt Poikaansa maailmaan tuomitsemaan maailmaa, vaan pelastamaan sen.",
        "John.3.17",
        &[],
    ),
    verse(
        "John", 3, 17, "KJV",
        "For God sent not his Son into the world to condemn the world; but that the world through him might be saved.",
        "John.3.17",
        &[],
    ),
    verse(
        "I John", 1, 1, "KR92",
        "Se, mikä oli alusta, minkä olemme kuulleet, minkä omin silmin nähneet, mitä katselimme ja käsin kosketimme, siitä me puhumme: elämän Sanasta.",
        "I John.1.1",
        &[],
    ),
    verse(
        "I John", 1, 2, "KR92",
        "Elämä ilmestyi, ja me olemme nähneet sen, me todistamme siitä ja julistamme teille iankaikkista elämää.",
        "I John.1.2",
        &[],
    ),
    verse(
        "I John", 1, 3, "KR92",
        "Minkä olemme nähneet ja kuulleet, sen me julistamme myös teille, jotta teilläkin olisi yhteys meihin.",
        "I John.1.3",
        &[],
    ),
    verse(
        "I John", 1, 4, "KR92",
        "Tämän me kirjoitamme, jotta ilomme olisi täydellinen.",
        "I John.1.4",
        &[],
    ),
    verse(
        "I John", 1, 5, "KR92",
        "Tämä on se sanoma, jonka olemme häneltä kuulleet ja jonka julistamme teille: Jumala on valo, hänessä ei ole pimeyttä.",
        "I John.1.5",
        &[],
    ),
    verse(
        "I John", 1, 5, "KJV",
        "This then is the message which we have heard of him, and declare unto you, that God is light, and in him is no darkness at all.",
        "I John.1.5",
        &[],
    ),
    verse(
        "I John", 4, 7, "KR92",
        "Rakkaat ystävät, rakastakaamme toisiamme, sillä rakkaus on Jumalasta.",
        "I John.4.7",
        &[],
    ),
    verse(
        "I John", 4, 7, "KJV",
        "Beloved, let us love one another: for love is of God; and every one that loveth is born of God, and knoweth God.",
        "I John.4.7",
        &[
            ("Beloved,", Some("G27")),
            ("let us love", Some("G25")),
            ("one another:", Some("G240")),
            ("for", Some("G3754")),
            ("love", Some("G26")),
            ("is", Some("G2076")),
            ("of", Some("G1537")),
            ("God;", Some("G2316")),
            ("and", Some("G2532")),
            ("every one", Some("G3956")),
            ("that loveth", Some("G25")),
            ("is born", Some("G1080")),
            ("of", Some("G1537")),
            ("God,", Some("G2316")),
            ("and", Some("G2532")),
            ("knoweth", Some("G1097")),
            ("God.", Some("G2316")),
        ],
    ),
];

// Rows the backend function returns directly; other tagged verses are
// composed from their words.
const FUNCTION_ROWS: &[(&str, &str, &str)] = &[(
    "John.3.16",
    "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
    "For<G1063> God<G2316> so<G3779> loved<G25> the world<G2889>, that<G5620> he gave<G1325> his<G846> only begotten<G3439> Son<G5207>, that whosoever<G3956> believeth<G4100> in<G1519> him<G846> should not<G3361> perish<G622>, but<G235> have<G2192> everlasting<G166> life<G2222>.",
)];

fn lexicon() -> Vec<LexiconEntry> {
    fn entry(
        number: &str,
        language: &str,
        lemma: &str,
        transliteration: &str,
        pronunciation: &str,
        part_of_speech: &str,
        definition_short: &str,
    ) -> LexiconEntry {
        LexiconEntry {
            strongs_number: number.to_string(),
            language: language.to_string(),
            lemma: lemma.to_string(),
            transliterations: vec![transliteration.to_string()],
            pronunciations: vec![pronunciation.to_string()],
            part_of_speech: part_of_speech.to_string(),
            definition_short: definition_short.to_string(),
            ..Default::default()
        }
    }

    vec![
        LexiconEntry {
            derivation: "perhaps from ἄγαν (much) (or compare [[H5689]])".to_string(),
            definition_lit: "to love (in a social or moral sense)".to_string(),
            definition_long: "(be-)love(-ed)".to_string(),
            notes: "Chiefly of the love of God; contrast <G5368>, personal attachment."
                .to_string(),
            compare: vec!["G5368".to_string()],
            see_also: vec!["G26".to_string(), "G27".to_string()],
            ..entry("G25", "greek", "ἀγαπάω", "agapáō", "ag-ap-ah'-o", "verb", "to love")
        },
        LexiconEntry {
            derivation: "from [[G25]]".to_string(),
            definition_long: "(feast of) charity(-ably), dear, love".to_string(),
            ..entry("G26", "greek", "ἀγάπη", "agápē", "ag-ah'-pay", "noun", "love, benevolence")
        },
        LexiconEntry {
            derivation: "from [[G25]]".to_string(),
            ..entry("G27", "greek", "ἀγαπητός", "agapētós", "ag-ap-ay-tos'", "adjective", "beloved")
        },
        LexiconEntry {
            derivation: "from (G5384)".to_string(),
            compare: vec!["G25".to_string()],
            ..entry("G5368", "greek", "φιλέω", "philéō", "fil-eh'-o", "verb", "to be a friend to, to have affection for")
        },
        LexiconEntry {
            derivation: "genitive case of σύ (thou)".to_string(),
            ..entry("G4675", "greek", "σοῦ", "soû", "soo", "pronoun", "of thee, thy")
        },
        LexiconEntry {
            derivation: "from πέλας (near)".to_string(),
            ..entry("G4139", "greek", "πλησίον", "plēsíon", "play-see'-on", "adverb", "close by; a neighbor")
        },
        LexiconEntry {
            derivation: "of uncertain affinity".to_string(),
            see_also: vec!["H430".to_string()],
            ..entry("G2316", "greek", "θεός", "theós", "theh'-os", "noun", "a deity, God")
        },
        LexiconEntry {
            derivation: "probably from the base of [[G2865]]".to_string(),
            ..entry("G2889", "greek", "κόσμος", "kósmos", "kos'-mos", "noun", "orderly arrangement; the world")
        },
        LexiconEntry {
            derivation: "contracted from [[H1]] and an unused root (probably meaning to be populous)"
                .to_string(),
            notes: "The later name of Abram (H87).".to_string(),
            compare: vec!["H87".to_string()],
            ..entry("H85", "hebrew", "אַבְרָהָם", "ʼAbrâhâm", "ab-raw-hawm'", "proper noun", "Abraham, father of a multitude")
        },
        entry("H1", "hebrew", "אָב", "ʼâb", "awb", "noun", "father"),
        LexiconEntry {
            derivation: "plural of <H433>".to_string(),
            see_also: vec!["G2316".to_string(), "H0410".to_string()],
            ..entry("H430", "hebrew", "אֱלֹהִים", "ʼĕlôhîym", "el-o-heem'", "noun", "God, gods")
        },
        LexiconEntry {
            derivation: "from the same as [[H7218]]".to_string(),
            ..entry("H7225", "hebrew", "רֵאשִׁית", "rêʼshîyth", "ray-sheeth'", "noun", "the first, in place, time, order or rank")
        },
        entry("H1254", "hebrew", "בָּרָא", "bârâʼ", "baw-raw'", "verb", "to create"),
        entry("H8064", "hebrew", "שָׁמַיִם", "shâmayim", "shaw-mah'-yim", "noun", "the sky, heaven"),
        entry("H776", "hebrew", "אֶרֶץ", "ʼerets", "eh'-rets", "noun", "the earth, land"),
    ]
}

/// Load the sample dataset into `store`
pub async fn load_sample(store: &InMemoryBibleStore) {
    let kr92 = store.add_version(READING_VERSION, "Kirkkoraamattu 1992", "fi").await;
    let kjv = store.add_version(TAGGED_VERSION, "King James Version", "en").await;

    let mut chapters: Vec<(&str, i32, Uuid)> = Vec::new();
    for (name, chapters_count, book_chapters) in BOOKS {
        let Some(info) = book_info(name) else { continue };
        let book_id = store
            .add_book(info.canonical, info.testament(), *chapters_count, i32::from(info.order))
            .await;
        for (number, verses_count) in book_chapters.iter() {
            let chapter_id = store.add_chapter(book_id, *number, *verses_count).await;
            chapters.push((info.canonical, *number, chapter_id));
        }
    }

    for sample in VERSES {
        let Some((_, _, chapter_id)) = chapters
            .iter()
            .find(|(book, number, _)| *book == sample.book && *number == sample.chapter)
        else {
            continue;
        };
        let version_id = if sample.version == TAGGED_VERSION { kjv } else { kr92 };
        let verse_id = store
            .add_verse(*chapter_id, version_id, sample.verse, sample.text, Some(sample.osis))
            .await;
        if !sample.words.is_empty() {
            store.add_strongs_words(verse_id, sample.words).await;
        }
    }

    for (osis, plain_text, tagged_text) in FUNCTION_ROWS {
        store
            .add_tagged_verse_row(
                TAGGED_VERSION,
                TaggedVerse {
                    osis: osis.to_string(),
                    plain_text: plain_text.to_string(),
                    tagged_text: tagged_text.to_string(),
                },
            )
            .await;
    }

    for entry in lexicon() {
        store.add_lexicon_entry(entry).await;
    }
}

/// A fresh in-memory store holding the sample dataset
pub async fn sample_store() -> InMemoryBibleStore {
    let store = InMemoryBibleStore::new();
    load_sample(&store).await;
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BibleStore;

    #[tokio::test]
    async fn every_sample_verse_lands_in_a_chapter() {
        let store = sample_store().await;
        for sample in VERSES {
            let hit = store
                .verse_by_key(sample.osis, sample.version)
                .await
                .unwrap()
                .unwrap_or_else(|| panic!("{} {} missing", sample.osis, sample.version));
            assert_eq!(hit.verse_number, sample.verse);
        }
    }

    #[tokio::test]
    async fn sample_books_use_canonical_names() {
        let store = sample_store().await;
        let names: Vec<String> = store.books().await.unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Genesis", "Malachi", "Matthew", "John", "I John"]);
    }

    #[test]
    fn sample_loads_without_a_runtime() {
        let store = tokio_test::block_on(sample_store());
        let versions = tokio_test::block_on(store.versions()).unwrap();
        let codes: Vec<&str> = versions.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![TAGGED_VERSION, READING_VERSION]);
    }
}
