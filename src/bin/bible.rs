//! Bible command line interface
//!
//! Read chapters, search, and study Strong's numbers from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Parse a reference without touching the backend
//! bible parse "1.Joh.1:2-5"
//!
//! # Reference or full-text search
//! bible search "Matt 5:14"
//! bible search '"valkeus on"' --version KR92
//!
//! # Read a chapter and remember the position
//! bible read "1. Joh" 1
//! bible resume
//!
//! # Word study against the bundled sample data
//! bible --demo lexicon G25
//! bible --demo study "Matt" 22 39
//! ```

use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use bible_study::bible_types::{LexiconCard, LexiconSegment, SearchKind, TextSpan, VerseHit};
use bible_study::config::{AppConfig, Backend};
use bible_study::database::{DatabaseConfig, DatabaseManager};
use bible_study::reader::ReaderService;
use bible_study::reference::parse_bible_reference;
use bible_study::search::SearchDispatcher;
use bible_study::store::{sample::sample_store, BibleStore, VersionFilter};
use bible_study::strongs::{parse_tagged_text, LexiconNavigator, StrongsResolver};
use bible_study::PositionFile;

#[derive(Parser)]
#[command(name = "bible")]
#[command(version = "0.1.0")]
#[command(about = "Read, search and study the Bible from the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use the bundled sample dataset instead of the database
    #[arg(long, global = true)]
    demo: bool,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a reference (no backend access)
    Parse {
        /// Reference text, e.g. "1.Joh.1:2-5"
        query: String,
    },

    /// Split tagged text into plain and Strong's-tagged spans
    Spans {
        /// Tagged text (reads stdin if not provided)
        text: Option<String>,
    },

    /// Reference lookup or full-text search
    Search {
        query: String,

        /// Version id or code
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Print a chapter and remember it as the reading position
    Read {
        book: String,
        chapter: u32,

        #[arg(short, long)]
        version: Option<String>,
    },

    /// Reopen the last chapter read on this machine
    Resume,

    /// Show a lexicon card
    Lexicon {
        /// Strong's number, e.g. G25 or H0085
        number: String,
    },

    /// Verses containing a Strong's number
    Strongs { number: String },

    /// Open a verse for word study and browse its lexicon entries
    Study {
        book: String,
        chapter: u32,
        verse: u32,

        #[arg(short, long)]
        version: Option<String>,
    },

    /// Find the same verse in another version
    Map {
        verse_id: Uuid,

        /// Target version code; defaults to the Strong's version
        #[arg(short, long)]
        version: Option<String>,
    },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?;

    // Commands that need no backend
    match &cli.command {
        Commands::Parse { query } => return cmd_parse(query, cli.json),
        Commands::Spans { text } => return cmd_spans(text.clone(), cli.json),
        _ => {}
    }

    let store = open_store(&config, cli.demo).await?;
    let json = cli.json;

    match cli.command {
        Commands::Parse { .. } | Commands::Spans { .. } => Ok(()),
        Commands::Search { query, version } => {
            let dispatcher = SearchDispatcher::with_limit(store, config.text_search_limit);
            cmd_search(&dispatcher, &query, version.as_deref(), json).await
        }
        Commands::Read {
            book,
            chapter,
            version,
        } => {
            let reader = ReaderService::new(store, config.default_version.clone());
            let position = PositionFile::new(&config.position_file);
            cmd_read(&reader, &position, &book, chapter, version.as_deref(), json).await
        }
        Commands::Resume => {
            let reader = ReaderService::new(store, config.default_version.clone());
            let position = PositionFile::new(&config.position_file);
            let Some(last) = position.load() else {
                bail!("no reading position saved yet; use `bible read` first");
            };
            cmd_read(
                &reader,
                &position,
                &last.book_name,
                last.chapter,
                Some(&last.version_code),
                json,
            )
            .await
        }
        Commands::Lexicon { number } => {
            let resolver = resolver(store, &config);
            let card = resolver.lexicon_card(&number).await;
            if json {
                return print_json(&card);
            }
            print_card(&card);
            Ok(())
        }
        Commands::Strongs { number } => {
            let dispatcher = SearchDispatcher::with_limit(store, config.text_search_limit);
            let result = dispatcher.search_strongs(&number).await;
            if json {
                return print_json(&result);
            }
            if let Some(notice) = &result.notice {
                println!("{}", notice.yellow());
            }
            println!(
                "{} {} verse(s) with {}",
                "Found:".green().bold(),
                result.total_count,
                result.search_term.bold()
            );
            for hit in &result.verses {
                print_hit(hit);
            }
            Ok(())
        }
        Commands::Study {
            book,
            chapter,
            verse,
            version,
        } => {
            let resolver = Arc::new(resolver(store, &config));
            cmd_study(resolver, &book, chapter, verse, version.as_deref(), json).await
        }
        Commands::Map { verse_id, version } => {
            let resolver = resolver(store, &config);
            let target = version.unwrap_or_else(|| resolver.strongs_version().to_string());
            match resolver.map_verse(verse_id, &target).await? {
                Some(hit) if json => print_json(&hit),
                Some(hit) => {
                    print_hit(&hit);
                    Ok(())
                }
                None => bail!("no {} verse shares the key of {}", target, verse_id),
            }
        }
    }
}

async fn open_store(config: &AppConfig, demo: bool) -> Result<Arc<dyn BibleStore>> {
    if demo || config.backend == Backend::Memory {
        return Ok(Arc::new(sample_store().await));
    }
    let manager = DatabaseManager::new(DatabaseConfig::from(config))
        .await
        .context("connecting to the database (use --demo for the sample data)")?;
    Ok(Arc::new(manager.bible_store()))
}

fn resolver(store: Arc<dyn BibleStore>, config: &AppConfig) -> StrongsResolver {
    StrongsResolver::new(
        store,
        config.default_version.clone(),
        config.strongs_version.clone(),
    )
}

// =============================================================================
// COMMANDS
// =============================================================================

fn cmd_parse(query: &str, json: bool) -> Result<()> {
    let Some(reference) = parse_bible_reference(query) else {
        bail!("'{}' is not a reference; it would be searched as text", query);
    };
    if json {
        return print_json(&reference);
    }
    println!("{} {}", "Reference:".green().bold(), reference);
    println!("  book:    {}", reference.book);
    println!("  chapter: {}", reference.chapter);
    if let Some(end) = reference.chapter_end {
        println!("  through: {}", end);
    }
    if let Some(verses) = &reference.verses {
        let verses: Vec<String> = verses.iter().map(u32::to_string).collect();
        println!("  verses:  {}", verses.join(", "));
    }
    Ok(())
}

fn cmd_spans(text: Option<String>, json: bool) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading tagged text from stdin")?;
            buffer
        }
    };
    let spans = parse_tagged_text(&text);
    if json {
        return print_json(&spans);
    }
    println!("{}", render_spans(&spans));
    Ok(())
}

async fn cmd_search(
    dispatcher: &SearchDispatcher,
    query: &str,
    version: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = version.and_then(VersionFilter::parse);
    let result = dispatcher.perform_search(query, filter).await;
    if json {
        return print_json(&result);
    }
    if let Some(notice) = &result.notice {
        println!("{}", notice.yellow());
    }
    match (&result.kind, &result.reference) {
        (SearchKind::Reference, Some(reference)) => {
            println!("{} {}", "Reference:".cyan().bold(), reference)
        }
        _ => println!("{} {}", "Text search:".cyan().bold(), query),
    }
    if result.verses.is_empty() {
        println!("{}", "No verses found".dimmed());
    }
    for hit in &result.verses {
        print_hit(hit);
    }
    Ok(())
}

async fn cmd_read(
    reader: &ReaderService,
    position: &PositionFile,
    book: &str,
    chapter: u32,
    version: Option<&str>,
    json: bool,
) -> Result<()> {
    let Some(loaded) = reader.chapter(book, chapter, version).await? else {
        bail!(
            "{} {} not found in {}",
            book,
            chapter,
            version.unwrap_or(reader.default_version())
        );
    };
    position.record(&loaded.book, loaded.chapter, &loaded.version_code)?;

    if json {
        return print_json(&loaded);
    }
    let title = loaded.display_name.as_deref().unwrap_or(&loaded.book);
    println!(
        "\n{} {} ({})\n",
        title.bold(),
        loaded.chapter,
        loaded.version_code.dimmed()
    );
    for verse in &loaded.verses {
        println!("{} {}", verse.verse_number.to_string().yellow(), verse.text);
    }
    Ok(())
}

async fn cmd_study(
    resolver: Arc<StrongsResolver>,
    book: &str,
    chapter: u32,
    verse: u32,
    version: Option<&str>,
    json: bool,
) -> Result<()> {
    let study = resolver.study_verse(book, chapter, verse, version).await?;
    if json {
        return print_json(&study);
    }

    let title = study.display_name.as_deref().unwrap_or(&study.book);
    println!("\n{} {}:{}", title.bold(), study.chapter, study.verse);
    match &study.source {
        Some(source) => println!("{}", source.text),
        None => println!("{}", "(verse not found in the reading version)".dimmed()),
    }
    if study.spans.is_empty() {
        println!("{}", "(no tagged text for this verse)".dimmed());
        return Ok(());
    }
    println!("\n{}", render_spans(&study.spans));
    println!(
        "\n{}",
        "Enter a Strong's number, 'b' back, 'f' forward, 'q' quit".dimmed()
    );

    let mut navigator = LexiconNavigator::new(resolver);
    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("strongs> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history_entry(input)?;

        let card = match input {
            "q" | "quit" | "exit" => break,
            "b" | "back" => navigator.back().await,
            "f" | "forward" => navigator.forward().await,
            number => Some(navigator.open(number).await),
        };
        match card {
            Some(card) => print_card(&card),
            None => println!("{}", "Nothing there".dimmed()),
        }
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_hit(hit: &VerseHit) {
    let version = hit.version_code.as_deref().unwrap_or("");
    println!(
        "{} {} {}",
        format!("{} {}:{}", hit.book_name, hit.chapter_number, hit.verse_number)
            .cyan()
            .bold(),
        version.dimmed(),
        hit.text
    );
}

/// Tagged words are underlined with their numbers in brackets
fn render_spans(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            TextSpan::Plain { text } => text.clone(),
            TextSpan::Tagged { text, strongs } => format!(
                "{}{}",
                text.underline(),
                format!("[{}]", strongs.join(",")).blue()
            ),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_segments(segments: &[LexiconSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            LexiconSegment::Text { text } => text.clone(),
            LexiconSegment::Link { link } if link.resolved => {
                format!("{} ({})", link.display.green(), link.strongs_number)
            }
            LexiconSegment::Link { link } => link.display.yellow().to_string(),
        })
        .collect()
}

fn print_card(card: &LexiconCard) {
    println!("\n{}", card.title.cyan().bold());
    if let Some(pronunciation) = &card.pronunciation {
        println!("{}", pronunciation.dimmed());
    }
    let Some(entry) = &card.entry else {
        println!("{}", "No lexicon entry".yellow());
        return;
    };
    if !entry.part_of_speech.is_empty() {
        println!("{}", entry.part_of_speech.italic());
    }
    if !entry.definition_short.is_empty() {
        println!("{}", entry.definition_short);
    }
    if !entry.definition_long.is_empty() {
        println!("{}", entry.definition_long);
    }
    if !card.derivation.is_empty() {
        println!("{} {}", "Derivation:".bold(), render_segments(&card.derivation));
    }
    if !card.notes.is_empty() {
        println!("{} {}", "Notes:".bold(), render_segments(&card.notes));
    }
    for (label, links) in [("Compare:", &card.compare), ("See also:", &card.see_also)] {
        if links.is_empty() {
            continue;
        }
        let rendered: Vec<String> = links
            .iter()
            .map(|link| format!("{} ({})", link.display, link.strongs_number))
            .collect();
        println!("{} {}", label.bold(), rendered.join(", "));
    }
}
