// src/main.rs
use clap::{ArgGroup, Parser};
use wiki_tracklist::extractors::{strategy_for, tracks, MatchOrder};
use wiki_tracklist::report;
use wiki_tracklist::storage::{page_slug, StorageManager};
use wiki_tracklist::utils::{self, html_debug, AppError};
use wiki_tracklist::wiki::client;

/// Extracts a section's data table (e.g. a soundtrack track listing) from a Wikipedia page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file"])))]
struct Args {
    /// Wikipedia article URL to fetch
    #[arg(short, long)]
    url: Option<String>,

    /// Previously saved page HTML to read instead of fetching
    #[arg(short, long)]
    file: Option<String>,

    /// Candidate section ids (repeatable)
    #[arg(short, long = "section", default_values_t = ["Soundtrack".to_string(), "Music".to_string(), "Track_listing".to_string()])]
    sections: Vec<String>,

    /// Try candidate ids in the given order instead of taking whichever appears first in the page
    #[arg(long)]
    priority_order: bool,

    /// Use the DOM-based extractor instead of the offset-based one
    #[arg(long)]
    dom: bool,

    /// Output directory for saved pages and extracted tables
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Save the raw page, the table and the track list
    #[arg(long)]
    save: bool,

    /// Debug mode - save annotated HTML with headlines, boundaries and tables highlighted
    #[arg(short, long)]
    debug: bool,

    /// Number of data rows to print
    #[arg(long, default_value_t = 3)]
    sample: usize,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load the page
    let (source, html) = match (&args.url, &args.file) {
        (Some(url), _) => (url.clone(), client::fetch_page(url).await?),
        (None, Some(path)) => {
            tracing::info!("Reading saved page from {}", path);
            (path.clone(), std::fs::read_to_string(path)?)
        }
        (None, None) => return Err(AppError::Config("Either --url or --file is required".to_string())),
    };
    tracing::info!("Loaded page ({} bytes) from {}", html.len(), source);

    let slug = page_slug(&source);
    let storage = if args.save || args.debug {
        Some(StorageManager::new(&args.output_dir)?)
    } else {
        None
    };

    // 4. Persist the raw page and the annotated copy before extracting
    if let Some(storage) = &storage {
        if args.save && args.url.is_some() {
            storage.save_raw_html(&slug, &html)?;
        }
        if args.debug {
            let debug_path = storage.page_dir(&slug)?.join("annotated.html");
            if let Err(e) = html_debug::create_debug_html(&html, &debug_path, html_debug::DEBUG_PATTERNS) {
                tracing::warn!("Failed to create debug HTML: {}", e);
            }
        }
    }

    // 5. Extract the section table
    let order = if args.priority_order { MatchOrder::Priority } else { MatchOrder::DocumentOrder };
    let strategy = strategy_for(args.dom, order);
    tracing::info!("Extracting with '{}' strategy, candidates {:?}", strategy.name(), args.sections);

    let table = match strategy.extract_table(&html, &args.sections) {
        Ok(table) => table,
        Err(e) => {
            print!("{}", report::format_error_report(&e));
            return Err(e.into());
        }
    };
    print!("{}", report::format_table_report(&table, args.sample));

    // 6. Map to tracks
    let album = tracks::album_from_table(&html, &source, &table);
    if album.tracks.is_empty() {
        tracing::warn!("No tracks could be mapped from section '{}'", table.section_id);
    } else {
        println!();
        print!("{}", report::format_album_report(&album));
    }

    // 7. Save results
    if let (true, Some(storage)) = (args.save, &storage) {
        storage.save_table(&slug, &table)?;
        storage.save_table_metadata(&slug, &source, &table)?;
        if !album.tracks.is_empty() {
            storage.save_album(&slug, &album)?;
        }
    }

    tracing::info!("Processing finished for {}", source);
    Ok(())
}
