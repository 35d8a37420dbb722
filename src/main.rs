//! epub-outline - inspect the structure of an EPUB

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epub_outline::{Document, EpubParser, TocNode, TracingObserver, ZipExtractor};

#[derive(Parser)]
#[command(name = "epub-outline")]
#[command(version, about = "Show the metadata, spine and table of contents of an EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    epub-outline book.epub                 Show a summary
    epub-outline --toc book.epub           Also print the table of contents
    epub-outline --json extracted/         Dump an extracted book as JSON")]
struct Cli {
    /// EPUB archive or extracted EPUB directory
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Print the whole document as JSON
    #[arg(long)]
    json: bool,

    /// Print the table of contents tree
    #[arg(long)]
    toc: bool,

    /// Directory archives are extracted into
    #[arg(long, value_name = "DIR")]
    extract_to: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "epub_outline=debug"
    } else {
        "epub_outline=warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let extractor = cli
        .extract_to
        .clone()
        .map(ZipExtractor::new)
        .unwrap_or_default();
    let parser = EpubParser::new()
        .with_archive_service(extractor)
        .with_observer(TracingObserver);

    let document = parser.parse(&cli.input).map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&document).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    show_info(&cli.input, &document);
    if cli.toc {
        println!();
        print_toc(document.table_of_contents(), 0);
    }
    Ok(())
}

fn show_info(path: &std::path::Path, document: &Document) {
    let meta = document.metadata();
    println!("File: {}", path.display());
    println!("Content: {}", document.content_directory().display());
    println!("Title: {}", meta.title.as_deref().unwrap_or("(untitled)"));
    let authors: Vec<_> = meta.authors().collect();
    if !authors.is_empty() {
        println!("Authors: {}", authors.join(", "));
    }
    if let Some(ref language) = meta.language {
        println!("Language: {language}");
    }
    if let Some(ref identifier) = meta.identifier {
        println!("Identifier: {identifier}");
    }
    if let Some(ref publisher) = meta.publisher {
        println!("Publisher: {publisher}");
    }
    if let Some(ref desc) = meta.description {
        let desc = desc.trim();
        match desc.char_indices().nth(200) {
            Some((cut, _)) => println!("Description: {}...", &desc[..cut]),
            None => println!("Description: {desc}"),
        }
    }
    if let Some(cover) = document.cover() {
        println!("Cover: {}", cover.path);
    }
    println!("Manifest items: {}", document.manifest().len());
    println!("Spine items: {}", document.spine().len());
    println!("TOC entries: {}", document.table_of_contents().node_count() - 1);
}

fn print_toc(node: &TocNode, depth: usize) {
    if depth > 0 {
        println!("{}{} -> {}", "  ".repeat(depth - 1), node.label, node.path);
    } else if !node.label.is_empty() {
        println!("{}", node.label);
    }
    for child in &node.children {
        print_toc(child, depth + 1);
    }
}
