//! Receipt Merge CLI tool
//!
//! A command-line tool for merging image and PDF receipts into one PDF.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use receipt_merge::layout::{GridLayout, PageDimensions};
use receipt_merge::output::{resolve_output_name, write_output};
use receipt_merge::pdf::{assemble_with, extract_metadata, AssembleOptions};
use receipt_merge::source::expand_patterns;
use receipt_merge::{Collection, SourceFile};

/// Receipt Merge - combine image and PDF receipts into a single PDF
#[derive(Parser)]
#[command(name = "receipt-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge photos and PDFs in the order given
    receipt-merge merge taxi.jpg hotel.pdf lunch.png

    # Merge every JPEG, then a PDF, into a named file
    receipt-merge merge -o trip.pdf \"*.jpg\" invoice.pdf

    # Move the third input to the front before merging
    receipt-merge merge --move 3:1 a.jpg b.jpg c.pdf

    # Letter-sized grid pages, open the result
    receipt-merge merge --page-size letter --open *.jpg")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge images and PDFs into one PDF
    Merge {
        /// Input files (in order). Supports glob patterns like "*.jpg"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path (defaults to a date-stamped name; ".pdf" is added if missing)
        #[arg(short, long)]
        output: Option<String>,

        /// Page size for image grid pages
        #[arg(long, value_enum, default_value_t = PageSize::A4)]
        page_size: PageSize,

        /// Move an input before merging, as FROM:TO with 1-based positions.
        /// May be repeated; moves apply in order
        #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    fn dimensions(self) -> PageDimensions {
        match self {
            PageSize::A4 => PageDimensions::a4(),
            PageSize::Letter => PageDimensions::letter(),
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "receipt_merge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Merge { inputs, output, page_size, moves, open } => {
            cmd_merge(inputs, output, page_size, moves, open)
        }
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Parse a "FROM:TO" move into zero-based indices
fn parse_move(value: &str) -> Result<(usize, usize), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got {}", value))?;
    let parse = |s: &str| -> Result<usize, String> {
        match s.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("positions start at 1, got {}", s)),
        }
    };
    Ok((parse(from)?, parse(to)?))
}

/// Open a file with the system default application
fn open_file(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Merge images and PDFs into one
fn cmd_merge(
    inputs: Vec<String>,
    output: Option<String>,
    page_size: PageSize,
    moves: Vec<(usize, usize)>,
    open: bool,
) -> anyhow::Result<()> {
    let paths = expand_patterns(&inputs)?;

    let files = paths
        .iter()
        .map(|path| SourceFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut collection = Collection::new();
    collection.add(files).context("Failed to stage input files")?;

    for (from, to) in moves {
        collection
            .move_item(from, to)
            .with_context(|| format!("Cannot apply move {}:{}", from + 1, to + 1))?;
    }

    if collection.is_empty() {
        bail!("No input files");
    }

    eprintln!("Merging {} files...", collection.len());

    let options = AssembleOptions {
        layout: GridLayout::with_page(page_size.dimensions()),
    };
    let assembly = assemble_with(collection.items(), &options).context("Failed to generate PDF")?;

    for skipped in &assembly.skipped {
        eprintln!("Skipped {}: {}", skipped.name, skipped.error);
    }

    let name = resolve_output_name(output.as_deref(), Local::now().date_naive());
    let path = write_output(Path::new(&name), &assembly.bytes)
        .with_context(|| format!("Failed to write {}", name))?;

    eprintln!("Wrote {} pages to: {}", assembly.page_count, path.display());

    if open {
        open_file(&path)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let metadata = extract_metadata(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if let Some(producer) = metadata.producer {
        println!("Producer: {}", producer);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3:1"), Ok((2, 0)));
        assert_eq!(parse_move(" 1 : 2 "), Ok((0, 1)));
        assert!(parse_move("0:1").is_err());
        assert!(parse_move("2").is_err());
        assert!(parse_move("a:b").is_err());
    }

    #[test]
    fn test_cli_parses_merge() {
        let cli = Cli::try_parse_from([
            "receipt-merge", "merge", "--page-size", "letter", "--move", "2:1", "-o", "out", "a.jpg", "b.pdf",
        ])
        .unwrap();

        match cli.command {
            Commands::Merge { inputs, output, page_size, moves, open } => {
                assert_eq!(inputs, vec!["a.jpg", "b.pdf"]);
                assert_eq!(output.as_deref(), Some("out"));
                assert!(matches!(page_size, PageSize::Letter));
                assert_eq!(moves, vec![(1, 0)]);
                assert!(!open);
            }
            Commands::Info { .. } => panic!("expected merge"),
        }
    }
}
