//! pdfmark CLI - layout-ordered PDF text extraction with position markers

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmark::{JsonFormat, PdfExtractor};

#[derive(Parser)]
#[command(name = "pdfmark")]
#[command(version)]
#[command(about = "Extract PDF text with inline !!page,y!! markers", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract marker-annotated text
    #[command(alias = "txt")]
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the page/block model as JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_text(&input, cli.output.as_deref())
            } else {
                println!("{}", "Usage: pdfmark <FILE> [-o OUTPUT]".yellow());
                println!("       pdfmark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        if matches!(e, pdfmark::Error::UnknownFormat) {
            eprintln!(
                "{}: Unsupported file type. Only PDF files are supported.",
                "Error".red().bold()
            );
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        std::process::exit(1);
    }
}

fn cmd_text(input: &Path, output: Option<&Path>) -> pdfmark::Result<()> {
    let spinner = parse_spinner(input);
    let extractor = PdfExtractor::open(input)?;
    let text = extractor.marked_text()?;
    spinner.finish_and_clear();

    log::debug!("extracted {} bytes of marked text", text.len());
    write_output(&text, output)?;

    if output.is_some() {
        let pages = extractor.page_count();
        eprintln!(
            "{} {} page{} extracted",
            "Done:".green().bold(),
            pages,
            if pages == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> pdfmark::Result<()> {
    let spinner = parse_spinner(input);
    let extractor = PdfExtractor::open(input)?;
    let pages = extractor.pages()?;
    spinner.finish_and_clear();

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = pdfmark::render::to_json(&pages, format)?;

    write_output(&json, output)
}

fn cmd_info(input: &Path) -> pdfmark::Result<()> {
    let extractor = PdfExtractor::open(input)?;
    let info = extractor.info();

    println!("{}", "Document information".bold());
    print_field("Version", Some(format!("PDF {}", info.version)));
    print_field("Pages", Some(info.page_count.to_string()));
    print_field("Title", info.title);
    print_field("Author", info.author);
    print_field("Subject", info.subject);
    print_field("Keywords", info.keywords);
    print_field("Creator", info.creator);
    print_field("Producer", info.producer);
    print_field("Created", info.created.map(|d| d.to_rfc3339()));
    print_field("Modified", info.modified.map(|d| d.to_rfc3339()));
    print_field(
        "Encrypted",
        Some(if info.encrypted { "yes" } else { "no" }.to_string()),
    );

    Ok(())
}

fn cmd_version() {
    println!("pdfmark {}", env!("CARGO_PKG_VERSION"));
}

fn print_field(label: &str, value: Option<String>) {
    if let Some(value) = value {
        let label = format!("{}:", label);
        println!("  {:<10} {}", label.as_str().cyan(), value);
    }
}

fn parse_spinner(input: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Parsing {}", input.display()));
    spinner
}

fn write_output(content: &str, output: Option<&Path>) -> pdfmark::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
