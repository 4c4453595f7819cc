// ABOUTME: CLI for preparing word-processor HTML exports with docpress-core.
// ABOUTME: Reads an export from a file or stdin and prints content + metadata as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use docpress_core::{prepare_document, Options};

/// Normalize a word-processor HTML export into publishable content and metadata.
#[derive(Parser, Debug)]
#[command(name = "docpress")]
#[command(about = "Prepare an exported HTML document and print JSON", long_about = None)]
struct Args {
    /// HTML export to read, or "-" to read from stdin.
    input: String,

    /// Keep inline style attributes.
    #[arg(long)]
    keep_styles: bool,

    /// Keep empty anchor and span elements.
    #[arg(long)]
    keep_empty_text: bool,

    /// Keep empty paragraphs instead of collapsing them to <br>.
    #[arg(long)]
    keep_empty_para: bool,

    /// Keep redirect-wrapped hyperlinks as exported.
    #[arg(long)]
    keep_google_links: bool,

    /// Keep image referrer behavior as exported.
    #[arg(long)]
    keep_referrer: bool,

    /// Skip metadata table extraction.
    #[arg(long)]
    ignore_meta: bool,

    /// Skip snippet derivation.
    #[arg(long)]
    ignore_snippet: bool,

    /// Maximum snippet length in characters.
    #[arg(long, default_value_t = 200)]
    snippet_length: usize,

    /// Skip title derivation.
    #[arg(long)]
    ignore_title: bool,

    /// Skip cover-image derivation.
    #[arg(long)]
    ignore_cover: bool,

    /// Leave the title heading in the content fragment.
    #[arg(long)]
    keep_title_heading: bool,

    /// Leave the cover image element in the content fragment.
    #[arg(long)]
    keep_cover_element: bool,

    /// Derive a description from the paragraph after the heading.
    #[arg(long)]
    description: bool,

    /// Fetch the cover image and inline it as base64.
    #[arg(long)]
    inline_cover: bool,

    /// Allow cover fetches to private/local networks.
    #[arg(long)]
    allow_private_networks: bool,

    /// Print only the content fragment instead of JSON.
    #[arg(long)]
    content_only: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Output file path (default: stdout).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

impl Args {
    fn to_options(&self) -> Options {
        Options {
            keep_styles: self.keep_styles,
            keep_empty_text: self.keep_empty_text,
            keep_empty_para: self.keep_empty_para,
            keep_google_links: self.keep_google_links,
            keep_referrer: self.keep_referrer,
            ignore_meta: self.ignore_meta,
            ignore_snippet: self.ignore_snippet,
            snippet_length: self.snippet_length,
            ignore_title: self.ignore_title,
            ignore_cover: self.ignore_cover,
            keep_title_heading: self.keep_title_heading,
            keep_cover_element: self.keep_cover_element,
            extract_description: self.description,
            inline_cover: self.inline_cover,
            allow_private_networks: self.allow_private_networks,
            ..Options::default()
        }
    }
}

fn load_html(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let html = load_html(&args.input)?;
    let prepared = prepare_document(&html, &args.to_options()).await?;

    let output = if args.content_only {
        prepared.content.clone()
    } else if args.compact {
        serde_json::to_string(&prepared)?
    } else {
        serde_json::to_string_pretty(&prepared)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("failed to write {:?}", path))?
        }
        None => println!("{}", output),
    }

    Ok(())
}
