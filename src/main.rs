//! intbox — turn structured documents into integration-box CSV.
//!
//! Accepts three kinds of input:
//!
//! - **.txt**: parsed as-is
//! - **.docx**: paragraphs are flattened to markdown (heading styles become
//!   `#` prefixes), then parsed; the markdown is kept as `md.md`
//! - **.md**: rendered to `docx.docx` first, then handled like a `.docx`
//!
//! Records are written to `csv.csv` in the output directory.

mod model;
mod parser;
mod transcode;
mod writer;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

const CSV_FILE: &str = "csv.csv";
const DOCX_FILE: &str = "docx.docx";
const MARKDOWN_FILE: &str = "md.md";

#[derive(Parser)]
#[command(
    name = "intbox",
    about = "Convert a .txt, .md, or .docx file to integration-box CSV"
)]
struct Cli {
    /// Path to the input .txt, .md, or .docx file
    #[arg(short = 'd', long)]
    document: PathBuf,

    /// Directory receiving csv.csv (and docx.docx / md.md when applicable)
    #[arg(short = 'o', long, default_value = "output")]
    output_dir: PathBuf,
}

/// Input kinds, by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Text,
    Markdown,
    Docx,
}

impl InputKind {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(Self::Text),
            "md" => Ok(Self::Markdown),
            "docx" => Ok(Self::Docx),
            _ => bail!(
                "unsupported file type '.{}'. Only .txt, .md, and .docx are supported",
                ext
            ),
        }
    }
}

/// What a successful run produced. `outputs` lists the CSV and the
/// extracted markdown; the intermediate `.docx` is not reported.
struct Summary {
    records: usize,
    outputs: Vec<PathBuf>,
}

fn run(cli: &Cli) -> Result<Summary> {
    let input = cli.document.as_path();
    if !input.exists() {
        bail!("input file '{}' not found", input.display());
    }
    let kind = InputKind::from_path(input)?;

    println!("Processing {}...", input.display());
    fs::create_dir_all(&cli.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            cli.output_dir.display()
        )
    })?;

    let content = match kind {
        InputKind::Text => {
            println!("Parsing {}...", input.display());
            fs::read_to_string(input)
                .with_context(|| format!("failed to read {}", input.display()))?
        }
        InputKind::Markdown | InputKind::Docx => {
            let docx_path = if kind == InputKind::Markdown {
                let markdown = fs::read_to_string(input)
                    .with_context(|| format!("failed to read {}", input.display()))?;
                let docx_path = cli.output_dir.join(DOCX_FILE);
                transcode::docx::write(&transcode::render_to_document(&markdown), &docx_path)?;
                println!("Converted markdown to docx: {}", docx_path.display());
                docx_path
            } else {
                input.to_path_buf()
            };

            println!("Parsing {}...", docx_path.display());
            transcode::render_to_markdown(&transcode::docx::read(&docx_path)?)
        }
    };
    let records = parser::parse(&content);

    let csv_path = cli.output_dir.join(CSV_FILE);
    let mut outputs = vec![csv_path.clone()];

    if kind != InputKind::Text {
        let md_path = cli.output_dir.join(MARKDOWN_FILE);
        fs::write(&md_path, &content)
            .with_context(|| format!("failed to write {}", md_path.display()))?;
        println!("Extracted markdown to {}", md_path.display());
        outputs.push(md_path);
    }

    println!("Writing output to {}...", csv_path.display());
    writer::write(&records, &csv_path)?;

    Ok(Summary {
        records: records.len(),
        outputs,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let summary = run(&cli)?;
    println!(
        "Successfully converted {} record(s) to CSV.",
        summary.records
    );
    let outputs: Vec<String> = summary
        .outputs
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("Output files: {}", outputs.join(", "));
    Ok(())
}
