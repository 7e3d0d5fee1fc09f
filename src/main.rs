use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use lessonmd::Config;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lessonmd")]
#[command(about = "Render lesson notes written in a small Markdown subset")]
struct Cli {
    /// Input Markdown file ("-" reads stdin)
    input: PathBuf,

    /// Output file (text formats default to stdout, PDF to the input name with .pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// TOML config layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Block tree as JSON
    Json,
    Html,
    Typst,
    Pdf,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut markdown = String::new();
        io::stdin()
            .read_to_string(&mut markdown)
            .context("reading stdin")?;
        return Ok(markdown);
    }
    fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => io::stdout().write_all(bytes).context("writing stdout")?,
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };
    debug!(?config, "using config");

    let markdown = read_input(&cli.input)?;

    match cli.format {
        Format::Json => {
            let blocks = lessonmd::render_document(&markdown);
            let mut json = serde_json::to_string_pretty(&blocks)?;
            json.push('\n');
            write_output(cli.output.as_deref(), json.as_bytes())
        }
        Format::Html => {
            let html = lessonmd::markdown_to_html_with_config(&markdown, &config);
            write_output(cli.output.as_deref(), html.as_bytes())
        }
        Format::Typst => {
            let typst = lessonmd::markdown_to_typst_with_config(&markdown, &config);
            write_output(cli.output.as_deref(), typst.as_bytes())
        }
        Format::Pdf => {
            let output = match cli.output {
                Some(path) => path,
                None if cli.input == Path::new("-") => {
                    bail!("PDF output from stdin needs --output")
                }
                None => cli.input.with_extension("pdf"),
            };
            let pdf_bytes = lessonmd::markdown_to_pdf_with_config(&markdown, &config)?;
            write_output(Some(&output), &pdf_bytes)?;
            println!("Created {}", output.display());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
