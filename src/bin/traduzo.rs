//! CLI binary for traduzo.
//!
//! A thin shim over the library crate: flags map onto the workflow and the
//! client, errors map onto their user-facing Portuguese banners.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use traduzo::{
    export, render_markdown, ApiConfig, DocumentType, Language, TranslationClient, TraduzoError,
    UploadedFile, Workflow, DEFAULT_PDF_NAME,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate an Italian birth certificate to Brazilian Portuguese
  traduzo certidao.png --from Italian --to "Portuguese BR" --type Nascimento

  # Short language codes work too
  traduzo certidao.pdf --from it --to pt-br --type nascimento -o saida.pdf

  # Print Markdown to stdout instead of writing a PDF
  traduzo certidao.jpg --from es --to pt-br --type Casamento --markdown

  # Structured JSON (translatedText + extractedData)
  traduzo certidao.png --from de --to pt-pt --type Obito --json > resultado.json

LANGUAGES:
  Code             Aliases
  ─────────────    ──────────────────────
  Portuguese BR    pt-br, portugues br
  Portuguese PT    pt-pt, portugues pt
  Spanish          es, espanhol
  Italian          it, italiano
  German           de, alemao

DOCUMENT TYPES:
  Nascimento    birth certificate     (alias: nascita)
  Obito         death certificate     (alias: óbito)
  Casamento     marriage certificate  (alias: matrimonio)

SUPPORTED FILES:
  PNG, JPEG or PDF, at most 5 MB. The declared type is checked against the
  file's magic bytes before anything is sent.

ENVIRONMENT VARIABLES:
  TRADUZO_API_URL      Base URL of the translation service
  TRADUZO_API_TIMEOUT  Request timeout in seconds (default: 60)

SETUP:
  1. Point at the service:  export TRADUZO_API_URL=http://localhost:5000/api
  2. Translate:             traduzo certidao.png --from it --to pt-br --type Nascimento
"#;

/// Translate civil-registry certificates through a translation service.
#[derive(Parser, Debug)]
#[command(
    name = "traduzo",
    version,
    about = "Translate civil-registry certificates (PNG, JPEG or PDF) and export the result",
    long_about = "Translate civil-registry certificates (birth, death, marriage) between languages \
through a translation service. The result is written as a single-page PDF by default, or printed \
as Markdown or JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Certificate to translate (PNG, JPEG or PDF, at most 5 MB).
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Language to translate from.
    #[arg(
        long,
        value_name = "LANG",
        long_help = "Language the certificate is written in.\n\
          Codes: 'Portuguese BR', 'Portuguese PT', Spanish, Italian, German \
          (or pt-br, pt-pt, es, it, de)."
    )]
    from: Language,

    /// Language to translate into. Must differ from --from.
    #[arg(long, value_name = "LANG")]
    to: Language,

    /// Certificate type: Nascimento, Obito or Casamento.
    #[arg(long = "type", value_name = "TYPE")]
    doc_type: DocumentType,

    /// Write the PDF (or Markdown) to this file.
    #[arg(short, long, env = "TRADUZO_OUTPUT", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the translation as Markdown instead of exporting a PDF.
    #[arg(long, env = "TRADUZO_MARKDOWN")]
    markdown: bool,

    /// Print the raw result as JSON (translatedText + extractedData).
    #[arg(long, env = "TRADUZO_JSON")]
    json: bool,

    /// Base URL of the translation service.
    #[arg(long, env = "TRADUZO_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "TRADUZO_API_TIMEOUT", default_value_t = 60, value_name = "SECS")]
    api_timeout: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "TRADUZO_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TRADUZO_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TRADUZO_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner is the user feedback while a request is in flight, so
    // INFO-level library logs stay off unless explicitly asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli, show_progress).await {
        match err.downcast_ref::<TraduzoError>() {
            Some(e) => {
                eprintln!("{} {}", red("✗"), bold(e.user_message()));
                eprintln!("  {}", dim(&format!("{err:#}")));
            }
            None => eprintln!("{} {err:#}", red("✗")),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    // ── Configuration ────────────────────────────────────────────────────
    let config = match cli.api_url.as_deref() {
        Some(url) => ApiConfig::builder()
            .base_url(url)
            .timeout_secs(cli.api_timeout)
            .build()?,
        // No flag and no env var: surface the setup hint.
        None => ApiConfig::from_env()?,
    };
    let client = TranslationClient::new(&config)?;

    // ── Drive the workflow ───────────────────────────────────────────────
    let mut workflow = Workflow::new();
    workflow.select_file(UploadedFile::from_path(&cli.file)?)?;
    workflow.set_source_language(cli.from)?;
    workflow.set_target_language(cli.to)?;
    workflow.set_document_type(cli.doc_type)?;
    let pending = workflow.submit()?;

    let spinner = show_progress.then(make_spinner);
    let outcome = client.translate(&pending.request).await;
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => return Err(e.into()),
    };
    workflow.complete(pending.seq, Ok(result));
    let Some(result) = workflow.translation() else {
        anyhow::bail!("workflow dropped a fresh translation result");
    };

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(result).context("Failed to serialise result")?;
        println!("{json}");
        return Ok(());
    }

    if cli.markdown {
        let markdown = render_markdown(&result.translated_text);
        match &cli.output {
            Some(path) => {
                std::fs::write(path, &markdown)
                    .with_context(|| format!("Failed to write Markdown to {}", path.display()))?;
                if !cli.quiet {
                    eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
                }
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(markdown.as_bytes())
                    .context("Failed to write to stdout")?;
            }
        }
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PDF_NAME));
    export::write_pdf(&result.translated_text, &output)?;

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), bold(&output.display().to_string()));
        eprintln!(
            "  {}",
            dim(&format!(
                "{} → {}  {} chars",
                cli.from.code(),
                cli.to.code(),
                result.translated_text.chars().count()
            ))
        );
    }
    Ok(())
}

/// Spinner shown while the request is in flight.
fn make_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Traduzindo");
    bar.set_message("Aguarde um momento...");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
