//! CLI binary for edgequake-pdf2text.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2text::{
    convert, convert_bytes, convert_file, inspect, inspect_bytes, inspect_encoded, write_text,
    ConversionConfig, ConversionError, ConversionProgressCallback, ConversionRequest,
    EncryptionScheme, ExtractionResult, PageSelection, PageSeparator, Pdf2TextError,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while passwords are tried, then a
/// page bar with one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Opening");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_password_attempt(&self, index: usize, total: usize) {
        self.bar.set_prefix("Unlocking");
        self.bar
            .set_message(format!("trying password {}/{}", index + 1, total));
    }

    fn on_unlocked(&self, scheme: EncryptionScheme, candidate: Option<usize>) {
        if !scheme.is_encrypted() {
            return;
        }
        let how = match candidate {
            Some(i) => format!("with password #{}", i + 1),
            None => "without a password".to_string(),
        };
        self.bar
            .println(format!("{} Unlocked {} document {}", cyan("◆"), scheme, how));
    }

    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_complete(&self, page_num: usize, total: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(std::iter::once('…')).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages extracted",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages extracted  ({} skipped)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Plain document (stdout)
  pdf2text document.pdf

  # Encrypted document, candidates tried in order
  pdf2text -p wrong -p secret statement.pdf -o statement.txt

  # Candidates from a file, one per line
  pdf2text --password-file passwords.txt statement.pdf

  # Base64 payload (e.g. from an API request), read from stdin
  base64 document.pdf | pdf2text --base64 -

  # Specific pages, form feed between pages
  pdf2text --pages 1-5 --separator formfeed report.pdf

  # Inspect page count and encryption (no password needed)
  pdf2text --inspect-only document.pdf

  # JSON output with per-page results
  pdf2text --json document.pdf > output.json

EXIT STATUS:
  0  text extracted
  1  conversion failed; with --json the error is printed as
     { "error": { "kind": "...", "message": "..." } }
"#;

/// Extract plain text from PDF files, unlocking encrypted ones.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Extract plain text from PDF files, unlocking encrypted ones",
    long_about = "Extract the text of every page of a PDF document (local file, URL, or base64 \
payload). Encrypted documents are unlocked by trying the supplied passwords in order, as user \
or owner password. RC4 and AES (128/256-bit) standard security handlers are supported.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path, HTTP/HTTPS URL, or `-` for stdin.
    input: String,

    /// Write text to this file instead of stdout.
    #[arg(short, long, env = "PDF2TEXT_OUTPUT")]
    output: Option<PathBuf>,

    /// Candidate password; repeat to try several, in order.
    #[arg(short = 'p', long = "password")]
    passwords: Vec<String>,

    /// File with one candidate password per line, tried after `--password`.
    #[arg(long, env = "PDF2TEXT_PASSWORD_FILE")]
    password_file: Option<PathBuf>,

    /// Input is base64 text rather than raw PDF bytes.
    #[arg(long)]
    base64: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TEXT_PAGES", default_value = "all")]
    pages: String,

    /// Page separator: newline, formfeed, marker, or a custom string.
    #[arg(long, env = "PDF2TEXT_SEPARATOR", default_value = "newline")]
    separator: String,

    /// Keep extracted text verbatim (skip whitespace normalisation).
    #[arg(long, env = "PDF2TEXT_RAW")]
    raw: bool,

    /// Output structured JSON (ExtractionResult) instead of plain text.
    #[arg(long, env = "PDF2TEXT_JSON")]
    json: bool,

    /// Print page count, version and encryption only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Largest accepted document in bytes.
    #[arg(long, env = "PDF2TEXT_MAX_INPUT_BYTES")]
    max_input_bytes: Option<usize>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2TEXT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TEXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces WARN-level page logs when it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = if cli.base64 {
            let encoded = read_input_text(&cli.input).await?;
            inspect_encoded(&encoded, &config).map_err(Pdf2TextError::from)
        } else if cli.input == "-" {
            read_stdin_bytes()
                .and_then(|bytes| inspect_bytes(bytes).map_err(Pdf2TextError::from))
        } else {
            inspect(&cli.input, &config).await
        };
        let info = match info {
            Ok(info) => info,
            Err(e) => return fail(&cli, e),
        };

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise metadata")?
            );
        } else {
            println!("Input:        {}", cli.input);
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
            println!("Encryption:   {}", info.encryption);
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let passwords = collect_passwords(&cli).await?;
    let outcome = run(&cli, passwords, &config).await;
    let output = match outcome {
        Ok(output) => output,
        Err(e) => return fail(&cli, e),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if let Some(ref path) = cli.output {
        write_text(path, &output.text)
            .await
            .context("Failed to write output")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} chars  {}ms  →  {}",
                green("✔"),
                output.stats.total_chars,
                output.stats.duration_ms,
                bold(&path.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        if !output.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !show_progress && !cli.json && output.stats.failed_pages > 0 {
        eprintln!("  {} pages skipped", output.stats.failed_pages);
    }

    Ok(())
}

async fn run(
    cli: &Cli,
    passwords: Vec<String>,
    config: &ConversionConfig,
) -> std::result::Result<ExtractionResult, Pdf2TextError> {
    if cli.base64 {
        let encoded = read_input_text(&cli.input)
            .await
            .map_err(|e| Pdf2TextError::Internal(format!("{e:#}")))?;
        let request = ConversionRequest::new(encoded).passwords(passwords);
        return Ok(convert(request, config).await?);
    }
    if cli.input == "-" {
        let bytes = read_stdin_bytes()?;
        return Ok(convert_bytes(bytes, passwords, config).await?);
    }
    convert_file(&cli.input, &passwords, config).await
}

fn read_stdin_bytes() -> std::result::Result<Vec<u8>, Pdf2TextError> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|e| Pdf2TextError::Internal(format!("Failed to read stdin: {e}")))?;
    Ok(bytes)
}

/// Report a failure and exit non-zero.
///
/// With `--json` the error goes to stdout as `{ "error": { "kind", "message" } }`
/// so scripted callers can branch on `kind`.
fn fail(cli: &Cli, err: Pdf2TextError) -> Result<()> {
    if cli.json {
        let kind = err
            .failure_kind()
            .map(|k| k.as_str().to_string())
            .unwrap_or_else(|| "io_error".to_string());
        let body = serde_json::json!({
            "error": { "kind": kind, "message": err.to_string() }
        });
        println!("{body}");
        std::process::exit(1);
    }
    let context = match &err {
        Pdf2TextError::Conversion(ConversionError::PasswordRequired { .. }) => {
            "Conversion failed (supply candidates with -p / --password-file)"
        }
        _ => "Conversion failed",
    };
    Err(anyhow::Error::new(err).context(context))
}

/// Read the whole input as text (`-` means stdin).
async fn read_input_text(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {input}"))
}

/// `--password` values first, then `--password-file` lines, in order.
async fn collect_passwords(cli: &Cli) -> Result<Vec<String>> {
    let mut passwords = cli.passwords.clone();
    if let Some(ref path) = cli.password_file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read password file {:?}", path))?;
        passwords.extend(
            text.lines()
                .map(|l| l.trim_end_matches('\r'))
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }
    Ok(passwords)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let separator = parse_separator(&cli.separator);

    let mut builder = ConversionConfig::builder()
        .pages(pages)
        .page_separator(separator)
        .normalize(!cli.raw)
        .download_timeout_secs(cli.download_timeout);

    if let Some(limit) = cli.max_input_bytes {
        builder = builder.max_input_bytes(limit);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "newline" | "nl" => PageSeparator::Newline,
        "formfeed" | "ff" => PageSeparator::FormFeed,
        "marker" => PageSeparator::Marker,
        _ => PageSeparator::Custom(s.replace("\\n", "\n")),
    }
}
