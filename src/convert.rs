//! Conversion entry points.
//!
//! The pipeline itself is synchronous and CPU-bound. [`convert_sync`] runs it
//! on the calling thread; the async entry points move it onto tokio's
//! blocking pool with `spawn_blocking` so a large document never stalls the
//! executor. Every invocation owns its buffers and document handle, so any
//! number of conversions can run concurrently without coordination.

use crate::config::ConversionConfig;
use crate::error::{ConversionError, Pdf2TextError};
use crate::output::{ConversionOutcome, ConversionStats, DocumentInfo, ExtractionResult};
use crate::pipeline::classify::{classify, panic_message, Fault};
use crate::pipeline::decode::{self, RawDocument};
use crate::pipeline::{self, input, unlock};
use crate::request::ConversionRequest;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub use crate::pipeline::unlock::unlock_document;

/// Convert a base64-encoded PDF to text.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ExtractionResult)` on success, even if some pages were skipped
/// (check `result.stats.failed_pages`).
///
/// # Errors
/// One of the six [`crate::FailureKind`]s; see [`ConversionError`].
pub async fn convert(request: ConversionRequest, config: &ConversionConfig) -> ConversionOutcome {
    let config = config.clone();
    run_blocking(move || pipeline::run(&request, &config)).await
}

/// Blocking variant of [`convert`]. Needs no runtime.
///
/// A panic inside the pipeline is caught and reported as `ExtractionFailed`,
/// as it is for [`convert`].
pub fn convert_sync(request: &ConversionRequest, config: &ConversionConfig) -> ConversionOutcome {
    let started = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(|| pipeline::run(request, config)))
        .unwrap_or_else(|payload| {
            Err(classify(Fault::TaskPanicked(panic_message(payload.as_ref()))))
        });
    debug!("Conversion finished in {}ms", started.elapsed().as_millis());
    outcome
}

/// Convert raw PDF bytes that arrived without transport encoding.
///
/// # Errors
/// As [`convert`], minus `InvalidEncoding`.
pub async fn convert_bytes(
    bytes: Vec<u8>,
    passwords: Vec<String>,
    config: &ConversionConfig,
) -> ConversionOutcome {
    let raw = decode::validate_bytes(bytes)?;
    convert_raw(raw, passwords, config).await
}

/// Convert a local PDF file or HTTP/HTTPS URL to text.
///
/// # Errors
/// File and download problems as [`Pdf2TextError`] variants; pipeline
/// failures as [`Pdf2TextError::Conversion`].
pub async fn convert_file(
    input_str: impl AsRef<str>,
    passwords: &[String],
    config: &ConversionConfig,
) -> Result<ExtractionResult, Pdf2TextError> {
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);
    let raw = input::resolve_input(input_str, config.download_timeout_secs).await?;
    Ok(convert_raw(raw, passwords.to_vec(), config).await?)
}

/// Convert a PDF file or URL and write the text to `output_path`.
///
/// The file is written atomically with [`write_text`].
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    passwords: &[String],
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2TextError> {
    let output = convert_file(input_str, passwords, config).await?;
    let path = output_path.as_ref();
    write_text(path, &output.text).await?;
    info!("Wrote {} chars to {}", output.stats.total_chars, path.display());
    Ok(output.stats)
}

/// Write `text` to `path` atomically, creating parent directories.
///
/// Text goes to a sibling temp file that is then renamed over the target, so
/// readers never observe a partial file.
pub async fn write_text(path: &Path, text: &str) -> Result<(), Pdf2TextError> {
    let write_err = |e| Pdf2TextError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, text).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)
}

/// Report page count, PDF version and encryption scheme of a local file or
/// URL without extracting any text. Needs no password.
///
/// Downloads honour `config.download_timeout_secs`.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<DocumentInfo, Pdf2TextError> {
    let raw = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    Ok(run_blocking(move || unlock::inspect_document(&raw)).await?)
}

/// [`inspect`] for raw PDF bytes, such as a document piped on stdin.
pub fn inspect_bytes(bytes: Vec<u8>) -> Result<DocumentInfo, ConversionError> {
    let raw = decode::validate_bytes(bytes)?;
    unlock::inspect_document(&raw)
}

/// [`inspect`] for a base64 payload.
pub fn inspect_encoded(
    encoded: &str,
    config: &ConversionConfig,
) -> Result<DocumentInfo, ConversionError> {
    let raw = decode::decode_document(encoded, config.max_input_bytes)?;
    unlock::inspect_document(&raw)
}

async fn convert_raw(
    raw: RawDocument,
    passwords: Vec<String>,
    config: &ConversionConfig,
) -> ConversionOutcome {
    let config = config.clone();
    run_blocking(move || pipeline::run_decoded(&raw, &passwords, &config)).await
}

/// Run CPU-bound pipeline work on the blocking pool.
///
/// A panic inside the task is reported as `ExtractionFailed` rather than
/// propagated to the caller.
async fn run_blocking<T, F>(work: F) -> Result<T, ConversionError>
where
    F: FnOnce() -> Result<T, ConversionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| classify(Fault::TaskPanicked(e.to_string())))?
}
