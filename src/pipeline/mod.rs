//! Pipeline stages for PDF-to-text extraction.
//!
//! Each submodule implements exactly one transformation step. Stages talk to
//! each other in owned values and keep their faults internal; only
//! classified [`crate::ConversionError`]s leave a stage.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ unlock ──▶ extract ──▶ normalize
//! (base64)   (passwords) (per page)  (cleanup)
//! ```
//!
//! 1. [`decode`]   : base64 payload → bytes, `%PDF-` signature check
//! 2. [`unlock`]   : parse, detect encryption, try candidates in order
//!    (`security` and `cipher` implement the standard security handler)
//! 3. [`extract`]  : per-page text in native order, faulty pages skipped
//! 4. [`normalize`]: deterministic whitespace and invisible-character rules
//!
//! [`input`] sits in front of the pipeline for file and URL inputs.
//!
//! A run moves through `Received → Decoded → (Unencrypted | Decrypting) →
//! Opened → Extracting → Done`; each transition is logged at DEBUG.

pub(crate) mod cipher;
pub(crate) mod classify;
pub mod decode;
pub mod extract;
pub mod input;
pub mod normalize;
pub(crate) mod security;
pub mod unlock;

use crate::config::ConversionConfig;
use crate::output::{ConversionOutcome, ExtractionResult};
use crate::request::ConversionRequest;
use decode::RawDocument;
use tracing::debug;

/// Run one request through every stage.
pub fn run(request: &ConversionRequest, config: &ConversionConfig) -> ConversionOutcome {
    debug!("state: Received");
    let raw = decode::decode_document(&request.document, config.max_input_bytes)
        .inspect_err(|e| debug!("state: Failed({})", e.kind()))?;
    debug!("state: Decoded ({} bytes, PDF {})", raw.len(), raw.version());
    run_decoded(&raw, &request.passwords, config)
}

/// Run the stages after transport decoding.
pub fn run_decoded(
    raw: &RawDocument,
    passwords: &[String],
    config: &ConversionConfig,
) -> ConversionOutcome {
    let outcome = open_and_extract(raw, passwords, config);
    match &outcome {
        Ok(result) => debug!(
            "state: Done ({} pages, {} chars)",
            result.pages.len(),
            result.stats.total_chars
        ),
        Err(e) => debug!("state: Failed({})", e.kind()),
    }
    outcome
}

fn open_and_extract(
    raw: &RawDocument,
    passwords: &[String],
    config: &ConversionConfig,
) -> ConversionOutcome {
    let handle = unlock::open_document(raw, passwords, config.progress_callback.as_deref())?;
    debug!(
        "state: Opened ({}, {} pages)",
        handle.scheme(),
        handle.page_count()
    );

    let extracted = extract::extract_pages(handle.document(), config)?;
    Ok(ExtractionResult {
        text: extracted.text,
        pages: extracted.pages,
        document: handle.info(),
        stats: extracted.stats,
    })
}
