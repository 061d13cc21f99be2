//! Error types for the edgequake-pdf2text library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ConversionError`] is **terminal**: the extraction pipeline could not
//!   produce text. The variants form a closed set; every internal fault is
//!   mapped onto one of them by the pipeline's classifier before it leaves
//!   the pipeline, so callers can `match` on [`ConversionError::kind`] without
//!   ever seeing a parser- or cipher-specific error value.
//!
//! * [`PageError`] is **non-fatal**: a single page could not be read but the
//!   rest of the document is fine. Stored inside
//!   [`crate::output::PageResult`]; only escalates to
//!   [`ConversionError::ExtractionFailed`] when every page fails.
//!
//! * [`Pdf2TextError`] covers the outer layer (local files, URLs, output
//!   files, configuration) that sits around the pipeline. It wraps
//!   [`ConversionError`] so file-based entry points return a single type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stable, enumerable classification of a failed conversion.
///
/// Variants are listed in the order the pipeline can detect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The transport payload is not valid base64.
    InvalidEncoding,
    /// The decoded bytes are not a readable PDF.
    NotAPdf,
    /// The document is encrypted and no candidate password was supplied.
    PasswordRequired,
    /// The document is encrypted and every supplied candidate failed.
    AllPasswordsFailed,
    /// The document uses a security handler or cipher that cannot be read.
    UnsupportedEncryption,
    /// The document opened but no page yielded text because of internal faults.
    ExtractionFailed,
}

impl FailureKind {
    /// Machine-readable code, stable across releases.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidEncoding => "invalid_encoding",
            FailureKind::NotAPdf => "not_a_pdf",
            FailureKind::PasswordRequired => "password_required",
            FailureKind::AllPasswordsFailed => "all_passwords_failed",
            FailureKind::UnsupportedEncryption => "unsupported_encryption",
            FailureKind::ExtractionFailed => "extraction_failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionError {
    /// Input is not valid base64 (or exceeds the configured size limit).
    #[error("Document payload is not valid base64: {detail}")]
    InvalidEncoding { detail: String },

    /// Decoded bytes lack a PDF signature or cannot be parsed as a PDF.
    #[error("Input is not a readable PDF document: {detail}")]
    NotAPdf { detail: String },

    /// Encrypted document, empty candidate list.
    #[error("PDF is encrypted ({scheme}) and requires a password")]
    PasswordRequired { scheme: String },

    /// Encrypted document, every candidate rejected.
    #[error("PDF password verification failed: none of the {attempted} supplied passwords is correct")]
    AllPasswordsFailed { attempted: usize },

    /// Security handler, version or cipher the engine cannot interpret.
    #[error("PDF encryption is not supported: {detail}")]
    UnsupportedEncryption { detail: String },

    /// Every page failed with an internal fault.
    #[error("Text extraction failed on all {total} pages. First error: {first_error}")]
    ExtractionFailed { total: usize, first_error: String },
}

impl ConversionError {
    /// The closed-set classification of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ConversionError::InvalidEncoding { .. } => FailureKind::InvalidEncoding,
            ConversionError::NotAPdf { .. } => FailureKind::NotAPdf,
            ConversionError::PasswordRequired { .. } => FailureKind::PasswordRequired,
            ConversionError::AllPasswordsFailed { .. } => FailureKind::AllPasswordsFailed,
            ConversionError::UnsupportedEncryption { .. } => FailureKind::UnsupportedEncryption,
            ConversionError::ExtractionFailed { .. } => FailureKind::ExtractionFailed,
        }
    }

    /// Free-text diagnostic detail (never contains a password).
    pub fn detail(&self) -> String {
        match self {
            ConversionError::InvalidEncoding { detail }
            | ConversionError::NotAPdf { detail }
            | ConversionError::UnsupportedEncryption { detail } => detail.clone(),
            ConversionError::PasswordRequired { scheme } => format!("encryption: {scheme}"),
            ConversionError::AllPasswordsFailed { attempted } => {
                format!("{attempted} candidates attempted")
            }
            ConversionError::ExtractionFailed { first_error, .. } => first_error.clone(),
        }
    }
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::PageResult`] when a page fails; the page then
/// contributes no text and the conversion continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PageError {
    /// The page's content stream could not be interpreted.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractFailed { page: usize, detail: String },
}

/// Errors of the file/URL/CLI layer around the pipeline.
#[derive(Debug, Error)]
pub enum Pdf2TextError {
    // ── Pipeline ──────────────────────────────────────────────────────────
    /// The pipeline itself produced a classified failure.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2TextError {
    /// The pipeline classification, when this error came from the pipeline.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Pdf2TextError::Conversion(e) => Some(e.kind()),
            _ => None,
        }
    }
}
