//! Result types returned by a successful conversion.

use crate::error::{ConversionError, PageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one conversion: the extracted text or a classified failure.
pub type ConversionOutcome = Result<ExtractionResult, ConversionError>;

/// Encryption scheme detected on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cipher", rename_all = "snake_case")]
pub enum EncryptionScheme {
    /// No `/Encrypt` dictionary.
    None,
    /// RC4 stream cipher (standard security handler V1, V2, or V4 with `/V2`).
    Rc4 { key_bits: u16 },
    /// AES in CBC mode (V4 `/AESV2` = 128 bits, V5 `/AESV3` = 256 bits).
    Aes { key_bits: u16 },
}

impl EncryptionScheme {
    pub fn is_encrypted(&self) -> bool {
        !matches!(self, EncryptionScheme::None)
    }
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionScheme::None => f.write_str("none"),
            EncryptionScheme::Rc4 { key_bits } => write!(f, "RC4-{key_bits}"),
            EncryptionScheme::Aes { key_bits } => write!(f, "AES-{key_bits}"),
        }
    }
}

/// Which password of the standard security handler a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRole {
    User,
    Owner,
}

/// What the pipeline learned while opening the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Number of pages in the document (before any page selection).
    pub page_count: usize,
    /// Version from the `%PDF-x.y` header.
    pub pdf_version: String,
    /// Detected encryption scheme.
    pub encryption: EncryptionScheme,
    /// 0-based index of the candidate that opened the document, if one was needed.
    pub unlocked_with: Option<usize>,
    /// Role the winning candidate matched.
    pub password_role: Option<PasswordRole>,
    /// Number of candidates actually tried (never more than `unlocked_with + 1`).
    pub attempts: usize,
}

/// The result for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Extracted text; empty for blank or image-only pages and for failed pages.
    pub text: String,
    /// Set when the page was skipped because of an internal fault.
    pub error: Option<PageError>,
}

/// Aggregate counters for a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_pages: usize,
    pub extracted_pages: usize,
    pub failed_pages: usize,
    /// Pages that were read successfully but carried no text.
    pub empty_pages: usize,
    /// Pages excluded by the page selection.
    pub skipped_pages: usize,
    pub total_chars: usize,
    pub duration_ms: u64,
}

/// Successful conversion output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Page texts in native order, joined by the configured separator.
    pub text: String,
    /// Per-page results in native order.
    pub pages: Vec<PageResult>,
    pub document: DocumentInfo,
    pub stats: ConversionStats,
}

/// The `{ "text": ... }` body handed back to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

impl From<ExtractionResult> for TextResponse {
    fn from(result: ExtractionResult) -> Self {
        Self { text: result.text }
    }
}
