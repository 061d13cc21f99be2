//! # edgequake-pdf2text
//!
//! Extract plain text from PDF documents, including password-protected ones.
//!
//! A request carries the document as base64 text plus an ordered list of
//! candidate passwords. The pipeline decodes the payload, opens the document
//! (trying the candidates one by one if it is encrypted), reads the text of
//! every page in order and joins it. Failures are reported as one of six
//! stable [`FailureKind`]s; no parser or cipher error ever leaks through.
//!
//! ## Pipeline Overview
//!
//! ```text
//! base64
//!  │
//!  ├─ 1. Decode   base64 → bytes, check the %PDF- signature
//!  ├─ 2. Unlock   parse, detect encryption, try candidates in order
//!  ├─ 3. Extract  per-page text in native order (spawn_blocking)
//!  ├─ 4. Clean    deterministic whitespace rules
//!  └─ 5. Output   joined text + per-page results and stats
//! ```
//!
//! Encryption support covers the PDF standard security handler: RC4 40–128
//! bit, AES-128 and AES-256 (revisions 2 to 6). A candidate is accepted as
//! either the user or the owner password.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2text::{convert, ConversionConfig, ConversionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = ConversionRequest::new("JVBERi0xLjcK...")
//!         .passwords(["wrong", "secret"]);
//!     let config = ConversionConfig::default();
//!     match convert(request, &config).await {
//!         Ok(result) => println!("{}", result.text),
//!         Err(e) => eprintln!("{}: {}", e.kind(), e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-pdf2text = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageSelection, PageSeparator};
pub use convert::{
    convert, convert_bytes, convert_file, convert_sync, convert_to_file, inspect,
    inspect_bytes, inspect_encoded, unlock_document, write_text,
};
pub use error::{ConversionError, FailureKind, PageError, Pdf2TextError};
pub use output::{
    ConversionOutcome, ConversionStats, DocumentInfo, EncryptionScheme, ExtractionResult,
    PageResult, PasswordRole, TextResponse,
};
pub use pipeline::decode::{decode_document, RawDocument};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use request::ConversionRequest;
