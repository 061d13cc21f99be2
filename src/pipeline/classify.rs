//! Failure classification: internal faults → [`ConversionError`].
//!
//! Every stage works internally with [`Fault`], a vocabulary that can carry
//! library-specific detail (base64 decode errors, parser messages, cipher
//! problems). [`classify`] is the only way a `Fault` leaves a stage: each
//! public stage function ends in `.map_err(classify)`, so callers only ever
//! observe the closed set of [`crate::error::FailureKind`]s.

use crate::error::ConversionError;
use crate::output::EncryptionScheme;
use std::any::Any;
use tracing::debug;

/// An internal fault raised by one of the pipeline stages.
#[derive(Debug)]
pub(crate) enum Fault {
    // ── Transport decoder ─────────────────────────────────────────────────
    Base64(base64::DecodeError),
    Oversized { limit: usize, estimated: usize },
    MissingSignature { magic: Vec<u8> },

    // ── Password attempt engine ───────────────────────────────────────────
    Unparseable(String),
    Unsupported(String),
    NoCandidates(EncryptionScheme),
    CandidatesExhausted { attempted: usize },

    // ── Text extraction ───────────────────────────────────────────────────
    AllPagesFailed { total: usize, first_error: String },
    TaskPanicked(String),
}

/// Map an internal fault onto exactly one public failure kind.
pub(crate) fn classify(fault: Fault) -> ConversionError {
    let err = match fault {
        Fault::Base64(e) => ConversionError::InvalidEncoding {
            detail: e.to_string(),
        },
        Fault::Oversized { limit, estimated } => ConversionError::InvalidEncoding {
            detail: format!(
                "payload decodes to about {estimated} bytes, above the {limit}-byte limit"
            ),
        },
        Fault::MissingSignature { magic } => ConversionError::NotAPdf {
            detail: format!("missing %PDF- header (first bytes: {:?})", printable(&magic)),
        },
        Fault::Unparseable(detail) => ConversionError::NotAPdf {
            detail: format!("document structure could not be parsed: {detail}"),
        },
        Fault::Unsupported(detail) => ConversionError::UnsupportedEncryption { detail },
        Fault::NoCandidates(scheme) => ConversionError::PasswordRequired {
            scheme: scheme.to_string(),
        },
        Fault::CandidatesExhausted { attempted } => {
            ConversionError::AllPasswordsFailed { attempted }
        }
        Fault::AllPagesFailed { total, first_error } => {
            ConversionError::ExtractionFailed { total, first_error }
        }
        Fault::TaskPanicked(detail) => ConversionError::ExtractionFailed {
            total: 0,
            first_error: format!("conversion task panicked: {detail}"),
        },
    };
    debug!("Classified failure as {}: {}", err.kind(), err);
    err
}

/// The message carried by a caught panic, if it has one.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Render leading bytes for diagnostics without dumping binary noise.
fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
