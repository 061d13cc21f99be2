//! Transport decoding: base64 text → [`RawDocument`].
//!
//! The request layer carries the PDF as printable text. This stage undoes
//! that encoding and performs one cheap structural check, the `%PDF-`
//! signature, so that arbitrary binaries never reach the parser.

use crate::pipeline::classify::{classify, Fault};
use crate::error::ConversionError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Header signature every PDF file starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Readers accept up to this many bytes of junk before the signature.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Decoded document bytes, already known to carry a PDF signature.
///
/// Owned by a single conversion and never written anywhere.
pub struct RawDocument {
    bytes: Vec<u8>,
    header_offset: usize,
}

impl RawDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of `%PDF-` from the start of the buffer (usually 0).
    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    /// Version declared in the header, e.g. `"1.7"`; empty if unreadable.
    pub fn version(&self) -> String {
        let start = self.header_offset + PDF_SIGNATURE.len();
        self.bytes[start.min(self.bytes.len())..]
            .iter()
            .take(4)
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .map(|&b| b as char)
            .collect()
    }
}

impl std::fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawDocument")
            .field("len", &self.bytes.len())
            .field("header_offset", &self.header_offset)
            .finish()
    }
}

/// Decode a base64 payload and validate the PDF signature.
///
/// ASCII whitespace is ignored and a `data:…;base64,` prefix is stripped.
/// Padding must be canonical.
///
/// # Errors
/// * `InvalidEncoding`: not base64, or larger than `max_input_bytes`
/// * `NotAPdf`: decoded bytes carry no `%PDF-` signature
pub fn decode_document(
    encoded: &str,
    max_input_bytes: usize,
) -> Result<RawDocument, ConversionError> {
    decode_base64(encoded, max_input_bytes)
        .and_then(check_signature)
        .map_err(classify)
}

/// Validate bytes that arrived without transport encoding (files, URLs).
pub fn validate_bytes(bytes: Vec<u8>) -> Result<RawDocument, ConversionError> {
    check_signature(bytes).map_err(classify)
}

fn decode_base64(encoded: &str, max_input_bytes: usize) -> Result<Vec<u8>, Fault> {
    let payload = strip_data_uri(encoded.trim());
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let estimated = compact.len() / 4 * 3;
    if estimated > max_input_bytes {
        return Err(Fault::Oversized {
            limit: max_input_bytes,
            estimated,
        });
    }

    let bytes = STANDARD.decode(&compact).map_err(Fault::Base64)?;
    debug!(
        "Decoded {} base64 chars → {} bytes",
        compact.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn strip_data_uri(s: &str) -> &str {
    if s.starts_with("data:") {
        if let Some(idx) = s.find(";base64,") {
            return &s[idx + ";base64,".len()..];
        }
    }
    s
}

fn check_signature(bytes: Vec<u8>) -> Result<RawDocument, Fault> {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW + PDF_SIGNATURE.len())];
    match window
        .windows(PDF_SIGNATURE.len())
        .position(|w| w == PDF_SIGNATURE)
    {
        Some(header_offset) => {
            if header_offset > 0 {
                debug!("PDF signature found at offset {}", header_offset);
            }
            Ok(RawDocument {
                bytes,
                header_offset,
            })
        }
        None => Err(Fault::MissingSignature {
            magic: bytes.iter().take(8).copied().collect(),
        }),
    }
}
