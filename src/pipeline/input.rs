//! Input resolution: read a user-supplied path or URL into memory.
//!
//! The pipeline works on byte buffers, so a local file is read whole and a
//! URL is downloaded into memory. Either way the bytes go through the same
//! signature check as a decoded base64 payload before anything parses them.

use crate::error::Pdf2TextError;
use crate::pipeline::decode::{validate_bytes, RawDocument};
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to validated document bytes.
///
/// # Errors
/// * `FileNotFound` / `PermissionDenied` for unreadable local paths
/// * `DownloadFailed` / `DownloadTimeout` for URLs
/// * `Conversion(NotAPdf)` when the bytes carry no `%PDF-` signature
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<RawDocument, Pdf2TextError> {
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    Ok(validate_bytes(bytes)?)
}

async fn read_local(path_str: &str) -> Result<Vec<u8>, Pdf2TextError> {
    let path = PathBuf::from(path_str);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Pdf2TextError::PermissionDenied { path })
        }
        Err(_) => Err(Pdf2TextError::FileNotFound { path }),
    }
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, Pdf2TextError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2TextError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            Pdf2TextError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2TextError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(map_err)?;
    if !response.status().is_success() {
        return Err(Pdf2TextError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(map_err)?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
