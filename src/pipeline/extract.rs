//! Text extraction: [`DocumentHandle`] → per-page text → joined output.
//!
//! Pages are read one at a time in the document's native order. A page that
//! cannot be read is logged, recorded as a [`PageError`] on its
//! [`PageResult`], and contributes nothing to the text; the conversion only
//! fails when every selected page failed.

use crate::config::ConversionConfig;
use crate::error::{ConversionError, PageError};
use crate::output::{ConversionStats, PageResult};
use crate::pipeline::classify::{classify, panic_message, Fault};
use crate::pipeline::normalize::clean_text;
use crate::progress::ConversionProgressCallback;
use lopdf::Document;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

/// Anything pages of text can be read from.
///
/// Implemented for [`lopdf::Document`]; tests substitute their own sources.
pub trait PageSource {
    /// Number of pages, in native order.
    fn page_count(&self) -> usize;

    /// Raw text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String, String>;
}

impl PageSource for Document {
    fn page_count(&self) -> usize {
        self.get_pages().len()
    }

    fn page_text(&self, index: usize) -> Result<String, String> {
        let page_number = self
            .get_pages()
            .keys()
            .nth(index)
            .copied()
            .ok_or_else(|| format!("page index {index} out of range"))?;
        self.extract_text(&[page_number]).map_err(|e| e.to_string())
    }
}

/// Text recovered from the selected pages.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub pages: Vec<PageResult>,
    pub stats: ConversionStats,
}

/// Read every selected page of `source` and join the texts.
///
/// # Errors
/// `ExtractionFailed` when at least one page was selected and all of them
/// failed. A document with no pages, or with only blank pages, succeeds with
/// empty text.
pub fn extract_pages<S: PageSource + ?Sized>(
    source: &S,
    config: &ConversionConfig,
) -> Result<ExtractedText, ConversionError> {
    extract(source, config).map_err(classify)
}

fn extract<S: PageSource + ?Sized>(
    source: &S,
    config: &ConversionConfig,
) -> Result<ExtractedText, Fault> {
    let started = Instant::now();
    let total_pages = source.page_count();
    let indices = config.pages.to_indices(total_pages);
    let selected = indices.len();
    let progress = config.progress_callback.as_deref();

    debug!("state: Extracting ({} of {} pages)", selected, total_pages);
    if let Some(cb) = progress {
        cb.on_conversion_start(selected);
    }

    let pages: Vec<PageResult> = indices
        .iter()
        .map(|&idx| read_page(source, idx, selected, config, progress))
        .collect();

    let failed_pages = pages.iter().filter(|p| p.error.is_some()).count();
    let extracted_pages = selected - failed_pages;
    if let Some(cb) = progress {
        cb.on_conversion_complete(selected, extracted_pages);
    }

    if selected > 0 && failed_pages == selected {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(Fault::AllPagesFailed {
            total: selected,
            first_error,
        });
    }

    let text = join_pages(&pages, config);
    let stats = ConversionStats {
        total_pages,
        extracted_pages,
        failed_pages,
        empty_pages: pages
            .iter()
            .filter(|p| p.error.is_none() && p.text.is_empty())
            .count(),
        skipped_pages: total_pages - selected,
        total_chars: text.chars().count(),
        duration_ms: started.elapsed().as_millis() as u64,
    };

    Ok(ExtractedText { text, pages, stats })
}

fn read_page<S: PageSource + ?Sized>(
    source: &S,
    idx: usize,
    selected: usize,
    config: &ConversionConfig,
    progress: Option<&dyn ConversionProgressCallback>,
) -> PageResult {
    let page_num = idx + 1;
    // Malformed fonts can trip assertions inside lopdf; that stays a page fault.
    let page = catch_unwind(AssertUnwindSafe(|| source.page_text(idx))).unwrap_or_else(
        |payload| {
            Err(format!(
                "page extraction panicked: {}",
                panic_message(payload.as_ref())
            ))
        },
    );
    match page {
        Ok(raw) => {
            let text = if config.normalize {
                clean_text(&raw)
            } else {
                raw
            };
            let chars = text.chars().count();
            debug!("Page {}: {} chars", page_num, chars);
            if let Some(cb) = progress {
                cb.on_page_complete(page_num, selected, chars);
            }
            PageResult {
                page_num,
                text,
                error: None,
            }
        }
        Err(detail) => {
            warn!("Skipping page {}: {}", page_num, detail);
            if let Some(cb) = progress {
                cb.on_page_error(page_num, selected, &detail);
            }
            PageResult {
                page_num,
                text: String::new(),
                error: Some(PageError::ExtractFailed {
                    page: page_num,
                    detail,
                }),
            }
        }
    }
}

/// Join page texts in order. Failed pages contribute nothing, not even a
/// separator; blank pages contribute an empty string.
fn join_pages(pages: &[PageResult], config: &ConversionConfig) -> String {
    let mut out = String::new();
    let mut first = true;
    for page in pages.iter().filter(|p| p.error.is_none()) {
        if !first {
            out.push_str(&config.page_separator.render(page.page_num));
        }
        out.push_str(&page.text);
        first = false;
    }
    out
}
