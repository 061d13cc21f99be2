//! Configuration types for PDF-to-text conversion.
//!
//! All extraction behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Passwords are deliberately *not* part
//! of the configuration: they belong to the individual request
//! ([`crate::ConversionRequest`]), so one config can be shared by concurrent
//! conversions without any of them seeing another's candidates.

use crate::error::Pdf2TextError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default ceiling on the decoded document size: 256 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024 * 1024;

/// Configuration for a PDF-to-text conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2text::{ConversionConfig, PageSeparator};
///
/// let config = ConversionConfig::builder()
///     .page_separator(PageSeparator::FormFeed)
///     .normalize(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Page selection. Default: All pages.
    ///
    /// Selected pages are always emitted in the document's native order.
    pub pages: PageSelection,

    /// Separator placed between page texts. Default: [`PageSeparator::Newline`].
    pub page_separator: PageSeparator,

    /// Apply the deterministic text clean-up rules in
    /// [`crate::pipeline::normalize`]. Default: true.
    pub normalize: bool,

    /// Largest decoded document accepted, in bytes. Default: 256 MiB.
    ///
    /// Checked against the size implied by the base64 payload before the
    /// payload is decoded, so an oversized request never allocates its buffer.
    pub max_input_bytes: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional progress callback for password attempts and page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            page_separator: PageSeparator::default(),
            normalize: true,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("pages", &self.pages)
            .field("page_separator", &self.page_separator)
            .field("normalize", &self.normalize)
            .field("max_input_bytes", &self.max_input_bytes)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn max_input_bytes(mut self, n: usize) -> Self {
        self.config.max_input_bytes = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2TextError> {
        let c = &self.config;
        if c.max_input_bytes == 0 {
            return Err(Pdf2TextError::InvalidConfig(
                "max_input_bytes must be ≥ 1".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(Pdf2TextError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}: pages are 1-indexed and start must be <= end"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to extract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Extract all pages (default).
    #[default]
    All,
    /// Extract a single page (1-indexed).
    Single(usize),
    /// Extract a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Extract specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// How to separate pages in the assembled text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// Single newline between pages. (default)
    #[default]
    Newline,
    /// Form feed (`\x0c`), as emitted by pdftotext.
    FormFeed,
    /// A marker line carrying the page number: "--- page N ---".
    Marker,
    /// Custom string inserted between pages, verbatim.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator placed *before* the given page (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::Newline => "\n".to_string(),
            PageSeparator::FormFeed => "\x0c".to_string(),
            PageSeparator::Marker => format!("\n--- page {} ---\n", page_num),
            PageSeparator::Custom(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ConversionConfig::builder().build().unwrap();
        assert!(config.normalize);
        assert_eq!(config.page_separator, PageSeparator::Newline);
        assert_eq!(config.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn zero_input_limit_is_rejected() {
        let err = ConversionConfig::builder()
            .max_input_bytes(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_input_bytes"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(ConversionConfig::builder()
            .pages(PageSelection::Range(5, 2))
            .build()
            .is_err());
        assert!(ConversionConfig::builder()
            .pages(PageSelection::Range(0, 2))
            .build()
            .is_err());
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Range(3, 10).to_indices(4), vec![2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn separator_render() {
        assert_eq!(PageSeparator::Newline.render(2), "\n");
        assert_eq!(PageSeparator::FormFeed.render(2), "\x0c");
        assert_eq!(PageSeparator::Marker.render(7), "\n--- page 7 ---\n");
        assert_eq!(PageSeparator::Custom("|".into()).render(2), "|");
    }

    #[test]
    fn debug_hides_callback() {
        let config = ConversionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(dbg.contains("<dyn ConversionProgressCallback>"));
    }
}
