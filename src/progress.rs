//! Progress-callback trait for password attempts and per-page events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to observe
//! the pipeline as it runs: each candidate password as it is tried, the
//! moment the document opens, and every page as its text is recovered.
//!
//! Callbacks receive candidate *indices*, never the passwords themselves, so
//! an implementation that forwards events to a log or a UI cannot leak them.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2text::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct AttemptCounter {
//!     attempts: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for AttemptCounter {
//!     fn on_password_attempt(&self, index: usize, total: usize) {
//!         self.attempts.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("trying candidate {}/{}", index + 1, total);
//!     }
//! }
//!
//! let counter = Arc::new(AttemptCounter { attempts: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::EncryptionScheme;
use std::sync::Arc;

/// Called by the conversion pipeline as it unlocks and reads a document.
///
/// Implementations must be `Send + Sync`: the pipeline runs on a blocking
/// worker thread and a single callback may be shared by concurrent
/// conversions. All methods have default no-op implementations so callers
/// only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called just before a candidate password is tried.
    ///
    /// # Arguments
    /// * `index`: 0-based position of the candidate in the request
    /// * `total`: number of candidates supplied
    fn on_password_attempt(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called once the document is open.
    ///
    /// # Arguments
    /// * `scheme`   : detected encryption scheme ([`EncryptionScheme::None`]
    ///   for plain documents)
    /// * `candidate`: index of the candidate that opened it, `None` when no
    ///   password was needed
    fn on_unlocked(&self, scheme: EncryptionScheme, candidate: Option<usize>) {
        let _ = (scheme, candidate);
    }

    /// Called once before any page is read.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be processed
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page's text has been recovered.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: number of pages being processed
    /// * `chars`      : character count of the page text (0 for blank pages)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a page is skipped because of an internal fault.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all pages have been attempted.
    ///
    /// # Arguments
    /// * `total_pages`  : number of pages processed
    /// * `success_count`: pages read without error
    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
