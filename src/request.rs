//! The conversion request as received from the API layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document to convert plus the passwords to try on it, in order.
///
/// Deserialises from `{ "document": "<base64>", "passwords": [...] }`;
/// `passwords` may be omitted and `pdf` is accepted in place of `document`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Base64-encoded PDF bytes.
    #[serde(alias = "pdf")]
    pub document: String,
    /// Candidate passwords; order is significant, first match wins.
    #[serde(default)]
    pub passwords: Vec<String>,
}

impl ConversionRequest {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            passwords: Vec::new(),
        }
    }

    /// Append a candidate password.
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.passwords.push(pwd.into());
        self
    }

    /// Replace the candidate list.
    pub fn passwords<I, S>(mut self, pwds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passwords = pwds.into_iter().map(Into::into).collect();
        self
    }
}

// Hand-written so neither the payload nor the candidates end up in logs.
impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("document_len", &self.document.len())
            .field("passwords", &format_args!("<{} redacted>", self.passwords.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwords_default_to_empty() {
        let req: ConversionRequest = serde_json::from_str(r#"{"document":"SGVsbG8="}"#).unwrap();
        assert_eq!(req.document, "SGVsbG8=");
        assert!(req.passwords.is_empty());
    }

    #[test]
    fn pdf_alias_is_accepted() {
        let req: ConversionRequest =
            serde_json::from_str(r#"{"pdf":"JVBERi0=","passwords":["a","b"]}"#).unwrap();
        assert_eq!(req.document, "JVBERi0=");
        assert_eq!(req.passwords, vec!["a", "b"]);
    }

    #[test]
    fn debug_redacts_passwords() {
        let req = ConversionRequest::new("abc").password("hunter2");
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<1 redacted>"));
    }

    #[test]
    fn builder_preserves_order() {
        let req = ConversionRequest::new("x").passwords(["wrong", "secret"]);
        assert_eq!(req.passwords, vec!["wrong", "secret"]);
    }
}
