//! Password attempt engine: [`RawDocument`] + candidates → [`DocumentHandle`].
//!
//! The document is parsed once. If it carries no `/Encrypt` entry it is
//! handed on untouched. Otherwise the empty password is tried first (owner-
//! restricted documents open that way), then each candidate in order, as
//! user password and then as owner password. The first match wins and the
//! remaining candidates are never looked at. Only the winning key ever
//! decrypts anything.
//!
//! Object streams of an encrypted document cannot be expanded until the key
//! is known. Such documents are parsed a second time with those streams held
//! back, and the streams are expanded right after decryption.

use crate::error::ConversionError;
use crate::output::{DocumentInfo, EncryptionScheme, PasswordRole};
use crate::pipeline::classify::{classify, Fault};
use crate::pipeline::decode::RawDocument;
use crate::pipeline::security::{Attempt, FileKey, SecurityHandler};
use crate::progress::ConversionProgressCallback;
use lopdf::xref::XrefEntry;
use lopdf::{Document, Object, ObjectId, ObjectStream, Reader};
use tracing::{debug, info, warn};

/// `/Type` given to object streams held back until the document is decrypted.
const HELD_OBJECT_STREAM: &[u8] = b"HeldObjStm";

/// An opened, fully decrypted document ready for text extraction.
pub struct DocumentHandle {
    document: Document,
    scheme: EncryptionScheme,
    unlocked_with: Option<usize>,
    role: Option<PasswordRole>,
    attempts: usize,
    pdf_version: String,
}

impl DocumentHandle {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn scheme(&self) -> EncryptionScheme {
        self.scheme
    }

    /// Index of the candidate that opened the document, if one was needed.
    pub fn unlocked_with(&self) -> Option<usize> {
        self.unlocked_with
    }

    pub fn password_role(&self) -> Option<PasswordRole> {
        self.role
    }

    /// Number of candidates tried before the document opened.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            pdf_version: self.pdf_version.clone(),
            encryption: self.scheme,
            unlocked_with: self.unlocked_with,
            password_role: self.role,
            attempts: self.attempts,
        }
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("objects", &self.document.objects.len())
            .field("scheme", &self.scheme)
            .field("unlocked_with", &self.unlocked_with)
            .field("role", &self.role)
            .field("attempts", &self.attempts)
            .finish()
    }
}

/// Open a document, trying the candidates in order if it is encrypted.
///
/// Candidates are strictly sequential; `progress` sees the index of each one
/// just before it is tried.
///
/// # Errors
/// * `NotAPdf`: the bytes carry a signature but do not parse
/// * `UnsupportedEncryption`: unknown security handler, version or cipher
/// * `PasswordRequired`: encrypted, and `passwords` is empty
/// * `AllPasswordsFailed`: encrypted, and no candidate matched
pub fn open_document(
    raw: &RawDocument,
    passwords: &[String],
    progress: Option<&dyn ConversionProgressCallback>,
) -> Result<DocumentHandle, ConversionError> {
    let handle = open(raw, passwords, progress).map_err(classify)?;
    if let Some(cb) = progress {
        cb.on_unlocked(handle.scheme, handle.unlocked_with);
    }
    Ok(handle)
}

fn open(
    raw: &RawDocument,
    passwords: &[String],
    progress: Option<&dyn ConversionProgressCallback>,
) -> Result<DocumentHandle, Fault> {
    let document = parse(raw)?;
    let pdf_version = raw.version();

    let Some(handler) = SecurityHandler::from_document(&document)? else {
        debug!("state: Unencrypted");
        return Ok(DocumentHandle {
            document,
            scheme: EncryptionScheme::None,
            unlocked_with: None,
            role: None,
            attempts: 0,
            pdf_version,
        });
    };

    let document = if missing_members(&document) > 0 {
        debug!("Encrypted object streams present; parsing again with them held back");
        parse_holding_object_streams(raw)?
    } else {
        document
    };

    let scheme = handler.scheme();
    info!(
        "Document is encrypted ({}, revision {}); {} candidate(s) supplied",
        scheme,
        handler.revision(),
        passwords.len()
    );

    match handler.authenticate("") {
        Attempt::Unlocked(key) => {
            debug!("Empty user password accepted");
            return unlock(document, &handler, key, None, 0, pdf_version);
        }
        Attempt::Unsupported(detail) => return Err(Fault::Unsupported(detail)),
        Attempt::Rejected => {}
    }

    if passwords.is_empty() {
        return Err(Fault::NoCandidates(scheme));
    }

    let total = passwords.len();
    let winner = passwords.iter().enumerate().find_map(|(index, candidate)| {
        if let Some(cb) = progress {
            cb.on_password_attempt(index, total);
        }
        match handler.authenticate(candidate) {
            Attempt::Rejected => {
                debug!("Candidate {}/{} rejected", index + 1, total);
                None
            }
            attempt => Some((index, attempt)),
        }
    });

    match winner {
        Some((index, Attempt::Unlocked(key))) => {
            info!("Candidate {}/{} opened the document", index + 1, total);
            unlock(
                document,
                &handler,
                key,
                Some(index),
                index + 1,
                pdf_version,
            )
        }
        Some((_, Attempt::Unsupported(detail))) => Err(Fault::Unsupported(detail)),
        Some((_, Attempt::Rejected)) | None => {
            Err(Fault::CandidatesExhausted { attempted: total })
        }
    }
}

/// Describe a document without unlocking it or reading any page text.
///
/// The page tree and `/Encrypt` dictionary are never encrypted, so this works
/// on protected documents without a password. The exception is a page tree
/// stored in an encrypted object stream, which reads as zero pages until the
/// document is unlocked.
///
/// # Errors
/// `NotAPdf` or `UnsupportedEncryption`, as for [`open_document`].
pub fn inspect_document(raw: &RawDocument) -> Result<DocumentInfo, ConversionError> {
    let document = parse(raw).map_err(classify)?;
    let scheme = SecurityHandler::from_document(&document)
        .map_err(classify)?
        .map_or(EncryptionScheme::None, |h| h.scheme());
    Ok(DocumentInfo {
        page_count: document.get_pages().len(),
        pdf_version: raw.version(),
        encryption: scheme,
        unlocked_with: None,
        password_role: None,
        attempts: 0,
    })
}

fn parse(raw: &RawDocument) -> Result<Document, Fault> {
    let bytes = &raw.bytes()[raw.header_offset()..];
    Document::load_mem(bytes).map_err(|e| Fault::Unparseable(e.to_string()))
}

/// Parse again, retagging every object stream so the reader keeps it whole.
fn parse_holding_object_streams(raw: &RawDocument) -> Result<Document, Fault> {
    let reader = Reader {
        buffer: &raw.bytes()[raw.header_offset()..],
        document: Document::new(),
    };
    reader
        .read(Some(hold_object_stream))
        .map_err(|e| Fault::Unparseable(e.to_string()))
}

fn hold_object_stream(id: ObjectId, object: &mut Object) -> Option<(ObjectId, Object)> {
    if let Object::Stream(stream) = object {
        if stream.dict.type_is(b"ObjStm") {
            stream
                .dict
                .set("Type", Object::Name(HELD_OBJECT_STREAM.to_vec()));
        }
    }
    Some((id, object.clone()))
}

/// Objects the cross-reference table places inside an object stream but
/// which the document does not contain.
fn missing_members(document: &Document) -> usize {
    document
        .reference_table
        .entries
        .iter()
        .filter(|(number, entry)| {
            matches!(entry, XrefEntry::Compressed { .. })
                && !document.objects.contains_key(&(**number, 0))
        })
        .count()
}

/// Expand the held object streams once their content is decrypted.
///
/// Members never replace an object that is already present.
fn expand_held_object_streams(document: &mut Document) {
    let held: Vec<ObjectId> = document
        .objects
        .iter()
        .filter(|(_, object)| {
            matches!(object, Object::Stream(s) if s.dict.type_is(HELD_OBJECT_STREAM))
        })
        .map(|(id, _)| *id)
        .collect();

    for id in held {
        let Some(Object::Stream(stream)) = document.objects.get_mut(&id) else {
            continue;
        };
        stream.dict.set("Type", Object::Name(b"ObjStm".to_vec()));
        match ObjectStream::new(stream) {
            Ok(members) => {
                debug!(
                    "Object stream {} {} R holds {} objects",
                    id.0,
                    id.1,
                    members.objects.len()
                );
                for (member_id, member) in members.objects {
                    document.objects.entry(member_id).or_insert(member);
                }
            }
            Err(e) => warn!("Object stream {} {} R could not be expanded: {}", id.0, id.1, e),
        }
    }
}

fn unlock(
    mut document: Document,
    handler: &SecurityHandler,
    key: FileKey,
    unlocked_with: Option<usize>,
    attempts: usize,
    pdf_version: String,
) -> Result<DocumentHandle, Fault> {
    debug!("state: Decrypting");
    handler.decrypt_document(&mut document, &key);
    expand_held_object_streams(&mut document);

    let missing = missing_members(&document);
    if missing > 0 {
        return Err(Fault::Unsupported(format!(
            "{missing} objects stored in encrypted object streams could not be read"
        )));
    }

    Ok(DocumentHandle {
        document,
        scheme: handler.scheme(),
        unlocked_with,
        role: Some(key.role),
        attempts,
        pdf_version,
    })
}

/// Decrypt a document with one known password and serialise it without its
/// `/Encrypt` entry.
///
/// Unencrypted input is re-serialised as is. The password is tried as user
/// password and then as owner password, exactly as a candidate would be.
///
/// # Errors
/// As [`open_document`] with a single candidate.
pub fn unlock_document(raw: &RawDocument, password: &str) -> Result<Vec<u8>, ConversionError> {
    let handle = open_document(raw, &[password.to_string()], None)?;
    let mut document = handle.into_document();
    let mut out = Vec::with_capacity(raw.len());
    document.save_to(&mut out).map_err(|e| {
        classify(Fault::Unparseable(format!("could not serialise document: {e}")))
    })?;
    Ok(out)
}
