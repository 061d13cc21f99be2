//! The PDF standard security handler.
//!
//! Reads the `/Encrypt` dictionary, decides whether the scheme is one we can
//! read, checks candidate passwords against `/U` and `/O`, and, once a key is
//! known, decrypts every string and stream in the document.
//!
//! Checking a password only derives keys; nothing in the parsed document is
//! touched until [`SecurityHandler::decrypt_document`] runs with the winning
//! key.

use crate::output::{EncryptionScheme, PasswordRole};
use crate::pipeline::cipher::{
    aes_cbc_decrypt, aes_cbc_decrypt_unpadded, aes_cbc_encrypt_unpadded, rc4, CipherError,
};
use crate::pipeline::classify::Fault;
use lopdf::{Dictionary, Document, Object, ObjectId};
use sha2::{Digest, Sha256, Sha384, Sha512};
use tracing::{debug, warn};

/// Padding string from the standard security handler (Algorithm 2, step a).
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Revision 6 passwords are truncated to this many UTF-8 bytes.
const MAX_R6_PASSWORD: usize = 127;

/// How one class of objects (strings or streams) is encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CryptMethod {
    Identity,
    Rc4,
    AesV2,
    AesV3,
}

/// A file encryption key together with the password role that produced it.
#[derive(Clone)]
pub(crate) struct FileKey {
    bytes: Vec<u8>,
    pub(crate) role: PasswordRole,
}

impl std::fmt::Debug for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKey")
            .field("len", &self.bytes.len())
            .field("role", &self.role)
            .finish()
    }
}

/// Result of checking one password.
#[derive(Debug)]
pub(crate) enum Attempt {
    Unlocked(FileKey),
    Rejected,
    Unsupported(String),
}

/// Parsed `/Encrypt` dictionary of a standard-security-handler document.
#[derive(Debug)]
pub(crate) struct SecurityHandler {
    version: i64,
    revision: i64,
    key_len: usize,
    owner_entry: Vec<u8>,
    user_entry: Vec<u8>,
    owner_key_entry: Vec<u8>,
    user_key_entry: Vec<u8>,
    permissions: i32,
    file_id: Vec<u8>,
    encrypt_metadata: bool,
    string_method: CryptMethod,
    stream_method: CryptMethod,
    encrypt_ref: Option<ObjectId>,
}

impl SecurityHandler {
    /// Read the handler from the trailer. `Ok(None)` means "not encrypted".
    pub(crate) fn from_document(doc: &Document) -> Result<Option<Self>, Fault> {
        let Ok(entry) = doc.trailer.get(b"Encrypt") else {
            return Ok(None);
        };

        let (encrypt_ref, dict) = match entry {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Dictionary(dict)) => (Some(*id), dict),
                Ok(_) => {
                    return Err(Fault::Unparseable(
                        "/Encrypt does not point to a dictionary".into(),
                    ))
                }
                Err(e) => {
                    return Err(Fault::Unparseable(format!(
                        "/Encrypt object {} {} is missing: {e}",
                        id.0, id.1
                    )))
                }
            },
            Object::Dictionary(dict) => (None, dict),
            _ => {
                return Err(Fault::Unparseable(
                    "/Encrypt entry is not a dictionary".into(),
                ))
            }
        };

        let file_id = match doc.trailer.get(b"ID").map(|o| resolve(doc, o)) {
            Ok(Object::Array(ids)) => match ids.first().map(|o| resolve(doc, o)) {
                Some(Object::String(bytes, _)) => bytes.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Self::parse(doc, dict, encrypt_ref, file_id).map(Some)
    }

    fn parse(
        doc: &Document,
        dict: &Dictionary,
        encrypt_ref: Option<ObjectId>,
        file_id: Vec<u8>,
    ) -> Result<Self, Fault> {
        match name(doc, dict, b"Filter") {
            Some(filter) if filter == b"Standard" => {}
            Some(filter) => {
                return Err(Fault::Unsupported(format!(
                    "security handler /{} is not supported",
                    String::from_utf8_lossy(&filter)
                )))
            }
            None => {
                return Err(Fault::Unsupported(
                    "encryption dictionary names no security handler".into(),
                ))
            }
        }

        let version = integer(doc, dict, b"V").unwrap_or(0);
        let revision = integer(doc, dict, b"R")
            .ok_or_else(|| Fault::Unsupported("encryption dictionary has no /R entry".into()))?;
        let length_bits = integer(doc, dict, b"Length").unwrap_or(40);

        let (string_method, stream_method, key_len) = match version {
            1 => (CryptMethod::Rc4, CryptMethod::Rc4, 5),
            2 => {
                let bits = checked_rc4_bits(length_bits)?;
                (CryptMethod::Rc4, CryptMethod::Rc4, bits / 8)
            }
            4 | 5 => {
                let (strings, string_bits) = crypt_filter(doc, dict, b"StrF", length_bits)?;
                let (streams, stream_bits) = crypt_filter(doc, dict, b"StmF", length_bits)?;
                if strings == CryptMethod::Identity && streams == CryptMethod::Identity {
                    return Err(Fault::Unsupported(
                        "all crypt filters are /Identity".into(),
                    ));
                }
                let aes_v3 = [strings, streams].contains(&CryptMethod::AesV3);
                if (version == 5) != aes_v3 {
                    return Err(Fault::Unsupported(format!(
                        "crypt filter method does not match /V {version}"
                    )));
                }
                let key_len = if aes_v3 {
                    32
                } else if [strings, streams].contains(&CryptMethod::AesV2) {
                    16
                } else {
                    checked_rc4_bits(string_bits.max(stream_bits))? / 8
                };
                (strings, streams, key_len)
            }
            v => {
                return Err(Fault::Unsupported(format!(
                    "encryption algorithm /V {v} is not supported"
                )))
            }
        };

        let revision_ok = match version {
            1 | 2 => (2..=3).contains(&revision),
            4 => revision == 4,
            _ => (5..=6).contains(&revision),
        };
        if !revision_ok {
            return Err(Fault::Unsupported(format!(
                "revision /R {revision} is not supported with /V {version}"
            )));
        }

        let entry_len = if revision >= 5 { 48 } else { 32 };
        let owner_entry = bytes(doc, dict, b"O").unwrap_or_default();
        let user_entry = bytes(doc, dict, b"U").unwrap_or_default();
        if owner_entry.len() < entry_len || user_entry.len() < entry_len {
            return Err(Fault::Unsupported(format!(
                "/O or /U entry shorter than {entry_len} bytes"
            )));
        }
        let owner_key_entry = bytes(doc, dict, b"OE").unwrap_or_default();
        let user_key_entry = bytes(doc, dict, b"UE").unwrap_or_default();
        if revision >= 5 && (owner_key_entry.len() < 32 || user_key_entry.len() < 32) {
            return Err(Fault::Unsupported(
                "/OE or /UE entry shorter than 32 bytes".into(),
            ));
        }

        // /P may be written signed or as its unsigned 32-bit pattern.
        let permissions = integer(doc, dict, b"P")
            .ok_or_else(|| Fault::Unsupported("encryption dictionary has no /P entry".into()))?
            as i32;

        let handler = Self {
            version,
            revision,
            key_len,
            owner_entry,
            user_entry,
            owner_key_entry,
            user_key_entry,
            permissions,
            file_id,
            encrypt_metadata: boolean(doc, dict, b"EncryptMetadata").unwrap_or(true),
            string_method,
            stream_method,
            encrypt_ref,
        };
        debug!(
            "Standard security handler: V{} R{} key {} bytes, strings {:?}, streams {:?}",
            handler.version,
            handler.revision,
            handler.key_len,
            handler.string_method,
            handler.stream_method
        );
        Ok(handler)
    }

    pub(crate) fn revision(&self) -> i64 {
        self.revision
    }

    /// The scheme reported to callers, named after the stream cipher.
    pub(crate) fn scheme(&self) -> EncryptionScheme {
        let method = if self.stream_method == CryptMethod::Identity {
            self.string_method
        } else {
            self.stream_method
        };
        match method {
            CryptMethod::AesV2 => EncryptionScheme::Aes { key_bits: 128 },
            CryptMethod::AesV3 => EncryptionScheme::Aes { key_bits: 256 },
            _ => EncryptionScheme::Rc4 {
                key_bits: (self.key_len * 8) as u16,
            },
        }
    }

    /// Check a candidate as the user password, then as the owner password.
    ///
    /// Revisions 2–4 hash raw bytes. When a non-ASCII candidate fails as
    /// UTF-8 it is retried in Latin-1, which is how most writers encode
    /// PDFDocEncoding passwords.
    pub(crate) fn authenticate(&self, candidate: &str) -> Attempt {
        if self.revision >= 5 {
            let bytes = candidate.as_bytes();
            return self.authenticate_bytes(&bytes[..bytes.len().min(MAX_R6_PASSWORD)]);
        }

        match self.authenticate_bytes(candidate.as_bytes()) {
            Attempt::Rejected if !candidate.is_ascii() => match latin1(candidate) {
                Some(bytes) => self.authenticate_bytes(&bytes),
                None => Attempt::Rejected,
            },
            other => other,
        }
    }

    fn authenticate_bytes(&self, password: &[u8]) -> Attempt {
        if self.revision >= 5 {
            let checks = [
                (PasswordRole::User, self.user_key_r6(password)),
                (PasswordRole::Owner, self.owner_key_r6(password)),
            ];
            for (role, check) in checks {
                match check {
                    Ok(Some(bytes)) => return Attempt::Unlocked(FileKey { bytes, role }),
                    Ok(None) => {}
                    Err(e) => return Attempt::Unsupported(e.to_string()),
                }
            }
            return Attempt::Rejected;
        }

        if let Some(bytes) = self.user_key(password) {
            return Attempt::Unlocked(FileKey {
                bytes,
                role: PasswordRole::User,
            });
        }
        if let Some(bytes) = self.owner_key(password) {
            return Attempt::Unlocked(FileKey {
                bytes,
                role: PasswordRole::Owner,
            });
        }
        Attempt::Rejected
    }

    // ── Revisions 2–4 (MD5 + RC4) ────────────────────────────────────────

    /// Algorithm 2: derive the file key from a padded password.
    fn file_key(&self, padded: &[u8; 32]) -> Vec<u8> {
        let mut ctx = md5::Context::new();
        ctx.consume(padded);
        ctx.consume(&self.owner_entry[..32]);
        ctx.consume(self.permissions.to_le_bytes());
        ctx.consume(&self.file_id);
        if self.revision >= 4 && !self.encrypt_metadata {
            ctx.consume([0xFF; 4]);
        }
        let mut hash = ctx.compute().0;
        let n = self.key_len;
        if self.revision >= 3 {
            for _ in 0..50 {
                hash = md5::compute(&hash[..n]).0;
            }
        }
        hash[..n].to_vec()
    }

    /// Algorithms 4–6: the password opens the document as its user.
    fn user_key(&self, password: &[u8]) -> Option<Vec<u8>> {
        let key = self.file_key(&pad_password(password));
        let matches = if self.revision == 2 {
            rc4(&key, &PASSWORD_PAD).as_slice() == &self.user_entry[..32]
        } else {
            let mut ctx = md5::Context::new();
            ctx.consume(PASSWORD_PAD);
            ctx.consume(&self.file_id);
            let mut check = rc4(&key, &ctx.compute().0);
            for i in 1..=19u8 {
                check = rc4(&xor_key(&key, i), &check);
            }
            check[..16] == self.user_entry[..16]
        };
        matches.then_some(key)
    }

    /// Algorithm 7: recover the user password from `/O` and check it.
    fn owner_key(&self, password: &[u8]) -> Option<Vec<u8>> {
        let n = self.key_len;
        let mut hash = md5::compute(pad_password(password)).0;
        if self.revision >= 3 {
            for _ in 0..50 {
                hash = md5::compute(&hash[..n]).0;
            }
        }
        let rc4_key = &hash[..n];

        let user_password = if self.revision == 2 {
            rc4(rc4_key, &self.owner_entry[..32])
        } else {
            (0..=19u8)
                .rev()
                .fold(self.owner_entry[..32].to_vec(), |acc, i| {
                    rc4(&xor_key(rc4_key, i), &acc)
                })
        };
        self.user_key(&user_password)
    }

    // ── Revisions 5–6 (SHA-2 + AES-256) ──────────────────────────────────

    fn user_key_r6(&self, password: &[u8]) -> Result<Option<Vec<u8>>, CipherError> {
        let u = &self.user_entry[..48];
        let (hash, rest) = u.split_at(32);
        let (validation_salt, key_salt) = rest.split_at(8);
        if self.hash_r6(password, validation_salt, &[])? != hash {
            return Ok(None);
        }
        let wrap_key = self.hash_r6(password, key_salt, &[])?;
        aes_cbc_decrypt_unpadded(&wrap_key, &[0u8; 16], &self.user_key_entry[..32]).map(Some)
    }

    fn owner_key_r6(&self, password: &[u8]) -> Result<Option<Vec<u8>>, CipherError> {
        let o = &self.owner_entry[..48];
        let u = &self.user_entry[..48];
        let (hash, rest) = o.split_at(32);
        let (validation_salt, key_salt) = rest.split_at(8);
        if self.hash_r6(password, validation_salt, u)? != hash {
            return Ok(None);
        }
        let wrap_key = self.hash_r6(password, key_salt, u)?;
        aes_cbc_decrypt_unpadded(&wrap_key, &[0u8; 16], &self.owner_key_entry[..32]).map(Some)
    }

    fn hash_r6(&self, password: &[u8], salt: &[u8], udata: &[u8]) -> Result<Vec<u8>, CipherError> {
        let initial = Sha256::new()
            .chain_update(password)
            .chain_update(salt)
            .chain_update(udata)
            .finalize()
            .to_vec();
        if self.revision == 5 {
            return Ok(initial);
        }
        hardened_hash(password, initial, udata)
    }

    // ── Object decryption ────────────────────────────────────────────────

    /// Decrypt every string and stream in place and drop `/Encrypt`.
    ///
    /// Returns the number of objects that could not be decrypted; those keep
    /// their ciphertext and usually surface later as page faults.
    pub(crate) fn decrypt_document(&self, doc: &mut Document, key: &FileKey) -> usize {
        let mut failures = 0;
        for (&id, object) in doc.objects.iter_mut() {
            if Some(id) == self.encrypt_ref {
                continue;
            }
            if let Err(e) = self.decrypt_object(key, id, object) {
                debug!("Object {} {} could not be decrypted: {}", id.0, id.1, e);
                failures += 1;
            }
        }
        doc.trailer.remove(b"Encrypt");
        if let Some(id) = self.encrypt_ref {
            doc.objects.remove(&id);
        }
        if failures > 0 {
            warn!("{} objects could not be decrypted", failures);
        }
        failures
    }

    fn decrypt_object(&self, key: &FileKey, id: ObjectId, object: &mut Object) -> Result<(), CipherError> {
        match object {
            Object::String(bytes, _) => {
                *bytes = self.decrypt_bytes(key, id, self.string_method, bytes)?;
            }
            Object::Array(items) => {
                for item in items.iter_mut() {
                    self.decrypt_object(key, id, item)?;
                }
            }
            Object::Dictionary(dict) => {
                for (_, value) in dict.iter_mut() {
                    self.decrypt_object(key, id, value)?;
                }
            }
            Object::Stream(stream) => {
                if stream.dict.type_is(b"XRef") {
                    return Ok(());
                }
                for (_, value) in stream.dict.iter_mut() {
                    self.decrypt_object(key, id, value)?;
                }
                if !self.stream_is_encrypted(&stream.dict) {
                    return Ok(());
                }
                let plain = self.decrypt_bytes(key, id, self.stream_method, &stream.content)?;
                stream.set_content(plain);
            }
            _ => {}
        }
        Ok(())
    }

    fn stream_is_encrypted(&self, dict: &Dictionary) -> bool {
        if dict.type_is(b"Metadata") && !self.encrypt_metadata {
            return false;
        }
        // A /Crypt filter names its own crypt filter; any name but /Identity
        // falls back to the document's stream method.
        match crypt_filter_name(dict) {
            Some(filter) => filter != b"Identity",
            None => true,
        }
    }

    fn decrypt_bytes(
        &self,
        key: &FileKey,
        id: ObjectId,
        method: CryptMethod,
        data: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        match method {
            CryptMethod::Identity => Ok(data.to_vec()),
            CryptMethod::Rc4 => Ok(rc4(&self.object_key(key, id, false), data)),
            CryptMethod::AesV2 => aes_cbc_decrypt(&self.object_key(key, id, true), data),
            CryptMethod::AesV3 => aes_cbc_decrypt(&key.bytes, data),
        }
    }

    /// Algorithm 1: per-object key from the file key, object number and generation.
    fn object_key(&self, key: &FileKey, id: ObjectId, aes: bool) -> Vec<u8> {
        let mut ctx = md5::Context::new();
        ctx.consume(&key.bytes);
        ctx.consume(&id.0.to_le_bytes()[..3]);
        ctx.consume(id.1.to_le_bytes());
        if aes {
            ctx.consume(b"sAlT");
        }
        let digest = ctx.compute().0;
        digest[..(key.bytes.len() + 5).min(16)].to_vec()
    }
}

/// Algorithm 2.B: the iterated SHA-2 hash of revision 6.
fn hardened_hash(password: &[u8], mut k: Vec<u8>, udata: &[u8]) -> Result<Vec<u8>, CipherError> {
    let mut round = 0usize;
    loop {
        let mut block = Vec::with_capacity(password.len() + k.len() + udata.len());
        block.extend_from_slice(password);
        block.extend_from_slice(&k);
        block.extend_from_slice(udata);
        let k1 = block.repeat(64);

        let e = aes_cbc_encrypt_unpadded(&k[..16], &k[16..32], &k1)?;
        let selector = e[..16].iter().map(|&b| u32::from(b)).sum::<u32>() % 3;
        k = match selector {
            0 => Sha256::digest(&e).to_vec(),
            1 => Sha384::digest(&e).to_vec(),
            _ => Sha512::digest(&e).to_vec(),
        };

        round += 1;
        let last = e.last().copied().map(usize::from).unwrap_or(0);
        if round >= 64 && last <= round - 32 {
            break;
        }
    }
    k.truncate(32);
    Ok(k)
}

fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = PASSWORD_PAD;
    let n = password.len().min(32);
    padded[..n].copy_from_slice(&password[..n]);
    padded[n..].copy_from_slice(&PASSWORD_PAD[..32 - n]);
    padded
}

fn xor_key(key: &[u8], value: u8) -> Vec<u8> {
    key.iter().map(|b| b ^ value).collect()
}

fn latin1(candidate: &str) -> Option<Vec<u8>> {
    candidate
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

fn checked_rc4_bits(bits: i64) -> Result<usize, Fault> {
    if (40..=128).contains(&bits) && bits % 8 == 0 {
        Ok(bits as usize)
    } else {
        Err(Fault::Unsupported(format!(
            "RC4 key length of {bits} bits is not supported"
        )))
    }
}

/// Resolve a named crypt filter (`/StrF` or `/StmF`) to its method.
///
/// Returns the method and the key length in bits declared for it.
fn crypt_filter(
    doc: &Document,
    dict: &Dictionary,
    key: &[u8],
    default_bits: i64,
) -> Result<(CryptMethod, i64), Fault> {
    let filter_name = name(doc, dict, key).unwrap_or_else(|| b"Identity".to_vec());
    if filter_name == b"Identity" {
        return Ok((CryptMethod::Identity, default_bits));
    }

    let filter = match dict.get(b"CF").map(|o| resolve(doc, o)) {
        Ok(Object::Dictionary(cf)) => match cf.get(&filter_name).map(|o| resolve(doc, o)) {
            Ok(Object::Dictionary(filter)) => filter,
            _ => {
                return Err(Fault::Unsupported(format!(
                    "crypt filter /{} is not defined",
                    String::from_utf8_lossy(&filter_name)
                )))
            }
        },
        _ => {
            return Err(Fault::Unsupported(
                "encryption dictionary has no /CF entry".into(),
            ))
        }
    };

    let method = match name(doc, filter, b"CFM").as_deref() {
        None | Some(b"None") => CryptMethod::Identity,
        Some(b"V2") => CryptMethod::Rc4,
        Some(b"AESV2") => CryptMethod::AesV2,
        Some(b"AESV3") => CryptMethod::AesV3,
        Some(other) => {
            return Err(Fault::Unsupported(format!(
                "crypt filter method /{} is not supported",
                String::from_utf8_lossy(other)
            )))
        }
    };

    // Some writers give /Length in bytes rather than bits.
    let bits = match integer(doc, filter, b"Length") {
        Some(n) if n <= 16 => n * 8,
        Some(n) => n,
        None => default_bits.max(if method == CryptMethod::Rc4 { 40 } else { 128 }),
    };
    Ok((method, bits))
}

/// The crypt filter a stream selects through a `/Crypt` entry in `/Filter`.
///
/// The name lives in the matching `/DecodeParms` entry and defaults to
/// `/Identity`. `None` means the stream has no `/Crypt` filter.
fn crypt_filter_name(dict: &Dictionary) -> Option<Vec<u8>> {
    let is_crypt = |f: &Object| matches!(f, Object::Name(n) if n.as_slice() == b"Crypt");
    let position = match dict.get(b"Filter").ok()? {
        f @ Object::Name(_) if is_crypt(f) => 0,
        Object::Array(filters) => filters.iter().position(is_crypt)?,
        _ => return None,
    };
    let params = match dict.get(b"DecodeParms") {
        Ok(Object::Dictionary(params)) if position == 0 => Some(params),
        Ok(Object::Array(params)) => match params.get(position) {
            Some(Object::Dictionary(params)) => Some(params),
            _ => None,
        },
        _ => None,
    };
    let filter = params.and_then(|p| match p.get(b"Name") {
        Ok(Object::Name(n)) => Some(n.clone()),
        _ => None,
    });
    Some(filter.unwrap_or_else(|| b"Identity".to_vec()))
}

// ── Dictionary helpers ───────────────────────────────────────────────────

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn integer(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::Integer(i) => Some(*i),
        _ => None,
    }
}

fn bytes(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Vec<u8>> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::String(b, _) => Some(b.clone()),
        _ => None,
    }
}

fn name(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Vec<u8>> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::Name(n) => Some(n.clone()),
        _ => None,
    }
}

fn boolean(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<bool> {
    match resolve(doc, dict.get(key).ok()?) {
        Object::Boolean(b) => Some(*b),
        _ => None,
    }
}
