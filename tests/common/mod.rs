//! Fixture builder for the integration tests.
//!
//! Assembles small PDFs with `lopdf` and, when asked, encrypts them with the
//! standard security handler (RC4 40/128, AES-128, AES-256 R5 and R6) the
//! same way a PDF writer would. One builder writes the file by hand so that it
//! can use a cross-reference stream and an object stream. Nothing is read from
//! disk and nothing touches the network.

#![allow(dead_code)]

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256, Block};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;
use sha2::{Digest, Sha256, Sha384, Sha512};

const PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

const FILE_ID: &[u8; 16] = b"pdf2text-fixture";
const PERMISSIONS: i32 = -3904;

/// Encryption applied by [`encrypted_pdf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    /// V1 R2, 40-bit RC4.
    Rc4_40,
    /// V2 R3, 128-bit RC4.
    Rc4_128,
    /// V4 R4, 128-bit RC4 selected through a `/V2` crypt filter.
    Rc4CryptFilter,
    /// V4 R4, `/AESV2` crypt filter.
    Aes128,
    /// V5 R5, `/AESV3` crypt filter with the plain SHA-256 password hash.
    Aes256R5,
    /// V5 R6, `/AESV3` crypt filter.
    Aes256,
}

pub fn b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// An unencrypted PDF with one line of text per page.
pub fn plain_pdf(pages: &[&str]) -> Vec<u8> {
    save(build_document(pages))
}

/// A PDF whose pages carry the given raw content streams.
pub fn pdf_with_contents(contents: &[&[u8]]) -> Vec<u8> {
    save(build_from_contents(contents))
}

/// An encrypted PDF with one line of text per page.
pub fn encrypted_pdf(pages: &[&str], cipher: Cipher, user: &str, owner: &str) -> Vec<u8> {
    encrypted_pdf_bytes(pages, cipher, user.as_bytes(), owner.as_bytes())
}

/// As [`encrypted_pdf`], with passwords given as raw bytes.
pub fn encrypted_pdf_bytes(pages: &[&str], cipher: Cipher, user: &[u8], owner: &[u8]) -> Vec<u8> {
    let mut doc = build_document(pages);
    encrypt(&mut doc, cipher, user, owner, true);
    save(doc)
}

/// An encrypted PDF with `/EncryptMetadata false` and a plain-text XMP stream
/// referenced from the catalog. Only the V4 ciphers support this.
pub fn encrypted_pdf_with_metadata(
    pages: &[&str],
    cipher: Cipher,
    user: &str,
    metadata: &[u8],
) -> Vec<u8> {
    assert!(
        matches!(cipher, Cipher::Rc4CryptFilter | Cipher::Aes128),
        "/EncryptMetadata needs a V4 cipher"
    );
    let mut doc = build_document(pages);
    let metadata_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        metadata.to_vec(),
    ));
    let root = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("fixture has a catalog");
    doc.get_object_mut(root)
        .and_then(Object::as_dict_mut)
        .expect("catalog is a dictionary")
        .set("Metadata", Object::Reference(metadata_id));
    encrypt(&mut doc, cipher, user.as_bytes(), b"owner", false);
    save(doc)
}

/// A one-page PDF 1.5 file whose catalog, page tree, page and font live in
/// object stream 6, indexed by a cross-reference stream.
///
/// With `protection` the content stream and the object stream are encrypted
/// and the cross-reference stream points at the `/Encrypt` dictionary.
pub fn object_stream_pdf(text: &str, protection: Option<(Cipher, &str, &str)>) -> Vec<u8> {
    let members = [
        (1, "<</Type /Catalog /Pages 2 0 R>>".to_string()),
        (2, "<</Type /Pages /Kids [3 0 R] /Count 1>>".to_string()),
        (
            3,
            "<</Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 5 0 R \
             /Resources <</Font <</F1 4 0 R>>>>>>"
                .to_string(),
        ),
        (4, "<</Type /Font /Subtype /Type1 /BaseFont /Helvetica>>".to_string()),
    ];
    let mut header = String::new();
    let mut body = String::new();
    for (number, member) in &members {
        header.push_str(&format!("{number} {} ", body.len()));
        body.push_str(member);
        body.push('\n');
    }
    let first = header.len();
    let object_stream = format!("{header}{body}").into_bytes();
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escape(text)).into_bytes();

    let sealed = protection.map(|(cipher, user, owner)| {
        let (dict, file_key) = handler(cipher, user.as_bytes(), owner.as_bytes(), true);
        (cipher, dict, file_key)
    });
    let seal = |number: u32, data: Vec<u8>| match &sealed {
        Some((cipher, _, file_key)) => encrypt_bytes(*cipher, file_key, (number, 0), &data),
        None => data,
    };
    let content = seal(5, content);
    let object_stream = seal(6, object_stream);

    let mut out = b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = BTreeMap::new();
    offsets.insert(
        5,
        push_object(&mut out, 5, &format!("<</Length {}>>", content.len()), Some(&content)),
    );
    offsets.insert(
        6,
        push_object(
            &mut out,
            6,
            &format!(
                "<</Type /ObjStm /N {} /First {first} /Length {}>>",
                members.len(),
                object_stream.len()
            ),
            Some(&object_stream),
        ),
    );
    let encrypt_entry = match &sealed {
        Some((_, dict, _)) => {
            let dict = serialize(&Object::Dictionary(dict.clone()));
            offsets.insert(7, push_object(&mut out, 7, &dict, None));
            "/Encrypt 7 0 R"
        }
        None => "",
    };

    let xref_offset = out.len() as u32;
    offsets.insert(8, xref_offset);
    let mut rows = Vec::new();
    let mut row = |kind: u8, field: u32, generation: u16| {
        rows.push(kind);
        rows.extend_from_slice(&field.to_be_bytes());
        rows.extend_from_slice(&generation.to_be_bytes());
    };
    row(0, 0, 65535);
    for (index, _) in members.iter().enumerate() {
        row(2, 6, index as u16);
    }
    for number in 5..=8 {
        match offsets.get(&number) {
            Some(&offset) => row(1, offset, 0),
            None => row(0, 0, 0),
        }
    }

    let id = hex_literal(FILE_ID);
    let xref_dict = format!(
        "<</Type /XRef /Size 9 /W [1 4 2] /Root 1 0 R /ID [{id} {id}] {encrypt_entry} /Length {}>>",
        rows.len()
    );
    push_object(&mut out, 8, &xref_dict, Some(&rows));
    out.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF\n").as_bytes());
    out
}

/// A document protected by a handler other than `/Standard`.
pub fn public_key_pdf() -> Vec<u8> {
    let mut doc = build_document(&["sealed"]);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Adobe.PubSec",
        "SubFilter" => "adbe.pkcs7.s5",
        "V" => 4_i64,
        "R" => 4_i64,
    });
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    set_file_id(&mut doc);
    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save fixture PDF");
    buf
}

fn build_document(pages: &[&str]) -> Document {
    let contents: Vec<Vec<u8>> = pages
        .iter()
        .map(|text| {
            format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escape(text)).into_bytes()
        })
        .collect();
    let refs: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();
    build_from_contents(&refs)
}

fn build_from_contents(contents: &[&[u8]]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = contents
        .iter()
        .map(|content| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => Object::Reference(font_id),
                    },
                },
            });
            Object::Reference(page_id)
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(b"Fixture document".to_vec(), StringFormat::Hexadecimal),
        "Producer" => Object::String(b"pdf2text tests".to_vec(), StringFormat::Hexadecimal),
    });
    doc.trailer.set("Info", info_id);
    doc
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn set_file_id(doc: &mut Document) {
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(FILE_ID.to_vec(), StringFormat::Hexadecimal),
            Object::String(FILE_ID.to_vec(), StringFormat::Hexadecimal),
        ]),
    );
}

fn hex(bytes: Vec<u8>) -> Object {
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn hex_literal(bytes: &[u8]) -> String {
    let digits: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
    format!("<{digits}>")
}

/// Append `number 0 obj ... endobj` and return the offset it starts at.
fn push_object(out: &mut Vec<u8>, number: u32, dict: &str, stream: Option<&[u8]>) -> u32 {
    let offset = out.len() as u32;
    out.extend_from_slice(format!("{number} 0 obj\n{dict}").as_bytes());
    if let Some(data) = stream {
        out.extend_from_slice(b"\nstream\n");
        out.extend_from_slice(data);
        out.extend_from_slice(b"\nendstream");
    }
    out.extend_from_slice(b"\nendobj\n");
    offset
}

/// PDF syntax for the handful of object kinds an `/Encrypt` dictionary uses.
fn serialize(object: &Object) -> String {
    match object {
        Object::Null => "null".to_string(),
        Object::Boolean(b) => b.to_string(),
        Object::Integer(i) => i.to_string(),
        Object::Name(name) => format!("/{}", String::from_utf8_lossy(name)),
        Object::String(bytes, _) => hex_literal(bytes),
        Object::Reference((number, generation)) => format!("{number} {generation} R"),
        Object::Array(items) => {
            let items: Vec<String> = items.iter().map(serialize).collect();
            format!("[{}]", items.join(" "))
        }
        Object::Dictionary(dict) => {
            let entries: Vec<String> = dict
                .iter()
                .map(|(key, value)| format!("/{} {}", String::from_utf8_lossy(key), serialize(value)))
                .collect();
            format!("<<{}>>", entries.join(" "))
        }
        other => panic!("fixture cannot serialise {other:?}"),
    }
}

// ── Encryption ───────────────────────────────────────────────────────────────

fn handler(cipher: Cipher, user: &[u8], owner: &[u8], encrypt_metadata: bool) -> (Dictionary, Vec<u8>) {
    match cipher {
        Cipher::Rc4_40 => legacy_handler(1, 2, 5, user, owner, None, true),
        Cipher::Rc4_128 => legacy_handler(2, 3, 16, user, owner, None, true),
        Cipher::Rc4CryptFilter => {
            legacy_handler(4, 4, 16, user, owner, Some("V2"), encrypt_metadata)
        }
        Cipher::Aes128 => legacy_handler(4, 4, 16, user, owner, Some("AESV2"), encrypt_metadata),
        Cipher::Aes256R5 => aes256_handler(5, user, owner),
        Cipher::Aes256 => aes256_handler(6, user, owner),
    }
}

fn encrypt(doc: &mut Document, cipher: Cipher, user: &[u8], owner: &[u8], encrypt_metadata: bool) {
    let (encrypt_dict, file_key) = handler(cipher, user, owner, encrypt_metadata);

    let ids: Vec<ObjectId> = doc.objects.keys().copied().collect();
    for id in ids {
        if let Some(object) = doc.objects.get_mut(&id) {
            let is_metadata =
                matches!(object, Object::Stream(s) if s.dict.type_is(b"Metadata"));
            if is_metadata && !encrypt_metadata {
                continue;
            }
            encrypt_object(object, cipher, &file_key, id);
        }
    }

    let encrypt_id = doc.add_object(encrypt_dict);
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    set_file_id(doc);
}

fn encrypt_object(object: &mut Object, cipher: Cipher, file_key: &[u8], id: ObjectId) {
    match object {
        Object::String(bytes, format) => {
            *bytes = encrypt_bytes(cipher, file_key, id, bytes);
            *format = StringFormat::Hexadecimal;
        }
        Object::Array(items) => {
            for item in items.iter_mut() {
                encrypt_object(item, cipher, file_key, id);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                encrypt_object(value, cipher, file_key, id);
            }
        }
        Object::Stream(stream) => {
            let content = encrypt_bytes(cipher, file_key, id, &stream.content);
            stream.set_content(content);
        }
        _ => {}
    }
}

fn encrypt_bytes(cipher: Cipher, file_key: &[u8], id: ObjectId, data: &[u8]) -> Vec<u8> {
    match cipher {
        Cipher::Rc4_40 | Cipher::Rc4_128 | Cipher::Rc4CryptFilter => {
            rc4(&object_key(file_key, id, false), data)
        }
        Cipher::Aes128 => aes_encrypt_padded(&object_key(file_key, id, true), id, data),
        Cipher::Aes256R5 | Cipher::Aes256 => aes_encrypt_padded(file_key, id, data),
    }
}

fn object_key(file_key: &[u8], id: ObjectId, aes: bool) -> Vec<u8> {
    let mut input = file_key.to_vec();
    input.extend_from_slice(&id.0.to_le_bytes()[..3]);
    input.extend_from_slice(&id.1.to_le_bytes()[..2]);
    if aes {
        input.extend_from_slice(b"sAlT");
    }
    let digest = md5::compute(&input);
    digest[..(file_key.len() + 5).min(16)].to_vec()
}

/// IV || AES-CBC(PKCS#7(data)); the IV is derived from the object number.
fn aes_encrypt_padded(key: &[u8], id: ObjectId, data: &[u8]) -> Vec<u8> {
    let iv = [id.0 as u8 ^ 0x5A; 16];
    let pad = 16 - data.len() % 16;
    let mut padded = data.to_vec();
    padded.extend(std::iter::repeat(pad as u8).take(pad));

    let mut out = iv.to_vec();
    out.extend(cbc_encrypt(key, &iv, &padded));
    out
}

// ── Revisions 2–4 ────────────────────────────────────────────────────────────

fn pad_password(password: &[u8]) -> Vec<u8> {
    let n = password.len().min(32);
    let mut padded = password[..n].to_vec();
    padded.extend_from_slice(&PAD[..32 - n]);
    padded
}

fn legacy_handler(
    version: i64,
    revision: i64,
    key_len: usize,
    user: &[u8],
    owner: &[u8],
    crypt_filter: Option<&str>,
    encrypt_metadata: bool,
) -> (Dictionary, Vec<u8>) {
    // Algorithm 3: /O from the owner password.
    let mut hash = md5::compute(pad_password(owner)).0;
    if revision >= 3 {
        for _ in 0..50 {
            hash = md5::compute(&hash[..key_len]).0;
        }
    }
    let owner_key = &hash[..key_len];
    let mut o_value = rc4(owner_key, &pad_password(user));
    if revision >= 3 {
        for i in 1..=19u8 {
            let k: Vec<u8> = owner_key.iter().map(|b| b ^ i).collect();
            o_value = rc4(&k, &o_value);
        }
    }

    // Algorithm 2: file key from the user password.
    let mut input = pad_password(user);
    input.extend_from_slice(&o_value);
    input.extend_from_slice(&PERMISSIONS.to_le_bytes());
    input.extend_from_slice(FILE_ID);
    if !encrypt_metadata {
        input.extend_from_slice(&[0xFF; 4]);
    }
    let mut key = md5::compute(&input).0;
    if revision >= 3 {
        for _ in 0..50 {
            key = md5::compute(&key[..key_len]).0;
        }
    }
    let file_key = key[..key_len].to_vec();

    // Algorithms 4/5: /U.
    let u_value = if revision == 2 {
        rc4(&file_key, &PAD)
    } else {
        let mut input = PAD.to_vec();
        input.extend_from_slice(FILE_ID);
        let mut check = rc4(&file_key, &md5::compute(&input).0);
        for i in 1..=19u8 {
            let k: Vec<u8> = file_key.iter().map(|b| b ^ i).collect();
            check = rc4(&k, &check);
        }
        check.extend_from_slice(&[0u8; 16]);
        check
    };

    let mut dict = dictionary! {
        "Filter" => "Standard",
        "V" => version,
        "R" => revision,
        "Length" => (key_len * 8) as i64,
        "O" => hex(o_value),
        "U" => hex(u_value),
        "P" => PERMISSIONS as i64,
    };
    if let Some(method) = crypt_filter {
        dict.set(
            "CF",
            dictionary! {
                "StdCF" => dictionary! {
                    "Type" => "CryptFilter",
                    "CFM" => method,
                    "AuthEvent" => "DocOpen",
                    "Length" => key_len as i64,
                },
            },
        );
        dict.set("StmF", "StdCF");
        dict.set("StrF", "StdCF");
    }
    if !encrypt_metadata {
        dict.set("EncryptMetadata", false);
    }
    (dict, file_key)
}

// ── Revisions 5 and 6 ────────────────────────────────────────────────────────

fn aes256_handler(revision: i64, user: &[u8], owner: &[u8]) -> (Dictionary, Vec<u8>) {
    let file_key: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(7).wrapping_add(3)).collect();
    let zero_iv = [0u8; 16];

    let user_validation_salt = *b"uvsalt01";
    let user_key_salt = *b"uksalt01";
    let mut u_value = password_hash(revision, user, &user_validation_salt, &[]);
    u_value.extend_from_slice(&user_validation_salt);
    u_value.extend_from_slice(&user_key_salt);
    let ue_value = cbc_encrypt(
        &password_hash(revision, user, &user_key_salt, &[]),
        &zero_iv,
        &file_key,
    );

    let owner_validation_salt = *b"ovsalt01";
    let owner_key_salt = *b"oksalt01";
    let mut o_value = password_hash(revision, owner, &owner_validation_salt, &u_value);
    o_value.extend_from_slice(&owner_validation_salt);
    o_value.extend_from_slice(&owner_key_salt);
    let oe_value = cbc_encrypt(
        &password_hash(revision, owner, &owner_key_salt, &u_value),
        &zero_iv,
        &file_key,
    );

    let mut perms = [0u8; 16];
    perms[..4].copy_from_slice(&PERMISSIONS.to_le_bytes());
    perms[4..8].copy_from_slice(&[0xFF; 4]);
    perms[8] = b'T';
    perms[9..12].copy_from_slice(b"adb");
    let perms_value = cbc_encrypt(&file_key, &zero_iv, &perms);

    let dict = dictionary! {
        "Filter" => "Standard",
        "V" => 5_i64,
        "R" => revision,
        "Length" => 256_i64,
        "CF" => dictionary! {
            "StdCF" => dictionary! {
                "Type" => "CryptFilter",
                "CFM" => "AESV3",
                "AuthEvent" => "DocOpen",
                "Length" => 32_i64,
            },
        },
        "StmF" => "StdCF",
        "StrF" => "StdCF",
        "O" => hex(o_value),
        "U" => hex(u_value),
        "OE" => hex(oe_value),
        "UE" => hex(ue_value),
        "P" => PERMISSIONS as i64,
        "Perms" => hex(perms_value),
    };
    (dict, file_key)
}

/// Revision 5 hashes once with SHA-256; revision 6 runs Algorithm 2.B.
fn password_hash(revision: i64, password: &[u8], salt: &[u8], udata: &[u8]) -> Vec<u8> {
    if revision == 5 {
        return Sha256::new()
            .chain_update(password)
            .chain_update(salt)
            .chain_update(udata)
            .finalize()
            .to_vec();
    }
    hash_r6(password, salt, udata)
}

fn hash_r6(password: &[u8], salt: &[u8], udata: &[u8]) -> Vec<u8> {
    let mut k = Sha256::new()
        .chain_update(password)
        .chain_update(salt)
        .chain_update(udata)
        .finalize()
        .to_vec();
    let mut round = 0usize;
    loop {
        let mut block = password.to_vec();
        block.extend_from_slice(&k);
        block.extend_from_slice(udata);
        let k1 = block.repeat(64);
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&k[16..32]);
        let e = cbc_encrypt(&k[..16], &iv, &k1);
        let selector = e[..16].iter().map(|&b| u32::from(b)).sum::<u32>() % 3;
        k = match selector {
            0 => Sha256::digest(&e).to_vec(),
            1 => Sha384::digest(&e).to_vec(),
            _ => Sha512::digest(&e).to_vec(),
        };
        round += 1;
        if round >= 64 && usize::from(e[e.len() - 1]) <= round - 32 {
            break;
        }
    }
    k.truncate(32);
    k
}

// ── Primitives ───────────────────────────────────────────────────────────────

pub fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j: usize = 0;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) % 256;
        s.swap(i, j);
    }
    let (mut i, mut j) = (0usize, 0usize);
    data.iter()
        .map(|&b| {
            i = (i + 1) % 256;
            j = (j + s[i] as usize) % 256;
            s.swap(i, j);
            b ^ s[(s[i] as usize + s[j] as usize) % 256]
        })
        .collect()
}

/// AES-CBC without padding; `data` must be block aligned.
fn cbc_encrypt(key: &[u8], iv: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let encrypt: Box<dyn Fn(&mut Block)> = match key.len() {
        16 => {
            let c = Aes128::new_from_slice(key).unwrap();
            Box::new(move |b| c.encrypt_block(b))
        }
        32 => {
            let c = Aes256::new_from_slice(key).unwrap();
            Box::new(move |b| c.encrypt_block(b))
        }
        n => panic!("unsupported AES key length {n}"),
    };

    let mut prev = *iv;
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(16) {
        let mut block = Block::default();
        for (i, b) in block.iter_mut().enumerate() {
            *b = chunk[i] ^ prev[i];
        }
        encrypt(&mut block);
        prev.copy_from_slice(&block);
        out.extend_from_slice(&block);
    }
    out
}
