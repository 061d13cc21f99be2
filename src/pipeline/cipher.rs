//! Cipher primitives used by the standard security handler.
//!
//! RC4 is small enough to live here; AES comes from the `aes` block cipher
//! crate and is chained in CBC mode by hand, one 16-byte block at a time.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256, Block};
use thiserror::Error;

const BLOCK: usize = 16;

/// Errors raised while decrypting a single payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum CipherError {
    #[error("AES key of {0} bytes is not supported")]
    KeyLength(usize),

    #[error("AES payload of {0} bytes is not a whole number of blocks")]
    Misaligned(usize),

    #[error("AES payload carries invalid PKCS#7 padding")]
    Padding,
}

/// RC4 keystream XOR. Encryption and decryption are the same operation.
pub(crate) fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
    if !key.is_empty() {
        let mut j: u8 = 0;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|&byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            let k = s[(s[i as usize].wrapping_add(s[j as usize])) as usize];
            byte ^ k
        })
        .collect()
}

enum AesCipher {
    Aes128(Aes128),
    Aes256(Aes256),
}

impl AesCipher {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        match key.len() {
            16 => Aes128::new_from_slice(key)
                .map(AesCipher::Aes128)
                .map_err(|_| CipherError::KeyLength(key.len())),
            32 => Aes256::new_from_slice(key)
                .map(AesCipher::Aes256)
                .map_err(|_| CipherError::KeyLength(key.len())),
            n => Err(CipherError::KeyLength(n)),
        }
    }

    fn decrypt_block(&self, block: &mut Block) {
        match self {
            AesCipher::Aes128(c) => c.decrypt_block(block),
            AesCipher::Aes256(c) => c.decrypt_block(block),
        }
    }

    fn encrypt_block(&self, block: &mut Block) {
        match self {
            AesCipher::Aes128(c) => c.encrypt_block(block),
            AesCipher::Aes256(c) => c.encrypt_block(block),
        }
    }
}

fn cbc_decrypt(cipher: &AesCipher, iv: &[u8], data: &[u8]) -> Vec<u8> {
    let mut prev = [0u8; BLOCK];
    prev.copy_from_slice(&iv[..BLOCK]);
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(BLOCK) {
        let mut block = Block::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        for (b, p) in block.iter_mut().zip(prev.iter()) {
            *b ^= p;
        }
        out.extend_from_slice(block.as_slice());
        prev.copy_from_slice(chunk);
    }
    out
}

/// Decrypt a string or stream payload: 16-byte IV, CBC ciphertext, PKCS#7.
///
/// A payload consisting of the IV alone decrypts to nothing.
pub(crate) fn aes_cbc_decrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = AesCipher::new(key)?;
    if data.len() < BLOCK || data.len() % BLOCK != 0 {
        return Err(CipherError::Misaligned(data.len()));
    }
    let (iv, body) = data.split_at(BLOCK);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut plain = cbc_decrypt(&cipher, iv, body);
    let pad = plain.last().copied().unwrap_or(0) as usize;
    if pad == 0 || pad > BLOCK || plain[plain.len() - pad..].iter().any(|&b| b as usize != pad) {
        return Err(CipherError::Padding);
    }
    plain.truncate(plain.len() - pad);
    Ok(plain)
}

/// CBC decryption without padding, for the `/UE` and `/OE` key wraps.
pub(crate) fn aes_cbc_decrypt_unpadded(
    key: &[u8],
    iv: &[u8; BLOCK],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = AesCipher::new(key)?;
    if data.len() % BLOCK != 0 {
        return Err(CipherError::Misaligned(data.len()));
    }
    Ok(cbc_decrypt(&cipher, iv, data))
}

/// CBC encryption without padding, used by the revision 6 password hash.
pub(crate) fn aes_cbc_encrypt_unpadded(
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let cipher = AesCipher::new(key)?;
    if data.len() % BLOCK != 0 || iv.len() != BLOCK {
        return Err(CipherError::Misaligned(data.len()));
    }
    let mut prev = [0u8; BLOCK];
    prev.copy_from_slice(iv);
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(BLOCK) {
        let mut block = Block::default();
        for ((b, c), p) in block.iter_mut().zip(chunk).zip(prev.iter()) {
            *b = c ^ p;
        }
        cipher.encrypt_block(&mut block);
        out.extend_from_slice(block.as_slice());
        prev.copy_from_slice(block.as_slice());
    }
    Ok(out)
}
