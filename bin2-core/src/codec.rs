/// Handles the Bin2.0 buffer transforms: header detection, encryption and decryption
use anyhow::{Context, Result, bail};

use crate::keystream::{keystream, xor_cycle};

/// 8-byte magic prefix marking an encrypted buffer
pub const HEADER: [u8; 8] = *b"%BIN_2.0";

/// Checks for the Bin2.0 header. Exact 8-byte prefix match only;
/// shorter buffers never match.
pub fn has_header(bytes: &[u8]) -> bool {
    bytes.len() >= HEADER.len() && bytes[..HEADER.len()] == HEADER
}

/// Encrypts a plaintext buffer into a headered Bin2.0 buffer.
///
/// Layout of the result: header, then the XORed content with its first
/// 8 bytes relocated to the tail. `result.len() == plain.len() + 8`.
///
/// Input that already carries the header is rejected so the transform
/// never stacks.
pub fn encrypt(plain: &[u8]) -> Result<Vec<u8>> {
    if has_header(plain) {
        bail!("buffer already starts with the %BIN_2.0 header");
    }

    let key = keystream(plain.len() as u32);
    let mut body = plain.to_vec();
    xor_cycle(&mut body, &key);

    let mut cipher = Vec::with_capacity(plain.len() + HEADER.len());
    cipher.extend_from_slice(&HEADER);

    // Rotate the first 8 XORed bytes to the tail. A body shorter than
    // the header has no full chunk to relocate and is kept as is.
    if body.len() >= HEADER.len() {
        cipher.extend_from_slice(&body[HEADER.len()..]);
        cipher.extend_from_slice(&body[..HEADER.len()]);
    } else {
        cipher.extend_from_slice(&body);
    }

    Ok(cipher)
}

/// Decrypts a headered Bin2.0 buffer back into the plaintext bytes.
///
/// The caller is expected to have confirmed the header is present;
/// a short or headerless buffer is malformed and reported as an error,
/// never silently truncated.
pub fn decrypt(cipher: &[u8]) -> Result<Vec<u8>> {
    if cipher.len() < HEADER.len() {
        bail!("cipher too short: {} bytes", cipher.len());
    }
    if !has_header(cipher) {
        bail!("missing %BIN_2.0 header");
    }

    let content_len = cipher.len() - HEADER.len();
    let key = keystream(content_len as u32);

    // Undo the rotation with index arithmetic: the true first 8 bytes
    // sit in the trailing header-sized slot, the rest follows from
    // offset 8. Contents shorter than 8 bytes were never rotated.
    let mut plain = Vec::with_capacity(content_len);
    if content_len >= HEADER.len() {
        plain.extend_from_slice(&cipher[content_len..]);
        plain.extend_from_slice(&cipher[HEADER.len()..content_len]);
    } else {
        plain.extend_from_slice(&cipher[HEADER.len()..]);
    }

    xor_cycle(&mut plain, &key);
    Ok(plain)
}

/// Decrypts a buffer and decodes the plaintext as UTF-8.
///
/// Invalid UTF-8 is surfaced as an error; the bytes are never
/// lossy-replaced.
pub fn decrypt_text(cipher: &[u8]) -> Result<String> {
    let plain = decrypt(cipher)?;
    String::from_utf8(plain).context("decrypted content is not valid UTF-8")
}
