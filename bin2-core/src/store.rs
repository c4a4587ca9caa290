/// Byte stores: the sources and sinks the codec operates against
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::codec::{self, HEADER};

/// A readable, writable home for one asset's bytes — a file on disk,
/// or an archive entry the archive layer has already pulled into
/// memory. The codec is implemented once against this trait instead of
/// once per source kind.
pub trait ByteStore {
    /// Reads the first 8 bytes without consuming the store; `None`
    /// when fewer than 8 bytes are available. The full contents must
    /// still be readable afterwards, since detection is immediately
    /// followed by a full read.
    fn peek_header(&mut self) -> Result<Option<[u8; 8]>>;

    /// Reads the complete contents.
    fn read_all(&mut self) -> Result<Vec<u8>>;

    /// Replaces the complete contents. Sized by byte length, never by
    /// character count.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Store backed by a file on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStore for FileStore {
    fn peek_header(&mut self) -> Result<Option<[u8; 8]>> {
        // A fresh handle per peek, so no position needs restoring
        // before the follow-up read
        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut magic = [0u8; 8];
        match file.read_exact(&mut magic) {
            Ok(()) => Ok(Some(magic)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Store backed by an in-memory buffer, e.g. an archive entry that was
/// inflated elsewhere and will be written back by the archive layer.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    bytes: Vec<u8>,
}

impl MemStore {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteStore for MemStore {
    fn peek_header(&mut self) -> Result<Option<[u8; 8]>> {
        if self.bytes.len() < 8 {
            return Ok(None);
        }
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&self.bytes[..8]);
        Ok(Some(magic))
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}

/// Checks whether a store currently holds an encrypted buffer.
pub fn is_encrypted<S: ByteStore + ?Sized>(store: &mut S) -> Result<bool> {
    Ok(store.peek_header()?.is_some_and(|magic| magic == HEADER))
}

/// Reads a store's contents, decrypting when the header is present.
/// Plain contents pass through unchanged — many assets are legitimately
/// stored unencrypted.
pub fn load_plain<S: ByteStore + ?Sized>(store: &mut S) -> Result<Vec<u8>> {
    let bytes = store.read_all()?;
    if codec::has_header(&bytes) {
        codec::decrypt(&bytes)
    } else {
        Ok(bytes)
    }
}

/// [`load_plain`] decoded as UTF-8 text. Invalid text is an error,
/// never a lossy replacement.
pub fn load_text<S: ByteStore + ?Sized>(store: &mut S) -> Result<String> {
    let plain = load_plain(store)?;
    String::from_utf8(plain).context("content is not valid UTF-8")
}

/// Encrypts a store's contents in place. Returns `Ok(false)` without
/// touching the store when the contents already carry the header.
pub fn seal_in_place<S: ByteStore + ?Sized>(store: &mut S) -> Result<bool> {
    if is_encrypted(store)? {
        return Ok(false);
    }
    let plain = store.read_all()?;
    let cipher = codec::encrypt(&plain)?;
    store.write_all(&cipher)?;
    Ok(true)
}

/// Decrypts a store's contents in place. Returns `Ok(false)` without
/// touching the store when the contents are not encrypted.
pub fn open_in_place<S: ByteStore + ?Sized>(store: &mut S) -> Result<bool> {
    if !is_encrypted(store)? {
        return Ok(false);
    }
    let cipher = store.read_all()?;
    let plain = codec::decrypt(&cipher)?;
    store.write_all(&plain)?;
    Ok(true)
}
