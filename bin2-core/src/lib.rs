//! core functionality for encrypting and decrypting
//! Bin2.0-obscured game asset files
//!
//! # Modules
//!
//! - `keystream`: length-keyed key derivation and the cycled XOR pass
//! - `codec`: header detection and the encrypt/decrypt transforms
//! - `store`: byte stores (file, in-memory) the codec operates against

pub mod codec;
pub mod keystream;
pub mod store;

// Re-export commonly used items
pub use codec::{HEADER, decrypt, decrypt_text, encrypt, has_header};
pub use keystream::{derive_key, keystream, xor_cycle};
pub use store::{
    ByteStore, FileStore, MemStore, is_encrypted, load_plain, load_text, open_in_place,
    seal_in_place,
};
