//! Envelope encryption layer for shardbox.
//!
//! Wraps each month shard in password-derived authenticated encryption:
//! - PBKDF2-HMAC-SHA256 for key derivation from the shared password
//! - ChaCha20-Poly1305 for authenticated encryption
//! - A fresh random salt per file, shipped at a fixed blob prefix
//!
//! # Blob layout
//!
//! ```text
//! salt (16 bytes) ‖ nonce (12 bytes) ‖ ciphertext + tag
//! ```
//!
//! The salt always sits at the first 16 bytes, so a decryptor needs no
//! length field: the blob plus the original password is everything
//! required to recover the plaintext. Any bit flip in the salt, nonce or
//! ciphertext makes decryption fail rather than return corrupted data.

mod batch;
mod cipher;
mod envelope;
mod error;
mod key;

pub use batch::{encrypt_tree, BatchReport};
pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use envelope::{
    decrypt_file, encrypt_file, encrypted_path, open, seal, ENCRYPTED_SUFFIX,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, DerivedKey, KdfParams, Salt, KEY_SIZE, SALT_SIZE};
