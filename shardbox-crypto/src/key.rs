//! Password-based key derivation.
//!
//! A shared password plus a per-file random salt is stretched into a
//! 256-bit cipher key with PBKDF2-HMAC-SHA256. Derivation is
//! deterministic per (password, salt); fresh salts yield unlinkable keys,
//! which is why the salt travels with every blob.

use crate::error::{CryptoError, CryptoResult};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cipher key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Salt length in bytes. Fixed so the salt can sit at a known blob prefix.
pub const SALT_SIZE: usize = 16;

/// Random salt for key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a fresh random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Derived cipher key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Versioned key-derivation parameters.
///
/// The iteration count is part of the blob format contract: it must match
/// between encrypt and decrypt. New parameter sets get new constants;
/// `V1` never changes once blobs exist in the wild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl KdfParams {
    /// First shipped parameter set: 100 000 iterations of HMAC-SHA256.
    pub const V1: Self = Self {
        iterations: 100_000,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::V1
    }
}

/// Derives a cipher key from a password and salt.
pub fn derive_key(password: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<DerivedKey> {
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be non-zero".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key,
    );
    Ok(DerivedKey::from_bytes(key))
}
