//! Blob envelope: salt ‖ nonce ‖ ciphertext, plus the `.enc` file driver.
//!
//! Every seal derives a fresh random salt, so two blobs of the same
//! plaintext under the same password share nothing observable.

use crate::cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KdfParams, Salt, SALT_SIZE};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name suffix for encrypted blobs.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Smallest possible blob: salt, nonce, and the tag of an empty plaintext.
const MIN_BLOB_LEN: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Seals `plaintext` under `password` into a self-contained blob.
pub fn seal(plaintext: &[u8], password: &str) -> CryptoResult<Vec<u8>> {
    let salt = Salt::random();
    let key = derive_key(password, &salt, &KdfParams::default())?;
    let data = encrypt(&key, plaintext)?;

    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + data.ciphertext.len());
    blob.extend_from_slice(salt.as_bytes());
    blob.extend_from_slice(&data.nonce);
    blob.extend_from_slice(&data.ciphertext);
    Ok(blob)
}

/// Opens a sealed blob with the original password.
///
/// A wrong password or any tampering with the blob surfaces as
/// `CryptoError::Decryption`.
pub fn open(blob: &[u8], password: &str) -> CryptoResult<Vec<u8>> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(CryptoError::MalformedBlob(format!(
            "{} bytes, need at least {MIN_BLOB_LEN}",
            blob.len()
        )));
    }

    let mut salt_bytes = [0u8; SALT_SIZE];
    salt_bytes.copy_from_slice(&blob[..SALT_SIZE]);
    let salt = Salt::from_bytes(salt_bytes);

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&blob[SALT_SIZE..SALT_SIZE + NONCE_SIZE]);

    let data = EncryptedData {
        nonce,
        ciphertext: blob[SALT_SIZE + NONCE_SIZE..].to_vec(),
    };

    let key = derive_key(password, &salt, &KdfParams::default())?;
    decrypt(&key, &data)
}

/// Returns the sibling path for a file's encrypted blob (`<path>.enc`).
pub fn encrypted_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// Encrypts a file into its `.enc` sibling, leaving the source untouched.
///
/// The blob is written to a temp path and renamed into place so an
/// interrupted run never leaves a half-written `.enc` file behind.
pub fn encrypt_file(path: &Path, password: &str) -> CryptoResult<PathBuf> {
    let plaintext = fs::read(path)?;
    let blob = seal(&plaintext, password)?;

    let out = encrypted_path(path);
    write_atomic(&out, &blob)?;

    info!(
        input = %path.display(),
        output = %out.display(),
        input_bytes = plaintext.len(),
        output_bytes = blob.len(),
        "encrypted file"
    );
    Ok(out)
}

/// Decrypts a `.enc` blob back into its original sibling path.
pub fn decrypt_file(path: &Path, password: &str) -> CryptoResult<PathBuf> {
    let name = path.to_string_lossy();
    let stripped = name
        .strip_suffix(ENCRYPTED_SUFFIX)
        .ok_or_else(|| CryptoError::NotEncrypted(name.to_string()))?;
    let out = PathBuf::from(stripped);

    let blob = fs::read(path)?;
    let plaintext = open(&blob, password)?;
    write_atomic(&out, &plaintext)?;

    info!(input = %path.display(), output = %out.display(), "decrypted file");
    Ok(out)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CryptoResult<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
