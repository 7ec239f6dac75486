//! AES-CBC / PKCS#7 block primitive behind the [`CbcBackend`] seam.
//!
//! [`FieldDecryptor`](super::FieldDecryptor) only talks to the trait, so the
//! envelope contract has one implementation regardless of which primitive
//! backs it.

use aes::{Aes128, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

/// AES block size, which is also the IV length for CBC.
pub const BLOCK_LEN: usize = 16;

/// AES-128 key length in bytes.
pub const AES128_KEY_LEN: usize = 16;

/// AES-256 key length in bytes.
pub const AES256_KEY_LEN: usize = 32;

/// Errors produced by the block-cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is neither [`AES128_KEY_LEN`] nor [`AES256_KEY_LEN`] bytes.
    #[error("invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// The ciphertext is empty or not a whole number of blocks.
    #[error("invalid ciphertext length: {0} bytes")]
    InvalidCiphertextLength(usize),

    /// PKCS#7 padding did not validate after decryption.
    #[error("invalid padding")]
    Padding,
}

/// A CBC-mode block cipher with PKCS#7 padding.
pub trait CbcBackend: Send + Sync {
    /// Decrypt `ciphertext` under `key` / `iv` and strip the padding.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError`] on a bad key size, a partial final block, or
    /// invalid padding.
    fn decrypt(
        &self,
        key: &[u8],
        iv: &[u8; BLOCK_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError>;

    /// Pad and encrypt `plaintext` under `key` / `iv`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] on a bad key size.
    fn encrypt(
        &self,
        key: &[u8],
        iv: &[u8; BLOCK_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError>;
}

/// [`CbcBackend`] backed by the RustCrypto `aes` and `cbc` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoCbc;

impl CbcBackend for RustCryptoCbc {
    fn decrypt(
        &self,
        key: &[u8],
        iv: &[u8; BLOCK_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::InvalidCiphertextLength(ciphertext.len()));
        }
        match key.len() {
            AES128_KEY_LEN => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CipherError::Padding),
            AES256_KEY_LEN => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CipherError::Padding),
            n => Err(CipherError::InvalidKeyLength(n)),
        }
    }

    fn encrypt(
        &self,
        key: &[u8],
        iv: &[u8; BLOCK_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CipherError> {
        match key.len() {
            AES128_KEY_LEN => Ok(cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            AES256_KEY_LEN => Ok(cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            n => Err(CipherError::InvalidKeyLength(n)),
        }
    }
}
