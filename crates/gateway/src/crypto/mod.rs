//! Field-level envelope decryption.
//!
//! The lens backend replaces a few record fields (prompt text, model
//! identifiers, token limits) with a JSON envelope before transmission:
//!
//! ```text
//! {"key":"<hex>","iv":"<hex, 16 bytes>","encryptedData":"<hex>"}
//! ```
//!
//! The ciphertext is AES-CBC with PKCS#7 padding; the key size selects
//! AES-128 (16 bytes) or AES-256 (32 bytes).
//!
//! # Security note
//!
//! The key travels in the same payload as the ciphertext it unlocks. This is
//! obfuscation against casual inspection, not confidentiality. The wire shape
//! is kept as-is because the backend and dashboard depend on it; do not build
//! anything on the assumption that envelope contents are secret.
//!
//! This module is free of HTTP and upstream dependencies.

pub mod cipher;
pub mod decryptor;
pub mod envelope;

pub use cipher::{CbcBackend, RustCryptoCbc};
pub use decryptor::FieldDecryptor;
pub use envelope::{Envelope, EnvelopeError};
