//! [`FieldDecryptor`]: the single implementation of the field decryption contract.
//!
//! `decrypt(value) -> plaintext`. Anything that is not a decryptable envelope
//! comes back unchanged; the function never fails past its boundary.

use serde_json::Value;
use tracing::{debug, warn};

use super::cipher::{CbcBackend, RustCryptoCbc, BLOCK_LEN};
use super::envelope::{Envelope, EnvelopeError};

/// Decrypts envelope-encoded field values.
///
/// Stateless apart from the backend, which is itself stateless; a single
/// instance can be shared across tasks and threads.
#[derive(Debug, Clone, Default)]
pub struct FieldDecryptor<B = RustCryptoCbc> {
    backend: B,
}

impl FieldDecryptor {
    /// Create a decryptor backed by [`RustCryptoCbc`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: CbcBackend> FieldDecryptor<B> {
    /// Create a decryptor over a specific block primitive.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Decrypt `value`, reporting why it could not be opened.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] for a value that is not an envelope, has bad
    /// hex or sizes, fails padding, or decrypts to non-UTF-8 bytes.
    pub fn try_decrypt(&self, value: &str) -> Result<String, EnvelopeError> {
        let decoded = Envelope::parse(value)?.decode()?;
        let plaintext = self
            .backend
            .decrypt(&decoded.key, &decoded.iv, &decoded.ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| EnvelopeError::Utf8)
    }

    /// Decrypt `value`, falling back to the original string on any failure.
    ///
    /// The empty string is returned as-is without touching the cipher.
    pub fn decrypt(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        match self.try_decrypt(value) {
            Ok(plaintext) => plaintext,
            Err(e) if e.is_not_envelope() => {
                debug!("field is not an envelope; passing through");
                value.to_owned()
            }
            Err(e) => {
                warn!(error = %e, "field decryption failed; passing original value through");
                value.to_owned()
            }
        }
    }

    /// Decrypt a JSON field value if it looks encrypted.
    ///
    /// Only strings starting with `{` are considered; numbers, booleans,
    /// nulls and plain strings are returned unchanged.
    pub fn decrypt_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) if s.starts_with('{') => Value::String(self.decrypt(&s)),
            other => other,
        }
    }

    /// Encrypt `plaintext` into a wire envelope.
    ///
    /// The gateway never re-encrypts on a request path; this exists to build
    /// fixtures that match what the lens backend emits.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidKeyLength`] for a key that is not 16 or 32 bytes.
    pub fn encrypt_field(
        &self,
        plaintext: &str,
        key: &[u8],
        iv: &[u8; BLOCK_LEN],
    ) -> Result<Envelope, EnvelopeError> {
        let ciphertext = self.backend.encrypt(key, iv, plaintext.as_bytes())?;
        Ok(Envelope::from_parts(key, iv, &ciphertext))
    }
}
