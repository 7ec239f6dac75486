//! The `{key, iv, encryptedData}` wire envelope and its hex decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use super::cipher::{CipherError, AES128_KEY_LEN, AES256_KEY_LEN, BLOCK_LEN};

/// Errors produced while parsing, decoding, or opening an envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The value is not a JSON object with exactly `key`, `iv` and `encryptedData` strings.
    #[error("value is not an encrypted field envelope")]
    Malformed,

    /// One of the attributes is not valid hex (odd length or a non-hex digit).
    #[error("envelope attribute `{field}` is not valid hex")]
    InvalidHex {
        /// Wire name of the offending attribute.
        field: &'static str,
    },

    /// The decoded key is not 16 or 32 bytes.
    #[error("invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// The decoded IV is not 16 bytes.
    #[error("invalid iv length: {0} bytes")]
    InvalidIvLength(usize),

    /// The decoded ciphertext is empty or not a whole number of blocks.
    #[error("invalid ciphertext length: {0} bytes")]
    InvalidCiphertextLength(usize),

    /// PKCS#7 padding failed to validate.
    #[error("invalid padding")]
    Padding,

    /// Decryption succeeded but the plaintext is not UTF-8.
    #[error("plaintext is not valid UTF-8")]
    Utf8,
}

impl EnvelopeError {
    /// `true` when the input simply was not an envelope, as opposed to an
    /// envelope that failed to open.
    pub fn is_not_envelope(&self) -> bool {
        matches!(self, EnvelopeError::Malformed)
    }
}

impl From<CipherError> for EnvelopeError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::InvalidKeyLength(n) => EnvelopeError::InvalidKeyLength(n),
            CipherError::InvalidCiphertextLength(n) => EnvelopeError::InvalidCiphertextLength(n),
            CipherError::Padding => EnvelopeError::Padding,
        }
    }
}

/// Encrypted field envelope exactly as it appears on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Envelope {
    /// Raw AES key, hex.
    pub key: String,
    /// 16-byte IV, hex.
    pub iv: String,
    /// Ciphertext, hex.
    pub encrypted_data: String,
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key, IV and ciphertext stay out of logs.
        f.debug_struct("Envelope")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .field("encrypted_data_len", &self.encrypted_data.len())
            .finish()
    }
}

/// Envelope attributes decoded to raw bytes and checked for size.
pub struct DecodedEnvelope {
    /// AES key; zeroed on drop.
    pub key: Zeroizing<Vec<u8>>,
    /// CBC initialization vector.
    pub iv: [u8; BLOCK_LEN],
    /// Ciphertext, a whole number of blocks.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse the JSON-encoded envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] for anything that is not a JSON
    /// object with exactly the three string attributes.
    pub fn parse(s: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(s).map_err(|_| EnvelopeError::Malformed)
    }

    /// Build an envelope from raw parts.
    pub fn from_parts(key: &[u8], iv: &[u8; BLOCK_LEN], ciphertext: &[u8]) -> Self {
        Self {
            key: hex::encode(key),
            iv: hex::encode(iv),
            encrypted_data: hex::encode(ciphertext),
        }
    }

    /// Serialise back to the JSON wire string.
    pub fn to_json_string(&self) -> String {
        // A struct of three strings always serialises.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Hex-decode all attributes and validate their sizes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidHex`] or one of the length variants.
    pub fn decode(&self) -> Result<DecodedEnvelope, EnvelopeError> {
        let key = Zeroizing::new(
            hex::decode(&self.key).map_err(|_| EnvelopeError::InvalidHex { field: "key" })?,
        );
        if key.len() != AES128_KEY_LEN && key.len() != AES256_KEY_LEN {
            return Err(EnvelopeError::InvalidKeyLength(key.len()));
        }

        let iv_bytes =
            hex::decode(&self.iv).map_err(|_| EnvelopeError::InvalidHex { field: "iv" })?;
        let iv: [u8; BLOCK_LEN] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| EnvelopeError::InvalidIvLength(iv_bytes.len()))?;

        let ciphertext = hex::decode(&self.encrypted_data).map_err(|_| EnvelopeError::InvalidHex {
            field: "encryptedData",
        })?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(EnvelopeError::InvalidCiphertextLength(ciphertext.len()));
        }

        Ok(DecodedEnvelope {
            key,
            iv,
            ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "00112233445566778899aabbccddeeff";
    const IV: &str = "000102030405060708090a0b0c0d0e0f";

    fn envelope(key: &str, iv: &str, data: &str) -> Envelope {
        Envelope {
            key: key.into(),
            iv: iv.into(),
            encrypted_data: data.into(),
        }
    }

    #[test]
    fn parse_accepts_wire_shape() {
        let s = format!(r#"{{"key":"{KEY}","iv":"{IV}","encryptedData":"00"}}"#);
        let env = Envelope::parse(&s).unwrap();
        assert_eq!(env.key, KEY);
        assert_eq!(env.encrypted_data, "00");
    }

    #[test]
    fn parse_rejects_missing_attribute() {
        let s = format!(r#"{{"key":"{KEY}","iv":"{IV}"}}"#);
        assert_eq!(Envelope::parse(&s), Err(EnvelopeError::Malformed));
    }

    #[test]
    fn parse_rejects_extra_attribute() {
        let s = format!(r#"{{"key":"{KEY}","iv":"{IV}","encryptedData":"00","tag":"x"}}"#);
        assert_eq!(Envelope::parse(&s), Err(EnvelopeError::Malformed));
    }

    #[test]
    fn parse_rejects_non_string_attribute() {
        let s = format!(r#"{{"key":"{KEY}","iv":"{IV}","encryptedData":42}}"#);
        assert_eq!(Envelope::parse(&s), Err(EnvelopeError::Malformed));
    }

    #[test]
    fn parse_rejects_plain_text_and_arrays() {
        assert!(Envelope::parse("plain unencrypted text").is_err());
        assert!(Envelope::parse("[1,2,3]").is_err());
        assert!(Envelope::parse("{").is_err());
    }

    #[test]
    fn decode_accepts_both_key_sizes() {
        let data = "00".repeat(16);
        assert!(envelope(KEY, IV, &data).decode().is_ok());
        assert!(envelope(&KEY.repeat(2), IV, &data).decode().is_ok());
    }

    #[test]
    fn decode_rejects_fifteen_byte_key() {
        let data = "00".repeat(16);
        let err = envelope(&KEY[..30], IV, &data).decode().err().unwrap();
        assert_eq!(err, EnvelopeError::InvalidKeyLength(15));
    }

    #[test]
    fn decode_rejects_odd_length_hex() {
        let data = "00".repeat(16);
        let err = envelope(&KEY[..31], IV, &data).decode().err().unwrap();
        assert_eq!(err, EnvelopeError::InvalidHex { field: "key" });
    }

    #[test]
    fn decode_rejects_non_hex_digits() {
        let err = envelope(KEY, IV, &"zz".repeat(16)).decode().err().unwrap();
        assert_eq!(
            err,
            EnvelopeError::InvalidHex {
                field: "encryptedData"
            }
        );
    }

    #[test]
    fn decode_rejects_short_iv() {
        let err = envelope(KEY, &IV[..30], &"00".repeat(16))
            .decode()
            .err()
            .unwrap();
        assert_eq!(err, EnvelopeError::InvalidIvLength(15));
    }

    #[test]
    fn decode_rejects_partial_block() {
        let err = envelope(KEY, IV, &"00".repeat(17)).decode().err().unwrap();
        assert_eq!(err, EnvelopeError::InvalidCiphertextLength(17));
    }

    #[test]
    fn decode_accepts_uppercase_hex() {
        let decoded = envelope(&KEY.to_uppercase(), IV, &"AB".repeat(16))
            .decode()
            .unwrap();
        assert_eq!(decoded.key[15], 0xff);
        assert_eq!(decoded.ciphertext[0], 0xab);
    }

    #[test]
    fn debug_redacts_key_material() {
        let dbg = format!("{:?}", envelope(KEY, IV, "00"));
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains(KEY));
    }

    #[test]
    fn json_string_uses_wire_names() {
        let s = envelope(KEY, IV, "00").to_json_string();
        assert!(s.contains(r#""encryptedData":"00""#));
        assert_eq!(Envelope::parse(&s).unwrap().key, KEY);
    }
}
