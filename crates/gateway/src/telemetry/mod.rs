//! Telemetry setup: structured JSON logs, optionally exporting spans over OTLP.
//!
//! # Telemetry invariants
//!
//! - **No key material, IVs, ciphertext, or decrypted plaintext** may appear
//!   in any span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
