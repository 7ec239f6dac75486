//! `lens-gateway`: serves the lens list with envelope-encrypted fields opened.
//!
//! The [`crypto`] module holds the single field decryption contract; the rest
//! of the crate fetches lens records ([`upstream`]), decodes them ([`lens`]),
//! and exposes them over HTTP ([`server`]).

pub mod config;
pub mod crypto;
pub mod lens;
pub mod server;
pub mod telemetry;
pub mod upstream;
