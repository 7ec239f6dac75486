//! Common types, protocol definitions, and errors shared across `lens-gateway` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
