//! lanscan-core: Shared types and error handling for the lanscan inventory engine.
//!
//! This crate provides the foundational types used across lanscan components:
//! - `MacAddress`, a validated link-layer address with canonical formatting
//! - Device, snapshot, and diff types produced by a discovery pass
//! - Security classification types
//! - Common error types

pub mod error;
pub mod mac;
pub mod types;

pub use error::ParseError;
pub use mac::MacAddress;
