//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code strategies (derived base62 and random)
//! - [`url_validator`] - Redirect target validation and host blocklist
//! - [`qr`] - QR artifact rendering
//! - [`db_error`] - Unique-violation classification for sqlx errors

pub mod code_generator;
pub mod db_error;
pub mod qr;
pub mod url_validator;
