//! Short code generation.
//!
//! Two strategies share one 62-symbol, URL-path-safe alphabet:
//!
//! - **Derived**: base62 encoding of the persistence-assigned link id. Ids are
//!   unique, so derived codes never collide.
//! - **Random**: fixed-length codes drawn from the OS CSPRNG. The store's unique
//!   constraint decides collisions; the caller redraws on conflict.

use std::str::FromStr;

use serde_json::json;

use crate::error::AppError;

/// Code alphabet. Index 0 (`a`) encodes the value zero.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of randomly drawn codes.
pub const RANDOM_CODE_LENGTH: usize = 6;

/// Largest multiple of 62 that fits in a byte; bytes at or above it are rejected
/// so every symbol is equally likely.
const REJECTION_THRESHOLD: u8 = 248;

/// Code generation strategy, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeStrategy {
    #[default]
    Derived,
    Random,
}

impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derived" => Ok(Self::Derived),
            "random" => Ok(Self::Random),
            other => Err(format!(
                "unknown code strategy '{other}', expected 'derived' or 'random'"
            )),
        }
    }
}

impl CodeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Random => "random",
        }
    }
}

/// Encodes a non-negative integer in base62, most significant symbol first.
///
/// ```ignore
/// assert_eq!(encode_base62(0), "a");
/// assert_eq!(encode_base62(62), "ba");
/// ```
pub fn encode_base62(mut value: u64) -> String {
    if value == 0 {
        return (BASE62_ALPHABET[0] as char).to_string();
    }

    let mut symbols = Vec::new();
    while value > 0 {
        symbols.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    symbols.reverse();

    symbols.into_iter().map(char::from).collect()
}

/// Decodes a base62 string produced by [`encode_base62`].
///
/// Returns `None` for empty input, foreign symbols or overflow.
pub fn decode_base62(code: &str) -> Option<u64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, byte| {
        let digit = BASE62_ALPHABET.iter().position(|&s| s == byte)? as u64;
        acc.checked_mul(62)?.checked_add(digit)
    })
}

/// Draws a random code of `length` symbols from the OS random source.
///
/// # Errors
///
/// Returns the underlying error if the system random source is unavailable.
pub fn generate_random_code(length: usize) -> Result<String, getrandom::Error> {
    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while code.len() < length {
        getrandom::fill(&mut buffer)?;

        for &byte in buffer.iter().filter(|&&b| b < REJECTION_THRESHOLD) {
            if code.len() == length {
                break;
            }
            code.push(BASE62_ALPHABET[(byte % 62) as usize] as char);
        }
    }

    Ok(code)
}

/// Source of random code candidates.
#[cfg_attr(test, mockall::automock)]
pub trait CodeSource: Send + Sync {
    /// Draws one candidate code.
    fn draw(&self) -> Result<String, AppError>;
}

/// [`CodeSource`] backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCodeSource;

impl CodeSource for OsCodeSource {
    fn draw(&self) -> Result<String, AppError> {
        generate_random_code(RANDOM_CODE_LENGTH).map_err(|e| {
            AppError::internal(
                "Failed to generate short code",
                json!({ "reason": e.to_string() }),
            )
        })
    }
}
