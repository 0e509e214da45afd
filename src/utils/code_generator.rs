//! Short code generation and validation utilities.
//!
//! Generated codes are 6 characters drawn uniformly from a 62-symbol
//! alphabet using the operating system CSPRNG. Predictable codes would let
//! anyone guess or squat future links, so no user-space PRNG is involved.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Symbols a generated short code is made of.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bytes at or above this value are rejected; 248 is the largest multiple
/// of 62 that fits in a byte, so `byte % 62` stays uniform.
const ACCEPT_BELOW: u8 = 248;

/// Maximum length of a custom short code.
pub const CUSTOM_CODE_MAX_LENGTH: usize = 32;

/// Characters a custom short code may contain.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Codes that would shadow service routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Generates a random short code.
///
/// Uniqueness is not checked here; the caller inserts the code and retries
/// with a fresh one when storage reports a conflict.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails. This is
/// not retried: the request is aborted with a 500.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> Result<String, AppError> {
    generate_code_from(|buf| getrandom::fill(buf).map_err(|e| e.to_string()))
}

/// Builds a code from an arbitrary byte source using rejection sampling.
fn generate_code_from<F>(mut fill: F) -> Result<String, AppError>
where
    F: FnMut(&mut [u8]) -> Result<(), String>,
{
    let mut code = String::with_capacity(CODE_LENGTH);
    let mut buffer = [0u8; 16];

    while code.len() < CODE_LENGTH {
        fill(&mut buffer).map_err(|reason| {
            AppError::internal("Random source unavailable", json!({ "reason": reason }))
        })?;

        for byte in buffer.iter().copied().filter(|b| *b < ACCEPT_BELOW) {
            code.push(char::from(ALPHABET[usize::from(byte % 62)]));
            if code.len() == CODE_LENGTH {
                break;
            }
        }
    }

    Ok(code)
}

/// Validates a user-provided custom short code.
///
/// The code is stored verbatim, so it only has to be URL-path safe.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > CUSTOM_CODE_MAX_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 1-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
