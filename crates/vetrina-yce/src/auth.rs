// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider credential hygiene.
//!
//! The S2S API uses V2 secret keys with a fixed `sk-` prefix. V1 tokens
//! (access_token, id_token, client_secret) are a recurring misconfiguration,
//! so the format is checked before any provider call: failing here is far
//! cheaper than a charged task creation that comes back 401.

use thiserror::Error;

/// Expected prefix of a V2 S2S secret key.
pub const KEY_PREFIX: &str = "sk-";

/// Minimum plausible key length.
pub const MIN_KEY_LENGTH: usize = 20;

/// A syntactically invalid provider credential.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("provider API key is not configured")]
    Missing,

    #[error(
        "API key does not appear to be a V2 S2S secret key; V2 keys start with \"sk-\". \
         Ensure you are not using a V1 access_token, id_token, or client_secret"
    )]
    BadPrefix,

    #[error("API key appears to be too short; V2 S2S secret keys are typically longer")]
    TooShort,
}

/// Strip whitespace and accidental wrapping quotes from a configured key.
///
/// Keys pasted into env files frequently arrive as `"sk-..."` including the
/// quotes.
pub fn clean_api_key(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
        })
        .unwrap_or(trimmed)
        .to_string()
}

/// Validate the cleaned key's format.
pub fn validate_api_key(key: &str) -> Result<(), CredentialError> {
    if key.is_empty() {
        return Err(CredentialError::Missing);
    }
    if !key.starts_with(KEY_PREFIX) {
        return Err(CredentialError::BadPrefix);
    }
    if key.len() < MIN_KEY_LENGTH {
        return Err(CredentialError::TooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key_passes() {
        assert_eq!(validate_api_key("sk-test-0123456789abcdef0123"), Ok(()));
    }

    #[test]
    fn empty_key_is_missing() {
        assert_eq!(validate_api_key(""), Err(CredentialError::Missing));
    }

    #[test]
    fn v1_token_is_rejected_by_prefix() {
        assert_eq!(
            validate_api_key("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            Err(CredentialError::BadPrefix)
        );
    }

    #[test]
    fn short_key_is_rejected() {
        assert_eq!(validate_api_key("sk-short"), Err(CredentialError::TooShort));
    }

    #[test]
    fn clean_strips_whitespace_and_quotes() {
        assert_eq!(clean_api_key("  sk-abc  "), "sk-abc");
        assert_eq!(clean_api_key("\"sk-abc\""), "sk-abc");
        assert_eq!(clean_api_key("'sk-abc'"), "sk-abc");
        assert_eq!(clean_api_key(" \"sk-abc\" "), "sk-abc");
        // Unmatched quote is left alone.
        assert_eq!(clean_api_key("\"sk-abc"), "\"sk-abc");
    }
}
