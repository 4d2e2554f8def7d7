//! Base32 transport codec for shared secrets (RFC 4648).
//!
//! Encoding is canonical: uppercase alphabet `A–Z2–7`, `=` padding to
//! 8-character groups. Decoding accepts either case and ignores padding,
//! but rejects any character outside the alphabet and any character count
//! whose bit length cannot map to whole bytes.

use base32::Alphabet;

use crate::totp::types::{TotpError, TotpErrorKind};

/// Encode raw bytes as padded, uppercase Base32.
pub fn encode(bytes: &[u8]) -> String {
    base32::encode(Alphabet::Rfc4648 { padding: true }, bytes)
}

/// Decode Base32 text (either case, padding optional) into raw bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, TotpError> {
    let cleaned = text.trim_end_matches('=').to_uppercase();

    if let Some(bad) = cleaned
        .chars()
        .find(|c| !matches!(c, 'A'..='Z' | '2'..='7'))
    {
        return Err(TotpError::new(
            TotpErrorKind::Format,
            format!("Invalid base-32 character: {:?}", bad),
        ));
    }

    // 5 bits per character: remainders 1, 3 and 6 leave trailing bits that
    // no whole-byte input could have produced.
    if matches!(cleaned.len() % 8, 1 | 3 | 6) {
        return Err(TotpError::new(
            TotpErrorKind::Format,
            format!("Truncated base-32 input ({} characters)", cleaned.len()),
        ));
    }

    base32::decode(Alphabet::Rfc4648 { padding: false }, &cleaned)
        .ok_or_else(|| TotpError::new(TotpErrorKind::Format, "Invalid base-32 input"))
}

/// Check if a string is decodable Base32.
pub fn is_valid(text: &str) -> bool {
    !text.trim_end_matches('=').is_empty() && decode(text).is_ok()
}
