//! Core OTP generation — RFC 4226 (HOTP) and RFC 6238 (TOTP).
//!
//! HMAC-based One-Time Password with SHA-1, SHA-256, and SHA-512,
//! time-step calculation, and code verification with a configurable
//! drift window. Everything here is a pure function of its inputs;
//! keys are raw bytes (Base32 lives at the transport edge, see
//! [`crate::totp::base32`]).

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::totp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (counter-based, RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given raw key bytes and counter.
///
/// `digits` must be within 6–8.
pub fn hotp(key: &[u8], counter: u64, digits: u8, algo: Algorithm) -> Result<String, TotpError> {
    check_digits(digits)?;
    let hmac_result = compute_hmac(key, &counter.to_be_bytes(), algo);
    Ok(truncate(&hmac_result, digits))
}

fn check_digits(digits: u8) -> Result<(), TotpError> {
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return Err(TotpError::new(
            TotpErrorKind::InvalidDigits,
            format!(
                "Digit count {} outside supported range {}-{}",
                digits, MIN_DIGITS, MAX_DIGITS
            ),
        ));
    }
    Ok(())
}

/// Compute HMAC(key, message) using the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(hmac_result: &[u8], digits: u8) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let modulus = 10u32.pow(digits as u32);
    format!("{:0>width$}", binary % modulus, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the current TOTP time-step counter.
pub fn time_step(period: u32) -> u64 {
    time_step_at(current_unix_time(), period)
}

/// Compute the time-step counter for a given unix timestamp.
///
/// `period` must be positive.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    debug_assert!(period > 0, "period must be positive");
    unix_seconds / period as u64
}

/// Seconds remaining until the current time-step expires.
pub fn seconds_remaining(period: u32) -> u32 {
    seconds_remaining_at(current_unix_time(), period)
}

/// Seconds remaining for a specific timestamp.
///
/// `period` must be positive.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    debug_assert!(period > 0, "period must be positive");
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

/// Generate a TOTP code at the current time.
pub fn totp(key: &[u8], digits: u8, period: u32, algo: Algorithm) -> Result<String, TotpError> {
    totp_at(key, digits, period, algo, current_unix_time())
}

/// Generate a TOTP code at an explicit unix timestamp.
///
/// `period` must be positive.
pub fn totp_at(
    key: &[u8],
    digits: u8,
    period: u32,
    algo: Algorithm,
    unix_seconds: u64,
) -> Result<String, TotpError> {
    hotp(key, time_step_at(unix_seconds, period), digits, algo)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verify a submitted code against the current time.
///
/// `window` is how many time-steps to accept on either side of the current
/// one; the default window of 0 accepts only the exact step.
pub fn verify(
    key: &[u8],
    code: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
    window: u32,
) -> Result<VerifyResult, TotpError> {
    verify_at(key, code, digits, period, algo, window, current_unix_time())
}

/// Verify at a specific timestamp.
///
/// A wrong code is not an error: it yields `valid: false`. Verification
/// mutates nothing and is safe to call repeatedly; replay defense is the
/// caller's job via [`VerifyResult::matched_counter`]. `period` must be
/// positive.
pub fn verify_at(
    key: &[u8],
    code: &str,
    digits: u8,
    period: u32,
    algo: Algorithm,
    window: u32,
    unix_seconds: u64,
) -> Result<VerifyResult, TotpError> {
    check_digits(digits)?;

    // Shape check before any HMAC work: digits only, correct length.
    if code.len() != digits as usize || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(VerifyResult::mismatch());
    }

    let base_counter = time_step_at(unix_seconds, period);
    let start = base_counter.saturating_sub(window as u64);
    let end = base_counter + window as u64;

    for c in start..=end {
        let generated = hotp(key, c, digits, algo)?;
        if constant_time_eq(generated.as_bytes(), code.as_bytes()) {
            let drift = c as i64 - base_counter as i64;
            log::debug!("code accepted at counter {} (drift {})", c, drift);
            return Ok(VerifyResult {
                valid: true,
                drift,
                matched_counter: Some(c),
            });
        }
    }

    Ok(VerifyResult::mismatch())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  High-level: credential wrappers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate the code for a [`Credential`] at a specific unix timestamp.
pub fn credential_code_at(cred: &Credential, unix_seconds: u64) -> Result<String, TotpError> {
    totp_at(
        &cred.secret,
        cred.digits,
        cred.period,
        cred.algorithm,
        unix_seconds,
    )
}

/// Generate the code for a [`Credential`] at the current time.
pub fn credential_code(cred: &Credential) -> Result<String, TotpError> {
    credential_code_at(cred, current_unix_time())
}

/// Verify a submitted code against a [`Credential`] at a specific timestamp.
pub fn credential_verify_at(
    cred: &Credential,
    code: &str,
    window: u32,
    unix_seconds: u64,
) -> Result<VerifyResult, TotpError> {
    verify_at(
        &cred.secret,
        code,
        cred.digits,
        cred.period,
        cred.algorithm,
        window,
        unix_seconds,
    )
}

/// Verify a submitted code against a [`Credential`] at the current time.
pub fn credential_verify(
    cred: &Credential,
    code: &str,
    window: u32,
) -> Result<VerifyResult, TotpError> {
    credential_verify_at(cred, code, window, current_unix_time())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Utility helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Current unix timestamp in seconds.
fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Constant-time comparison (to prevent timing attacks on code verification).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
