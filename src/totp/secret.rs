//! Shared-secret generation.
//!
//! Draws from the OS CSPRNG directly — no process-wide RNG handle, so
//! concurrent callers need no coordination.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::totp::types::{TotpError, TotpErrorKind, DEFAULT_SECRET_BYTES};

/// Generate a random shared secret of `byte_length` bytes.
pub fn generate_secret(byte_length: usize) -> Result<Vec<u8>, TotpError> {
    if byte_length == 0 {
        return Err(TotpError::new(
            TotpErrorKind::InvalidLength,
            "Secret length must be at least one byte",
        ));
    }

    let mut buf = vec![0u8; byte_length];
    OsRng.try_fill_bytes(&mut buf).map_err(|e| {
        log::warn!("OS random source unavailable: {}", e);
        TotpError::new(TotpErrorKind::Entropy, "OS random source unavailable")
            .with_detail(e.to_string())
    })?;
    Ok(buf)
}

/// Generate a secret of the recommended length (20 bytes / 160 bits).
pub fn generate_default_secret() -> Result<Vec<u8>, TotpError> {
    generate_secret(DEFAULT_SECRET_BYTES)
}
