//! TOTP crate: sub-modules.

pub mod base32;
pub mod core;
pub mod secret;
pub mod types;
pub mod uri;

// Re-export top-level items for convenience.
pub use self::core::{
    credential_code, credential_code_at, credential_verify, credential_verify_at, hotp,
    seconds_remaining, seconds_remaining_at, time_step, time_step_at, totp, totp_at, verify,
    verify_at,
};
pub use self::secret::{generate_default_secret, generate_secret};
pub use self::types::*;
pub use self::uri::{build_otpauth_uri, parse_otpauth_uri};
