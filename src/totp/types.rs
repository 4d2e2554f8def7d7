//! Core types for the TOTP second-factor engine.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Defaults
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Recommended shared-secret length in bytes (160 bits, RFC 4226 §4).
pub const DEFAULT_SECRET_BYTES: usize = 20;

/// Default number of code digits.
pub const DEFAULT_DIGITS: u8 = 6;

/// Smallest supported digit count (RFC 4226 §5.3).
pub const MIN_DIGITS: u8 = 6;

/// Largest supported digit count.
pub const MAX_DIGITS: u8 = 8;

/// Default TOTP time-step in seconds.
pub const DEFAULT_PERIOD: u32 = 30;

/// Default verification drift window: only the current time-step is
/// accepted. Widening tolerance is a deployment choice, not a core change.
pub const DEFAULT_DRIFT_WINDOW: u32 = 0;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm used for HMAC-based OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_name())
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// URI-safe name for `otpauth://` parameters.
    pub fn uri_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Credential
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One enrolled second factor: the shared secret plus its display and
/// generation parameters. Purely derived data with no identity of its own;
/// persistence is the account store's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Issuer shown by authenticator apps (e.g. "GitHub").
    pub issuer: Option<String>,
    /// Account label (e.g. "user@example.com").
    pub label: String,
    /// Raw shared-secret bytes. Base32 only at the transport edges.
    pub secret: Vec<u8>,
    /// Hash algorithm.
    pub algorithm: Algorithm,
    /// Number of digits in the generated code (6–8).
    pub digits: u8,
    /// Time-step in seconds.
    pub period: u32,
}

impl Credential {
    /// Create a credential with default parameters (SHA-1, 6 digits, 30 s).
    pub fn new(label: impl Into<String>, secret: Vec<u8>) -> Self {
        Self {
            issuer: None,
            label: label.into(),
            secret,
            algorithm: Algorithm::default(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }

    /// Builder: set issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Builder: set algorithm.
    pub fn with_algorithm(mut self, algo: Algorithm) -> Self {
        self.algorithm = algo;
        self
    }

    /// Builder: set digit count.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Builder: set time-step.
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Display name: "Issuer (label)" or just "label".
    pub fn display_name(&self) -> String {
        match &self.issuer {
            Some(iss) if !iss.is_empty() => format!("{} ({})", iss, self.label),
            _ => self.label.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate. All variants are local, non-retryable
/// data-validation failures; a wrong code during verification is not an
/// error (see [`VerifyResult`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotpErrorKind {
    /// Malformed Base32 text.
    Format,
    /// OS random source unavailable.
    Entropy,
    /// Digit count outside the supported 6–8 range.
    InvalidDigits,
    /// Unparsable `otpauth://` provisioning URI.
    MalformedUri,
    /// Zero-length secret requested.
    InvalidLength,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotpError {
    pub kind: TotpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for TotpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for TotpError {}

impl TotpError {
    pub fn new(kind: TotpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of verifying a submitted code.
///
/// `matched_counter` is exposed so callers can keep a "last accepted
/// counter" record for replay defense; this core performs none itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    /// How many time-steps off the match was (0 = exact, negative = past).
    pub drift: i64,
    /// The counter value that matched (if any).
    pub matched_counter: Option<u64>,
}

impl VerifyResult {
    pub(crate) fn mismatch() -> Self {
        Self {
            valid: false,
            drift: 0,
            matched_counter: None,
        }
    }
}
