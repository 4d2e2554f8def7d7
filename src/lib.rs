//! # totp-core — TOTP / HOTP second-factor core
//!
//! The algorithmic heart of a TOTP second factor, with no storage, transport
//! or rendering attached:
//!
//! - **RFC 4226 / 6238** – HOTP & TOTP generation with SHA-1, SHA-256, SHA-512
//! - **Verification** – configurable drift window, constant-time comparison
//! - **otpauth:// URIs** – Parsing & generation per the Google Authenticator spec
//! - **Secrets** – OS-CSPRNG shared-secret generation, Base32 transport codec
//!
//! Every operation is a pure synchronous function over its explicit inputs
//! (the secret generator's entropy draw being the only non-determinism), so
//! the crate is safe to call concurrently without coordination. Persistence,
//! replay defense, rate limiting and QR rendering belong to the caller.

pub mod totp;
