//! `otpauth://` URI parsing and generation per the Google Authenticator
//! key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Format: `otpauth://totp/ISSUER:LABEL?secret=BASE32&issuer=ISSUER&algorithm=SHA1&digits=6&period=30`

use crate::totp::base32;
use crate::totp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an `otpauth://totp/...` URI into a [`Credential`].
///
/// Unknown query parameters are ignored; out-of-range `digits`/`period`
/// values fall back to the defaults.
pub fn parse_otpauth_uri(uri: &str) -> Result<Credential, TotpError> {
    let url = url::Url::parse(uri).map_err(|e| {
        TotpError::new(TotpErrorKind::MalformedUri, format!("Invalid URI: {}", e))
    })?;

    if url.scheme() != "otpauth" {
        return Err(TotpError::new(
            TotpErrorKind::MalformedUri,
            format!("Expected scheme 'otpauth', got '{}'", url.scheme()),
        ));
    }

    if url.host_str() != Some("totp") {
        return Err(TotpError::new(
            TotpErrorKind::MalformedUri,
            format!("Expected authority 'totp', got {:?}", url.host_str()),
        ));
    }

    // Path is "/LABEL" or "/ISSUER:LABEL". Split on the raw separator
    // before decoding so an encoded colon inside a segment survives.
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);

    let (path_issuer, label) = if let Some(colon_pos) = path.find(':') {
        let issuer = url_decode(&path[..colon_pos]).trim().to_string();
        let label = url_decode(&path[colon_pos + 1..]).trim().to_string();
        (Some(issuer), label)
    } else {
        (None, url_decode(path).trim().to_string())
    };

    // Query parameters
    let mut secret_b32 = None;
    let mut param_issuer = None;
    let mut algorithm = Algorithm::default();
    let mut digits = DEFAULT_DIGITS;
    let mut period = DEFAULT_PERIOD;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => secret_b32 = Some(value.to_string()),
            "issuer" => param_issuer = Some(value.to_string()),
            "algorithm" => {
                if let Some(algo) = Algorithm::from_str_loose(&value) {
                    algorithm = algo;
                }
            }
            "digits" => {
                if let Ok(d) = value.parse::<u8>() {
                    if (MIN_DIGITS..=MAX_DIGITS).contains(&d) {
                        digits = d;
                    }
                }
            }
            "period" => {
                if let Ok(p) = value.parse::<u32>() {
                    if p > 0 {
                        period = p;
                    }
                }
            }
            _ => {} // ignore unknown params
        }
    }

    let secret_b32 = secret_b32.ok_or_else(|| {
        TotpError::new(TotpErrorKind::MalformedUri, "Missing 'secret' parameter")
    })?;
    let secret = base32::decode(&secret_b32).map_err(|e| {
        TotpError::new(TotpErrorKind::MalformedUri, "Undecodable 'secret' parameter")
            .with_detail(e.to_string())
    })?;

    // Prefer issuer from query param, then from path prefix
    let issuer = param_issuer.or(path_issuer);

    let mut cred = Credential::new(label, secret)
        .with_algorithm(algorithm)
        .with_digits(digits)
        .with_period(period);

    if let Some(iss) = issuer.filter(|i| !i.is_empty()) {
        cred = cred.with_issuer(iss);
    }

    Ok(cred)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Build
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build an `otpauth://totp/...` URI from a [`Credential`].
///
/// Default algorithm/digits/period are omitted, matching what authenticator
/// apps emit themselves.
pub fn build_otpauth_uri(cred: &Credential) -> String {
    let label = url_encode(&cred.label);

    let path = match &cred.issuer {
        Some(iss) if !iss.is_empty() => format!("{}:{}", url_encode(iss), label),
        _ => label,
    };

    // '=' is reserved in query strings; authenticator apps expect the
    // secret unpadded.
    let secret_b32 = base32::encode(&cred.secret);
    let secret_b32 = secret_b32.trim_end_matches('=');

    let mut params = vec![format!("secret={}", secret_b32)];

    if let Some(ref iss) = cred.issuer {
        if !iss.is_empty() {
            params.push(format!("issuer={}", url_encode(iss)));
        }
    }

    if cred.algorithm != Algorithm::default() {
        params.push(format!("algorithm={}", cred.algorithm.uri_name()));
    }

    if cred.digits != DEFAULT_DIGITS {
        params.push(format!("digits={}", cred.digits));
    }

    if cred.period != DEFAULT_PERIOD {
        params.push(format!("period={}", cred.period));
    }

    format!("otpauth://totp/{}?{}", path, params.join("&"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  URL encoding helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn url_encode(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            b' ' => output.push_str("%20"),
            b'@' => output.push_str("%40"),
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}

fn url_decode(s: &str) -> String {
    // Decode to bytes first: a multi-byte UTF-8 character arrives as one
    // percent-escape per byte.
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                bytes.push(byte);
            } else {
                bytes.push(b'%');
                bytes.extend_from_slice(hex.as_bytes());
            }
        } else if c == '+' {
            bytes.push(b' ');
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    // JBSWY3DPEHPK3PXP = "Hello!\xde\xad\xbe\xef"
    const SECRET_B32: &str = "JBSWY3DPEHPK3PXP";

    fn secret_bytes() -> Vec<u8> {
        base32::decode(SECRET_B32).unwrap()
    }

    // ── Parse basic TOTP URI ─────────────────────────────────────

    #[test]
    fn parse_basic_totp() {
        let uri = "otpauth://totp/Example:alice@example.com?secret=JBSWY3DPEHPK3PXP&issuer=Example";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.label, "alice@example.com");
        assert_eq!(cred.issuer.as_deref(), Some("Example"));
        assert_eq!(cred.secret, secret_bytes());
        assert_eq!(cred.algorithm, Algorithm::Sha1);
        assert_eq!(cred.digits, 6);
        assert_eq!(cred.period, 30);
    }

    #[test]
    fn parse_all_params() {
        let uri = "otpauth://totp/GitHub:user?secret=JBSWY3DPEHPK3PXP&algorithm=SHA256&digits=8&period=60&issuer=GitHub";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.algorithm, Algorithm::Sha256);
        assert_eq!(cred.digits, 8);
        assert_eq!(cred.period, 60);
        assert_eq!(cred.issuer.as_deref(), Some("GitHub"));
    }

    #[test]
    fn parse_no_issuer() {
        let uri = "otpauth://totp/myaccount?secret=JBSWY3DPEHPK3PXP";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.label, "myaccount");
        assert!(cred.issuer.is_none());
    }

    #[test]
    fn parse_issuer_in_path_only() {
        let uri = "otpauth://totp/Acme:user@ex.com?secret=JBSWY3DPEHPK3PXP";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.issuer.as_deref(), Some("Acme"));
        assert_eq!(cred.label, "user@ex.com");
    }

    #[test]
    fn parse_encoded_chars() {
        let uri = "otpauth://totp/My%20Corp:my%20user?secret=JBSWY3DPEHPK3PXP&issuer=My%20Corp";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.issuer.as_deref(), Some("My Corp"));
        assert_eq!(cred.label, "my user");
    }

    #[test]
    fn parse_lowercase_padded_secret() {
        let uri = "otpauth://totp/a?secret=mzxw6===";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.secret, b"foo");
    }

    #[test]
    fn parse_ignores_out_of_range_params() {
        let uri = "otpauth://totp/a?secret=JBSWY3DPEHPK3PXP&digits=9&period=0&algorithm=MD5";
        let cred = parse_otpauth_uri(uri).unwrap();
        assert_eq!(cred.digits, DEFAULT_DIGITS);
        assert_eq!(cred.period, DEFAULT_PERIOD);
        assert_eq!(cred.algorithm, Algorithm::Sha1);
    }

    // ── Parse errors ─────────────────────────────────────────────

    #[test]
    fn parse_invalid_scheme() {
        let err = parse_otpauth_uri("https://example.com").unwrap_err();
        assert_eq!(err.kind, TotpErrorKind::MalformedUri);
    }

    #[test]
    fn parse_invalid_authority() {
        let err = parse_otpauth_uri("otpauth://hotp/Test?secret=JBSWY3DPEHPK3PXP").unwrap_err();
        assert_eq!(err.kind, TotpErrorKind::MalformedUri);
    }

    #[test]
    fn parse_missing_secret() {
        let err = parse_otpauth_uri("otpauth://totp/Test?issuer=X").unwrap_err();
        assert_eq!(err.kind, TotpErrorKind::MalformedUri);
    }

    #[test]
    fn parse_undecodable_secret() {
        let err = parse_otpauth_uri("otpauth://totp/Test?secret=0189").unwrap_err();
        assert_eq!(err.kind, TotpErrorKind::MalformedUri);
    }

    #[test]
    fn parse_not_a_url() {
        assert!(parse_otpauth_uri("not a url at all").is_err());
    }

    // ── Build URI ────────────────────────────────────────────────

    #[test]
    fn build_basic_uri() {
        let cred = Credential::new("alice@example.com", secret_bytes()).with_issuer("Example");
        let uri = build_otpauth_uri(&cred);
        assert_eq!(
            uri,
            "otpauth://totp/Example:alice%40example.com?secret=JBSWY3DPEHPK3PXP&issuer=Example"
        );
    }

    #[test]
    fn build_uri_non_default_params() {
        let cred = Credential::new("user", secret_bytes())
            .with_issuer("Acme")
            .with_algorithm(Algorithm::Sha512)
            .with_digits(8)
            .with_period(60);
        let uri = build_otpauth_uri(&cred);
        assert!(uri.contains("algorithm=SHA512"));
        assert!(uri.contains("digits=8"));
        assert!(uri.contains("period=60"));
    }

    #[test]
    fn build_uri_omits_defaults() {
        let cred = Credential::new("user", secret_bytes());
        let uri = build_otpauth_uri(&cred);
        // SHA1, 6 digits, 30s period are defaults—should not appear
        assert!(!uri.contains("algorithm="));
        assert!(!uri.contains("digits="));
        assert!(!uri.contains("period="));
        // and without an issuer the path is the bare label
        assert!(uri.starts_with("otpauth://totp/user?"));
    }

    #[test]
    fn build_uri_secret_is_unpadded() {
        let cred = Credential::new("user", b"foo".to_vec());
        let uri = build_otpauth_uri(&cred);
        assert!(uri.contains("secret=MZXW6&") || uri.ends_with("secret=MZXW6"));
    }

    #[test]
    fn build_uri_empty_issuer_treated_as_absent() {
        let cred = Credential::new("user", secret_bytes()).with_issuer("");
        let uri = build_otpauth_uri(&cred);
        assert!(uri.starts_with("otpauth://totp/user?"));
        assert!(!uri.contains("issuer="));
    }

    // ── Roundtrip ────────────────────────────────────────────────

    #[test]
    fn build_parse_roundtrip() {
        let cred = Credential::new("alice", secret_bytes())
            .with_issuer("MyApp")
            .with_digits(6)
            .with_period(30);
        let uri = build_otpauth_uri(&cred);
        let parsed = parse_otpauth_uri(&uri).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn build_parse_roundtrip_label_with_colon() {
        // A colon inside the label is percent-encoded by the builder and
        // must not be mistaken for the issuer separator on the way back.
        let cred = Credential::new("acct:primary", secret_bytes());
        let uri = build_otpauth_uri(&cred);
        assert!(uri.starts_with("otpauth://totp/acct%3Aprimary?"));
        let parsed = parse_otpauth_uri(&uri).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn build_parse_roundtrip_colon_in_both_segments() {
        let cred = Credential::new("db:replica", secret_bytes()).with_issuer("Acme:Ops");
        let uri = build_otpauth_uri(&cred);
        let parsed = parse_otpauth_uri(&uri).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn build_parse_roundtrip_non_ascii_label() {
        let cred = Credential::new("rené@example.com", secret_bytes()).with_issuer("Büro");
        let uri = build_otpauth_uri(&cred);
        assert!(uri.contains("ren%C3%A9%40example.com"));
        let parsed = parse_otpauth_uri(&uri).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn build_parse_roundtrip_non_defaults() {
        let cred = Credential::new("my user", secret_bytes())
            .with_issuer("My Corp")
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .with_period(60);
        let uri = build_otpauth_uri(&cred);
        let parsed = parse_otpauth_uri(&uri).unwrap();
        assert_eq!(parsed, cred);
    }

    // ── URL encoding helpers ─────────────────────────────────────

    #[test]
    fn url_encode_basic() {
        assert_eq!(url_encode("hello"), "hello");
        assert_eq!(url_encode("hello world"), "hello%20world");
        assert_eq!(url_encode("a@b"), "a%40b");
    }

    #[test]
    fn url_decode_basic() {
        assert_eq!(url_decode("hello%20world"), "hello world");
        assert_eq!(url_decode("a%40b"), "a@b");
        assert_eq!(url_decode("no+plus"), "no plus");
    }

    #[test]
    fn url_decode_multibyte_utf8() {
        assert_eq!(url_decode("ren%C3%A9"), "rené");
        assert_eq!(url_decode("%E2%9C%93"), "✓");
    }

    #[test]
    fn url_encode_decode_roundtrip_unicode() {
        for s in ["rené@example.com", "Büro", "日本"] {
            assert_eq!(url_decode(&url_encode(s)), s, "roundtrip for {}", s);
        }
    }
}
