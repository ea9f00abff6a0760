//! Cross-implementation tests for the token wire format.
//!
//! The fixtures were produced by an independent RSA-OAEP (SHA-1) implementation
//! with the 2048-bit key in `fixtures/`, using the same block splitting rule.
//!
//! Run with: cargo test --package warehouse-token --test interop

use chrono::{Duration, TimeZone, Utc};
use warehouse_core::SignOptions;
use warehouse_token::{
    ErrorKind, KeyPair, MalformedToken, PaddingScheme, TokenError, TokenIssuer, TokenValidator,
    decode_access_token, inspect_token_unverified,
};

const PRIVATE_PEM: &str = include_str!("fixtures/authority_private.pem");
const PRIVATE_PKCS8_PEM: &str = include_str!("fixtures/authority_private_pkcs8.pem");
const PUBLIC_PEM: &str = include_str!("fixtures/authority_public.pem");
const VALID_TOKEN: &str = include_str!("fixtures/valid_token.txt");
const EXPIRED_TOKEN: &str = include_str!("fixtures/expired_token.txt");
const CHUNKED_TOKEN: &str = include_str!("fixtures/chunked_token.txt");

fn validator() -> TokenValidator {
    TokenValidator::from_private_key_pem(PRIVATE_PEM).unwrap()
}

fn issuer() -> TokenIssuer {
    let public_key = warehouse_token::keys::load_public_key_pem(PUBLIC_PEM).unwrap();
    TokenIssuer::new("main-warehouse", "https://warehouse.example.com", public_key)
}

/// A token from a legacy issuer decodes to the values it was minted with.
#[test]
fn test_decode_legacy_token() {
    let decoded = validator().decode(VALID_TOKEN).unwrap();

    assert_eq!(decoded.warehouse_name, "main-warehouse");
    assert_eq!(decoded.resource_id, "invoices/2024/march.pdf");
    assert_eq!(decoded.salt, "aB3dE5fG7hJ9kL1mN3pQ5rS7");
    assert_eq!(decoded.expires_at, Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());

    let info = inspect_token_unverified(VALID_TOKEN).unwrap();
    assert_eq!(info.version, None);
    assert_eq!(info.ciphertext_len, 256);
}

/// The same key in PKCS#8 form decodes the same token.
#[test]
fn test_decode_with_pkcs8_key() {
    let decoded = decode_access_token(VALID_TOKEN, PRIVATE_PKCS8_PEM).unwrap();
    assert_eq!(decoded.resource_id, "invoices/2024/march.pdf");
}

/// Payloads longer than one RSA block are split and rejoined.
#[test]
fn test_decode_multi_block_token() {
    let decoded = validator().decode(CHUNKED_TOKEN).unwrap();

    assert_eq!(decoded.warehouse_name, "archive");
    assert_eq!(decoded.resource_id, format!("deep/{}/file.bin", "x".repeat(300)));
    assert_eq!(
        decoded.expires_at,
        Utc.with_ymd_and_hms(2099, 6, 30, 12, 30, 45).unwrap() + Duration::milliseconds(123)
    );
    assert_eq!(inspect_token_unverified(CHUNKED_TOKEN).unwrap().ciphertext_len, 512);
}

/// A well-formed but elapsed token is denied, not reported as corrupt.
#[test]
fn test_expired_legacy_token_is_access_denied() {
    let err = validator().decode(EXPIRED_TOKEN).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    match err {
        TokenError::Expired { expired_at } => {
            assert_eq!(expired_at, Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap());
        }
        other => panic!("expected Expired, got {other:?}"),
    }
}

/// A validator pinned to a different scheme cannot open the token.
#[test]
fn test_padding_mismatch_is_malformed() {
    let err = validator()
        .with_padding(PaddingScheme::OaepSha256)
        .decode(VALID_TOKEN)
        .unwrap_err();
    assert!(matches!(err, TokenError::Malformed(MalformedToken::DecryptionFailed)));
}

#[test]
fn test_roundtrip_preserves_resource_and_expiry() {
    let expires_at = Utc::now() + Duration::days(2);
    let long = "long/".repeat(100);
    let resources = ["a", "reports/2024/q3 summary.pdf", "ünïcødé/файл.txt", long.as_str()];

    for resource in resources {
        let access = issuer()
            .issue(&SignOptions::new(resource).expires_at(expires_at))
            .unwrap();
        let decoded = validator().decode(&access.token).unwrap();

        assert_eq!(decoded.resource_id, resource);
        assert_eq!(decoded.warehouse_name, "main-warehouse");
        assert_eq!(decoded.expires_at, access.expires_at);
        assert!((decoded.expires_at - expires_at).num_milliseconds().abs() < 1);
    }
}

#[test]
fn test_roundtrip_with_sha256_padding() {
    let access = issuer()
        .with_padding(PaddingScheme::OaepSha256)
        .issue(&SignOptions::new("a.pdf"))
        .unwrap();

    let decoded = validator()
        .with_padding(PaddingScheme::OaepSha256)
        .decode(&access.token)
        .unwrap();
    assert_eq!(decoded.resource_id, "a.pdf");
}

/// Equal requests never produce equal tokens.
#[test]
fn test_identical_requests_differ() {
    let options = SignOptions::new("a.pdf").expires_at(Utc::now() + Duration::hours(1));
    let first = issuer().issue(&options).unwrap();
    let second = issuer().issue(&options).unwrap();

    assert_ne!(first.token, second.token);

    let first = validator().decode(&first.token).unwrap();
    let second = validator().decode(&second.token).unwrap();
    assert_eq!(first.expires_at, second.expires_at);
    assert_ne!(first.salt, second.salt);
}

#[test]
fn test_default_lifetime_is_about_thirty_minutes() {
    let before = Utc::now();
    let access = issuer().issue(&SignOptions::new("a.pdf")).unwrap();
    let decoded = validator().decode(&access.token).unwrap();

    let lifetime = decoded.time_until_expiration(before);
    assert!(lifetime > Duration::minutes(29));
    assert!(lifetime <= Duration::minutes(30) + Duration::seconds(5));
}

#[test]
fn test_past_expiry_always_fails() {
    for seconds in [1, 60, 86_400] {
        let options = SignOptions::new("a.pdf").expires_at(Utc::now() - Duration::seconds(seconds));
        let err = issuer().issue(&options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

/// Truncated or altered tokens are rejected as malformed, never panicking.
#[test]
fn test_tampered_tokens_are_malformed() {
    let token = issuer().issue(&SignOptions::new("a.pdf")).unwrap().token;
    let validator = validator();

    let mut candidates = vec![
        String::new(),
        "not base64!".to_string(),
        token[..token.len() / 2].to_string(),
        token[..token.len() - 4].to_string(),
        token[4..].to_string(),
    ];

    for position in [token.len() / 3, token.len() / 2, 2 * token.len() / 3] {
        let mut bytes = token.clone().into_bytes();
        bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
        candidates.push(String::from_utf8(bytes).unwrap());
    }

    for candidate in candidates {
        let err = validator.decode(&candidate).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed, "candidate {candidate:?} gave {err}");
    }
}

/// Tokens issued with a fresh key cannot be read with the fixture key.
#[test]
fn test_foreign_key_is_malformed() {
    let foreign = KeyPair::generate(1024).unwrap();
    let access = TokenIssuer::new(
        "main-warehouse",
        "https://warehouse.example.com",
        foreign.public_key().clone(),
    )
    .issue(&SignOptions::new("a.pdf"))
    .unwrap();

    assert_eq!(validator().decode(&access.token).unwrap_err().kind(), ErrorKind::Malformed);
    assert!(TokenValidator::from_keypair(&foreign).decode(&access.token).is_ok());
}
