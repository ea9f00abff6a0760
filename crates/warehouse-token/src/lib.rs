//! # warehouse-token
//!
//! Short-lived, encrypted access tokens for warehouse files.
//!
//! This crate provides functionality for:
//! - Loading and generating the authority's RSA keypair
//! - Issuing file access tokens with the authority's public key
//! - Decoding and validating tokens with the matching private key
//! - Inspecting the plaintext outer layer of a token without a key
//!
//! ## Wire Format
//!
//! A token is two layers of JSON:
//!
//! | Layer | Shape | Protection |
//! |-------|-------|------------|
//! | **Envelope** | `{"w": warehouse, "st": ciphertext, "v": 1}` | base64, plaintext |
//! | **Payload** | `{"expiresAt": iso, "fileId": id, "salt": random}` | RSA-OAEP, base64 |
//!
//! The payload carries a random 24 character salt so two tokens for the same
//! file and expiry never share a ciphertext. Nothing is stored server-side:
//! a token is valid until `expiresAt` and cannot be revoked.
//!
//! ## Padding
//!
//! Payloads are encrypted with RSA-OAEP using SHA-1 for the label hash and
//! MGF1 by default ([`PaddingScheme::OaepSha1`]). Plaintexts longer than one
//! RSA block are split into blocks of `k - 2*hLen - 2` bytes and the
//! ciphertext blocks concatenated. Issuer and validator must use the same scheme.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod issuer;
pub mod keys;
pub mod payload;
pub mod validator;

pub use envelope::{AccessToken, TokenInfo, inspect_token_unverified};
pub use error::{ErrorKind, MalformedToken, TokenError};
pub use issuer::{FileAccess, TokenIssuer};
pub use keys::KeyPair;
pub use payload::{DecodedToken, SignedPayload};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
pub use validator::{TokenValidator, decode_access_token};
pub use warehouse_core::PaddingScheme;
