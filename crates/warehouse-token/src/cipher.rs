//! Block-wise RSA-OAEP encryption of token payloads.

use crate::error::{MalformedToken, TokenError};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use warehouse_core::PaddingScheme;

fn oaep(scheme: PaddingScheme) -> Oaep {
    match scheme {
        PaddingScheme::OaepSha1 => Oaep::new::<Sha1>(),
        PaddingScheme::OaepSha256 => Oaep::new::<Sha256>(),
    }
}

fn hash_len(scheme: PaddingScheme) -> usize {
    match scheme {
        PaddingScheme::OaepSha1 => 20,
        PaddingScheme::OaepSha256 => 32,
    }
}

/// Largest plaintext block a key of `key_size` bytes can encrypt.
pub fn max_block_len(key_size: usize, scheme: PaddingScheme) -> Option<usize> {
    key_size
        .checked_sub(2 * hash_len(scheme) + 2)
        .filter(|len| *len > 0)
}

/// Encrypt `plaintext`, splitting it into as many RSA blocks as needed.
pub fn encrypt(
    public_key: &RsaPublicKey,
    scheme: PaddingScheme,
    plaintext: &[u8],
) -> Result<Vec<u8>, TokenError> {
    let key_size = public_key.size();
    let block_len = max_block_len(key_size, scheme).ok_or_else(|| {
        TokenError::InvalidPublicKey(format!(
            "{}-bit key is too small for {}",
            key_size * 8,
            scheme
        ))
    })?;

    let blocks: Vec<&[u8]> = if plaintext.is_empty() {
        vec![plaintext]
    } else {
        plaintext.chunks(block_len).collect()
    };

    let mut ciphertext = Vec::with_capacity(blocks.len() * key_size);
    for block in blocks {
        let encrypted = public_key
            .encrypt(&mut OsRng, oaep(scheme), block)
            .map_err(|e| TokenError::EncryptionFailed(e.to_string()))?;
        ciphertext.extend_from_slice(&encrypted);
    }
    Ok(ciphertext)
}

/// Decrypt a ciphertext made of one or more RSA blocks.
pub fn decrypt(
    private_key: &RsaPrivateKey,
    scheme: PaddingScheme,
    ciphertext: &[u8],
) -> Result<Vec<u8>, MalformedToken> {
    let key_size = private_key.size();
    if ciphertext.is_empty() || ciphertext.len() % key_size != 0 {
        return Err(MalformedToken::InvalidCiphertext);
    }

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for block in ciphertext.chunks(key_size) {
        let decrypted = private_key
            .decrypt(oaep(scheme), block)
            .map_err(|_| MalformedToken::DecryptionFailed)?;
        plaintext.extend_from_slice(&decrypted);
    }
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    const PRIVATE_PEM: &str = include_str!("../tests/fixtures/authority_private.pem");

    fn keypair() -> KeyPair {
        KeyPair::from_private_key_pem(PRIVATE_PEM).unwrap()
    }

    #[test]
    fn test_block_len() {
        assert_eq!(max_block_len(256, PaddingScheme::OaepSha1), Some(214));
        assert_eq!(max_block_len(256, PaddingScheme::OaepSha256), Some(190));
        assert_eq!(max_block_len(64, PaddingScheme::OaepSha256), None);
    }

    #[test]
    fn test_single_block() {
        let keypair = keypair();
        let ciphertext = encrypt(keypair.public_key(), PaddingScheme::OaepSha1, b"hello").unwrap();
        assert_eq!(ciphertext.len(), 256);

        let plaintext =
            decrypt(keypair.private_key(), PaddingScheme::OaepSha1, &ciphertext).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_multi_block() {
        let keypair = keypair();
        let message = vec![b'x'; 500];
        let ciphertext =
            encrypt(keypair.public_key(), PaddingScheme::OaepSha256, &message).unwrap();
        assert_eq!(ciphertext.len(), 3 * 256);

        let plaintext =
            decrypt(keypair.private_key(), PaddingScheme::OaepSha256, &ciphertext).unwrap();
        assert_eq!(plaintext, message);
    }

    #[test]
    fn test_scheme_mismatch_fails() {
        let keypair = keypair();
        let ciphertext = encrypt(keypair.public_key(), PaddingScheme::OaepSha1, b"hello").unwrap();
        assert_eq!(
            decrypt(keypair.private_key(), PaddingScheme::OaepSha256, &ciphertext),
            Err(MalformedToken::DecryptionFailed)
        );
    }

    #[test]
    fn test_ragged_ciphertext() {
        let keypair = keypair();
        assert_eq!(
            decrypt(keypair.private_key(), PaddingScheme::OaepSha1, &[0u8; 100]),
            Err(MalformedToken::InvalidCiphertext)
        );
        assert_eq!(
            decrypt(keypair.private_key(), PaddingScheme::OaepSha1, &[]),
            Err(MalformedToken::InvalidCiphertext)
        );
    }
}
