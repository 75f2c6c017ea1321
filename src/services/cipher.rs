// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AES-256-GCM wrapping of the GitHub access token.
//!
//! Output layout matches WebCrypto's `AES-GCM` encrypt: ciphertext with the
//! 16-byte tag appended, base64-encoded, plus a separately encoded 12-byte IV.
//! The key itself lives in the same local store, so this only obscures the
//! token at rest.

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

/// Raw key length for AES-256.
const KEY_LEN: usize = 32;

/// Token ciphertext and its IV, both base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedToken {
    pub ciphertext: String,
    pub iv: String,
}

/// Generate a fresh random 256-bit key, base64-encoded for storage.
pub fn generate_key() -> Result<String, AppError> {
    let mut key = [0u8; KEY_LEN];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate encryption key")))?;
    Ok(BASE64.encode(key))
}

/// Token cipher bound to one key.
pub struct TokenCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl TokenCipher {
    /// Import a base64 raw key. Fails with `Decryption` for malformed keys,
    /// since a bad stored key is only ever discovered when unwrapping.
    pub fn from_base64_key(key_b64: &str) -> Result<Self, AppError> {
        let raw = BASE64
            .decode(key_b64)
            .map_err(|e| AppError::Decryption(format!("invalid key encoding: {}", e)))?;
        let unbound = UnboundKey::new(&AES_256_GCM, &raw)
            .map_err(|_| AppError::Decryption(format!("invalid key length {}", raw.len())))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt a token with a fresh random IV.
    pub fn encrypt(&self, token: &str) -> Result<EncryptedToken, AppError> {
        let mut iv = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut iv)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate IV")))?;

        let mut in_out = token.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(Nonce::assume_unique_for_key(iv), Aad::empty(), &mut in_out)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Token encryption failed")))?;

        Ok(EncryptedToken {
            ciphertext: BASE64.encode(in_out),
            iv: BASE64.encode(iv),
        })
    }

    /// Decrypt a base64 ciphertext with its base64 IV.
    pub fn decrypt(&self, ciphertext_b64: &str, iv_b64: &str) -> Result<String, AppError> {
        let iv = BASE64
            .decode(iv_b64)
            .map_err(|e| AppError::Decryption(format!("invalid IV encoding: {}", e)))?;
        let nonce = Nonce::try_assume_unique_for_key(&iv)
            .map_err(|_| AppError::Decryption(format!("invalid IV length {}", iv.len())))?;

        let mut in_out = BASE64
            .decode(ciphertext_b64)
            .map_err(|e| AppError::Decryption(format!("invalid ciphertext encoding: {}", e)))?;

        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| AppError::Decryption("authentication failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::Decryption(format!("UTF-8 decode failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let key = generate_key().unwrap();
        let cipher = TokenCipher::from_base64_key(&key).unwrap();

        let sealed = cipher.encrypt("ghp_secret_token").unwrap();
        assert_ne!(sealed.ciphertext, "ghp_secret_token");
        assert_eq!(BASE64.decode(&sealed.iv).unwrap().len(), NONCE_LEN);

        let opened = cipher.decrypt(&sealed.ciphertext, &sealed.iv).unwrap();
        assert_eq!(opened, "ghp_secret_token");
    }

    #[test]
    fn test_fresh_iv_per_encryption() {
        let cipher = TokenCipher::from_base64_key(&generate_key().unwrap()).unwrap();
        let a = cipher.encrypt("same").unwrap();
        let b = cipher.encrypt("same").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealer = TokenCipher::from_base64_key(&generate_key().unwrap()).unwrap();
        let other = TokenCipher::from_base64_key(&generate_key().unwrap()).unwrap();
        let sealed = sealer.encrypt("token").unwrap();

        let result = other.decrypt(&sealed.ciphertext, &sealed.iv);
        assert!(matches!(result, Err(AppError::Decryption(_))));
    }

    #[test]
    fn test_corrupt_inputs_fail_as_decryption_errors() {
        let cipher = TokenCipher::from_base64_key(&generate_key().unwrap()).unwrap();
        let sealed = cipher.encrypt("token").unwrap();

        assert!(matches!(
            cipher.decrypt("not base64!!", &sealed.iv),
            Err(AppError::Decryption(_))
        ));
        assert!(matches!(
            cipher.decrypt(&sealed.ciphertext, &BASE64.encode([0u8; 4])),
            Err(AppError::Decryption(_))
        ));
        assert!(matches!(
            TokenCipher::from_base64_key(&BASE64.encode([1u8; 16])),
            Err(AppError::Decryption(_))
        ));
    }
}
