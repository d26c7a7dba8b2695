// ABOUTME: AES-256-GCM encryption producing URL-safe base64 strings
// ABOUTME: Hands the storefront an opaque email that only this server can read back

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use widget_store_core::errors::{AppError, AppResult};

const NONCE_LENGTH: usize = 12;

/// Symmetric encryption keyed by the server secret
#[derive(Clone)]
pub struct Encryption {
    key: [u8; 32],
}

impl Encryption {
    /// Create an encryptor from a 32-byte key
    #[must_use]
    pub const fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext`; the random nonce is prepended before encoding
    ///
    /// # Errors
    ///
    /// Returns an internal error if encryption fails
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = GenericArray::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AppError::internal(format!("Encryption failed: {e}")))?;

        let mut result = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(result))
    }

    /// Decrypt a value produced by [`Encryption::encrypt`]
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the value is not valid base64, too short or
    /// was not encrypted with this key
    pub fn decrypt(&self, encoded: &str) -> AppResult<String> {
        let encrypted = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AppError::invalid_input("encrypted value is not valid base64"))?;

        if encrypted.len() < NONCE_LENGTH {
            return Err(AppError::invalid_input("encrypted value too short"));
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let (nonce, ciphertext) = encrypted.split_at(NONCE_LENGTH);

        let plaintext = cipher
            .decrypt(GenericArray::from_slice(nonce), ciphertext)
            .map_err(|_| AppError::invalid_input("encrypted value could not be decrypted"))?;

        String::from_utf8(plaintext)
            .map_err(|_| AppError::invalid_input("decrypted value is not valid UTF-8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypted_value_is_opaque_and_url_safe() {
        let encryption = Encryption::new([7u8; 32]);
        let encrypted = encryption.encrypt("admin@example.com").unwrap();

        assert!(!encrypted.contains("admin"));
        assert!(!encrypted.contains(['+', '/', '=']));
        assert_eq!(encryption.decrypt(&encrypted).unwrap(), "admin@example.com");
    }

    #[test]
    fn test_nonce_makes_each_encryption_distinct() {
        let encryption = Encryption::new([7u8; 32]);
        let first = encryption.encrypt("admin@example.com").unwrap();
        let second = encryption.encrypt("admin@example.com").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_or_garbage_is_rejected() {
        let encrypted = Encryption::new([7u8; 32]).encrypt("admin@example.com").unwrap();

        let other = Encryption::new([8u8; 32]);
        assert_eq!(other.decrypt(&encrypted).unwrap_err().http_status(), 400);
        assert!(other.decrypt("not base64!").is_err());
        assert!(other.decrypt("AAAA").is_err());
    }
}
