//! # Client-side note encryption
//!
//! Note bodies are sealed before they leave the machine. The key is derived with
//! **Argon2id** from a passphrase that is never sent to the server, salted with the
//! account email, so the same passphrase yields the same key on every device the
//! user signs in from.
//!
//! Each call to [`NoteCipher::encrypt`] picks a fresh random 96-bit nonce. The wire
//! format is `base64(nonce ‖ ciphertext ‖ tag)`, which is what the server stores in
//! `content`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroize;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

const KDF_MEMORY_KB: u32 = 19 * 1024;
const KDF_ITERATIONS: u32 = 2;
const KDF_PARALLELISM: u32 = 1;

/// Domain prefix for the salt; also keeps it above Argon2's minimum length for short emails.
const SALT_PREFIX: &str = "lockify-note-key:";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("passphrase cannot be empty")]
    EmptyPassphrase,

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("encryption failed")]
    Encrypt,

    #[error("not an encrypted note")]
    Malformed,

    #[error("wrong passphrase or corrupted note")]
    Decrypt,
}

pub struct NoteCipher {
    aead: Aes256Gcm,
}

impl std::fmt::Debug for NoteCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteCipher").field("key", &"[REDACTED]").finish()
    }
}

impl NoteCipher {
    /// Derive the note key for `email` from `passphrase`.
    pub fn derive(passphrase: &str, email: &str) -> Result<Self, CipherError> {
        if passphrase.is_empty() {
            return Err(CipherError::EmptyPassphrase);
        }

        let params = argon2::Params::new(
            KDF_MEMORY_KB,
            KDF_ITERATIONS,
            KDF_PARALLELISM,
            Some(KEY_LEN),
        )
        .map_err(|e| CipherError::Kdf(e.to_string()))?;
        let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let salt = format!("{SALT_PREFIX}{}", email.trim().to_lowercase());
        let mut key = [0u8; KEY_LEN];
        argon2
            .hash_password_into(passphrase.as_bytes(), salt.as_bytes(), &mut key)
            .map_err(|e| CipherError::Kdf(e.to_string()))?;

        let cipher = Self::from_key(&key);
        key.zeroize();
        Ok(cipher)
    }

    /// Build a cipher from raw key bytes.
    pub fn from_key(key: &[u8; KEY_LEN]) -> Self {
        Self {
            aead: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let sealed = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(STANDARD.encode(out))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CipherError::Malformed)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Malformed);
        }

        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let plain = self
            .aead
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Decrypt)?;
        String::from_utf8(plain).map_err(|_| CipherError::Malformed)
    }
}
