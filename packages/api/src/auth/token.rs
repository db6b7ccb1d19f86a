//! # Session tokens: HMAC-SHA256 signed bearer credentials
//!
//! Tokens use the compact `header.claims.signature` layout of an HS256 JWT: each part is
//! unpadded base64url, the signature is HMAC-SHA256 over `header.claims` with the server
//! secret. Claims carry the account id (`sub`), the email, and issue/expiry times as Unix
//! seconds.
//!
//! Nothing is stored server side. A token is valid until it expires; there is no
//! revocation and no refresh.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to encode token: {0}")]
    Encode(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The caller identity a verified token resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub account_id: Uuid,
    pub email: String,
}

/// Signs and verifies tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenKeys {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenKeys {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            lifetime,
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Issue a token for `account_id` valid for the configured lifetime.
    pub fn issue(&self, account_id: Uuid, email: &str) -> Result<String, TokenError> {
        self.issue_at(account_id, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        account_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let lifetime = i64::try_from(self.lifetime.as_secs())
            .map_err(|e| TokenError::Encode(e.to_string()))?;
        let header = Header {
            alg: ALGORITHM.into(),
            typ: "JWT".into(),
        };
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + lifetime,
        };

        let header = serde_json::to_vec(&header).map_err(|e| TokenError::Encode(e.to_string()))?;
        let claims = serde_json::to_vec(&claims).map_err(|e| TokenError::Encode(e.to_string()))?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Check structure, algorithm, signature and expiry, in that order.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_part), Some(claims_part), Some(signature_part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: Header = decode_part(header_part)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_part)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header_part.as_bytes());
        mac.update(b".");
        mac.update(claims_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_part(claims_part)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        let account_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Malformed)?;
        Ok(Identity {
            account_id,
            email: claims.email,
        })
    }
}

fn decode_part<T: serde::de::DeserializeOwned>(part: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(part).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
