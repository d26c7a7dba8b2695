// ABOUTME: HMAC-SHA256 signing and verification of links sent by email
// ABOUTME: A signed link carries its signing time and a hex signature over everything before it

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use widget_store_core::errors::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

const HASH_PARAM: &str = "&hash=";
const EXPIRES_PARAM: &str = "expires=";

/// Signs links so the server can later tell they were issued by itself
///
/// `expires` holds the unix time the link was signed at; [`UrlSigner::expired`]
/// compares its age against a lifetime in minutes.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl UrlSigner {
    /// Create a signer keyed by `secret`
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Sign `link` at the current time
    ///
    /// # Errors
    ///
    /// Returns an internal error if the MAC cannot be keyed
    pub fn sign(&self, link: &str) -> AppResult<String> {
        self.sign_at(link, Utc::now())
    }

    /// Sign `link` as if issued at `issued_at`
    ///
    /// # Errors
    ///
    /// Returns an internal error if the MAC cannot be keyed
    pub fn sign_at(&self, link: &str, issued_at: DateTime<Utc>) -> AppResult<String> {
        let separator = if link.contains('?') { '&' } else { '?' };
        let unsigned = format!("{link}{separator}{EXPIRES_PARAM}{}", issued_at.timestamp());
        let signature = self.signature(&unsigned)?;
        Ok(format!("{unsigned}{HASH_PARAM}{signature}"))
    }

    /// Check the signature of a link produced by [`UrlSigner::sign`]
    #[must_use]
    pub fn verify(&self, signed: &str) -> bool {
        let Some((unsigned, signature)) = signed.rsplit_once(HASH_PARAM) else {
            return false;
        };
        let Ok(signature) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(unsigned.as_bytes());
        mac.verify_slice(&signature).is_ok()
    }

    /// Whether a signed link is older than `minutes`; links without a timestamp count as expired
    #[must_use]
    pub fn expired(&self, signed: &str, minutes: i64) -> bool {
        Self::issued_at(signed).map_or(true, |issued| {
            Utc::now() - issued > Duration::minutes(minutes)
        })
    }

    fn issued_at(signed: &str) -> Option<DateTime<Utc>> {
        let unsigned = signed.rsplit_once(HASH_PARAM).map_or(signed, |(u, _)| u);
        let (_, timestamp) = unsigned.rsplit_once(EXPIRES_PARAM)?;
        DateTime::from_timestamp(timestamp.parse().ok()?, 0)
    }

    fn signature(&self, data: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid signing key: {e}")))?;
        mac.update(data.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}
