//! Telegram Web App init data
//!
//! The host signs the payload with HMAC-SHA256. The key is derived from the
//! bot token: `HMAC_SHA256("WebAppData", bot_token)`; the signed message is
//! every `key=value` pair except `hash`, sorted by key and joined with `\n`.
//!
//! The client only forwards the payload: the backend is the one that
//! verifies it. Parsing here is for diagnostics (which user is this?) and
//! for signing payloads during local development, where the developer owns
//! the bot token.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY_SALT: &[u8] = b"WebAppData";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitDataError {
    #[error("init data is empty")]
    Empty,

    #[error("missing {0} parameter")]
    Missing(&'static str),

    #[error("invalid hash - data may be tampered")]
    BadSignature,

    #[error("init data is too old ({0} seconds)")]
    Expired(i64),
}

/// Parsed, not yet verified, init data.
#[derive(Debug, Clone)]
pub struct InitData {
    raw: String,
    params: BTreeMap<String, String>,
}

impl InitData {
    /// Splits the query string and URL-decodes every value.
    ///
    /// Pairs without `=` or with undecodable values are skipped.
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InitDataError::Empty);
        }

        let params = raw
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                let value = urlencoding::decode(value).ok()?;
                Some((key.to_string(), value.into_owned()))
            })
            .collect();

        Ok(Self {
            raw: raw.to_string(),
            params,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// `user.id` as claimed by the payload. Not trustworthy until the
    /// backend has checked the signature.
    pub fn unverified_user_id(&self) -> Option<i64> {
        let user: serde_json::Value = serde_json::from_str(self.get("user")?).ok()?;
        user.get("id").and_then(serde_json::Value::as_i64)
    }

    pub fn auth_date(&self) -> Option<DateTime<Utc>> {
        let seconds = self.get("auth_date")?.parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    /// All pairs except `hash`, sorted by key, joined with newlines.
    pub fn data_check_string(&self) -> String {
        data_check_string(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Checks the signature and, when `max_age` is given, the `auth_date`.
    ///
    /// # Errors
    /// Returns [`InitDataError::BadSignature`] on a hash mismatch and
    /// [`InitDataError::Expired`] when the payload is older than `max_age`.
    pub fn verify(&self, bot_token: &str, max_age: Option<chrono::Duration>) -> Result<(), InitDataError> {
        let received = self.get("hash").ok_or(InitDataError::Missing("hash"))?;
        let received = hex::decode(received).map_err(|_| InitDataError::BadSignature)?;

        let mut mac = HmacSha256::new_from_slice(&secret_key(bot_token)?).map_err(|_| InitDataError::BadSignature)?;
        mac.update(self.data_check_string().as_bytes());
        // Constant-time comparison
        mac.verify_slice(&received).map_err(|_| InitDataError::BadSignature)?;

        if let Some(max_age) = max_age {
            let auth_date = self.auth_date().ok_or(InitDataError::Missing("auth_date"))?;
            let age = Utc::now().signed_duration_since(auth_date);
            if age > max_age {
                return Err(InitDataError::Expired(age.num_seconds()));
            }
        }
        Ok(())
    }

    /// Builds a signed payload from `fields` the way the host would.
    pub fn sign(fields: &[(&str, &str)], bot_token: &str) -> Result<String, InitDataError> {
        let check = data_check_string(fields.iter().copied());
        let hash = hex::encode(hmac_sha256(&secret_key(bot_token)?, check.as_bytes())?);

        let mut query: Vec<String> = fields
            .iter()
            .filter(|(key, _)| *key != "hash")
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        query.push(format!("hash={hash}"));
        Ok(query.join("&"))
    }
}

fn data_check_string<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut lines: Vec<String> = pairs
        .filter(|(key, _)| *key != "hash")
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort();
    lines.join("\n")
}

fn secret_key(bot_token: &str) -> Result<Vec<u8>, InitDataError> {
    hmac_sha256(SECRET_KEY_SALT, bot_token.as_bytes())
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, InitDataError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| InitDataError::BadSignature)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
