// src/sheets/auth.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Assertions are valid for one hour, the maximum Google accepts.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Google service-account credentials exchanging a signed JWT for OAuth
/// access tokens. Built once at startup; the token is cached and shared by
/// every request until shortly before it expires.
pub struct ServiceAccount {
    http: Client,
    client_email: String,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccount {
    pub fn new(http: Client, client_email: impl Into<String>, private_key_pem: &str) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("parsing service-account private key")?;
        Ok(Self {
            http,
            client_email: client_email.into(),
            key,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URI,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .context("signing JWT assertion")
    }

    /// A bearer token for the Sheets API, fetching a new one only when the
    /// cached token is missing or about to expire.
    #[instrument(level = "debug", skip(self), fields(client = %self.client_email))]
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(tok) = cached.as_ref() {
            if is_fresh(tok.expires_at, now) {
                return Ok(tok.value.clone());
            }
        }

        let assertion = self.assertion(now)?;
        let resp: TokenResponse = self
            .http
            .post(TOKEN_URI)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("POST token endpoint failed")?
            .error_for_status()
            .context("token endpoint rejected assertion")?
            .json()
            .await
            .context("decoding token response")?;

        debug!(expires_in = resp.expires_in, "obtained access token");
        let value = resp.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: now + Duration::seconds(resp.expires_in),
        });
        Ok(value)
    }
}

fn is_fresh(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now
}
