// common/src/utils.rs
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use jsonwebtoken::{encode, decode, Header, Algorithm, Validation, EncodingKey, DecodingKey};
use serde::{Serialize, Deserialize};
use uuid::Uuid;
use rand::{thread_rng, Rng};
use chrono::{DateTime, TimeZone, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SHORT_TOKEN_LEN: usize = 7;

/// Setup tracing for consistent logging across the client
pub fn setup_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Generate a short base36 token used for notification and listing ids.
/// Best-effort unique; callers that need uniqueness check their own collection.
pub fn short_token() -> String {
    let mut rng = thread_rng();
    (0..SHORT_TOKEN_LEN)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

// Delegation claims carried by an identity handle
#[derive(Debug, Serialize, Deserialize)]
pub struct DelegationClaims {
    pub sub: String,       // principal
    pub jti: String,       // delegation id
    pub exp: usize,        // expiration time
    pub iat: usize,        // issued at time
}

impl DelegationClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

// Issue a signed delegation for a principal, valid for `ttl`
pub fn issue_delegation(principal: &str, ttl: Duration, secret: &[u8]) -> Result<(String, DelegationClaims), jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize;

    let claims = DelegationClaims {
        sub: principal.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + ttl.as_secs() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret)
    )?;

    Ok((token, claims))
}

// Validate a delegation and return its claims; expired tokens are rejected
pub fn verify_delegation(token: &str, secret: &[u8]) -> Result<DelegationClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<DelegationClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &validation
    )?;

    Ok(token_data.claims)
}
