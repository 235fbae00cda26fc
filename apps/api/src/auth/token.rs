use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Issued tokens are valid for seven days.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("Token rejected: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys derived from `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let keys = JwtKeys::new(b"test-secret");
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let token = keys.issue(user_id, "ada_l", now).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "ada_l");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new(b"test-secret");
        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);
        let token = keys.issue(Uuid::new_v4(), "ada_l", issued).unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtKeys::new(b"secret-a")
            .issue(Uuid::new_v4(), "ada_l", Utc::now())
            .unwrap();
        assert!(JwtKeys::new(b"secret-b").verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(JwtKeys::new(b"s").verify("not.a.jwt").is_err());
    }
}
