use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    /// User identifier carried as an opaque string.
    pub payload: String,
}

/// Issues and verifies HS256 access tokens with issuer/audience/expiry
/// claims. Verification failures of any kind surface as Unauthorized.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(cfg.access_token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(cfg.access_token_secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl_seconds: cfg.access_token_ttl_seconds,
        }
    }

    pub fn issue(&self, user_id: Uuid, subject: &str) -> Result<String, ApiError> {
        self.issue_at(Utc::now().timestamp(), user_id, subject)
    }

    fn issue_at(&self, now: i64, user_id: Uuid, subject: &str) -> Result<String, ApiError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: subject.to_string(),
            exp: now + self.ttl_seconds as i64,
            iat: now,
            payload: user_id.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Checks signature, issuer, audience and expiry, then parses the
    /// embedded payload into a record identifier.
    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| ApiError::Unauthorized("invalid access token".to_string()))?;

        Uuid::parse_str(&data.claims.payload)
            .map_err(|_| ApiError::Unauthorized("invalid access token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig {
            access_token_secret: "unit-test-secret".to_string(),
            issuer: "payroll-api".to_string(),
            audience: "payroll-clients".to_string(),
            access_token_ttl_seconds: 900,
        })
    }

    #[test]
    fn token_round_trips_the_user_id() {
        let service = service();
        let user_id = Uuid::new_v4();
        let token = service.issue(user_id, "Ada:Obi").unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let service = service();
        // Issued far enough in the past that ttl plus validation leeway
        // have both elapsed.
        let past = Utc::now().timestamp() - 86_400;
        let token = service.issue_at(past, Uuid::new_v4(), "sub").unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_from_a_different_issuer_is_rejected() {
        let service = service();
        let other = TokenService::new(&AuthConfig {
            access_token_secret: "unit-test-secret".to_string(),
            issuer: "someone-else".to_string(),
            audience: "payroll-clients".to_string(),
            access_token_ttl_seconds: 900,
        });
        let token = other.issue(Uuid::new_v4(), "sub").unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let service = service();
        let forger = TokenService::new(&AuthConfig {
            access_token_secret: "other-secret".to_string(),
            issuer: "payroll-api".to_string(),
            audience: "payroll-clients".to_string(),
            access_token_ttl_seconds: 900,
        });
        let token = forger.issue(Uuid::new_v4(), "sub").unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn non_uuid_payload_is_unauthorized_not_a_crash() {
        let cfg = AuthConfig {
            access_token_secret: "unit-test-secret".to_string(),
            issuer: "payroll-api".to_string(),
            audience: "payroll-clients".to_string(),
            access_token_ttl_seconds: 900,
        };
        let service = TokenService::new(&cfg);

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
            sub: "sub".to_string(),
            exp: now + 900,
            iat: now,
            payload: "not-a-uuid".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(cfg.access_token_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
