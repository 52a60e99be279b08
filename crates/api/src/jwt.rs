//! Session token verification.
//!
//! Signature checks are delegated to `jsonwebtoken`; the claim time window is
//! then re-checked with [`validate_claims`] against the caller's clock.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use rolegate_auth::{SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token could not be decoded: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, JwtError>;
}

/// HS256 shared-secret validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, JwtError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};
    use rolegate_auth::{AccountStatus, Role};
    use rolegate_core::SubjectId;

    fn mint(secret: &[u8], claims: &SessionClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn claims(now: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            sub: SubjectId::from("u-1"),
            email: "u@example.com".to_string(),
            name: None,
            picture: None,
            role: Some(Role::USER),
            roles: Vec::new(),
            email_verified: true,
            account_status: AccountStatus::Active,
            iat: now - Duration::minutes(1),
            exp: now + Duration::minutes(10),
        }
    }

    #[test]
    fn accepts_valid_token() {
        let now = Utc::now();
        let token = mint(b"secret", &claims(now));
        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        let decoded = validator.validate(&token, now).unwrap();
        assert_eq!(decoded.all_roles(), vec![Role::USER]);
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let token = mint(b"secret", &claims(now));
        let validator = Hs256JwtValidator::new(b"other".to_vec());
        assert!(matches!(validator.validate(&token, now), Err(JwtError::Decode(_))));
    }

    #[test]
    fn rejects_future_issued_token() {
        let now = Utc::now();
        let mut c = claims(now);
        c.iat = now + Duration::minutes(5);
        let token = mint(b"secret", &c);
        let validator = Hs256JwtValidator::new(b"secret".to_vec());
        assert!(matches!(
            validator.validate(&token, now),
            Err(JwtError::Claims(TokenValidationError::NotYetValid))
        ));
    }
}
