// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // org id
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token service for JWT operations
///
/// The signing secret is process-wide configuration, injected once at
/// startup and shared through application state.
pub struct TokenService {
    secret: String,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService; tokens expire 24 hours after issuance
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            token_duration: 86_400,
        }
    }

    /// Generate a signed token carrying the org identity
    pub fn generate_token(&self, org_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: org_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature, structure, and expiry. Pure: no revocation list,
    /// no side effects.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_token_expiration_is_24_hours() {
        let service = test_token_service();
        let token = service
            .generate_token(Uuid::new_v4(), "org@example.com")
            .unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_token_claims_carry_identity() {
        let service = test_token_service();
        let org_id = Uuid::new_v4();

        let token = service.generate_token(org_id, "org@example.com").unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, org_id);
        assert_eq!(claims.email, "org@example.com");
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.verify_token("").is_err());
        assert!(service.verify_token("not.a.token").is_err());
        assert!(service
            .verify_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1
            .generate_token(Uuid::new_v4(), "org@example.com")
            .unwrap();

        assert!(service1.verify_token(&token).is_ok());
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "org@example.com".to_string(),
            iat: Utc::now().timestamp() - 1_000,
            exp: Utc::now().timestamp() - 500,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_token(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_issued_tokens_verify(
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let org_id = Uuid::new_v4();
            let token = service.generate_token(org_id, &email)?;
            let claims = service.verify_token(&token)?;
            prop_assert_eq!(claims.sub, org_id);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.exp - claims.iat, 86_400);
        }

        #[test]
        fn prop_random_strings_are_rejected(
            garbage in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.verify_token(&garbage).is_err());
        }
    }
}
