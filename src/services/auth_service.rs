// Auth service - signs and verifies session tokens shared with the identity provider
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::{JwtConfig, MAX_EXPIRY_HOURS};
use crate::error::{AppError, Result};
use crate::middleware::Claims;
use crate::models::User;

pub struct AuthService {
    config: JwtConfig,
}

impl AuthService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// The role is captured at signing time; later role changes apply once a new token is issued.
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let hours = self.config.expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        let exp = now + Duration::hours(hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            AppError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "editor@example.com".into(),
            name: "Eddie Tor".into(),
            role: Role::Editor,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let service = AuthService::new(JwtConfig::default());
        let user = user();
        let token = service.issue_token(&user).unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, Role::Editor);
        assert_eq!(claims.name, "Eddie Tor");
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = AuthService::new(JwtConfig {
            secret: "other".into(),
            expiry_hours: 1,
            ..JwtConfig::default()
        })
        .issue_token(&user())
        .unwrap();

        let err = AuthService::new(JwtConfig::default()).verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn garbage_is_rejected() {
        let service = AuthService::new(JwtConfig::default());
        assert!(matches!(service.verify_token("not-a-jwt"), Err(AppError::Unauthorized)));
    }

    #[test]
    fn oversized_expiry_is_capped() {
        let service = AuthService::new(JwtConfig {
            expiry_hours: u64::MAX,
            ..JwtConfig::default()
        });
        let token = service.issue_token(&user()).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, (MAX_EXPIRY_HOURS * 3600) as usize);
    }
}
