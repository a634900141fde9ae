use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use jobboard_domain::entities::UserRole;

use crate::error::ApiError;

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InvalidCredentials,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::InvalidToken => write!(f, "Invalid authentication token"),
            AuthError::ExpiredToken => write!(f, "Authentication token has expired"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Identity resolved by the auth middleware, available to handlers and
/// validation contexts.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Authentication(AuthError::MissingToken))
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_ref()),
            expiration_hours: config.jwt_expiration_hours,
        }
    }

    pub fn generate_token(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

pub async fn auth_middleware(
    State(state): State<crate::routes::AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)
        .ok_or(ApiError::Authentication(AuthError::MissingToken))?;

    let user = resolve_user(&token, &state.auth)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn resolve_user(token: &str, config: &AuthConfig) -> Result<AuthenticatedUser, ApiError> {
    let jwt_service = JwtService::new(config);
    let claims = jwt_service.validate_token(token).map_err(|err| {
        warn!("JWT validation failed: {}", err);
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        }
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Authentication(AuthError::InvalidToken))?;
    let role = UserRole::parse(&claims.role)
        .ok_or(ApiError::Authentication(AuthError::InvalidToken))?;

    Ok(AuthenticatedUser { user_id, role })
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .or_else(|| {
            req.headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .filter(|s| s.starts_with(BEARER_PREFIX))
                .map(|s| s[BEARER_PREFIX.len()..].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 24,
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let jwt_service = JwtService::new(&test_config());
        let user_id = Uuid::new_v4();

        let token = jwt_service
            .generate_token(user_id, UserRole::Admin)
            .unwrap();
        let claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_rejected() {
        let jwt_service = JwtService::new(&test_config());
        let token = jwt_service
            .generate_token(Uuid::new_v4(), UserRole::User)
            .unwrap();

        let other = JwtService::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            jwt_expiration_hours: 24,
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_resolve_user_maps_claims() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = JwtService::new(&config)
            .generate_token(user_id, UserRole::User)
            .unwrap();

        let user = resolve_user(&token, &config).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_admin_checks() {
        let admin = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let member = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };

        assert!(admin.require_admin().is_ok());
        assert!(matches!(
            member.require_admin(),
            Err(ApiError::Forbidden)
        ));
    }
}
