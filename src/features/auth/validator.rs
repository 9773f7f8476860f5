use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use super::model::{AccessClaims, AuthenticatedUser};
use crate::core::config::AuthConfig;
use crate::core::error::AppError;

/// Verifies HS256 access tokens and maps their claims onto the caller record
pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: Option<String>,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            // Without this a token carrying no `iss` at all skips the check
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        let claims = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid access token: {}", e)))?
            .claims;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject claim".to_string()))?;

        let role = claims
            .role
            .parse()
            .map_err(|e: crate::features::roles::error::AccessError| {
                AppError::Unauthorized(e.to_string())
            })?;

        let vendor_profile_id = claims
            .vendor_profile
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| AppError::Unauthorized("Invalid vendorProfile claim".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            role,
            is_active: claims.is_active,
            vendor_profile_id,
            email: claims.email,
        })
    }
}
