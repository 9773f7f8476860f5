use std::time::Duration;

use axum::{extract::Request, middleware::Next, Router};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::types::Json;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::features::auth::model::{AccessClaims, AuthenticatedUser};
use crate::features::categories::models::Category;
use crate::features::categories::slug::slugify;
use crate::features::roles::models::Role;

pub fn create_user(role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        role,
        is_active: true,
        vendor_profile_id: None,
        email: Some(format!("{}@example.com", role)),
    }
}

pub fn inactive(mut user: AuthenticatedUser) -> AuthenticatedUser {
    user.is_active = false;
    user
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
        issuer: None,
        jwt_leeway: Duration::from_secs(0),
    }
}

pub fn issue_token(config: &AuthConfig, claims: &AccessClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

/// Wrap a router so every request carries `user` as the authenticated caller
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}


/// Root category record with defaults, not yet stored
pub fn sample_category(name: &str) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::now_v7(),
        name: name.to_string(),
        slug: slugify(name),
        description: None,
        parent_id: None,
        level: 0,
        path: name.to_string(),
        meta_title: Some(name.to_string()),
        meta_description: None,
        meta_keywords: Vec::new(),
        image: None,
        icon: None,
        color: None,
        is_active: true,
        is_featured: false,
        is_visible: true,
        display_order: 0,
        show_in_navigation: true,
        show_in_footer: false,
        product_count: 0,
        total_products: 0,
        commission_rate: None,
        attributes: Json(Vec::new()),
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}
