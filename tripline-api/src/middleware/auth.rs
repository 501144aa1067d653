use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    /// The authenticated user id. Tokens carry it as the JWT subject.
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::AuthenticationError("Некорректный токен".to_string()))
    }

    pub fn is_manager(&self) -> bool {
        self.role == ROLE_MANAGER || self.role == ROLE_ADMIN
    }
}

fn decode_claims(state: &AppState, req: &Request) -> Result<Claims, ApiError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::AuthenticationError("Требуется авторизация".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::AuthenticationError("Требуется авторизация".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::AuthenticationError("Некорректный токен".to_string()))?;

    Ok(token_data.claims)
}

/// Any authenticated user: clients, managers, admins.
pub async fn client_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_claims(&state, &req)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Manager surface: managers and admins only.
pub async fn manager_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = decode_claims(&state, &req)?;
    if !claims.is_manager() {
        return Err(ApiError::AuthorizationError(
            "Недостаточно прав".to_string(),
        ));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
