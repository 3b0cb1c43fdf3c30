//! Bearer-token authentication. Validated claims become a `Principal`
//! request extension; role checks happen later, at the service gates.

use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::{Claims, Principal};
use crate::config;
use crate::error::ApiError;

pub async fn jwt_auth_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let principal = decode_principal(&token)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    header_value
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
        .ok_or_else(|| ApiError::unauthorized("Authorization header must be a Bearer token"))
}

fn decode_principal(token: &str) -> Result<Principal, ApiError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        tracing::error!("JWT_SECRET is not configured");
        return Err(ApiError::internal_server_error("Authentication unavailable"));
    }

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Principal::from(data.claims))
}
