use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Role carried by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The authenticated actor issuing a request. Built from JWT claims by the
/// auth middleware; credential issuance lives outside this service, which
/// only verifies tokens.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// Capability gate for mutating catalog operations. Fails with Forbidden so
/// callers can distinguish "forbidden" from "missing".
pub fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("This action requires the admin role"))
    }
}
