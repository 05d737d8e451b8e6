use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Role claim forwarded by the identity gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

/// Extractor for the gateway-verified caller identity.
///
/// Token verification happens upstream; the gateway strips any client-supplied
/// identity headers and injects `X-User-Id` / `X-User-Role` after validating
/// the token. Handlers only see the verified claims.
///
/// Usage in handlers:
/// ```ignore
/// async fn my_handler(identity: Identity) -> HttpResponse {
///     // identity.user_id / identity.role
/// }
/// ```
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    /// Rejects non-admin callers with 403
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}

fn identity_from_request(req: &HttpRequest) -> Result<Identity, AppError> {
    let user_id = req
        .headers()
        .get("X-User-Id")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()))?;

    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::Unauthorized("Malformed X-User-Id header".to_string()))?;

    let role = match req
        .headers()
        .get("X-User-Role")
        .and_then(|h| h.to_str().ok())
    {
        Some("admin") => Role::Admin,
        // Absent role claim defaults to the least-privileged one
        Some("student") | None => Role::Student,
        Some(other) => {
            return Err(AppError::Unauthorized(format!(
                "Unknown role claim: {}",
                other
            )))
        }
    };

    Ok(Identity { user_id, role })
}
