use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated identity's claims through the
/// request, for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub identity_id: IdentityId,
    pub email: String,
    pub username: String,
}

/// Middleware guarding protected routes.
///
/// Extracts the bearer credential, validates it through the auth service (a
/// pure signature/expiry check, no store access), and attaches the claims to
/// the request. Every failure produces the same 401 body; the cause only goes
/// to the logs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let claims = state.auth_service.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token validation failed");
        unauthorized()
    })?;

    let identity_id = IdentityId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Malformed subject claim in verified token");
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedIdentity {
        identity_id,
        email: claims.email,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!("Non-ASCII Authorization header");
        unauthorized()
    })?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Authorization header without Bearer scheme");
        unauthorized()
    })?;

    Ok(token)
}

/// Uniform rejection body: no cause disclosed to the caller.
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized"
        })),
    )
        .into_response()
}
