use axum::{
    Extension, Form, Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::observability::AuthenticatedUser;
use super::{ApiError, ApiResponse, AppState, MessageResponse, PrincipalDto};
use crate::auth::{NewAccount, Principal, UserDetails};
use crate::constants::SESSION_USER_KEY;
use crate::services::{AuthError, Registration};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub roles: Option<String>,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session's login identifier into a fresh [`Principal`] and
/// hands it to the handler as a request extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Ok(Some(email)) = session.get::<String>(SESSION_USER_KEY).await else {
        return Err(not_authenticated());
    };

    let principal = match state.auth_service().resolve_principal(&email).await {
        Ok(principal) => principal,
        Err(AuthError::NotFound(_)) => {
            // The account behind this session is gone
            tracing::warn!(user = %email, "Session refers to a missing account");
            let _ = session.flush().await;
            return Err(not_authenticated());
        }
        Err(e) => return Err(e.into()),
    };

    let username = principal.username().to_string();
    tracing::Span::current().record("user_id", username.as_str());
    request.extensions_mut().insert(principal);

    let mut response = next.run(request).await;
    response
        .extensions_mut()
        .insert(AuthenticatedUser(username));
    Ok(response)
}

fn not_authenticated() -> ApiError {
    ApiError::Unauthorized("Not authenticated".to_string())
}

pub fn require_authority(principal: &Principal, authority: &str) -> Result<(), ApiError> {
    if principal.has_authority(authority) {
        Ok(())
    } else {
        tracing::warn!(
            user = %principal.username(),
            required = authority,
            "Access denied"
        );
        Err(AuthError::Forbidden(authority.to_string()).into())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<PrincipalDto>>, ApiError> {
    establish_session(&state, &session, payload).await
}

/// POST /login, for clients posting an urlencoded login form.
pub async fn form_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Json<ApiResponse<PrincipalDto>>, ApiError> {
    establish_session(&state, &session, payload).await
}

async fn establish_session(
    state: &AppState,
    session: &Session,
    payload: LoginRequest,
) -> Result<Json<ApiResponse<PrincipalDto>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let principal = match state
        .auth_service()
        .authenticate(&payload.username, &payload.password)
        .await
    {
        Ok(principal) => principal,
        // Unknown accounts get the same answer as a wrong secret
        Err(AuthError::NotFound(_) | AuthError::InvalidCredentials) => {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    session
        .insert(SESSION_USER_KEY, principal.username())
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    tracing::info!(user = %principal.username(), "User logged in");

    Ok(Json(ApiResponse::success(PrincipalDto::from(&principal))))
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(Extension(principal): Extension<Principal>) -> Json<ApiResponse<PrincipalDto>> {
    Json(ApiResponse::success(PrincipalDto::from(&principal)))
}

/// POST /userinfos/new
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Registration>>), ApiError> {
    let account = NewAccount::new(payload.name, payload.email, payload.password, payload.roles);
    let registration = state.auth_service().register(account).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(registration))))
}
