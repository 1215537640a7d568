// HTTP handlers for org registration and sessions

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedOrg,
    models::{LoginRequest, OrgProfile, RegisterOrgRequest, RegisterOrgResponse, SessionResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

/// Handler for POST /orgs
/// Registers a new organization
#[utoipa::path(
    post,
    path = "/orgs",
    request_body = RegisterOrgRequest,
    responses(
        (status = 201, description = "Organization registered", body = RegisterOrgResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered")
    ),
    tag = "orgs"
)]
pub async fn register_org_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterOrgRequest>,
) -> Result<(StatusCode, Json<RegisterOrgResponse>), AuthError> {
    tracing::debug!("Registering org: {}", request.email);

    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /sessions
/// Authenticates an organization
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "orgs"
)]
pub async fn login_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Handler for GET /orgs/me
/// Profile of the authenticated organization
#[utoipa::path(
    get,
    path = "/orgs/me",
    responses(
        (status = 200, description = "Org profile", body = OrgProfile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Org no longer exists")
    ),
    security(("bearer_token" = [])),
    tag = "orgs"
)]
pub async fn me_handler(
    State(state): State<crate::AppState>,
    org: AuthenticatedOrg,
) -> Result<Json<OrgProfile>, AuthError> {
    let profile = state.auth_service.current_org(org.org_id).await?;
    Ok(Json(profile))
}
