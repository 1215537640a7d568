// Registration and session business logic

use crate::auth::{
    error::AuthError,
    models::{
        OrgProfile, OrgSummary, RegisterOrgRequest, RegisterOrgResponse, SessionResponse,
    },
    password::PasswordService,
    repository::OrgRepository,
    token::TokenService,
};
use std::sync::Arc;
use uuid::Uuid;

/// Service coordinating org registration, login, and profile lookup
pub struct AuthService {
    org_repo: OrgRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(org_repo: OrgRepository, token_service: Arc<TokenService>) -> Self {
        Self {
            org_repo,
            token_service,
        }
    }

    /// Register a new organization and issue its first token
    pub async fn register(
        &self,
        request: RegisterOrgRequest,
    ) -> Result<RegisterOrgResponse, AuthError> {
        if self.org_repo.email_exists(&request.email).await? {
            return Err(AuthError::EmailInUse);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let address_json = serde_json::to_string(&request.address)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let org = self
            .org_repo
            .create_org(
                &request.name,
                &request.email,
                &password_hash,
                &request.whatsapp,
                &address_json,
            )
            .await?;

        tracing::info!("Registered org {} ({})", org.id, org.email);

        let token = self.token_service.generate_token(org.id, &org.email)?;
        Ok(RegisterOrgResponse {
            org: OrgProfile::from(org),
            token,
        })
    }

    /// Authenticate an organization and issue a token.
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionResponse, AuthError> {
        let org = self
            .org_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &org.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.generate_token(org.id, &org.email)?;
        Ok(SessionResponse {
            token,
            org: OrgSummary::from(org),
        })
    }

    /// Profile of the authenticated org; 404 when the org no longer exists
    pub async fn current_org(&self, org_id: Uuid) -> Result<OrgProfile, AuthError> {
        let org = self
            .org_repo
            .find_by_id(org_id)
            .await?
            .ok_or(AuthError::OrgNotFound)?;

        Ok(OrgProfile::from(org))
    }
}
