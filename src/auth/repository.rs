// Database repository for organizations

use crate::auth::{error::AuthError, models::Org};
use sqlx::PgPool;
use uuid::Uuid;

const ORG_COLUMNS: &str = "id, name, email, password_hash, whatsapp, address, created_at";

/// Org repository for database operations
#[derive(Clone)]
pub struct OrgRepository {
    pool: PgPool,
}

impl OrgRepository {
    /// Create a new OrgRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new organization. A unique-constraint violation on email
    /// maps to `EmailInUse` so a racing duplicate registration fails
    /// without mutating state.
    pub async fn create_org(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        whatsapp: &str,
        address_json: &str,
    ) -> Result<Org, AuthError> {
        let org = sqlx::query_as::<_, Org>(&format!(
            "INSERT INTO orgs (name, email, password_hash, whatsapp, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {ORG_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(whatsapp)
        .bind(address_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailInUse;
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(org)
    }

    /// Find an organization by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Org>, AuthError> {
        let org = sqlx::query_as::<_, Org>(&format!(
            "SELECT {ORG_COLUMNS} FROM orgs WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(org)
    }

    /// Find an organization by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Org>, AuthError> {
        let org = sqlx::query_as::<_, Org>(&format!(
            "SELECT {ORG_COLUMNS} FROM orgs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(org)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM orgs WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}
