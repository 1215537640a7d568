// Organization data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Organization database model
#[derive(Debug, Clone, FromRow)]
pub struct Org {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub whatsapp: String,
    /// JSON serialized to text; the city search substring-matches this blob
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Org {
    /// Deserializes the stored address blob. A blob that fails to parse
    /// surfaces as null rather than an error, matching the listing format.
    pub fn parsed_address(&self) -> Value {
        serde_json::from_str(&self.address).unwrap_or(Value::Null)
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterOrgRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(custom = "crate::validation::validate_whatsapp")]
    pub whatsapp: String,
    /// Free-form structured address; stored serialized, no shape enforced
    #[schema(value_type = Object)]
    pub address: Value,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Full org profile (registration response and GET /orgs/me)
#[derive(Debug, Serialize, ToSchema)]
pub struct OrgProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    #[schema(value_type = Object)]
    pub address: Value,
}

impl From<Org> for OrgProfile {
    fn from(org: Org) -> Self {
        let address = org.parsed_address();
        Self {
            id: org.id,
            name: org.name,
            email: org.email,
            whatsapp: org.whatsapp,
            address,
        }
    }
}

/// Short org projection returned by POST /sessions
#[derive(Debug, Serialize, ToSchema)]
pub struct OrgSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Org> for OrgSummary {
    fn from(org: Org) -> Self {
        Self {
            id: org.id,
            name: org.name,
            email: org.email,
        }
    }
}

/// Registration response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterOrgResponse {
    pub org: OrgProfile,
    pub token: String,
}

/// Login response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub org: OrgSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_org(address: &str) -> Org {
        Org {
            id: Uuid::new_v4(),
            name: "Happy Paws".to_string(),
            email: "contact@happypaws.org".to_string(),
            password_hash: "$argon2id$...".to_string(),
            whatsapp: "+5511999999999".to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parsed_address_roundtrip() {
        let org = sample_org(r#"{"city":"Recife","street":"Rua A, 1"}"#);
        assert_eq!(org.parsed_address()["city"], json!("Recife"));
    }

    #[test]
    fn test_unparseable_address_becomes_null() {
        let org = sample_org("not json");
        assert_eq!(org.parsed_address(), Value::Null);
    }

    #[test]
    fn test_profile_excludes_password_hash() {
        let org = sample_org(r#"{"city":"Recife"}"#);
        let profile = OrgProfile::from(org);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("whatsapp").is_some());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterOrgRequest {
            name: "Happy Paws".to_string(),
            email: "contact@happypaws.org".to_string(),
            password: "secret1".to_string(),
            whatsapp: "+5511999999999".to_string(),
            address: json!({"city": "Recife"}),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterOrgRequest {
            password: "12345".to_string(),
            name: valid.name.clone(),
            email: valid.email.clone(),
            whatsapp: valid.whatsapp.clone(),
            address: valid.address.clone(),
        };
        assert!(short_password.validate().is_err());
    }
}
