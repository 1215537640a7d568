use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Pet species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Other,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Other => "other",
        }
    }
}

impl Default for Species {
    fn default() -> Self {
        Species::Dog
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pet size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "small",
            PetSize::Medium => "medium",
            PetSize::Large => "large",
        }
    }
}

/// Three-step scale used for both energy level and independence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Suitable living environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Apartment,
    House,
    Both,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Apartment => "apartment",
            Environment::House => "house",
            Environment::Both => "both",
        }
    }
}

/// Pet database model
#[derive(Debug, Clone, FromRow)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub species: Species,
    pub age: Option<i32>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    pub adopted: bool,
    pub org_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a pet
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePetRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub species: Species,
    #[validate(range(min = 0, max = 30))]
    pub age: Option<i32>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    #[validate(
        length(min = 1, max = 10, message = "between 1 and 10 photo URLs required"),
        custom = "crate::validation::validate_photo_urls"
    )]
    pub photo_urls: Vec<String>,
}

/// Request DTO for a partial pet update. Absent fields leave the stored
/// value untouched; a present `photo_urls` (even empty) replaces the whole
/// photo set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePetRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub species: Option<Species>,
    #[validate(range(min = 0, max = 30))]
    pub age: Option<i32>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    #[validate(
        length(max = 10, message = "at most 10 photo URLs allowed"),
        custom = "crate::validation::validate_photo_urls"
    )]
    pub photo_urls: Option<Vec<String>>,
}

/// Request DTO for PATCH /pets/:id/adopt. An empty body defaults to
/// `adopted = true`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdoptPetRequest {
    pub adopted: Option<bool>,
}

fn default_page() -> u32 {
    1
}

fn default_search_limit() -> u32 {
    12
}

fn default_org_limit() -> u32 {
    20
}

/// Query parameters for GET /pets. City is mandatory; every other filter
/// is an optional equality predicate combined with AND.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListPetsQuery {
    #[validate(length(min = 2, message = "City is required"))]
    pub city: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    pub species: Option<Species>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    pub adopted: Option<bool>,
}

/// Query parameters for GET /orgs/:orgId/pets
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrgPetsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
    #[serde(default = "default_org_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

/// Public org projection embedded in a hydrated pet
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PetOrgSummary {
    pub id: Uuid,
    pub name: String,
    pub whatsapp: String,
    pub email: String,
    #[schema(value_type = Object)]
    pub address: Value,
}

/// Hydrated pet response. The photo list is exposed under both `photos`
/// and `photo_urls`, a compatibility shape carried over from the previous
/// API surface.
#[derive(Debug, Serialize, ToSchema)]
pub struct PetResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub species: Species,
    pub age: Option<i32>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    pub adopted: bool,
    pub photos: Vec<String>,
    pub photo_urls: Vec<String>,
    pub org: Option<PetOrgSummary>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PetResponse {
    pub fn from_parts(pet: Pet, photo_urls: Vec<String>, org: Option<PetOrgSummary>) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            description: pet.description,
            species: pet.species,
            age: pet.age,
            size: pet.size,
            energy_level: pet.energy_level,
            independence: pet.independence,
            environment: pet.environment,
            adopted: pet.adopted,
            photos: photo_urls.clone(),
            photo_urls,
            org,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

/// Paginated listing envelope. `total` is the full matching count,
/// independent of the pagination window.
#[derive(Debug, Serialize, ToSchema)]
pub struct PetPage {
    pub items: Vec<PetResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl PetPage {
    pub fn new(items: Vec<PetResponse>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            ((total as u64 + limit as u64 - 1) / limit as u64) as u32
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), 0, page, limit)
    }
}

/// Response DTO for DELETE /pets/:id
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletePetResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_pet_deserialization_defaults_species() {
        let body = json!({
            "name": "Rex",
            "photo_urls": ["https://example.com/rex.jpg"]
        });
        let request: CreatePetRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.species, Species::Dog);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_pet_requires_at_least_one_photo() {
        let body = json!({
            "name": "Rex",
            "photo_urls": []
        });
        let request: CreatePetRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_pet_rejects_out_of_range_age() {
        let body = json!({
            "name": "Rex",
            "age": 31,
            "photo_urls": ["https://example.com/rex.jpg"]
        });
        let request: CreatePetRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_pet_rejects_unknown_species() {
        let body = json!({
            "name": "Rex",
            "species": "dragon",
            "photo_urls": ["https://example.com/rex.jpg"]
        });
        assert!(serde_json::from_value::<CreatePetRequest>(body).is_err());
    }

    #[test]
    fn test_update_pet_partial_deserialization() {
        let request: UpdatePetRequest = serde_json::from_str(r#"{"name":"Max"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("Max"));
        assert!(request.species.is_none());
        assert!(request.photo_urls.is_none());

        let request: UpdatePetRequest = serde_json::from_str(r#"{"photo_urls":[]}"#).unwrap();
        assert_eq!(request.photo_urls.as_deref(), Some(&[][..]));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_pet_response_shape() {
        let pet = Pet {
            id: Uuid::new_v4(),
            name: "Rex".to_string(),
            description: None,
            species: Species::Dog,
            age: Some(3),
            size: Some(PetSize::Medium),
            energy_level: Some(Level::High),
            independence: None,
            environment: Some(Environment::Both),
            adopted: false,
            org_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let urls = vec!["https://example.com/rex.jpg".to_string()];
        let response = PetResponse::from_parts(pet, urls.clone(), None);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["photos"], json!(urls));
        assert_eq!(json["photo_urls"], json!(urls));
        assert_eq!(json["species"], json!("dog"));
        assert_eq!(json["environment"], json!("both"));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("org_id").is_none());
    }

    #[test]
    fn test_page_envelope_total_pages() {
        assert_eq!(PetPage::new(Vec::new(), 5, 1, 2).total_pages, 3);
        assert_eq!(PetPage::new(Vec::new(), 4, 1, 2).total_pages, 2);
        assert_eq!(PetPage::new(Vec::new(), 1, 1, 12).total_pages, 1);
        assert_eq!(PetPage::empty(1, 12).total_pages, 0);
    }

    #[test]
    fn test_list_query_limit_bounds() {
        let query = ListPetsQuery {
            city: "Recife".to_string(),
            page: 1,
            limit: 101,
            species: None,
            size: None,
            energy_level: None,
            independence: None,
            environment: None,
            adopted: None,
        };
        assert!(query.validate().is_err());

        let query = ListPetsQuery {
            city: "R".to_string(),
            page: 1,
            limit: 12,
            species: None,
            size: None,
            energy_level: None,
            independence: None,
            environment: None,
            adopted: None,
        };
        assert!(query.validate().is_err(), "one-char city is rejected");
    }
}
