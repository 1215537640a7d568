// HTTP handlers for pet CRUD, adoption, and the city-scoped search

use crate::auth::middleware::{AuthenticatedOrg, MaybeOrg};
use crate::pets::{
    error::PetError,
    models::{
        AdoptPetRequest, CreatePetRequest, DeletePetResponse, ListPetsQuery, OrgPetsQuery,
        PetPage, PetResponse, UpdatePetRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

/// Handler for POST /pets
/// Registers a new pet under the authenticated org
#[utoipa::path(
    post,
    path = "/pets",
    request_body = CreatePetRequest,
    responses(
        (status = 201, description = "Pet created", body = PetResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_token" = [])),
    tag = "pets"
)]
pub async fn create_pet_handler(
    State(state): State<crate::AppState>,
    org: AuthenticatedOrg,
    Json(request): Json<CreatePetRequest>,
) -> Result<(StatusCode, Json<PetResponse>), PetError> {
    tracing::debug!("Creating pet {:?} for org {}", request.name, org.org_id);

    request
        .validate()
        .map_err(|e| PetError::Validation(e.to_string()))?;

    let response = state.pet_service.create_pet(org.org_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /pets
/// City-scoped pet search with optional attribute filters
#[utoipa::path(
    get,
    path = "/pets",
    params(
        ("city" = String, Query, description = "City substring to match against org addresses"),
        ("page" = Option<u32>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u32>, Query, description = "Page size, max 100"),
        ("species" = Option<String>, Query, description = "dog | cat | other"),
        ("size" = Option<String>, Query, description = "small | medium | large"),
        ("energy_level" = Option<String>, Query, description = "low | medium | high"),
        ("independence" = Option<String>, Query, description = "low | medium | high"),
        ("environment" = Option<String>, Query, description = "apartment | house | both"),
        ("adopted" = Option<bool>, Query, description = "Adoption status filter")
    ),
    responses(
        (status = 200, description = "Paginated pet listing", body = PetPage),
        (status = 400, description = "Missing or invalid city")
    ),
    tag = "pets"
)]
pub async fn list_pets_handler(
    State(state): State<crate::AppState>,
    MaybeOrg(identity): MaybeOrg,
    Query(query): Query<ListPetsQuery>,
) -> Result<Json<PetPage>, PetError> {
    query
        .validate()
        .map_err(|e| PetError::Validation(e.to_string()))?;

    // Identity is optional here; an unverifiable token browses anonymously
    if let Some(org) = &identity {
        tracing::debug!("Search by authenticated org {}", org.org_id);
    }

    let page = state.pet_service.list_pets(query).await?;
    Ok(Json(page))
}

/// Handler for GET /pets/:pet_id
/// Fetches one pet with photos and owning-org details
#[utoipa::path(
    get,
    path = "/pets/{pet_id}",
    params(("pet_id" = Uuid, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet details", body = PetResponse),
        (status = 404, description = "Pet not found")
    ),
    tag = "pets"
)]
pub async fn get_pet_handler(
    State(state): State<crate::AppState>,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<PetResponse>, PetError> {
    let response = state.pet_service.get_pet(pet_id).await?;
    Ok(Json(response))
}

/// Handler for PATCH /pets/:pet_id
/// Partial update of an owned pet; a supplied photo list replaces the set
#[utoipa::path(
    patch,
    path = "/pets/{pet_id}",
    params(("pet_id" = Uuid, Path, description = "Pet ID")),
    request_body = UpdatePetRequest,
    responses(
        (status = 200, description = "Updated pet", body = PetResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Pet belongs to another org"),
        (status = 404, description = "Pet not found")
    ),
    security(("bearer_token" = [])),
    tag = "pets"
)]
pub async fn update_pet_handler(
    State(state): State<crate::AppState>,
    org: AuthenticatedOrg,
    Path(pet_id): Path<Uuid>,
    Json(request): Json<UpdatePetRequest>,
) -> Result<Json<PetResponse>, PetError> {
    request
        .validate()
        .map_err(|e| PetError::Validation(e.to_string()))?;

    let response = state
        .pet_service
        .update_pet(org.org_id, pet_id, request)
        .await?;
    Ok(Json(response))
}

/// Handler for PATCH /pets/:pet_id/adopt
/// Marks an owned pet adopted (or available again). An absent or empty
/// body means adopted.
#[utoipa::path(
    patch,
    path = "/pets/{pet_id}/adopt",
    params(("pet_id" = Uuid, Path, description = "Pet ID")),
    request_body = AdoptPetRequest,
    responses(
        (status = 204, description = "Adoption status updated"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Pet belongs to another org"),
        (status = 404, description = "Pet not found")
    ),
    security(("bearer_token" = [])),
    tag = "pets"
)]
pub async fn adopt_pet_handler(
    State(state): State<crate::AppState>,
    org: AuthenticatedOrg,
    Path(pet_id): Path<Uuid>,
    body: Option<Json<AdoptPetRequest>>,
) -> Result<StatusCode, PetError> {
    let adopted = body
        .and_then(|Json(request)| request.adopted)
        .unwrap_or(true);

    state
        .pet_service
        .adopt_pet(org.org_id, pet_id, adopted)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /pets/:pet_id
/// Removes an owned pet and its photos
#[utoipa::path(
    delete,
    path = "/pets/{pet_id}",
    params(("pet_id" = Uuid, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet deleted", body = DeletePetResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Pet belongs to another org"),
        (status = 404, description = "Pet not found")
    ),
    security(("bearer_token" = [])),
    tag = "pets"
)]
pub async fn delete_pet_handler(
    State(state): State<crate::AppState>,
    org: AuthenticatedOrg,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<DeletePetResponse>, PetError> {
    state.pet_service.delete_pet(org.org_id, pet_id).await?;
    Ok(Json(DeletePetResponse {
        success: true,
        message: "Pet deleted successfully".to_string(),
    }))
}

/// Handler for GET /orgs/:org_id/pets
/// Public listing of one org's pets
#[utoipa::path(
    get,
    path = "/orgs/{org_id}/pets",
    params(
        ("org_id" = Uuid, Path, description = "Org ID"),
        ("page" = Option<u32>, Query, description = "Page number, 1-based"),
        ("limit" = Option<u32>, Query, description = "Page size, max 100")
    ),
    responses(
        (status = 200, description = "Paginated pet listing", body = PetPage),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "pets"
)]
pub async fn list_org_pets_handler(
    State(state): State<crate::AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<OrgPetsQuery>,
) -> Result<Json<PetPage>, PetError> {
    query
        .validate()
        .map_err(|e| PetError::Validation(e.to_string()))?;

    let page = state.pet_service.list_org_pets(org_id, query).await?;
    Ok(Json(page))
}
