use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::pets::error::PetError;
use crate::pets::models::{
    CreatePetRequest, ListPetsQuery, OrgPetsQuery, Pet, PetOrgSummary, PetPage, PetResponse,
    UpdatePetRequest,
};
use crate::pets::query::PetQuery;
use crate::pets::repository::PetsRepository;

/// Service for pet listing, search, and ownership-gated mutations
#[derive(Clone)]
pub struct PetService {
    repo: PetsRepository,
}

impl PetService {
    /// Create a new PetService
    pub fn new(repo: PetsRepository) -> Self {
        Self { repo }
    }

    /// Register a new pet under the calling org
    pub async fn create_pet(
        &self,
        org_id: Uuid,
        request: CreatePetRequest,
    ) -> Result<PetResponse, PetError> {
        let pet = self.repo.create(org_id, &request).await?;
        info!("Pet {} created by org {}", pet.id, org_id);
        self.hydrate(pet).await
    }

    /// City-scoped search. The city narrows the candidate set to pets owned
    /// by matching orgs before any attribute filter applies; a city that
    /// matches no org yields an empty page without touching the pets table.
    pub async fn list_pets(&self, query: ListPetsQuery) -> Result<PetPage, PetError> {
        let org_ids = self.repo.org_ids_matching_city(&query.city).await?;
        if org_ids.is_empty() {
            debug!("No orgs match city {:?}", query.city);
            return Ok(PetPage::empty(query.page, query.limit));
        }

        let filter = PetQuery {
            org_ids: Some(org_ids),
            species: query.species,
            size: query.size,
            energy_level: query.energy_level,
            independence: query.independence,
            environment: query.environment,
            adopted: query.adopted,
            limit: query.limit as i64,
            offset: (query.page as i64 - 1) * query.limit as i64,
            ..PetQuery::default()
        };

        let (pets, total) = self.repo.list(&filter).await?;
        let items = self.hydrate_all(pets).await?;
        Ok(PetPage::new(items, total, query.page, query.limit))
    }

    /// Fetch one pet with its photos and owning-org projection
    pub async fn get_pet(&self, pet_id: Uuid) -> Result<PetResponse, PetError> {
        let pet = self.repo.find_by_id(pet_id).await?.ok_or(PetError::NotFound)?;
        self.hydrate(pet).await
    }

    /// Partial update of an owned pet
    pub async fn update_pet(
        &self,
        org_id: Uuid,
        pet_id: Uuid,
        request: UpdatePetRequest,
    ) -> Result<PetResponse, PetError> {
        self.authorize_owner(org_id, pet_id).await?;
        let pet = self.repo.update(pet_id, &request).await?;
        info!("Pet {} updated by org {}", pet_id, org_id);
        self.hydrate(pet).await
    }

    /// Flip the adoption flag on an owned pet
    pub async fn adopt_pet(
        &self,
        org_id: Uuid,
        pet_id: Uuid,
        adopted: bool,
    ) -> Result<(), PetError> {
        self.authorize_owner(org_id, pet_id).await?;
        self.repo.set_adopted(pet_id, adopted).await?;
        info!("Pet {} adopted={} by org {}", pet_id, adopted, org_id);
        Ok(())
    }

    /// Delete an owned pet and its photos
    pub async fn delete_pet(&self, org_id: Uuid, pet_id: Uuid) -> Result<(), PetError> {
        self.authorize_owner(org_id, pet_id).await?;
        self.repo.delete(pet_id).await?;
        info!("Pet {} deleted by org {}", pet_id, org_id);
        Ok(())
    }

    /// Public listing of one org's pets, newest first
    pub async fn list_org_pets(
        &self,
        org_id: Uuid,
        query: OrgPetsQuery,
    ) -> Result<PetPage, PetError> {
        let filter = PetQuery {
            org_id: Some(org_id),
            limit: query.limit as i64,
            offset: (query.page as i64 - 1) * query.limit as i64,
            ..PetQuery::default()
        };

        let (pets, total) = self.repo.list(&filter).await?;
        let items = self.hydrate_all(pets).await?;
        Ok(PetPage::new(items, total, query.page, query.limit))
    }

    /// Existence is checked before ownership so a missing pet is a 404
    /// regardless of who asks, and never leaks whether someone else owns it.
    async fn authorize_owner(&self, org_id: Uuid, pet_id: Uuid) -> Result<(), PetError> {
        match self.repo.owner_of(pet_id).await? {
            None => Err(PetError::NotFound),
            Some(owner) if owner != org_id => Err(PetError::NotOwner),
            Some(_) => Ok(()),
        }
    }

    async fn hydrate(&self, pet: Pet) -> Result<PetResponse, PetError> {
        let photos = self.repo.photos_for(pet.id).await?;
        let org = self.repo.org_summary(pet.org_id).await?;
        Ok(PetResponse::from_parts(pet, photos, org))
    }

    async fn hydrate_all(&self, pets: Vec<Pet>) -> Result<Vec<PetResponse>, PetError> {
        let mut org_cache: HashMap<Uuid, Option<PetOrgSummary>> = HashMap::new();
        let mut items = Vec::with_capacity(pets.len());

        for pet in pets {
            let photos = self.repo.photos_for(pet.id).await?;
            let org = match org_cache.get(&pet.org_id) {
                Some(cached) => cached.clone(),
                None => {
                    let summary = self.repo.org_summary(pet.org_id).await?;
                    org_cache.insert(pet.org_id, summary.clone());
                    summary
                }
            };
            items.push(PetResponse::from_parts(pet, photos, org));
        }

        Ok(items)
    }
}
