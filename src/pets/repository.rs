use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::pets::error::PetError;
use crate::pets::models::{CreatePetRequest, Pet, PetOrgSummary, UpdatePetRequest};
use crate::pets::query::PetQuery;

const PET_COLUMNS: &str = "id, name, description, species, age, size, energy_level, \
                           independence, environment, adopted, org_id, created_at, updated_at";

/// Repository for pet and photo operations
#[derive(Clone)]
pub struct PetsRepository {
    pool: PgPool,
}

impl PetsRepository {
    /// Create a new PetsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve org ids whose serialized address contains the city
    /// substring. Case-sensitive containment against the raw blob, not a
    /// structured field lookup.
    pub async fn org_ids_matching_city(&self, city: &str) -> Result<Vec<Uuid>, PetError> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM orgs WHERE address LIKE $1 ESCAPE '\\'")
                .bind(containment_pattern(city))
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Create a pet and its photo set in one atomic transaction. A failed
    /// photo insert rolls back the pet insert; no pet is ever observable
    /// without its declared photos. Transient contention retries the whole
    /// transaction a bounded number of times.
    pub async fn create(&self, org_id: Uuid, request: &CreatePetRequest) -> Result<Pet, PetError> {
        let mut attempt = 1;
        loop {
            match self.try_create(org_id, request).await {
                Ok(pet) => return Ok(pet),
                Err(err) if db::is_retryable(&err) && attempt < db::TXN_MAX_ATTEMPTS => {
                    warn!(
                        "Retrying pet create after transient error (attempt {}): {}",
                        attempt, err
                    );
                    tokio::time::sleep(db::TXN_RETRY_BACKOFF).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn try_create(
        &self,
        org_id: Uuid,
        request: &CreatePetRequest,
    ) -> Result<Pet, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let pet = sqlx::query_as::<_, Pet>(&format!(
            "INSERT INTO pets \
             (name, description, species, age, size, energy_level, independence, environment, org_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PET_COLUMNS}"
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.species)
        .bind(request.age)
        .bind(request.size)
        .bind(request.energy_level)
        .bind(request.independence)
        .bind(request.environment)
        .bind(org_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_photos(&mut tx, pet.id, &request.photo_urls).await?;

        tx.commit().await?;
        Ok(pet)
    }

    /// Apply a partial attribute update and, when a new photo URL list is
    /// supplied (even empty), replace the whole photo set in the same
    /// transaction. Absent attributes keep their stored values.
    pub async fn update(&self, pet_id: Uuid, request: &UpdatePetRequest) -> Result<Pet, PetError> {
        let mut attempt = 1;
        loop {
            match self.try_update(pet_id, request).await {
                Ok(pet) => return Ok(pet),
                Err(err) if db::is_retryable(&err) && attempt < db::TXN_MAX_ATTEMPTS => {
                    warn!(
                        "Retrying pet update after transient error (attempt {}): {}",
                        attempt, err
                    );
                    tokio::time::sleep(db::TXN_RETRY_BACKOFF).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn try_update(
        &self,
        pet_id: Uuid,
        request: &UpdatePetRequest,
    ) -> Result<Pet, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let pet = sqlx::query_as::<_, Pet>(&format!(
            "UPDATE pets SET \
             name = COALESCE($1, name), \
             description = COALESCE($2, description), \
             species = COALESCE($3, species), \
             age = COALESCE($4, age), \
             size = COALESCE($5, size), \
             energy_level = COALESCE($6, energy_level), \
             independence = COALESCE($7, independence), \
             environment = COALESCE($8, environment), \
             updated_at = NOW() \
             WHERE id = $9 \
             RETURNING {PET_COLUMNS}"
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.species)
        .bind(request.age)
        .bind(request.size)
        .bind(request.energy_level)
        .bind(request.independence)
        .bind(request.environment)
        .bind(pet_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(urls) = &request.photo_urls {
            sqlx::query("DELETE FROM photos WHERE pet_id = $1")
                .bind(pet_id)
                .execute(&mut *tx)
                .await?;
            insert_photos(&mut tx, pet_id, urls).await?;
        }

        tx.commit().await?;
        Ok(pet)
    }

    /// Find a pet by ID
    pub async fn find_by_id(&self, pet_id: Uuid) -> Result<Option<Pet>, PetError> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1"
        ))
        .bind(pet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }

    /// Owning org of a pet, or None when the pet does not exist
    pub async fn owner_of(&self, pet_id: Uuid) -> Result<Option<Uuid>, PetError> {
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT org_id FROM pets WHERE id = $1")
            .bind(pet_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    /// Photo URLs for a pet, in creation order
    pub async fn photos_for(&self, pet_id: Uuid) -> Result<Vec<String>, PetError> {
        let urls: Vec<String> =
            sqlx::query_scalar("SELECT url FROM photos WHERE pet_id = $1 ORDER BY id")
                .bind(pet_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(urls)
    }

    /// Public projection of a pet's owning org
    pub async fn org_summary(&self, org_id: Uuid) -> Result<Option<PetOrgSummary>, PetError> {
        let row: Option<(Uuid, String, String, String, String)> = sqlx::query_as(
            "SELECT id, name, whatsapp, email, address FROM orgs WHERE id = $1",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name, whatsapp, email, address)| PetOrgSummary {
            id,
            name,
            whatsapp,
            email,
            address: serde_json::from_str(&address).unwrap_or(serde_json::Value::Null),
        }))
    }

    /// Set the adopted flag; single-row update, no transaction needed
    pub async fn set_adopted(&self, pet_id: Uuid, adopted: bool) -> Result<(), PetError> {
        sqlx::query("UPDATE pets SET adopted = $1, updated_at = NOW() WHERE id = $2")
            .bind(adopted)
            .bind(pet_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a pet; photo cleanup is the schema's cascade contract
    pub async fn delete(&self, pet_id: Uuid) -> Result<(), PetError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(pet_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PetError::NotFound);
        }
        Ok(())
    }

    /// Run a filtered listing: one page of rows plus the full matching count
    pub async fn list(&self, query: &PetQuery) -> Result<(Vec<Pet>, i64), PetError> {
        let mut select = query.select();
        let pets = select
            .build_query_as::<Pet>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = query.count();
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((pets, total))
    }
}

/// LIKE pattern for literal substring containment. `%`, `_`, and `\` in
/// the needle are escaped so they match themselves instead of acting as
/// wildcards.
fn containment_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Bulk photo insert: one statement, array order preserved, failure fails
/// the enclosing transaction.
async fn insert_photos(
    tx: &mut Transaction<'_, Postgres>,
    pet_id: Uuid,
    urls: &[String],
) -> Result<(), sqlx::Error> {
    if urls.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO photos (pet_id, url) \
         SELECT $1, t.url FROM UNNEST($2::text[]) WITH ORDINALITY AS t(url, ord) \
         ORDER BY t.ord",
    )
    .bind(pet_id)
    .bind(urls)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
