// SQL construction for the filtered pet listing.
//
// Every supplied filter is an equality predicate; filters combine with
// AND, and an absent filter imposes no constraint. Results are ordered
// newest-first. The same WHERE clause feeds both the page query and the
// total count so the envelope stays consistent.

use crate::pets::models::{Environment, Level, PetSize, Species};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

const PET_COLUMNS: &str = "id, name, description, species, age, size, energy_level, \
                           independence, environment, adopted, org_id, created_at, updated_at";

/// Filter set plus pagination window for a pet listing query
#[derive(Debug, Default)]
pub struct PetQuery {
    /// City-prefilter result: only pets owned by these orgs
    pub org_ids: Option<Vec<Uuid>>,
    /// Single-owner scope for the org listing route
    pub org_id: Option<Uuid>,
    pub species: Option<Species>,
    pub size: Option<PetSize>,
    pub energy_level: Option<Level>,
    pub independence: Option<Level>,
    pub environment: Option<Environment>,
    pub adopted: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl PetQuery {
    /// Builds the page query: filters, newest-first order, LIMIT/OFFSET
    pub fn select(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {PET_COLUMNS} FROM pets"));
        self.push_filters(&mut qb);
        qb.push(" ORDER BY created_at DESC");
        qb.push(" LIMIT ");
        qb.push_bind(self.limit);
        qb.push(" OFFSET ");
        qb.push_bind(self.offset);
        qb
    }

    /// Builds the matching-count query over the same filters
    pub fn count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM pets");
        self.push_filters(&mut qb);
        qb
    }

    fn push_filters(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let mut has_where = false;
        let mut clause = |qb: &mut QueryBuilder<'static, Postgres>, has_where: &mut bool| {
            if *has_where {
                qb.push(" AND ");
            } else {
                qb.push(" WHERE ");
                *has_where = true;
            }
        };

        if let Some(org_ids) = &self.org_ids {
            clause(qb, &mut has_where);
            qb.push("org_id = ANY(");
            qb.push_bind(org_ids.clone());
            qb.push(")");
        }
        if let Some(org_id) = self.org_id {
            clause(qb, &mut has_where);
            qb.push("org_id = ");
            qb.push_bind(org_id);
        }
        if let Some(species) = self.species {
            clause(qb, &mut has_where);
            qb.push("species = ");
            qb.push_bind(species.as_str());
        }
        if let Some(size) = self.size {
            clause(qb, &mut has_where);
            qb.push("size = ");
            qb.push_bind(size.as_str());
        }
        if let Some(energy_level) = self.energy_level {
            clause(qb, &mut has_where);
            qb.push("energy_level = ");
            qb.push_bind(energy_level.as_str());
        }
        if let Some(independence) = self.independence {
            clause(qb, &mut has_where);
            qb.push("independence = ");
            qb.push_bind(independence.as_str());
        }
        if let Some(environment) = self.environment {
            clause(qb, &mut has_where);
            qb.push("environment = ");
            qb.push_bind(environment.as_str());
        }
        if let Some(adopted) = self.adopted {
            clause(qb, &mut has_where);
            qb.push("adopted = ");
            qb.push_bind(adopted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_query() -> PetQuery {
        PetQuery {
            limit: 12,
            offset: 0,
            ..PetQuery::default()
        }
    }

    #[test]
    fn test_unfiltered_select() {
        let qb = base_query().select();
        let sql = qb.sql();

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY created_at DESC"));
        assert!(sql.contains("LIMIT $1"));
        assert!(sql.contains("OFFSET $2"));
    }

    #[test]
    fn test_org_set_filter() {
        let query = PetQuery {
            org_ids: Some(vec![Uuid::new_v4(), Uuid::new_v4()]),
            ..base_query()
        };
        let qb = query.select();
        let sql = qb.sql();

        assert!(sql.contains("WHERE org_id = ANY($1)"));
        assert!(sql.contains("LIMIT $2"));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = PetQuery {
            org_ids: Some(vec![Uuid::new_v4()]),
            species: Some(Species::Dog),
            size: Some(PetSize::Small),
            adopted: Some(false),
            ..base_query()
        };
        let qb = query.select();
        let sql = qb.sql();

        assert!(sql.contains("org_id = ANY($1)"));
        assert!(sql.contains(" AND species = $2"));
        assert!(sql.contains(" AND size = $3"));
        assert!(sql.contains(" AND adopted = $4"));
        assert!(sql.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn test_absent_filters_impose_no_constraint() {
        let query = PetQuery {
            energy_level: Some(Level::High),
            ..base_query()
        };
        let qb = query.select();
        let sql = qb.sql();

        assert!(sql.contains("WHERE energy_level = $1"));
        assert!(!sql.contains("species"));
        assert!(!sql.contains("adopted"));
    }

    #[test]
    fn test_count_shares_filters_without_pagination() {
        let query = PetQuery {
            org_id: Some(Uuid::new_v4()),
            environment: Some(Environment::Apartment),
            ..base_query()
        };
        let qb = query.count();
        let sql = qb.sql();

        assert!(sql.starts_with("SELECT COUNT(*) FROM pets"));
        assert!(sql.contains("WHERE org_id = $1"));
        assert!(sql.contains(" AND environment = $2"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("ORDER BY"));
    }
}
