//! Category and speciality CRUD; both kinds share tables of the same shape.

use crate::error::AppError;
use crate::model::{Lookup, LookupChanges, LookupKind};
use crate::service::crud::{fetch_all, fetch_optional, fetch_scalars};
use crate::sql::{insert_lookup, select_existing_lookup_ids, select_lookups, update_lookup};
use sqlx::postgres::Postgres;
use sqlx::{Executor, PgPool};
use std::collections::HashSet;

pub struct LookupService;

impl LookupService {
    pub async fn list(pool: &PgPool, kind: LookupKind, active: Option<bool>) -> Result<Vec<Lookup>, AppError> {
        fetch_all(pool, &select_lookups(kind, active)).await
    }

    pub async fn create(pool: &PgPool, kind: LookupKind, changes: &LookupChanges) -> Result<Lookup, AppError> {
        let created: Lookup = fetch_optional(pool, &insert_lookup(kind, changes))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(kind = kind.label(), id = created.id, name = %created.name, "lookup created");
        Ok(created)
    }

    /// Rename or toggle a lookup; `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        kind: LookupKind,
        id: i64,
        changes: &LookupChanges,
    ) -> Result<Option<Lookup>, AppError> {
        fetch_optional(pool, &update_lookup(kind, id, changes)).await
    }

    /// Ids from `ids` with no row in the lookup table, in input order.
    pub async fn missing_ids<'c, E>(executor: E, kind: LookupKind, ids: &[i64]) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'c, Database = Postgres>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<i64> = fetch_scalars(executor, &select_existing_lookup_ids(kind, ids)).await?;
        let found: HashSet<i64> = found.into_iter().collect();
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}
