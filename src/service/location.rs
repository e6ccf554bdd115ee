//! Doctor location CRUD.

use crate::error::AppError;
use crate::model::{DoctorLocation, LocationChanges};
use crate::service::crud::{fetch_all, fetch_optional, fetch_optional_scalar};
use crate::sql::{delete_location, insert_location, select_doctor_exists, select_locations_for_doctor, update_location};
use sqlx::PgPool;

pub struct LocationService;

impl LocationService {
    /// Locations of a doctor ordered by id; `None` if the doctor does not exist.
    pub async fn list_for_doctor(pool: &PgPool, doctor_id: i64) -> Result<Option<Vec<DoctorLocation>>, AppError> {
        if !Self::doctor_exists(pool, doctor_id).await? {
            return Ok(None);
        }
        Ok(Some(fetch_all(pool, &select_locations_for_doctor(doctor_id)).await?))
    }

    /// Add a location to a doctor; `None` if the doctor does not exist.
    pub async fn create(
        pool: &PgPool,
        doctor_id: i64,
        changes: &LocationChanges,
    ) -> Result<Option<DoctorLocation>, AppError> {
        if !Self::doctor_exists(pool, doctor_id).await? {
            return Ok(None);
        }
        let created: Option<DoctorLocation> = fetch_optional(pool, &insert_location(doctor_id, changes)).await?;
        if let Some(loc) = &created {
            tracing::info!(doctor_id, id = loc.id, "location created");
        }
        Ok(created)
    }

    pub async fn update(pool: &PgPool, id: i64, changes: &LocationChanges) -> Result<Option<DoctorLocation>, AppError> {
        fetch_optional(pool, &update_location(id, changes)).await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let deleted: Option<i64> = fetch_optional_scalar(pool, &delete_location(id)).await?;
        Ok(deleted.is_some())
    }

    async fn doctor_exists(pool: &PgPool, doctor_id: i64) -> Result<bool, AppError> {
        let exists: Option<bool> = fetch_optional_scalar(pool, &select_doctor_exists(doctor_id)).await?;
        Ok(exists.unwrap_or(false))
    }
}
