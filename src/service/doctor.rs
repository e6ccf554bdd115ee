//! Doctor CRUD. Writes touching several tables run in one transaction.

use crate::error::AppError;
use crate::filter::{invalid_choice, DoctorFilter};
use crate::model::{
    DoctorBasic, DoctorChanges, DoctorDetailRow, DoctorExtended, DoctorLocation, DoctorStatus, LookupKind,
};
use crate::service::crud::{execute, fetch_all, fetch_optional, fetch_optional_scalar};
use crate::service::LookupService;
use crate::sql::{
    delete_doctor, delete_links, insert_doctor, insert_links, select_doctor_by_id, select_doctor_detail,
    select_doctor_list, select_doctor_status_for_update, select_locations_for_doctor, update_doctor,
};
use sqlx::{PgConnection, PgPool};

const LINKED_KINDS: [LookupKind; 2] = [LookupKind::Category, LookupKind::Speciality];

pub struct DoctorService;

impl DoctorService {
    /// Filtered page of doctors in basic representation. Filter ids must name existing lookups.
    pub async fn list(pool: &PgPool, filter: &DoctorFilter) -> Result<Vec<DoctorBasic>, AppError> {
        for kind in LINKED_KINDS {
            let missing = LookupService::missing_ids(pool, kind, filter.ids(kind)).await?;
            if let Some(id) = missing.first() {
                tracing::warn!(kind = kind.label(), id, "list filter names unknown lookup");
                return Err(invalid_choice(id));
            }
        }
        let q = select_doctor_list(filter);
        fetch_all(pool, &q).await
    }

    /// Extended representation with lookups and locations, or `None` if absent.
    pub async fn retrieve(pool: &PgPool, id: i64) -> Result<Option<DoctorExtended>, AppError> {
        let row: Option<DoctorDetailRow> = fetch_optional(pool, &select_doctor_detail(id)).await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let locations: Vec<DoctorLocation> = fetch_all(pool, &select_locations_for_doctor(id)).await?;
        Ok(Some(DoctorExtended::from_parts(row, locations)))
    }

    /// Insert a doctor and its lookup links. Entering APPROVED or REJECTED on creation stamps its timestamp.
    pub async fn create(pool: &PgPool, changes: &DoctorChanges) -> Result<DoctorBasic, AppError> {
        let mut tx = pool.begin().await?;
        Self::check_links(&mut tx, changes).await?;
        let stamps = changes.status.unwrap_or_default().stamps_from(None);
        let id: i64 = fetch_optional_scalar(&mut *tx, &insert_doctor(changes, stamps))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        Self::replace_links(&mut tx, id, changes).await?;
        let doctor = Self::basic(&mut tx, id).await?;
        tx.commit().await?;
        tracing::info!(id, status = %doctor.status, "doctor created");
        Ok(doctor)
    }

    /// Apply changes to an existing doctor, or `None` if absent. The row is locked while the
    /// previous status is compared so concurrent transitions stamp at most once each.
    pub async fn update(pool: &PgPool, id: i64, changes: &DoctorChanges) -> Result<Option<DoctorBasic>, AppError> {
        let mut tx = pool.begin().await?;
        let current: Option<String> = fetch_optional_scalar(&mut *tx, &select_doctor_status_for_update(id)).await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let previous = DoctorStatus::try_from(current).ok();
        Self::check_links(&mut tx, changes).await?;
        let stamps = changes
            .status
            .map(|next| next.stamps_from(previous))
            .unwrap_or_default();
        execute(&mut *tx, &update_doctor(id, changes, stamps)).await?;
        Self::replace_links(&mut tx, id, changes).await?;
        let doctor = Self::basic(&mut tx, id).await?;
        tx.commit().await?;
        if stamps.approved || stamps.rejected {
            tracing::info!(id, from = ?previous, to = %doctor.status, "doctor status changed");
        }
        Ok(Some(doctor))
    }

    /// Delete a doctor with its locations and links. Returns false if absent.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let deleted: Option<i64> = fetch_optional_scalar(pool, &delete_doctor(id)).await?;
        if deleted.is_some() {
            tracing::info!(id, "doctor deleted");
        }
        Ok(deleted.is_some())
    }

    async fn basic(conn: &mut PgConnection, id: i64) -> Result<DoctorBasic, AppError> {
        fetch_optional(&mut *conn, &select_doctor_by_id(id))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn check_links(conn: &mut PgConnection, changes: &DoctorChanges) -> Result<(), AppError> {
        for kind in LINKED_KINDS {
            let Some(ids) = Self::link_ids(changes, kind) else { continue };
            let missing = LookupService::missing_ids(&mut *conn, kind, ids).await?;
            if let Some(id) = missing.first() {
                return Err(AppError::BadRequest(format!(
                    "{}: invalid pk \"{}\" - object does not exist",
                    kind.field(),
                    id
                )));
            }
        }
        Ok(())
    }

    async fn replace_links(conn: &mut PgConnection, doctor_id: i64, changes: &DoctorChanges) -> Result<(), AppError> {
        for kind in LINKED_KINDS {
            let Some(ids) = Self::link_ids(changes, kind) else { continue };
            execute(&mut *conn, &delete_links(kind, doctor_id)).await?;
            if !ids.is_empty() {
                execute(&mut *conn, &insert_links(kind, doctor_id, ids)).await?;
            }
        }
        Ok(())
    }

    fn link_ids(changes: &DoctorChanges, kind: LookupKind) -> Option<&[i64]> {
        match kind {
            LookupKind::Category => changes.categories.as_deref(),
            LookupKind::Speciality => changes.specialities.as_deref(),
        }
    }
}
