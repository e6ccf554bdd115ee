//! Ordered, versioned schema migrations embedded at compile time.
//!
//! Applied steps are recorded in `_sys_migrations` with a SHA-256 of their SQL. A step whose
//! SQL changed after it was applied, or a recorded step this build does not know, aborts the run.

use crate::error::{AppError, MigrationError};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::collections::HashMap;

/// One migration step.
#[derive(Debug)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All steps, in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "0001_lookups",
        sql: include_str!("../migrations/0001_lookups.sql"),
    },
    Migration {
        id: "0002_doctor",
        sql: include_str!("../migrations/0002_doctor.sql"),
    },
    Migration {
        id: "0003_doctor_location",
        sql: include_str!("../migrations/0003_doctor_location.sql"),
    },
    Migration {
        id: "0004_filter_indexes",
        sql: include_str!("../migrations/0004_filter_indexes.sql"),
    },
];

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _sys_migrations (
        id TEXT PRIMARY KEY,
        checksum TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Serialises concurrent runs from several instances.
const LOCK_KEY: i64 = 0x646f_6374_6f72;

pub fn checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}

/// Steps still to apply given the ledger contents `(id, checksum)`.
pub fn pending<'a>(
    applied: &[(String, String)],
    known: &'a [Migration],
) -> Result<Vec<&'a Migration>, MigrationError> {
    let known_ids: HashMap<&str, &Migration> = known.iter().map(|m| (m.id, m)).collect();
    let mut applied_ids = HashMap::new();
    for (id, recorded) in applied {
        let Some(m) = known_ids.get(id.as_str()) else {
            return Err(MigrationError::UnknownApplied(id.clone()));
        };
        let embedded = checksum(m.sql);
        if *recorded != embedded {
            return Err(MigrationError::ChecksumMismatch {
                id: id.clone(),
                recorded: recorded.clone(),
                embedded,
            });
        }
        applied_ids.insert(id.as_str(), ());
    }
    Ok(known.iter().filter(|m| !applied_ids.contains_key(m.id)).collect())
}

/// Apply every pending step in one transaction. Returns the ids applied by this call.
pub async fn apply_migrations(pool: &PgPool) -> Result<Vec<&'static str>, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    sqlx::raw_sql(LEDGER_DDL).execute(&mut *tx).await?;

    let applied: Vec<(String, String)> = sqlx::query_as("SELECT id, checksum FROM _sys_migrations ORDER BY id")
        .fetch_all(&mut *tx)
        .await?;
    let todo = pending(&applied, MIGRATIONS)?;

    let mut done = Vec::with_capacity(todo.len());
    for m in todo {
        tracing::info!(id = m.id, "applying migration");
        sqlx::raw_sql(m.sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO _sys_migrations (id, checksum) VALUES ($1, $2)")
            .bind(m.id)
            .bind(checksum(m.sql))
            .execute(&mut *tx)
            .await?;
        done.push(m.id);
    }
    tx.commit().await?;
    if done.is_empty() {
        tracing::info!("schema up to date");
    }
    Ok(done)
}
