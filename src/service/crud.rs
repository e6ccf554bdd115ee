//! Query execution shared by the services: bind a [`QueryBuf`] and fetch typed rows.

use crate::error::AppError;
use crate::sql::QueryBuf;
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{Executor, FromRow};

fn bind_as<'q, T>(q: &'q QueryBuf) -> QueryAs<'q, Postgres, T, PgArguments>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

fn bind_scalar<'q, T>(q: &'q QueryBuf) -> QueryScalar<'q, Postgres, T, PgArguments>
where
    (T,): for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

pub(crate) async fn fetch_all<'c, T, E>(executor: E, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    E: Executor<'c, Database = Postgres>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(bind_as::<T>(q).fetch_all(executor).await?)
}

pub(crate) async fn fetch_optional<'c, T, E>(executor: E, q: &QueryBuf) -> Result<Option<T>, AppError>
where
    E: Executor<'c, Database = Postgres>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(bind_as::<T>(q).fetch_optional(executor).await?)
}

pub(crate) async fn fetch_scalars<'c, T, E>(executor: E, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    E: Executor<'c, Database = Postgres>,
    T: Send + Unpin,
    (T,): for<'r> FromRow<'r, PgRow>,
{
    Ok(bind_scalar::<T>(q).fetch_all(executor).await?)
}

pub(crate) async fn fetch_optional_scalar<'c, T, E>(executor: E, q: &QueryBuf) -> Result<Option<T>, AppError>
where
    E: Executor<'c, Database = Postgres>,
    T: Send + Unpin,
    (T,): for<'r> FromRow<'r, PgRow>,
{
    Ok(bind_scalar::<T>(q).fetch_optional(executor).await?)
}

pub(crate) async fn execute<'c, E>(executor: E, q: &QueryBuf) -> Result<u64, AppError>
where
    E: Executor<'c, Database = Postgres>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(executor).await?.rows_affected())
}
