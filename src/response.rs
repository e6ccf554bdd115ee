//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaPage,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaPage {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::CREATED,
        Json(SuccessOne {
            data,
            meta: None,
        }),
    )
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            data,
            meta: None,
        }),
    )
}

/// List envelope; `limit`/`offset` are echoed back when the endpoint paginates.
pub fn success_many<T: Serialize>(
    data: Vec<T>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaPage { count, limit, offset },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_counts_rows_and_echoes_page() {
        let (status, Json(body)) = success_many(vec![1, 2, 3], Some(10), Some(20));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.meta, MetaPage { count: 3, limit: Some(10), offset: Some(20) });
    }

    #[test]
    fn unpaginated_meta_omits_page_fields() {
        let (_, Json(body)) = success_many(Vec::<u8>::new(), None, None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["meta"], serde_json::json!({ "count": 0 }));
    }

    #[test]
    fn single_created_has_no_meta() {
        let (status, Json(body)) = success_one("x");
        assert_eq!(status, StatusCode::CREATED);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "x" }));
    }
}
