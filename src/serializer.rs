//! Request payloads as clients send them. Keys may be camelCase or snake_case; read-only
//! fields (`id`, `addedAt`, ...) and unknown keys are ignored. Values are checked and turned
//! into typed changes by [`crate::service::RequestValidator`].

use crate::case::value_keys_to_snake_case;
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

/// Distinguish "absent" (`None`) from explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DoctorPayload {
    pub full_name: Option<String>,
    /// `M` or `F`.
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Vec<String>>)]
    pub websites: Option<Option<Vec<String>>>,
    pub i_care_better: Option<String>,
    pub nancys_nook: Option<bool>,
    /// `PENDING_APPROVAL`, `APPROVED` or `REJECTED`.
    pub status: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub specialities: Option<Vec<i64>>,
    /// Base64-encoded bytes, optionally as a `data:` URL; `null` removes the image.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LookupPayload {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct LocationPayload {
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    pub private_only: Option<bool>,
}

/// Query for lookup lists: `?active=true` narrows to active rows.
#[derive(Debug, Default, Deserialize)]
pub struct LookupListQuery {
    pub active: Option<bool>,
}

/// Fold keys to snake_case and deserialize a JSON object body.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(value_keys_to_snake_case(body))
        .map_err(|e| AppError::Validation(e.to_string()))
}
