//! Hospital locations; each belongs to exactly one doctor and is deleted with it.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorLocation {
    pub id: i64,
    pub doctor_id: i64,
    pub hospital_name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub private_only: bool,
}

/// Validated location write. Nullable columns use `Some(None)` to clear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationChanges {
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub private_only: Option<bool>,
}

impl LocationChanges {
    pub fn is_empty(&self) -> bool {
        self.hospital_name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.private_only.is_none()
    }
}
