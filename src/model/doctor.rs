//! Doctor entity, its enums, and the monitored-status rule.

use crate::model::{DoctorLocation, Lookup};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {kind}")]
pub struct InvalidChoice {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub const CHOICES: &'static [&'static str] = &["M", "F"];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = InvalidChoice;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(InvalidChoice { kind: "gender", value }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorStatus {
    #[default]
    PendingApproval,
    Approved,
    Rejected,
}

impl DoctorStatus {
    pub const CHOICES: &'static [&'static str] = &["PENDING_APPROVAL", "APPROVED", "REJECTED"];

    pub fn as_str(self) -> &'static str {
        match self {
            DoctorStatus::PendingApproval => "PENDING_APPROVAL",
            DoctorStatus::Approved => "APPROVED",
            DoctorStatus::Rejected => "REJECTED",
        }
    }

    /// Which monitored timestamps must be set to now when a row moves from `previous`
    /// (`None` for a new row) to `self`. Re-saving the same status stamps nothing.
    pub fn stamps_from(self, previous: Option<DoctorStatus>) -> StatusStamps {
        let entering = previous != Some(self);
        StatusStamps {
            approved: entering && self == DoctorStatus::Approved,
            rejected: entering && self == DoctorStatus::Rejected,
        }
    }
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DoctorStatus {
    type Error = InvalidChoice;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING_APPROVAL" => Ok(DoctorStatus::PendingApproval),
            "APPROVED" => Ok(DoctorStatus::Approved),
            "REJECTED" => Ok(DoctorStatus::Rejected),
            _ => Err(InvalidChoice { kind: "status", value }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusStamps {
    pub approved: bool,
    pub rejected: bool,
}

/// Basic representation, used by list, create and update.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorBasic {
    pub id: i64,
    pub full_name: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub websites: Option<Vec<String>>,
    pub i_care_better: String,
    pub nancys_nook: bool,
    #[sqlx(try_from = "String")]
    pub status: DoctorStatus,
    pub categories: Vec<i64>,
    pub specialities: Vec<i64>,
    pub added_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row shape of the detail query: lookups arrive pre-aggregated as JSON arrays.
#[derive(Debug, sqlx::FromRow)]
pub struct DoctorDetailRow {
    pub id: i64,
    pub full_name: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub websites: Option<Vec<String>>,
    pub i_care_better: String,
    pub nancys_nook: bool,
    pub image: Option<Vec<u8>>,
    #[sqlx(try_from = "String")]
    pub status: DoctorStatus,
    pub categories: Json<Vec<Lookup>>,
    pub specialities: Json<Vec<Lookup>>,
    pub added_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full nested representation returned by retrieve.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorExtended {
    pub id: i64,
    pub full_name: String,
    pub gender: Gender,
    pub websites: Option<Vec<String>>,
    pub i_care_better: String,
    pub nancys_nook: bool,
    /// Base64-encoded image bytes.
    pub image: Option<String>,
    pub status: DoctorStatus,
    pub categories: Vec<Lookup>,
    pub specialities: Vec<Lookup>,
    pub locations: Vec<DoctorLocation>,
    pub added_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DoctorExtended {
    pub fn from_parts(row: DoctorDetailRow, locations: Vec<DoctorLocation>) -> Self {
        DoctorExtended {
            id: row.id,
            full_name: row.full_name,
            gender: row.gender,
            websites: row.websites,
            i_care_better: row.i_care_better,
            nancys_nook: row.nancys_nook,
            image: row
                .image
                .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
            status: row.status,
            categories: row.categories.0,
            specialities: row.specialities.0,
            locations,
            added_at: row.added_at,
            approved_at: row.approved_at,
            rejected_at: row.rejected_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated doctor write. `None` means "not provided"; nullable columns use
/// `Some(None)` to store NULL. Lookup id lists replace the current links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoctorChanges {
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub websites: Option<Option<Vec<String>>>,
    pub i_care_better: Option<String>,
    pub nancys_nook: Option<bool>,
    pub status: Option<DoctorStatus>,
    pub image: Option<Option<Vec<u8>>>,
    pub categories: Option<Vec<i64>>,
    pub specialities: Option<Vec<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_stamps_only_its_terminal_status() {
        assert_eq!(DoctorStatus::PendingApproval.stamps_from(None), StatusStamps::default());
        assert_eq!(
            DoctorStatus::Approved.stamps_from(None),
            StatusStamps { approved: true, rejected: false }
        );
        assert_eq!(
            DoctorStatus::Rejected.stamps_from(None),
            StatusStamps { approved: false, rejected: true }
        );
    }

    #[test]
    fn entering_a_status_stamps_it() {
        let s = DoctorStatus::Approved.stamps_from(Some(DoctorStatus::PendingApproval));
        assert!(s.approved && !s.rejected);
        let s = DoctorStatus::Rejected.stamps_from(Some(DoctorStatus::Approved));
        assert!(s.rejected && !s.approved);
    }

    #[test]
    fn unchanged_or_pending_status_stamps_nothing() {
        assert_eq!(
            DoctorStatus::Approved.stamps_from(Some(DoctorStatus::Approved)),
            StatusStamps::default()
        );
        assert_eq!(
            DoctorStatus::PendingApproval.stamps_from(Some(DoctorStatus::Rejected)),
            StatusStamps::default()
        );
    }

    #[test]
    fn choices_parse_exactly() {
        assert_eq!(Gender::try_from("F".to_string()), Ok(Gender::Female));
        assert!(Gender::try_from("f".to_string()).is_err());
        assert_eq!(
            DoctorStatus::try_from("REJECTED".to_string()),
            Ok(DoctorStatus::Rejected)
        );
        let err = DoctorStatus::try_from("approved".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "'approved' is not a valid status");
    }

    #[test]
    fn enums_serialize_to_stored_values() {
        assert_eq!(serde_json::to_value(Gender::Female).unwrap(), "F");
        assert_eq!(
            serde_json::to_value(DoctorStatus::PendingApproval).unwrap(),
            "PENDING_APPROVAL"
        );
        for (status, text) in [
            (DoctorStatus::PendingApproval, "PENDING_APPROVAL"),
            (DoctorStatus::Approved, "APPROVED"),
            (DoctorStatus::Rejected, "REJECTED"),
        ] {
            assert_eq!(status.as_str(), text);
            assert_eq!(status.to_string(), text);
        }
    }

    #[test]
    fn extended_encodes_image_and_flattens_lookups() {
        let row = DoctorDetailRow {
            id: 3,
            full_name: "Jessie Park".into(),
            gender: Gender::Female,
            websites: Some(vec!["https://example.org".into()]),
            i_care_better: String::new(),
            nancys_nook: true,
            image: Some(vec![1, 2, 3]),
            status: DoctorStatus::Approved,
            categories: Json(vec![Lookup { id: 1, name: "Surgeon".into(), active: true }]),
            specialities: Json(vec![]),
            added_at: None,
            approved_at: None,
            rejected_at: None,
            updated_at: None,
        };
        let doc = DoctorExtended::from_parts(row, vec![]);
        assert_eq!(doc.image.as_deref(), Some("AQID"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["fullName"], "Jessie Park");
        assert_eq!(json["iCareBetter"], "");
        assert_eq!(json["categories"][0]["name"], "Surgeon");
        assert_eq!(json["status"], "APPROVED");
        assert!(json["locations"].as_array().is_some_and(|l| l.is_empty()));
    }
}
