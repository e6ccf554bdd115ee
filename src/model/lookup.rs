//! Named, togglable lookup entities linked to doctors many-to-many.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which lookup table an operation targets. Categories and specialities share one shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    Category,
    Speciality,
}

impl LookupKind {
    pub fn table(self) -> &'static str {
        match self {
            LookupKind::Category => "doctor_category",
            LookupKind::Speciality => "doctor_speciality",
        }
    }

    /// Join table linking doctors to this lookup.
    pub fn link_table(self) -> &'static str {
        match self {
            LookupKind::Category => "doctor_categories",
            LookupKind::Speciality => "doctor_specialities",
        }
    }

    /// Column in [`Self::link_table`] referencing the lookup row.
    pub fn link_column(self) -> &'static str {
        match self {
            LookupKind::Category => "category_id",
            LookupKind::Speciality => "speciality_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LookupKind::Category => "category",
            LookupKind::Speciality => "speciality",
        }
    }

    /// Name of the doctor field / list filter holding ids of this kind.
    pub fn field(self) -> &'static str {
        match self {
            LookupKind::Category => "categories",
            LookupKind::Speciality => "specialities",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Lookup {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// Validated lookup write. `None` leaves the column untouched (or at its default on insert).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupChanges {
    pub name: Option<String>,
    pub active: Option<bool>,
}

impl LookupChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.active.is_none()
    }
}
