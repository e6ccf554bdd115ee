//! Query-string filters for the doctor list.
//!
//! Usage:
//!   /api/doctors/doctor/list
//!   /api/doctors/doctor/list?categories=1&categories=2&specialities=1&status=approved
//!   /api/doctors/doctor/list?full_name=jesi
//!   /api/doctors/doctor/list?status=pending_approval&limit=20&offset=40

use crate::case::to_snake_case;
use crate::error::AppError;
use crate::model::LookupKind;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorFilter {
    /// Case-insensitive substring of `full_name`.
    pub full_name: Option<String>,
    /// Case-insensitive exact status; unknown values simply match nothing.
    pub status: Option<String>,
    /// Match doctors linked to any of these categories.
    pub categories: Vec<i64>,
    /// Match doctors linked to any of these specialities.
    pub specialities: Vec<i64>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for DoctorFilter {
    fn default() -> Self {
        DoctorFilter {
            full_name: None,
            status: None,
            categories: Vec::new(),
            specialities: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl DoctorFilter {
    /// Parse raw query pairs. Keys may repeat (`categories=1&categories=2`) and may be camelCase.
    /// Empty values and unknown keys are ignored; malformed ids are rejected.
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut filter = DoctorFilter::default();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match to_snake_case(key).as_str() {
                "full_name" => filter.full_name = Some(value.to_string()),
                "status" => filter.status = Some(value.to_string()),
                "categories" => filter.categories.push(parse_choice(value)?),
                "specialities" => filter.specialities.push(parse_choice(value)?),
                "limit" => {
                    if let Ok(n) = value.parse::<u32>() {
                        filter.limit = if n == 0 { DEFAULT_LIMIT } else { n.min(MAX_LIMIT) };
                    }
                }
                "offset" => {
                    if let Ok(n) = value.parse::<u32>() {
                        filter.offset = n;
                    }
                }
                _ => {}
            }
        }
        for ids in [&mut filter.categories, &mut filter.specialities] {
            ids.sort_unstable();
            ids.dedup();
        }
        Ok(filter)
    }

    pub fn ids(&self, kind: LookupKind) -> &[i64] {
        match kind {
            LookupKind::Category => &self.categories,
            LookupKind::Speciality => &self.specialities,
        }
    }
}

fn parse_choice(value: &str) -> Result<i64, AppError> {
    value.parse::<i64>().map_err(|_| invalid_choice(value))
}

pub fn invalid_choice(value: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    ))
}

/// Escape `%`, `_` and `\` so user input is matched literally inside an ILIKE pattern.
pub fn like_contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn no_params_gives_unfiltered_first_page() {
        assert_eq!(DoctorFilter::from_query(&[]).unwrap(), DoctorFilter::default());
    }

    #[test]
    fn repeated_ids_accumulate() {
        let f = DoctorFilter::from_query(&pairs(&[
            ("categories", "1"),
            ("categories", "2"),
            ("specialities", "7"),
            ("status", "approved"),
            ("full_name", "jesi"),
        ]))
        .unwrap();
        assert_eq!(f.categories, vec![1, 2]);
        assert_eq!(f.specialities, vec![7]);
        assert_eq!(f.status.as_deref(), Some("approved"));
        assert_eq!(f.full_name.as_deref(), Some("jesi"));
        assert_eq!(f.ids(LookupKind::Category), &[1, 2]);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let f = DoctorFilter::from_query(&pairs(&[("fullName", "ann")])).unwrap();
        assert_eq!(f.full_name.as_deref(), Some("ann"));
    }

    #[test]
    fn empty_values_and_unknown_keys_are_ignored() {
        let f = DoctorFilter::from_query(&pairs(&[("full_name", ""), ("status", " "), ("colour", "red")])).unwrap();
        assert_eq!(f, DoctorFilter::default());
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let err = DoctorFilter::from_query(&pairs(&[("categories", "one")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("one is not one of the available choices")));
    }

    #[test]
    fn paging_is_clamped() {
        let f = DoctorFilter::from_query(&pairs(&[("limit", "5000"), ("offset", "30")])).unwrap();
        assert_eq!((f.limit, f.offset), (MAX_LIMIT, 30));
        let f = DoctorFilter::from_query(&pairs(&[("limit", "0"), ("offset", "-1")])).unwrap();
        assert_eq!((f.limit, f.offset), (DEFAULT_LIMIT, 0));
        let f = DoctorFilter::from_query(&pairs(&[("limit", "abc")])).unwrap();
        assert_eq!(f.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("jesi"), "%jesi%");
        assert_eq!(like_contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
