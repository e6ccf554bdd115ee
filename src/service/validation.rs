//! Request validation: turns client payloads into typed, checked changes.

use crate::error::AppError;
use crate::model::{DoctorChanges, DoctorStatus, Gender, LocationChanges, LookupChanges};
use crate::serializer::{DoctorPayload, LocationPayload, LookupPayload};
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;

pub const FULL_NAME_MAX: usize = 100;
pub const LOOKUP_NAME_MAX: usize = 30;
pub const URL_MAX: usize = 200;
pub const LOCATION_TEXT_MAX: usize = 200;
pub const EMAIL_MAX: usize = 254;

const URL_PATTERN: &str = r"^(?i)(?:https?|ftps?)://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\.?|localhost|\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5})?(?:[/?#]\S*)?$";
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$";
const PHONE_PATTERN: &str = r"^\+[1-9]\d{7,14}$";

static URL_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// How a write treats absent fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// New row: required fields must be present.
    Create,
    /// Full update (PUT): required fields must be present, others keep their value when absent.
    Replace,
    /// Partial update (PATCH): only present fields are checked.
    Partial,
}

impl WriteMode {
    fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn doctor(payload: DoctorPayload, mode: WriteMode) -> Result<DoctorChanges, AppError> {
        let full_name = match payload.full_name {
            Some(name) => Some(required_text("full_name", &name, FULL_NAME_MAX)?),
            None if mode.requires_all() => return Err(AppError::Validation("full_name is required".into())),
            None => None,
        };
        let gender = payload
            .gender
            .map(|g| Gender::try_from(g).map_err(|e| choice_error("gender", e.value, Gender::CHOICES)))
            .transpose()?;
        let status = payload
            .status
            .map(|s| DoctorStatus::try_from(s).map_err(|e| choice_error("status", e.value, DoctorStatus::CHOICES)))
            .transpose()?;
        let websites = match payload.websites {
            Some(Some(urls)) => Some(Some(
                urls.iter()
                    .map(|u| url("websites", u))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Some(None) => Some(None),
            None => None,
        };
        let i_care_better = payload
            .i_care_better
            .map(|u| {
                let u = u.trim();
                if u.is_empty() {
                    Ok(String::new())
                } else {
                    url("i_care_better", u)
                }
            })
            .transpose()?;
        let image = match payload.image {
            Some(Some(encoded)) => Some(Some(image_bytes(&encoded)?)),
            Some(None) => Some(None),
            None => None,
        };
        Ok(DoctorChanges {
            full_name,
            gender,
            websites,
            i_care_better,
            nancys_nook: payload.nancys_nook,
            status,
            image,
            categories: payload.categories.map(dedup_ids),
            specialities: payload.specialities.map(dedup_ids),
        })
    }

    pub fn lookup(payload: LookupPayload, mode: WriteMode) -> Result<LookupChanges, AppError> {
        let name = match payload.name {
            Some(name) => Some(required_text("name", &name, LOOKUP_NAME_MAX)?),
            None if mode.requires_all() => return Err(AppError::Validation("name is required".into())),
            None => None,
        };
        Ok(LookupChanges {
            name,
            active: payload.active,
        })
    }

    /// All location fields are optional; blank text is stored as an empty string, blank
    /// phone/email as NULL.
    pub fn location(payload: LocationPayload) -> Result<LocationChanges, AppError> {
        let hospital_name = payload
            .hospital_name
            .map(|v| optional_text("hospital_name", &v, LOCATION_TEXT_MAX))
            .transpose()?;
        let address = payload
            .address
            .map(|v| optional_text("address", &v, LOCATION_TEXT_MAX))
            .transpose()?;
        let phone = payload
            .phone
            .map(|v| v.filter(|p| !p.trim().is_empty()).map(|p| phone_number(&p)).transpose())
            .transpose()?;
        let email = payload
            .email
            .map(|v| v.filter(|e| !e.trim().is_empty()).map(|e| email_address(&e)).transpose())
            .transpose()?;
        Ok(LocationChanges {
            hospital_name,
            address,
            phone,
            email,
            private_only: payload.private_only,
        })
    }
}

fn choice_error(field: &str, value: String, choices: &[&str]) -> AppError {
    AppError::Validation(format!(
        "{} must be one of: {:?}, got '{}'",
        field, choices, value
    ))
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn required_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} may not be blank", field)));
    }
    check_length(field, value, max)?;
    Ok(value.to_string())
}

fn optional_text(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    check_length(field, value, max)?;
    Ok(value.to_string())
}

pub fn url(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    check_length(field, value, URL_MAX)?;
    if !compiled(&URL_RE, URL_PATTERN).is_match(value) {
        return Err(AppError::Validation(format!("{} must contain valid URLs, got '{}'", field, value)));
    }
    Ok(value.to_string())
}

pub fn email_address(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    check_length("email", value, EMAIL_MAX)?;
    if !compiled(&EMAIL_RE, EMAIL_PATTERN).is_match(value) {
        return Err(AppError::Validation("email must be a valid email address".into()));
    }
    Ok(value.to_string())
}

/// Normalise to E.164: strip separators, turn a leading `00` into `+`, then require `+` and 8 to 15 digits.
pub fn phone_number(value: &str) -> Result<String, AppError> {
    let mut digits: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if let Some(rest) = digits.strip_prefix("00") {
        digits = format!("+{}", rest);
    }
    if !compiled(&PHONE_RE, PHONE_PATTERN).is_match(&digits) {
        return Err(AppError::Validation(
            "phone must be a valid international phone number, e.g. +12125552368".into(),
        ));
    }
    Ok(digits)
}

fn image_bytes(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = encoded.trim();
    let data = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|_| AppError::Validation("image must be base64-encoded".into()))
}

fn dedup_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn named(name: &str) -> DoctorPayload {
        DoctorPayload {
            full_name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_full_name() {
        let err = RequestValidator::doctor(DoctorPayload::default(), WriteMode::Create).unwrap_err();
        assert_eq!(message(err), "full_name is required");
        let err = RequestValidator::doctor(DoctorPayload::default(), WriteMode::Replace).unwrap_err();
        assert_eq!(message(err), "full_name is required");
        assert!(RequestValidator::doctor(DoctorPayload::default(), WriteMode::Partial).is_ok());
    }

    #[test]
    fn full_name_is_trimmed_and_bounded() {
        let c = RequestValidator::doctor(named("  Jessie Park "), WriteMode::Create).unwrap();
        assert_eq!(c.full_name.as_deref(), Some("Jessie Park"));
        let err = RequestValidator::doctor(named("   "), WriteMode::Create).unwrap_err();
        assert_eq!(message(err), "full_name may not be blank");
        let err = RequestValidator::doctor(named(&"x".repeat(101)), WriteMode::Create).unwrap_err();
        assert_eq!(message(err), "full_name must be at most 100 characters");
    }

    #[test]
    fn choices_are_enforced() {
        let p = DoctorPayload {
            gender: Some("F".into()),
            status: Some("APPROVED".into()),
            ..named("A")
        };
        let c = RequestValidator::doctor(p, WriteMode::Create).unwrap();
        assert_eq!(c.gender, Some(Gender::Female));
        assert_eq!(c.status, Some(DoctorStatus::Approved));

        let p = DoctorPayload {
            status: Some("DONE".into()),
            ..named("A")
        };
        let msg = message(RequestValidator::doctor(p, WriteMode::Create).unwrap_err());
        assert!(msg.starts_with("status must be one of"));
        assert!(msg.contains("'DONE'"));
    }

    #[test]
    fn websites_must_be_urls() {
        let p = DoctorPayload {
            websites: Some(Some(vec!["https://clinic.example.com/team".into(), " http://localhost:8000 ".into()])),
            ..named("A")
        };
        let c = RequestValidator::doctor(p, WriteMode::Create).unwrap();
        assert_eq!(
            c.websites,
            Some(Some(vec!["https://clinic.example.com/team".to_string(), "http://localhost:8000".to_string()]))
        );

        let p = DoctorPayload {
            websites: Some(Some(vec!["clinic dot com".into()])),
            ..named("A")
        };
        assert!(message(RequestValidator::doctor(p, WriteMode::Create).unwrap_err()).starts_with("websites must contain valid URLs"));
    }

    #[test]
    fn i_care_better_may_be_blank() {
        let p = DoctorPayload {
            i_care_better: Some("".into()),
            ..named("A")
        };
        let c = RequestValidator::doctor(p, WriteMode::Create).unwrap();
        assert_eq!(c.i_care_better.as_deref(), Some(""));

        let p = DoctorPayload {
            i_care_better: Some("not a url".into()),
            ..named("A")
        };
        assert!(RequestValidator::doctor(p, WriteMode::Create).is_err());
    }

    #[test]
    fn image_accepts_plain_and_data_url_base64() {
        assert_eq!(image_bytes("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(image_bytes("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
        assert!(image_bytes("@@@").is_err());
    }

    #[test]
    fn lookup_ids_are_deduplicated() {
        let p = DoctorPayload {
            categories: Some(vec![3, 1, 3]),
            specialities: Some(vec![]),
            ..Default::default()
        };
        let c = RequestValidator::doctor(p, WriteMode::Partial).unwrap();
        assert_eq!(c.categories, Some(vec![1, 3]));
        assert_eq!(c.specialities, Some(vec![]));
    }

    #[test]
    fn lookup_name_rules() {
        let err = RequestValidator::lookup(LookupPayload::default(), WriteMode::Create).unwrap_err();
        assert_eq!(message(err), "name is required");
        let p = LookupPayload {
            name: Some("x".repeat(31)),
            active: None,
        };
        assert_eq!(
            message(RequestValidator::lookup(p, WriteMode::Create).unwrap_err()),
            "name must be at most 30 characters"
        );
        let p = LookupPayload {
            name: None,
            active: Some(false),
        };
        let c = RequestValidator::lookup(p, WriteMode::Partial).unwrap();
        assert_eq!(c, LookupChanges { name: None, active: Some(false) });
    }

    #[test]
    fn phone_numbers_are_normalised() {
        assert_eq!(phone_number("+1 (212) 555-2368").unwrap(), "+12125552368");
        assert_eq!(phone_number("0044 20 7946 0958").unwrap(), "+442079460958");
        assert!(phone_number("555-2368").is_err());
        assert!(phone_number("+0123456789").is_err());
    }

    #[test]
    fn emails_are_checked() {
        assert_eq!(email_address(" desk@hospital.org ").unwrap(), "desk@hospital.org");
        assert!(email_address("desk@").is_err());
        assert!(email_address("desk.hospital.org").is_err());
    }

    #[test]
    fn blank_location_contacts_become_null() {
        let p = LocationPayload {
            hospital_name: Some(" St Mary ".into()),
            phone: Some(Some("  ".into())),
            email: Some(None),
            ..Default::default()
        };
        let c = RequestValidator::location(p).unwrap();
        assert_eq!(c.hospital_name.as_deref(), Some("St Mary"));
        assert_eq!(c.phone, Some(None));
        assert_eq!(c.email, Some(None));
        assert_eq!(c.address, None);
    }

    #[test]
    fn location_rejects_bad_contacts() {
        let p = LocationPayload {
            email: Some(Some("nope".into())),
            ..Default::default()
        };
        assert_eq!(
            message(RequestValidator::location(p).unwrap_err()),
            "email must be a valid email address"
        );
    }
}
