//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for doctors, lookups and locations.
//! Identifiers come from static table definitions only; every value is a bound parameter.

use crate::filter::{like_contains_pattern, DoctorFilter};
use crate::model::{DoctorChanges, LocationChanges, LookupChanges, LookupKind, StatusStamps};
use crate::sql::SqlParam;

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<SqlParam>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }

    /// Push a value and return its placeholder. NULLs are declared with the cast type so the
    /// prepared statement is the same whether a nullable column gets NULL or a value.
    fn placeholder(&mut self, v: impl Into<SqlParam>, pg_type: &str) -> String {
        let v = match v.into() {
            SqlParam::Null => SqlParam::null_of(pg_type),
            other => other,
        };
        let n = self.push_param(v);
        format!("${}::{}", n, pg_type)
    }
}

const DOCTOR_COLUMNS: &str = "d.id, d.full_name, d.gender, d.websites, d.i_care_better, d.nancys_nook, \
     d.status, d.added_at, d.approved_at, d.rejected_at, d.updated_at";

const LOOKUP_COLUMNS: &str = "id, name, active";

const LOCATION_COLUMNS: &str = "id, doctor_id, hospital_name, address, phone, email, private_only";

/// Ids of linked lookups as a BIGINT[] column named after the doctor field.
fn linked_ids(kind: LookupKind) -> String {
    format!(
        "ARRAY(SELECT l.{col} FROM {link} l WHERE l.doctor_id = d.id ORDER BY l.{col}) AS {field}",
        col = kind.link_column(),
        link = kind.link_table(),
        field = kind.field(),
    )
}

/// Linked lookups as a JSON array of `{id, name, active}` objects.
fn linked_objects(kind: LookupKind) -> String {
    format!(
        "(SELECT COALESCE(json_agg(row_to_json(sub) ORDER BY sub.id), '[]'::json) FROM \
         (SELECT t.id, t.name, t.active FROM {table} t JOIN {link} l ON l.{col} = t.id WHERE l.doctor_id = d.id) sub) AS {field}",
        table = kind.table(),
        link = kind.link_table(),
        col = kind.link_column(),
        field = kind.field(),
    )
}

fn basic_select() -> String {
    format!(
        "SELECT {}, {}, {} FROM doctor d",
        DOCTOR_COLUMNS,
        linked_ids(LookupKind::Category),
        linked_ids(LookupKind::Speciality)
    )
}

/// Doctor list: filters ANDed together; id filters match any listed lookup. Ordered by id.
pub fn select_doctor_list(filter: &DoctorFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();

    if let Some(name) = &filter.full_name {
        let ph = q.placeholder(like_contains_pattern(name), "text");
        where_parts.push(format!(r"d.full_name ILIKE {} ESCAPE '\'", ph));
    }
    if let Some(status) = &filter.status {
        let ph = q.placeholder(status.as_str(), "text");
        where_parts.push(format!("LOWER(d.status) = LOWER({})", ph));
    }
    for kind in [LookupKind::Category, LookupKind::Speciality] {
        let ids = filter.ids(kind);
        if ids.is_empty() {
            continue;
        }
        let ph = q.placeholder(SqlParam::I64Array(ids.to_vec()), "bigint[]");
        where_parts.push(format!(
            "EXISTS (SELECT 1 FROM {link} l WHERE l.doctor_id = d.id AND l.{col} = ANY({ph}))",
            link = kind.link_table(),
            col = kind.link_column(),
            ph = ph,
        ));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "{}{} ORDER BY d.id LIMIT {} OFFSET {}",
        basic_select(),
        where_clause,
        filter.limit,
        filter.offset
    );
    q
}

/// Basic representation of one doctor.
pub fn select_doctor_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("{} WHERE d.id = {}", basic_select(), ph);
    q
}

/// Extended representation of one doctor, lookups embedded as JSON. Locations are fetched separately.
pub fn select_doctor_detail(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!(
        "SELECT {}, d.image, {}, {} FROM doctor d WHERE d.id = {}",
        DOCTOR_COLUMNS,
        linked_objects(LookupKind::Category),
        linked_objects(LookupKind::Speciality),
        ph
    );
    q
}

/// Current status, row-locked for the rest of the transaction.
pub fn select_doctor_status_for_update(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("SELECT status FROM doctor WHERE id = {} FOR UPDATE", ph);
    q
}

/// Column assignments for provided doctor fields, in a fixed order.
fn doctor_assignments(q: &mut QueryBuf, changes: &DoctorChanges) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if let Some(v) = &changes.full_name {
        out.push(("full_name", q.placeholder(v.as_str(), "varchar")));
    }
    if let Some(v) = changes.gender {
        out.push(("gender", q.placeholder(v.as_str(), "varchar")));
    }
    if let Some(v) = &changes.websites {
        out.push(("websites", q.placeholder(v.clone().map(SqlParam::TextArray), "text[]")));
    }
    if let Some(v) = &changes.i_care_better {
        out.push(("i_care_better", q.placeholder(v.as_str(), "varchar")));
    }
    if let Some(v) = changes.nancys_nook {
        out.push(("nancys_nook", q.placeholder(v, "boolean")));
    }
    if let Some(v) = &changes.image {
        out.push(("image", q.placeholder(v.clone().map(SqlParam::Bytes), "bytea")));
    }
    if let Some(v) = changes.status {
        out.push(("status", q.placeholder(v.as_str(), "varchar")));
    }
    out
}

fn stamp_assignments(stamps: StatusStamps) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if stamps.approved {
        out.push(("approved_at", "NOW()".to_string()));
    }
    if stamps.rejected {
        out.push(("rejected_at", "NOW()".to_string()));
    }
    out
}

/// INSERT a doctor; omitted fields take their column defaults. Returns the new id.
pub fn insert_doctor(changes: &DoctorChanges, stamps: StatusStamps) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut assignments = doctor_assignments(&mut q, changes);
    assignments.extend(stamp_assignments(stamps));
    let (cols, values): (Vec<&str>, Vec<String>) = assignments.into_iter().unzip();
    q.sql = if cols.is_empty() {
        "INSERT INTO doctor DEFAULT VALUES RETURNING id".to_string()
    } else {
        format!(
            "INSERT INTO doctor ({}) VALUES ({}) RETURNING id",
            cols.join(", "),
            values.join(", ")
        )
    };
    q
}

/// UPDATE provided doctor fields and stamps; always refreshes `updated_at`. Returns the id, or no row.
pub fn update_doctor(id: i64, changes: &DoctorChanges, stamps: StatusStamps) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = doctor_assignments(&mut q, changes)
        .into_iter()
        .chain(stamp_assignments(stamps))
        .map(|(col, rhs)| format!("{} = {}", col, rhs))
        .collect();
    sets.push("updated_at = NOW()".to_string());
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("UPDATE doctor SET {} WHERE id = {} RETURNING id", sets.join(", "), ph);
    q
}

/// DELETE a doctor; locations and links go with it via ON DELETE CASCADE.
pub fn delete_doctor(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("DELETE FROM doctor WHERE id = {} RETURNING id", ph);
    q
}

pub fn delete_links(kind: LookupKind, doctor_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(doctor_id, "bigint");
    q.sql = format!("DELETE FROM {} WHERE doctor_id = {}", kind.link_table(), ph);
    q
}

pub fn insert_links(kind: LookupKind, doctor_id: i64, ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let doctor_ph = q.placeholder(doctor_id, "bigint");
    let ids_ph = q.placeholder(SqlParam::I64Array(ids.to_vec()), "bigint[]");
    q.sql = format!(
        "INSERT INTO {link} (doctor_id, {col}) SELECT {doctor}, UNNEST({ids}) ON CONFLICT DO NOTHING",
        link = kind.link_table(),
        col = kind.link_column(),
        doctor = doctor_ph,
        ids = ids_ph,
    );
    q
}

/// Which of `ids` exist in the lookup table.
pub fn select_existing_lookup_ids(kind: LookupKind, ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(SqlParam::I64Array(ids.to_vec()), "bigint[]");
    q.sql = format!("SELECT id FROM {} WHERE id = ANY({})", kind.table(), ph);
    q
}

pub fn select_lookups(kind: LookupKind, active: Option<bool>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = match active {
        Some(flag) => format!(" WHERE active = {}", q.placeholder(flag, "boolean")),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY id",
        LOOKUP_COLUMNS,
        kind.table(),
        where_clause
    );
    q
}

pub fn insert_lookup(kind: LookupKind, changes: &LookupChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut values = Vec::new();
    if let Some(name) = &changes.name {
        cols.push("name");
        values.push(q.placeholder(name.as_str(), "varchar"));
    }
    if let Some(active) = changes.active {
        cols.push("active");
        values.push(q.placeholder(active, "boolean"));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        kind.table(),
        cols.join(", "),
        values.join(", "),
        LOOKUP_COLUMNS
    );
    q
}

/// UPDATE a lookup; with no changes this degrades to a plain SELECT of the row.
pub fn update_lookup(kind: LookupKind, id: i64, changes: &LookupChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(name) = &changes.name {
        sets.push(format!("name = {}", q.placeholder(name.as_str(), "varchar")));
    }
    if let Some(active) = changes.active {
        sets.push(format!("active = {}", q.placeholder(active, "boolean")));
    }
    let id_ph = q.placeholder(id, "bigint");
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE id = {}", LOOKUP_COLUMNS, kind.table(), id_ph)
    } else {
        format!(
            "UPDATE {} SET {} WHERE id = {} RETURNING {}",
            kind.table(),
            sets.join(", "),
            id_ph,
            LOOKUP_COLUMNS
        )
    };
    q
}

/// Location column assignments for provided fields.
fn location_assignments(q: &mut QueryBuf, changes: &LocationChanges) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if let Some(v) = &changes.hospital_name {
        out.push(("hospital_name", q.placeholder(v.as_str(), "varchar")));
    }
    if let Some(v) = &changes.address {
        out.push(("address", q.placeholder(v.as_str(), "varchar")));
    }
    if let Some(v) = &changes.phone {
        out.push(("phone", q.placeholder(v.clone(), "varchar")));
    }
    if let Some(v) = &changes.email {
        out.push(("email", q.placeholder(v.clone(), "varchar")));
    }
    if let Some(v) = changes.private_only {
        out.push(("private_only", q.placeholder(v, "boolean")));
    }
    out
}

pub fn select_locations_for_doctor(doctor_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(doctor_id, "bigint");
    q.sql = format!(
        "SELECT {} FROM doctor_location WHERE doctor_id = {} ORDER BY id",
        LOCATION_COLUMNS, ph
    );
    q
}

pub fn insert_location(doctor_id: i64, changes: &LocationChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut assignments = vec![("doctor_id", q.placeholder(doctor_id, "bigint"))];
    assignments.extend(location_assignments(&mut q, changes));
    let (cols, values): (Vec<&str>, Vec<String>) = assignments.into_iter().unzip();
    q.sql = format!(
        "INSERT INTO doctor_location ({}) VALUES ({}) RETURNING {}",
        cols.join(", "),
        values.join(", "),
        LOCATION_COLUMNS
    );
    q
}

/// UPDATE a location; with no changes this degrades to a plain SELECT of the row.
pub fn update_location(id: i64, changes: &LocationChanges) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = location_assignments(&mut q, changes)
        .into_iter()
        .map(|(col, rhs)| format!("{} = {}", col, rhs))
        .collect();
    let id_ph = q.placeholder(id, "bigint");
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM doctor_location WHERE id = {}", LOCATION_COLUMNS, id_ph)
    } else {
        format!(
            "UPDATE doctor_location SET {} WHERE id = {} RETURNING {}",
            sets.join(", "),
            id_ph,
            LOCATION_COLUMNS
        )
    };
    q
}

pub fn delete_location(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("DELETE FROM doctor_location WHERE id = {} RETURNING id", ph);
    q
}

/// Whether a doctor row exists.
pub fn select_doctor_exists(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(id, "bigint");
    q.sql = format!("SELECT EXISTS(SELECT 1 FROM doctor WHERE id = {})", ph);
    q
}
