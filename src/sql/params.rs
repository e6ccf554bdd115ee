//! Owned, typed bind values so built queries can be inspected before execution.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    /// NULL whose column type is not known yet; [`SqlParam::null_of`] gives it one.
    Null,
    /// NULL declared with a column type, so a statement prepared with it still accepts values.
    TypedNull(PgTypeInfo),
    Bool(bool),
    I64(i64),
    Text(String),
    I64Array(Vec<i64>),
    TextArray(Vec<String>),
    Bytes(Vec<u8>),
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::I64(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

impl SqlParam {
    /// NULL declared with the Postgres type named by a placeholder cast.
    pub fn null_of(pg_type: &str) -> SqlParam {
        let info = match pg_type {
            "boolean" => <bool as Type<Postgres>>::type_info(),
            "bigint" => <i64 as Type<Postgres>>::type_info(),
            "bigint[]" => <Vec<i64> as Type<Postgres>>::type_info(),
            "text[]" => <Vec<String> as Type<Postgres>>::type_info(),
            "bytea" => <Vec<u8> as Type<Postgres>>::type_info(),
            _ => <String as Type<Postgres>>::type_info(),
        };
        SqlParam::TypedNull(info)
    }
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlParam::Null | SqlParam::TypedNull(_) => IsNull::Yes,
            SqlParam::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlParam::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlParam::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
            SqlParam::I64Array(v) => <Vec<i64> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            SqlParam::TextArray(v) => <Vec<String> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            SqlParam::Bytes(v) => <Vec<u8> as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    /// Declared type per value; NULL falls back to TEXT and relies on the placeholder cast.
    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            SqlParam::Null => None,
            SqlParam::TypedNull(info) => Some(info.clone()),
            SqlParam::Bool(_) => Some(<bool as Type<Postgres>>::type_info()),
            SqlParam::I64(_) => Some(<i64 as Type<Postgres>>::type_info()),
            SqlParam::Text(_) => Some(<String as Type<Postgres>>::type_info()),
            SqlParam::I64Array(_) => Some(<Vec<i64> as Type<Postgres>>::type_info()),
            SqlParam::TextArray(_) => Some(<Vec<String> as Type<Postgres>>::type_info()),
            SqlParam::Bytes(_) => Some(<Vec<u8> as Type<Postgres>>::type_info()),
        }
    }
}

impl Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_map_to_null_or_value() {
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some("x")), SqlParam::Text("x".into()));
        assert_eq!(SqlParam::from(Some(true)), SqlParam::Bool(true));
    }

    #[test]
    fn produced_types_follow_the_variant() {
        assert_eq!(SqlParam::I64(1).produces(), Some(<i64 as Type<Postgres>>::type_info()));
        assert_eq!(
            SqlParam::I64Array(vec![1]).produces(),
            Some(<Vec<i64> as Type<Postgres>>::type_info())
        );
        assert_eq!(SqlParam::Null.produces(), None);
    }

    #[test]
    fn typed_null_declares_same_type_as_a_value() {
        let cases = [
            ("text[]", SqlParam::TextArray(vec!["https://example.org".into()])),
            ("bytea", SqlParam::Bytes(vec![0xff])),
            ("bigint[]", SqlParam::I64Array(vec![1])),
            ("boolean", SqlParam::Bool(true)),
            ("varchar", SqlParam::Text("x".into())),
        ];
        for (cast, value) in cases {
            assert_eq!(SqlParam::null_of(cast).produces(), value.produces(), "{}", cast);
        }
    }
}
