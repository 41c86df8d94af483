//! Row values handed to the batch loader.
//!
//! Decoders produce loosely typed values (a tag may hold a number, a string
//! or a WKB blob). [`Value`] keeps that shape and coerces itself to whatever
//! parameter type PostgreSQL inferred for the prepared INSERT.

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// One positional value of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Any integer; narrowed to the column width on encode.
    Int(i64),

    /// Any floating point value.
    Float(f64),

    /// Text data.
    Text(String),

    /// Binary data (WKB geometries).
    Bytes(Vec<u8>),
}

/// A decoded row, in column order of the target table.
pub type Row = Vec<Value>;

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn is_text(ty: &Type) -> bool {
    *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
}

/// Parse a boolean the way PostgreSQL's `boolin` does for common spellings.
fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Encode a text value into a numeric or boolean parameter.
///
/// Binary parameters carry no type tag, so the string is parsed here; a
/// value that does not parse is an error, never raw UTF-8 bytes.
fn text_to_sql(
    text: &str,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    let trimmed = text.trim();
    if *ty == Type::INT2 {
        trimmed.parse::<i16>()?.to_sql(ty, out)
    } else if *ty == Type::INT4 {
        trimmed.parse::<i32>()?.to_sql(ty, out)
    } else if *ty == Type::INT8 {
        trimmed.parse::<i64>()?.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        trimmed.parse::<f32>()?.to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        trimmed.parse::<f64>()?.to_sql(ty, out)
    } else if *ty == Type::BOOL {
        match parse_bool(text) {
            Some(v) => v.to_sql(ty, out),
            None => Err(format!("invalid boolean value: {:?}", text).into()),
        }
    } else if *ty == Type::BYTEA {
        text.as_bytes().to_sql(ty, out)
    } else {
        text.to_sql_checked(ty, out)
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => {
                if *ty == Type::INT2 {
                    (*v as i16).to_sql(ty, out)
                } else if is_text(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*v as f64).to_sql(ty, out)
                } else if *ty == Type::BOOL {
                    (*v != 0).to_sql(ty, out)
                } else if is_text(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else if is_text(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Text(v) => text_to_sql(v, ty, out),
            Value::Bytes(v) => v.as_slice().to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}
