use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

/// The nil UUID, `00000000-0000-0000-0000-000000000000`.
pub const NIL_UUID: Uuid = Uuid::nil();

/// An LLSD map. Iteration follows document order.
pub type Map = IndexMap<String, Value>;

/// A decoded LLSD value.
///
/// Every variant corresponds to one of the eleven LLSD type tags; see
/// [`Value::type_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The `undef` marker.
    Undefined,

    /// A `boolean`.
    Boolean(bool),

    /// A 64-bit signed `integer`.
    Integer(i64),

    /// A 64-bit floating point `real`.
    Real(f64),

    /// A `string`, kept verbatim.
    String(String),

    /// A `uuid`; an empty element decodes to [`NIL_UUID`].
    Uuid(Uuid),

    /// An instant in UTC with microsecond precision.
    Date(DateTime<Utc>),

    /// A `uri`, not validated.
    Uri(Uri),

    /// A `binary` payload in its declared encoding, not decoded.
    Binary(Binary),

    /// Key/value pairs with unique keys, in document order.
    Map(Map),

    /// An ordered sequence of values.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the LLSD tag name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undef",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Uri(_) => "uri",
            Value::Binary(_) => "binary",
            Value::Map(_) => "map",
            Value::Array(_) => "array",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            Value::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

/// A resource locator. The text is kept as written and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Uri(String);

impl Uri {
    pub fn new(uri: impl Into<String>) -> Self {
        Uri(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Uri {
    fn from(uri: String) -> Self {
        Uri(uri)
    }
}

impl From<&str> for Uri {
    fn from(uri: &str) -> Self {
        Uri(uri.to_string())
    }
}

/// Binary content together with the encoding it was written in.
///
/// `data` is the encoded text exactly as it appeared in the document; it
/// is not decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    encoding: String,
    data: String,
}

impl Binary {
    /// The encoding assumed when a `binary` element has no `encoding`
    /// attribute.
    pub const DEFAULT_ENCODING: &'static str = "base64";

    pub fn new(encoding: impl Into<String>, data: impl Into<String>) -> Self {
        Binary {
            encoding: encoding.into(),
            data: data.into(),
        }
    }

    pub fn base64(data: impl Into<String>) -> Self {
        Binary::new(Binary::DEFAULT_ENCODING, data)
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}
