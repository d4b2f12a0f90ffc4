//! Tagged values stored in a session.

use std::collections::BTreeMap;

use serde::Serialize;

/// A value held in a [`SessionStore`](crate::SessionStore).
///
/// Sessions hold heterogeneous values; callers read them back through the
/// typed accessors (`as_int`, `as_str`, ...) which return `None` on a type
/// mismatch instead of panicking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<SessionValue>),
    Map(BTreeMap<String, SessionValue>),
}

impl SessionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, with integers widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SessionValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, SessionValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<bool> for SessionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SessionValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for SessionValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for SessionValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for SessionValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for SessionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SessionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for SessionValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<SessionValue>> for SessionValue {
    fn from(items: Vec<SessionValue>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, SessionValue>> for SessionValue {
    fn from(map: BTreeMap<String, SessionValue>) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(SessionValue::from(7).as_int(), Some(7));
        assert_eq!(SessionValue::from("hi").as_str(), Some("hi"));
        assert_eq!(SessionValue::from(true).as_bool(), Some(true));
        assert_eq!(SessionValue::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_mismatched_accessor_returns_none() {
        let v = SessionValue::from("7");
        assert_eq!(v.as_int(), None);
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.kind(), "text");
    }

    #[test]
    fn test_int_widens_to_float() {
        assert_eq!(SessionValue::from(3).as_float(), Some(3.0));
        assert_eq!(SessionValue::from(2.5).as_int(), None);
    }

    #[test]
    fn test_serializes_untagged() {
        let mut map = BTreeMap::new();
        map.insert("n".to_string(), SessionValue::from(1));
        map.insert(
            "tags".to_string(),
            SessionValue::from(vec![SessionValue::from("a"), SessionValue::from(false)]),
        );

        let json = serde_json::to_value(SessionValue::from(map)).unwrap();
        assert_eq!(json, serde_json::json!({"n": 1, "tags": ["a", false]}));
    }
}
