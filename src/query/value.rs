use serde::{Deserialize, Serialize};

/// Opaque bindable value. Carried untouched from filter construction into
/// the bind-variable map and serialized by the store as plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BindValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(chrono::DateTime<chrono::Utc>),
}

impl BindValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            BindValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            BindValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            BindValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BindValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        match self {
            BindValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

// Helper trait to convert types to BindValue
pub trait ToBindValue {
    fn to_bind_value(&self) -> BindValue;
}

impl ToBindValue for String {
    fn to_bind_value(&self) -> BindValue {
        BindValue::String(self.clone())
    }
}

impl ToBindValue for &str {
    fn to_bind_value(&self) -> BindValue {
        BindValue::String(self.to_string())
    }
}

impl ToBindValue for i64 {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Int(*self)
    }
}

impl ToBindValue for i32 {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Int(*self as i64)
    }
}

impl ToBindValue for u32 {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Int(*self as i64)
    }
}

impl ToBindValue for f64 {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Float(*self)
    }
}

impl ToBindValue for f32 {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Float(*self as f64)
    }
}

impl ToBindValue for bool {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Bool(*self)
    }
}

impl ToBindValue for chrono::DateTime<chrono::Utc> {
    fn to_bind_value(&self) -> BindValue {
        BindValue::Timestamp(*self)
    }
}

impl ToBindValue for BindValue {
    fn to_bind_value(&self) -> BindValue {
        self.clone()
    }
}
