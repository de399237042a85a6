// # Tri-State Value Model
//
// Every attribute persisted by the plugin framework is in one of three
// states: Null (absent), Unknown (not yet computed), or a concrete value.
//
// ## Types
//
// - [`Tri`]: typed tri-state scalar, the building block of model structs
// - [`Value`]: dynamic tri-state tree used during conversion
// - [`AttrType`] / [`ObjectType`]: the static shape a [`Value`] must conform to
// - [`attr`]: typed model attributes (`StringValue`, `ListValue`, ...)
//
// ## Equality
//
// `Set` values compare equal regardless of element order. `List` values
// compare element by element.

pub mod attr;

pub use attr::{
    Attr, BoolValue, FloatValue, Int64Value, ListValue, ObjectValue, SetValue, StringValue,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map of an object value, keyed by binding key
pub type Attributes = BTreeMap<String, Value>;

/// A typed tri-state value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Tri<T> {
    /// No value
    Null,
    /// Value not yet known (computed later)
    Unknown,
    /// Concrete value
    Value(T),
}

impl<T> Tri<T> {
    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Tri::Null)
    }

    /// Check for `Unknown`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Tri::Unknown)
    }

    /// Check for a concrete value
    pub fn is_known(&self) -> bool {
        matches!(self, Tri::Value(_))
    }

    /// Borrow the concrete value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Tri::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Map the concrete value, keeping Null/Unknown as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tri<U> {
        match self {
            Tri::Null => Tri::Null,
            Tri::Unknown => Tri::Unknown,
            Tri::Value(v) => Tri::Value(f(v)),
        }
    }
}

impl<T> Default for Tri<T> {
    fn default() -> Self {
        Tri::Null
    }
}

impl<T> From<T> for Tri<T> {
    fn from(value: T) -> Self {
        Tri::Value(value)
    }
}

impl<T> From<Option<T>> for Tri<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Tri::Null, Tri::Value)
    }
}

impl From<&str> for Tri<String> {
    fn from(value: &str) -> Self {
        Tri::Value(value.to_string())
    }
}

/// Dynamic tri-state value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Not yet known
    Unknown,
    /// Text
    String(String),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Ordered sequence, duplicates allowed
    List(Vec<Value>),
    /// Duplicate-free collection, order-insensitive equality
    Set(Vec<Value>),
    /// Attribute map
    Object(Attributes),
}

impl Value {
    /// Short name of the value's state or type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Unknown => "unknown",
            Value::String(_) => "string",
            Value::Int64(_) => "int64",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Object(_) => "object",
        }
    }

    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check for `Unknown`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Neither Null nor Unknown
    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    /// Check whether this value or anything nested in it is Unknown
    pub fn contains_unknown(&self) -> bool {
        match self {
            Value::Unknown => true,
            Value::List(items) | Value::Set(items) => items.iter().any(Value::contains_unknown),
            Value::Object(attributes) => attributes.values().any(Value::contains_unknown),
            _ => false,
        }
    }

    /// Check whether this value or anything nested in it is a NaN or
    /// infinite Float, which JSON cannot represent
    pub fn contains_non_finite(&self) -> bool {
        match self {
            Value::List(items) | Value::Set(items) => items.iter().any(Value::contains_non_finite),
            Value::Object(attributes) => attributes.values().any(Value::contains_non_finite),
            other => other.as_f64().is_some_and(|v| !v.is_finite()),
        }
    }

    /// Check that this value has the shape described by `attr_type`
    ///
    /// Null and Unknown conform to every type, at any depth. Objects must
    /// carry exactly the declared attribute keys.
    pub fn conforms(&self, attr_type: &AttrType) -> bool {
        match (self, attr_type) {
            (Value::Null | Value::Unknown, _) => true,
            (Value::String(_), AttrType::String)
            | (Value::Int64(_), AttrType::Int64)
            | (Value::Float(_), AttrType::Float)
            | (Value::Bool(_), AttrType::Bool) => true,
            (Value::List(items), AttrType::List(element))
            | (Value::Set(items), AttrType::Set(element)) => {
                items.iter().all(|item| item.conforms(element))
            }
            (Value::Object(attributes), AttrType::Object(object_type)) => {
                attributes.len() == object_type.len()
                    && attributes.iter().all(|(key, value)| {
                        object_type
                            .attribute(key)
                            .is_some_and(|attr_type| value.conforms(attr_type))
                    })
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Attributes> {
        match self {
            Value::Object(attributes) => Some(attributes),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unknown, Value::Unknown) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => same_members(a, b),
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// Multiset comparison ignoring order
fn same_members(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    a.iter().all(|item| {
        let hit = b
            .iter()
            .enumerate()
            .position(|(i, candidate)| !matched[i] && candidate == item);
        match hit {
            Some(i) => {
                matched[i] = true;
                true
            }
            None => false,
        }
    })
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Attributes> for Value {
    fn from(value: Attributes) -> Self {
        Value::Object(value)
    }
}

/// Static type of a tri-state attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    String,
    Int64,
    Float,
    Bool,
    List(Box<AttrType>),
    Set(Box<AttrType>),
    Object(ObjectType),
}

impl AttrType {
    /// Shorthand for `List(element)`
    pub fn list(element: AttrType) -> Self {
        AttrType::List(Box::new(element))
    }

    /// Shorthand for `Set(element)`
    pub fn set(element: AttrType) -> Self {
        AttrType::Set(Box::new(element))
    }

    /// Element type of a List or Set
    pub fn element(&self) -> Option<&AttrType> {
        match self {
            AttrType::List(element) | AttrType::Set(element) => Some(element),
            _ => None,
        }
    }

    /// The concrete zero value of this type
    ///
    /// Objects get every declared attribute, each set to Null.
    pub fn zero_value(&self) -> Value {
        match self {
            AttrType::String => Value::String(String::new()),
            AttrType::Int64 => Value::Int64(0),
            AttrType::Float => Value::Float(0.0),
            AttrType::Bool => Value::Bool(false),
            AttrType::List(_) => Value::List(Vec::new()),
            AttrType::Set(_) => Value::Set(Vec::new()),
            AttrType::Object(object_type) => Value::Object(object_type.null_attributes()),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::String => write!(f, "string"),
            AttrType::Int64 => write!(f, "int64"),
            AttrType::Float => write!(f, "float"),
            AttrType::Bool => write!(f, "bool"),
            AttrType::List(element) => write!(f, "list<{}>", element),
            AttrType::Set(element) => write!(f, "set<{}>", element),
            AttrType::Object(_) => write!(f, "object"),
        }
    }
}

/// Attribute types of an object, keyed by binding key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectType {
    attributes: BTreeMap<String, AttrType>,
}

impl ObjectType {
    /// Create an empty object type
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, attr_type: AttrType) -> Self {
        self.insert(key, attr_type);
        self
    }

    /// Add or replace an attribute
    pub fn insert(&mut self, key: impl Into<String>, attr_type: AttrType) {
        self.attributes.insert(key.into(), attr_type);
    }

    /// Type of one attribute
    pub fn attribute(&self, key: &str) -> Option<&AttrType> {
        self.attributes.get(key)
    }

    /// Iterate attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrType)> {
        self.attributes.iter()
    }

    /// Attribute keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// An attribute map with every declared key set to Null
    pub fn null_attributes(&self) -> Attributes {
        self.attributes
            .keys()
            .map(|key| (key.clone(), Value::Null))
            .collect()
    }
}

impl FromIterator<(String, AttrType)> for ObjectType {
    fn from_iter<I: IntoIterator<Item = (String, AttrType)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a = Value::Set(strings(&["a", "b", "c"]));
        let b = Value::Set(strings(&["c", "a", "b"]));
        assert_eq!(a, b);

        let list_a = Value::List(strings(&["a", "b"]));
        let list_b = Value::List(strings(&["b", "a"]));
        assert_ne!(list_a, list_b);

        assert_ne!(Value::Set(strings(&["a", "a"])), Value::Set(strings(&["a", "b"])));
    }

    #[test]
    fn test_conforms() {
        let contact = ObjectType::new()
            .with_attribute("email", AttrType::String)
            .with_attribute("priority", AttrType::Int64);

        let mut attributes = Attributes::new();
        attributes.insert("email".to_string(), Value::from("ops@example.com"));
        attributes.insert("priority".to_string(), Value::Unknown);
        let value = Value::Object(attributes.clone());
        assert!(value.conforms(&AttrType::Object(contact.clone())));

        attributes.remove("priority");
        assert!(!Value::Object(attributes).conforms(&AttrType::Object(contact)));

        let mixed = Value::List(vec![Value::from("a"), Value::from(1)]);
        assert!(!mixed.conforms(&AttrType::list(AttrType::String)));
        assert!(Value::Null.conforms(&AttrType::set(AttrType::Bool)));
    }

    #[test]
    fn test_zero_values() {
        let object_type = ObjectType::new().with_attribute("name", AttrType::String);
        let zero = AttrType::Object(object_type).zero_value();
        assert_eq!(zero.as_object().unwrap().get("name"), Some(&Value::Null));
        assert_eq!(AttrType::Int64.zero_value(), Value::Int64(0));
        assert_eq!(AttrType::set(AttrType::String).zero_value(), Value::Set(vec![]));
    }

    #[test]
    fn test_contains_unknown() {
        let nested = Value::List(vec![Value::from(1), Value::Unknown]);
        assert!(nested.contains_unknown());
        assert!(!Value::List(vec![Value::Null]).contains_unknown());
    }

    #[test]
    fn test_contains_non_finite() {
        let mut inner = Attributes::new();
        inner.insert("ratio".to_string(), Value::Float(f64::INFINITY));
        assert!(Value::List(vec![Value::Object(inner)]).contains_non_finite());
        assert!(Value::Float(f64::NAN).contains_non_finite());
        assert!(!Value::Float(0.25).contains_non_finite());
        assert!(!Value::from("nan").contains_non_finite());
    }

    #[test]
    fn test_tri_defaults_and_conversions() {
        let tri: Tri<String> = Tri::default();
        assert!(tri.is_null());
        assert_eq!(Tri::from(Some(3_i64)), Tri::Value(3));
        assert_eq!(Tri::<i64>::from(None), Tri::Null);
        assert_eq!(Tri::from("x").map(|s: String| s.len()), Tri::Value(1));
    }

    #[test]
    fn test_value_serde_shape() {
        let json = serde_json::to_string(&Value::Int64(7)).unwrap();
        assert_eq!(json, r#"{"state":"int64","value":7}"#);
        let back: Value = serde_json::from_str(r#"{"state":"unknown"}"#).unwrap();
        assert_eq!(back, Value::Unknown);
    }
}
