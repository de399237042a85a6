// # Typed Model Attributes
//
// Fields of a model struct are typed tri-state attributes. Each attribute
// type knows its static [`AttrType`] and how to move between itself and a
// dynamic [`Value`].
//
// Nested objects resolve their shape through the [`BindingRegistry`], so
// every conversion takes the registry explicitly.

use super::{AttrType, Tri, Value};
use crate::collection;
use crate::error::{Error, Result};
use crate::registry::BindingRegistry;
use crate::traits::Model;

/// A typed tri-state attribute usable as a model field
///
/// The zero value (`Default`) of every attribute is Null.
pub trait Attr: Default + Send + Sync + 'static {
    /// Static tri-state type of this attribute
    fn attr_type(registry: &BindingRegistry) -> Result<AttrType>;

    /// Convert into a dynamic value
    fn to_value(&self, registry: &BindingRegistry) -> Result<Value>;

    /// Build from a dynamic value
    ///
    /// Fails with `UnsupportedKind` when the value does not have this
    /// attribute's type.
    fn from_value(value: Value, registry: &BindingRegistry) -> Result<Self>;
}

/// Tri-state string attribute
pub type StringValue = Tri<String>;

/// Tri-state 64-bit integer attribute
pub type Int64Value = Tri<i64>;

/// Tri-state float attribute
pub type FloatValue = Tri<f64>;

/// Tri-state boolean attribute
pub type BoolValue = Tri<bool>;

macro_rules! scalar_attr {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Attr for Tri<$ty> {
                fn attr_type(_registry: &BindingRegistry) -> Result<AttrType> {
                    Ok(AttrType::$variant)
                }

                fn to_value(&self, _registry: &BindingRegistry) -> Result<Value> {
                    Ok(match self {
                        Tri::Null => Value::Null,
                        Tri::Unknown => Value::Unknown,
                        Tri::Value(v) => Value::$variant(v.clone()),
                    })
                }

                fn from_value(value: Value, _registry: &BindingRegistry) -> Result<Self> {
                    match value {
                        Value::Null => Ok(Tri::Null),
                        Value::Unknown => Ok(Tri::Unknown),
                        Value::$variant(v) => Ok(Tri::Value(v)),
                        other => Err(Error::unsupported_kind(
                            other.type_name(),
                            AttrType::$variant,
                        )),
                    }
                }
            }
        )+
    };
}

scalar_attr!(String => String, i64 => Int64, f64 => Float, bool => Bool);

fn to_values<E: Attr>(items: &[E], registry: &BindingRegistry) -> Result<Vec<Value>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.to_value(registry).map_err(|e| e.at_index(i)))
        .collect()
}

fn from_values<E: Attr>(items: Vec<Value>, registry: &BindingRegistry) -> Result<Vec<E>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| E::from_value(item, registry).map_err(|e| e.at_index(i)))
        .collect()
}

/// Tri-state ordered list of attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue<E>(pub Tri<Vec<E>>);

impl<E> ListValue<E> {
    /// A known list
    pub fn known(items: Vec<E>) -> Self {
        Self(Tri::Value(items))
    }

    pub fn null() -> Self {
        Self(Tri::Null)
    }

    pub fn unknown() -> Self {
        Self(Tri::Unknown)
    }

    /// Elements of a known list
    pub fn elements(&self) -> Option<&[E]> {
        self.0.value().map(Vec::as_slice)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }
}

impl<E> Default for ListValue<E> {
    fn default() -> Self {
        Self::null()
    }
}

impl<E: Attr> Attr for ListValue<E> {
    fn attr_type(registry: &BindingRegistry) -> Result<AttrType> {
        Ok(AttrType::list(E::attr_type(registry)?))
    }

    fn to_value(&self, registry: &BindingRegistry) -> Result<Value> {
        match &self.0 {
            Tri::Null => Ok(Value::Null),
            Tri::Unknown => Ok(Value::Unknown),
            Tri::Value(items) => Ok(collection::to_list(to_values(items, registry)?)),
        }
    }

    fn from_value(value: Value, registry: &BindingRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::null()),
            Value::Unknown => Ok(Self::unknown()),
            Value::List(items) => Ok(Self::known(from_values(items, registry)?)),
            other => Err(Error::unsupported_kind(
                other.type_name(),
                Self::attr_type(registry)?,
            )),
        }
    }
}

/// Tri-state set of attributes
///
/// Elements are kept duplicate-free under structural equality; the first
/// occurrence wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SetValue<E>(pub Tri<Vec<E>>);

impl<E: PartialEq> SetValue<E> {
    /// A known set, duplicates removed
    pub fn known(items: Vec<E>) -> Self {
        let mut unique: Vec<E> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Self(Tri::Value(unique))
    }
}

impl<E> SetValue<E> {
    pub fn null() -> Self {
        Self(Tri::Null)
    }

    pub fn unknown() -> Self {
        Self(Tri::Unknown)
    }

    /// Elements of a known set, in insertion order
    pub fn elements(&self) -> Option<&[E]> {
        self.0.value().map(Vec::as_slice)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }
}

impl<E> Default for SetValue<E> {
    fn default() -> Self {
        Self::null()
    }
}

impl<E: Attr> Attr for SetValue<E> {
    fn attr_type(registry: &BindingRegistry) -> Result<AttrType> {
        Ok(AttrType::set(E::attr_type(registry)?))
    }

    fn to_value(&self, registry: &BindingRegistry) -> Result<Value> {
        match &self.0 {
            Tri::Null => Ok(Value::Null),
            Tri::Unknown => Ok(Value::Unknown),
            Tri::Value(items) => Ok(collection::to_set(to_values(items, registry)?)),
        }
    }

    fn from_value(value: Value, registry: &BindingRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::null()),
            Value::Unknown => Ok(Self::unknown()),
            Value::Set(items) => {
                let items = from_values(collection::dedup(items), registry)?;
                Ok(Self(Tri::Value(items)))
            }
            other => Err(Error::unsupported_kind(
                other.type_name(),
                Self::attr_type(registry)?,
            )),
        }
    }
}

/// Tri-state nested object backed by a model struct
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue<M>(pub Tri<M>);

impl<M> ObjectValue<M> {
    /// A known object
    pub fn known(model: M) -> Self {
        Self(Tri::Value(model))
    }

    pub fn null() -> Self {
        Self(Tri::Null)
    }

    pub fn unknown() -> Self {
        Self(Tri::Unknown)
    }

    /// The nested model, if known
    pub fn get(&self) -> Option<&M> {
        self.0.value()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }
}

impl<M> Default for ObjectValue<M> {
    fn default() -> Self {
        Self::null()
    }
}

impl<M: Model> Attr for ObjectValue<M> {
    fn attr_type(registry: &BindingRegistry) -> Result<AttrType> {
        let bindings = registry.model::<M>()?;
        Ok(AttrType::Object(bindings.object_type().clone()))
    }

    fn to_value(&self, registry: &BindingRegistry) -> Result<Value> {
        match &self.0 {
            Tri::Null => Ok(Value::Null),
            Tri::Unknown => Ok(Value::Unknown),
            Tri::Value(model) => {
                let bindings = registry.model::<M>()?;
                Ok(Value::Object(bindings.to_attributes(model, registry)?))
            }
        }
    }

    fn from_value(value: Value, registry: &BindingRegistry) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::null()),
            Value::Unknown => Ok(Self::unknown()),
            Value::Object(attributes) => {
                let bindings = registry.model::<M>()?;
                Ok(Self::known(bindings.from_attributes(attributes, registry)?))
            }
            other => Err(Error::unsupported_kind(
                other.type_name(),
                BindingRegistry::type_label::<M>(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let registry = BindingRegistry::new();

        let name = StringValue::from("ns1");
        let value = name.to_value(&registry).unwrap();
        assert_eq!(value, Value::from("ns1"));
        assert_eq!(StringValue::from_value(value, &registry).unwrap(), name);

        let unknown = Int64Value::from_value(Value::Unknown, &registry).unwrap();
        assert!(unknown.is_unknown());
    }

    #[test]
    fn test_scalar_type_mismatch() {
        let registry = BindingRegistry::new();
        let err = BoolValue::from_value(Value::from("yes"), &registry).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind { .. }));
    }

    #[test]
    fn test_set_value_dedups() {
        let registry = BindingRegistry::new();
        let set = SetValue::known(vec![
            StringValue::from("a"),
            StringValue::from("a"),
            StringValue::from("b"),
        ]);
        assert_eq!(set.elements().map(<[_]>::len), Some(2));

        let value = set.to_value(&registry).unwrap();
        assert_eq!(
            value,
            Value::Set(vec![Value::from("b"), Value::from("a")])
        );
    }

    #[test]
    fn test_list_rejects_set() {
        let registry = BindingRegistry::new();
        let err = ListValue::<StringValue>::from_value(Value::Set(vec![]), &registry).unwrap_err();
        assert!(err.to_string().contains("list<string>"));
    }

    #[test]
    fn test_list_element_error_has_index() {
        let registry = BindingRegistry::new();
        let value = Value::List(vec![Value::from(1), Value::from("two")]);
        let err = ListValue::<Int64Value>::from_value(value, &registry).unwrap_err();
        assert_eq!(err.locations(), vec!["[1]"]);
    }
}
