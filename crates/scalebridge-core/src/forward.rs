//! Forward transcoder: domain struct → tri-state model
//!
//! The walk is driven by the destination: every attribute the destination
//! object type declares is produced exactly once. A destination key with no
//! matching source field becomes Null; source fields the destination does
//! not declare are ignored.
//!
//! The source is only read. Nested structs become freshly built nested
//! objects, sequences become Lists or Sets per the destination type.

use crate::collection;
use crate::config::{AbsentPolicy, TranscodeConfig};
use crate::error::{Error, Result};
use crate::numeric;
use crate::registry::BindingRegistry;
use crate::traits::{Datum, Domain, DomainObject, Kind, Model, StructRef};
use crate::value::{AttrType, Attributes, ObjectType, Value};

/// Converts domain structs into tri-state values
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a BindingRegistry,
    config: &'a TranscodeConfig,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a BindingRegistry, config: &'a TranscodeConfig) -> Self {
        Self { registry, config }
    }

    /// Encode `source` into a fresh model `M`
    pub fn encode<D: Domain, M: Model>(&self, source: &D) -> Result<M> {
        let bindings = self.registry.model::<M>()?;
        tracing::debug!(
            source = BindingRegistry::type_label::<D>(),
            target = bindings.type_name(),
            "Encoding domain value"
        );

        let attributes = self.encode_object(source, bindings.object_type())?;
        bindings.from_attributes(attributes, self.registry)
    }

    /// Encode `source` into an Object of its natural object type
    pub fn encode_value<D: Domain>(&self, source: &D) -> Result<Value> {
        let object_type = collection::infer_object_type(&StructRef::of::<D>(), self.registry)?;
        tracing::debug!(
            source = BindingRegistry::type_label::<D>(),
            attributes = object_type.len(),
            "Encoding domain value"
        );

        Ok(Value::Object(self.encode_object(source, &object_type)?))
    }

    /// Encode a struct against an explicit destination object type
    pub fn encode_object(&self, source: &dyn DomainObject, target: &ObjectType) -> Result<Attributes> {
        let mut attributes = Attributes::new();

        for (key, attr_type) in target.iter() {
            let value = match source.read_field(self.registry, key)? {
                Some((kind, datum)) => self
                    .encode_datum(&kind, datum, attr_type)
                    .map_err(|e| e.in_field(source.type_name(), key))?,
                None => {
                    tracing::trace!(source = source.type_name(), %key, "No source field, emitting null");
                    Value::Null
                }
            };
            attributes.insert(key.clone(), value);
        }

        Ok(attributes)
    }

    fn encode_datum(&self, kind: &Kind, datum: Datum<'_>, target: &AttrType) -> Result<Value> {
        if !collection::encodable(kind, target) {
            return Err(Error::unsupported_kind(kind, target));
        }
        self.convert(datum, target)
    }

    fn convert(&self, datum: Datum<'_>, target: &AttrType) -> Result<Value> {
        match (datum, target) {
            (Datum::Absent, target) => Ok(match self.config.absent {
                AbsentPolicy::Null => Value::Null,
                AbsentPolicy::Zero => target.zero_value(),
            }),
            (Datum::Int(v), AttrType::Int64) => Ok(Value::Int64(v)),
            (Datum::Uint(v), AttrType::Int64) => Ok(Value::Int64(numeric::unsigned_to_int64(v)?)),
            (Datum::Float(v), AttrType::Float) => Ok(Value::Float(v)),
            (Datum::Str(s), AttrType::String) => Ok(Value::String(s.to_string())),
            (Datum::Bool(b), AttrType::Bool) => Ok(Value::Bool(b)),
            (Datum::Struct(object), AttrType::Object(object_type)) => {
                Ok(Value::Object(self.encode_object(object, object_type)?))
            }
            (Datum::Seq(items), AttrType::List(element)) => {
                Ok(collection::to_list(self.convert_elements(items, element)?))
            }
            (Datum::Seq(items), AttrType::Set(element)) => {
                Ok(collection::to_set(self.convert_elements(items, element)?))
            }
            (datum, target) => Err(Error::unsupported_kind(datum.kind_name(), target)),
        }
    }

    fn convert_elements(&self, items: Vec<Datum<'_>>, element: &AttrType) -> Result<Vec<Value>> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| self.convert(item, element).map_err(|e| e.at_index(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Contact, ContactModel, Server, ServerModel};
    use crate::value::Tri;

    fn sample() -> Server {
        Server {
            name: "alpha".to_string(),
            port: 8080,
            weight: 0.75,
            ratio: None,
            tags: vec!["b".to_string(), "a".to_string(), "b".to_string()],
            labels: vec!["x".to_string(), "x".to_string(), "y".to_string()],
            owner: Some(Contact {
                email: "owner@example.com".to_string(),
                priority: 1,
            }),
            contacts: vec![],
            big: 7,
            enabled: true,
            retries: -3,
            internal: "not bound".to_string(),
        }
    }

    #[test]
    fn test_encode_into_model() {
        let registry = BindingRegistry::new();
        let config = TranscodeConfig::default();
        let encoder = Encoder::new(&registry, &config);

        let model: ServerModel = encoder.encode(&sample()).unwrap();
        assert_eq!(model.name, Tri::from("alpha"));
        assert_eq!(model.port, Tri::Value(8080));
        assert_eq!(model.retries, Tri::Value(-3));
        assert!(model.ratio.is_null());
        assert_eq!(model.tags.elements().map(<[_]>::len), Some(3));
        assert_eq!(model.labels.elements().map(<[_]>::len), Some(2));
        assert_eq!(
            model.owner.get().map(|owner| owner.priority.clone()),
            Some(Tri::Value(1))
        );
        assert_eq!(model.contacts.elements().map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_absent_zero_policy() {
        let registry = BindingRegistry::new();
        let config = TranscodeConfig::new().with_absent(AbsentPolicy::Zero);
        let encoder = Encoder::new(&registry, &config);

        let model: ServerModel = encoder.encode(&Server::default()).unwrap();
        assert_eq!(model.ratio, Tri::Value(0.0));
        let owner: &ContactModel = model.owner.get().unwrap();
        assert!(owner.email.is_null());
    }

    #[test]
    fn test_unsigned_overflow_names_field() {
        let registry = BindingRegistry::new();
        let config = TranscodeConfig::default();
        let encoder = Encoder::new(&registry, &config);

        let server = Server {
            big: u64::MAX,
            ..Default::default()
        };
        let err = encoder.encode::<_, ServerModel>(&server).unwrap_err();
        assert!(matches!(err.root_cause(), Error::RangeOverflow { .. }));
        assert_eq!(err.locations(), vec!["Server.big"]);
    }

    #[test]
    fn test_encode_value_uses_natural_types() {
        let registry = BindingRegistry::new();
        let config = TranscodeConfig::default();
        let encoder = Encoder::new(&registry, &config);

        let value = encoder.encode_value(&sample()).unwrap();
        let attributes = value.as_object().unwrap();
        assert_eq!(attributes.get("port"), Some(&Value::Int64(8080)));
        assert!(matches!(attributes.get("labels"), Some(Value::List(items)) if items.len() == 3));
        assert!(!attributes.contains_key("internal"));
    }

    #[test]
    fn test_kind_mismatch() {
        let registry = BindingRegistry::new();
        let config = TranscodeConfig::default();
        let encoder = Encoder::new(&registry, &config);

        let target = ObjectType::new().with_attribute("name", AttrType::Int64);
        let err = encoder.encode_object(&sample(), &target).unwrap_err();
        assert!(matches!(err.root_cause(), Error::UnsupportedKind { .. }));
        assert_eq!(err.locations(), vec!["Server.name"]);
    }
}
