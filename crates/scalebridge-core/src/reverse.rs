//! Reverse transcoder: tri-state model → domain struct
//!
//! The walk is driven by the source attributes. Null and Unknown attributes
//! are skipped and leave the destination field at its zero value; attributes
//! whose key no destination field carries are ignored. The result is always
//! a freshly allocated `Default` instance.

use crate::config::{NarrowingPolicy, TranscodeConfig};
use crate::error::{Error, Result};
use crate::numeric::{self, FromInt64};
use crate::registry::BindingRegistry;
use crate::traits::{Domain, DomainType, FloatKind, Kind};
use crate::value::{Attributes, Value};

/// Converts tri-state values into domain structs
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a BindingRegistry,
    config: &'a TranscodeConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a BindingRegistry, config: &'a TranscodeConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'a BindingRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a TranscodeConfig {
        self.config
    }

    /// Decode model `M` into a fresh domain struct `D`
    pub fn decode<M: crate::Model, D: Domain>(&self, source: &M) -> Result<D> {
        let bindings = self.registry.model::<M>()?;
        let attributes = bindings.to_attributes(source, self.registry)?;
        self.decode_attributes(&attributes)
    }

    /// Decode an Object value into a fresh domain struct `D`
    ///
    /// Fails with `NotAStruct` unless `value` is an Object.
    pub fn decode_value<D: Domain>(&self, value: &Value) -> Result<D> {
        match value {
            Value::Object(attributes) => self.decode_attributes(attributes),
            other => Err(Error::not_a_struct(
                BindingRegistry::type_label::<D>(),
                other.type_name(),
            )),
        }
    }

    /// Decode an attribute map into a fresh domain struct `D`
    pub fn decode_attributes<D: Domain>(&self, attributes: &Attributes) -> Result<D> {
        let bindings = self.registry.domain::<D>()?;
        tracing::debug!(
            target_type = bindings.type_name(),
            attributes = attributes.len(),
            "Decoding tri-state value"
        );

        let mut target = D::default();
        for (key, value) in attributes {
            if !value.is_known() {
                tracing::trace!(%key, state = value.type_name(), "Skipping attribute");
                continue;
            }

            let field = match bindings.field_by_key(key) {
                Ok(field) => field,
                Err(Error::FieldNotFound { .. }) => {
                    tracing::trace!(target_type = bindings.type_name(), %key, "No field bound to key");
                    continue;
                }
                Err(err) => return Err(err),
            };

            field
                .assign(&mut target, value, self)
                .map_err(|e| e.in_field(bindings.type_name(), key))?;
        }

        Ok(target)
    }

    /// Decode an Int64 into integer type `T`
    pub fn integer<T: FromInt64>(&self, value: &Value) -> Result<Option<T>> {
        match value {
            Value::Int64(v) => match self.config.narrowing {
                NarrowingPolicy::Checked => numeric::narrow_int(*v).map(Some),
                NarrowingPolicy::Wrapping => Ok(Some(numeric::wrap_int(*v))),
            },
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(other.type_name(), T::NAME)),
        }
    }

    /// Decode a Float into `f64`, rounded to the configured precision
    pub fn float64(&self, value: &Value) -> Result<Option<f64>> {
        match value {
            Value::Float(v) => Ok(Some(numeric::round_float64(*v, self.config.float_precision))),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(
                other.type_name(),
                Kind::Float(FloatKind::F64),
            )),
        }
    }

    /// Decode a Float into `f32`, rounded to the configured precision
    pub fn float32(&self, value: &Value) -> Result<Option<f32>> {
        match value {
            Value::Float(v) => numeric::round_float32(*v, self.config.float_precision).map(Some),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(
                other.type_name(),
                Kind::Float(FloatKind::F32),
            )),
        }
    }

    pub fn string(&self, value: &Value) -> Result<Option<String>> {
        match value {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(other.type_name(), Kind::String)),
        }
    }

    pub fn boolean(&self, value: &Value) -> Result<Option<bool>> {
        match value {
            Value::Bool(b) => Ok(Some(*b)),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(other.type_name(), Kind::Bool)),
        }
    }

    /// Decode a List or Set into a vector, keeping the stored order
    ///
    /// Null and Unknown elements become `T::default()` at their position.
    pub fn sequence<T: DomainType>(&self, value: &Value) -> Result<Option<Vec<T>>> {
        match value {
            Value::List(items) | Value::Set(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    T::decode(item, self)
                        .map(Option::unwrap_or_default)
                        .map_err(|e| e.at_index(i))
                })
                .collect::<Result<Vec<T>>>()
                .map(Some),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::unsupported_kind(other.type_name(), T::kind())),
        }
    }

    /// Decode a nested Object into a fresh struct `T`
    pub fn nested<T: Domain>(&self, value: &Value) -> Result<Option<T>> {
        match value {
            Value::Object(attributes) => self.decode_attributes(attributes).map(Some),
            Value::Null | Value::Unknown => Ok(None),
            other => Err(Error::not_a_struct(
                BindingRegistry::type_label::<T>(),
                other.type_name(),
            )),
        }
    }
}
