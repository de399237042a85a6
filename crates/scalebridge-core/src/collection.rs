//! Collection adapter
//!
//! Domain sequences become tri-state Lists or Sets depending on the
//! destination attribute type. Sets are duplicate-free under structural
//! equality; the first occurrence of a repeated element is kept.
//!
//! Natural tri-state types are inferred from declared [`Kind`]s only,
//! never from runtime values, so an empty sequence still has a well-defined
//! element type.

use crate::error::{Error, Result};
use crate::registry::BindingRegistry;
use crate::traits::{Kind, StructRef};
use crate::value::{AttrType, ObjectType, Value};
use std::any::TypeId;

/// Build a List from converted elements
pub fn to_list(items: Vec<Value>) -> Value {
    Value::List(items)
}

/// Build a Set from converted elements, dropping structural duplicates
pub fn to_set(items: Vec<Value>) -> Value {
    Value::Set(dedup(items))
}

/// Remove structural duplicates, keeping the first occurrence
pub fn dedup(items: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Elements of a List or Set, in stored order
pub fn elements(value: &Value) -> Option<&[Value]> {
    match value {
        Value::List(items) | Value::Set(items) => Some(items),
        _ => None,
    }
}

/// Check that a domain kind can be encoded as `target`
///
/// Decided once per field; element kinds of sequences are checked against
/// the element type here so individual elements need no further check.
pub fn encodable(kind: &Kind, target: &AttrType) -> bool {
    match (kind, target) {
        (Kind::Optional(inner), _) => encodable(inner, target),
        (Kind::Int(_), AttrType::Int64)
        | (Kind::Float(_), AttrType::Float)
        | (Kind::String, AttrType::String)
        | (Kind::Bool, AttrType::Bool)
        | (Kind::Struct(_), AttrType::Object(_)) => true,
        (Kind::Sequence(element), AttrType::List(element_type) | AttrType::Set(element_type)) => {
            encodable(element, element_type)
        }
        _ => false,
    }
}

/// Natural element type of a sequence kind
pub fn element_type(kind: &Kind, registry: &BindingRegistry) -> Result<Option<AttrType>> {
    match kind.strip_optional() {
        Kind::Sequence(element) => infer_attr_type(element, registry).map(Some),
        _ => Ok(None),
    }
}

/// Natural tri-state type of a domain kind
///
/// Sequences infer to Lists. Recursive struct types have no finite object
/// type and fail with `UnsupportedKind`.
pub fn infer_attr_type(kind: &Kind, registry: &BindingRegistry) -> Result<AttrType> {
    infer(kind, registry, &mut Vec::new())
}

/// Natural object type of a bound struct
pub fn infer_object_type(target: &StructRef, registry: &BindingRegistry) -> Result<ObjectType> {
    infer_struct(target, registry, &mut Vec::new())
}

fn infer(kind: &Kind, registry: &BindingRegistry, visiting: &mut Vec<TypeId>) -> Result<AttrType> {
    match kind {
        Kind::Int(_) => Ok(AttrType::Int64),
        Kind::Float(_) => Ok(AttrType::Float),
        Kind::String => Ok(AttrType::String),
        Kind::Bool => Ok(AttrType::Bool),
        Kind::Optional(inner) => infer(inner, registry, visiting),
        Kind::Sequence(element) => Ok(AttrType::list(infer(element, registry, visiting)?)),
        Kind::Struct(target) => Ok(AttrType::Object(infer_struct(target, registry, visiting)?)),
    }
}

fn infer_struct(
    target: &StructRef,
    registry: &BindingRegistry,
    visiting: &mut Vec<TypeId>,
) -> Result<ObjectType> {
    if visiting.contains(&target.type_id()) {
        return Err(Error::unsupported_kind(
            format!("recursive struct {}", target.name()),
            "object",
        ));
    }

    visiting.push(target.type_id());
    let mut object_type = ObjectType::new();
    for descriptor in target.descriptors(registry)? {
        let attr_type = infer(&descriptor.kind, registry, visiting)
            .map_err(|e| e.in_field(target.name(), descriptor.key))?;
        object_type.insert(descriptor.key, attr_type);
    }
    visiting.pop();

    Ok(object_type)
}
