//! Attribute schema declarations
//!
//! A [`Schema`] describes the attributes a resource or data source exposes
//! to the plugin framework: their tri-state types, whether the user must,
//! may, or cannot set them, and optional static defaults.
//!
//! Schemas are passive. They do not drive conversion; [`Schema::check_model`]
//! verifies that a model struct's bindings agree with the declaration, and
//! [`Schema::apply_defaults`] fills Null attributes of a plan with their
//! declared defaults.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::registry::BindingRegistry;
use crate::traits::Model;
use crate::value::{AttrType, Attributes, ObjectType, Value};

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be set by the user
    Required,
    /// May be set by the user, Null otherwise
    Optional,
    /// Set by the provider only
    Computed,
    /// May be set by the user, filled in by the provider otherwise
    OptionalComputed,
}

/// Declaration of one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub attr_type: AttrType,
    pub presence: Presence,
    /// Static default, only allowed on `OptionalComputed` attributes
    pub default: Option<Value>,
    pub description: String,
    /// Nested attribute declarations for single or list nested attributes
    pub nested: Option<Schema>,
}

impl AttributeSchema {
    fn scalar(attr_type: AttrType, presence: Presence) -> Self {
        Self {
            attr_type,
            presence,
            default: None,
            description: String::new(),
            nested: None,
        }
    }

    fn nested(attr_type: AttrType, schema: Schema, presence: Presence) -> Self {
        Self {
            nested: Some(schema),
            ..Self::scalar(attr_type, presence)
        }
    }

    pub fn string(presence: Presence) -> Self {
        Self::scalar(AttrType::String, presence)
    }

    pub fn int64(presence: Presence) -> Self {
        Self::scalar(AttrType::Int64, presence)
    }

    pub fn float(presence: Presence) -> Self {
        Self::scalar(AttrType::Float, presence)
    }

    pub fn boolean(presence: Presence) -> Self {
        Self::scalar(AttrType::Bool, presence)
    }

    /// List of primitive elements
    pub fn list(element: AttrType, presence: Presence) -> Self {
        Self::scalar(AttrType::list(element), presence)
    }

    /// Set of primitive elements
    pub fn set(element: AttrType, presence: Presence) -> Self {
        Self::scalar(AttrType::set(element), presence)
    }

    /// A single nested object
    pub fn single_nested(schema: Schema, presence: Presence) -> Self {
        Self::nested(AttrType::Object(schema.object_type()), schema, presence)
    }

    /// A list of nested objects
    pub fn list_nested(schema: Schema, presence: Presence) -> Self {
        Self::nested(AttrType::list(AttrType::Object(schema.object_type())), schema, presence)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Attribute declarations of one resource or data source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub description: String,
    attributes: BTreeMap<String, AttributeSchema>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, attribute: AttributeSchema) -> Self {
        self.attributes.insert(key.into(), attribute);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeSchema> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&String, &AttributeSchema)> {
        self.attributes.iter()
    }

    /// Object type formed by the declared attributes
    pub fn object_type(&self) -> ObjectType {
        self.attributes
            .iter()
            .map(|(key, attribute)| (key.clone(), attribute.attr_type.clone()))
            .collect()
    }

    /// Verify that model `M` binds exactly the declared attributes, with
    /// the declared types
    pub fn check_model<M: Model>(&self, registry: &BindingRegistry) -> Result<()> {
        let bindings = registry.model::<M>()?;
        let model_type = bindings.object_type();

        for (key, attribute) in &self.attributes {
            match model_type.attribute(key) {
                Some(bound) if *bound == attribute.attr_type => {}
                Some(bound) => {
                    return Err(Error::unsupported_kind(bound, &attribute.attr_type)
                        .in_field(bindings.type_name(), key));
                }
                None => {
                    return Err(Error::unsupported_kind("missing binding", &attribute.attr_type)
                        .in_field(bindings.type_name(), key));
                }
            }
        }

        match model_type.keys().find(|key| !self.attributes.contains_key(*key)) {
            Some(extra) => Err(Error::unsupported_kind("undeclared attribute", "schema")
                .in_field(bindings.type_name(), extra)),
            None => Ok(()),
        }
    }

    /// Verify that every default fits its attribute
    pub fn validate_defaults(&self) -> Result<()> {
        for (key, attribute) in &self.attributes {
            if let Some(default) = &attribute.default {
                if attribute.presence != Presence::OptionalComputed {
                    return Err(Error::config(format!(
                        "attribute '{}' has a default but is not optional and computed",
                        key
                    )));
                }
                if !default.is_known() || !default.conforms(&attribute.attr_type) {
                    return Err(Error::config(format!(
                        "default of attribute '{}' does not conform to {}",
                        key, attribute.attr_type
                    )));
                }
            }
            if let Some(nested) = &attribute.nested {
                nested
                    .validate_defaults()
                    .map_err(|e| Error::config(format!("{}: {}", key, e)))?;
            }
        }
        Ok(())
    }

    /// Replace Null attributes that declare a default with the default
    ///
    /// Recurses into nested objects and lists of nested objects. Missing
    /// keys are treated as Null.
    pub fn apply_defaults(&self, attributes: &mut Attributes) {
        for (key, attribute) in &self.attributes {
            let value = attributes.entry(key.clone()).or_insert(Value::Null);

            if value.is_null() {
                if let Some(default) = &attribute.default {
                    tracing::trace!(%key, "Applying schema default");
                    *value = default.clone();
                }
            }

            let Some(nested) = &attribute.nested else {
                continue;
            };
            match value {
                Value::Object(inner) => nested.apply_defaults(inner),
                Value::List(items) | Value::Set(items) => {
                    for item in items.iter_mut() {
                        if let Value::Object(inner) = item {
                            nested.apply_defaults(inner);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ContactModel;

    fn contact_schema() -> Schema {
        Schema::new("Contact.")
            .with_attribute(
                "email",
                AttributeSchema::string(Presence::Required).with_description("Email."),
            )
            .with_attribute(
                "priority",
                AttributeSchema::int64(Presence::OptionalComputed).with_default(-1),
            )
    }

    #[test]
    fn test_check_model() {
        let registry = BindingRegistry::new();
        assert!(contact_schema().check_model::<ContactModel>(&registry).is_ok());

        let wrong = contact_schema()
            .with_attribute("priority", AttributeSchema::string(Presence::Optional));
        let err = wrong.check_model::<ContactModel>(&registry).unwrap_err();
        assert_eq!(err.locations(), vec!["ContactModel.priority"]);

        let extra = contact_schema().with_attribute("phone", AttributeSchema::string(Presence::Optional));
        assert!(extra.check_model::<ContactModel>(&registry).is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let schema = Schema::new("Owner.").with_attribute(
            "contacts",
            AttributeSchema::list_nested(contact_schema(), Presence::Optional),
        );

        let mut contact = Attributes::new();
        contact.insert("email".to_string(), Value::from("a@example.com"));
        contact.insert("priority".to_string(), Value::Null);

        let mut attributes = Attributes::new();
        attributes.insert("contacts".to_string(), Value::List(vec![Value::Object(contact)]));

        schema.apply_defaults(&mut attributes);
        let contacts = attributes.get("contacts").unwrap();
        let first = crate::collection::elements(contacts).unwrap()[0].as_object().unwrap();
        assert_eq!(first.get("priority"), Some(&Value::Int64(-1)));
        assert_eq!(first.get("email"), Some(&Value::from("a@example.com")));
    }

    #[test]
    fn test_validate_defaults() {
        assert!(contact_schema().validate_defaults().is_ok());

        let bad_type = Schema::new("")
            .with_attribute("flag", AttributeSchema::boolean(Presence::OptionalComputed).with_default("no"));
        assert!(bad_type.validate_defaults().is_err());

        let required = Schema::new("")
            .with_attribute("name", AttributeSchema::string(Presence::Required).with_default("x"));
        assert!(required.validate_defaults().is_err());
    }
}
