// # Model Trait
//
// A model is a struct of typed tri-state attributes, as persisted by the
// plugin framework. Its binding keys form the tri-state namespace and are
// independent from the keys declared on domain structs.
//
// ## Usage
//
// ```rust,ignore
// use scalebridge_core::{model_field, Model, ModelField, StringValue, Int64Value};
//
// #[derive(Debug, Default)]
// struct ContactModel {
//     email: StringValue,
//     priority: Int64Value,
// }
//
// impl Model for ContactModel {
//     fn bindings() -> Vec<ModelField<Self>> {
//         vec![
//             model_field!("email" => email),
//             model_field!("priority" => priority),
//         ]
//     }
// }
// ```

use crate::error::Result;
use crate::registry::BindingRegistry;
use crate::value::{Attr, AttrType, Value};

/// A struct of tri-state attributes
///
/// `Default` must produce the all-Null model.
pub trait Model: Default + Send + Sync + 'static {
    /// Binding declarations, one per exposed attribute
    fn bindings() -> Vec<ModelField<Self>>;
}

/// One binding of a model struct: a key plus typed accessors
pub struct ModelField<M> {
    key: &'static str,
    access: Box<dyn ModelAccess<M>>,
}

impl<M: 'static> ModelField<M> {
    /// Bind `key` to the attribute reached by `get` / `get_mut`
    pub fn new<A: Attr>(
        key: &'static str,
        get: fn(&M) -> &A,
        get_mut: fn(&mut M) -> &mut A,
    ) -> Self {
        Self {
            key,
            access: Box::new(Accessor { get, get_mut }),
        }
    }

    /// Binding key
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub(crate) fn attr_type(&self, registry: &BindingRegistry) -> Result<AttrType> {
        self.access.attr_type(registry)
    }

    pub(crate) fn read(&self, model: &M, registry: &BindingRegistry) -> Result<Value> {
        self.access.read(model, registry)
    }

    pub(crate) fn write(&self, model: &mut M, value: Value, registry: &BindingRegistry) -> Result<()> {
        self.access.write(model, value, registry)
    }
}

impl<M> std::fmt::Debug for ModelField<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelField").field("key", &self.key).finish()
    }
}

trait ModelAccess<M>: Send + Sync {
    fn attr_type(&self, registry: &BindingRegistry) -> Result<AttrType>;
    fn read(&self, model: &M, registry: &BindingRegistry) -> Result<Value>;
    fn write(&self, model: &mut M, value: Value, registry: &BindingRegistry) -> Result<()>;
}

struct Accessor<M, A> {
    get: fn(&M) -> &A,
    get_mut: fn(&mut M) -> &mut A,
}

impl<M: 'static, A: Attr> ModelAccess<M> for Accessor<M, A> {
    fn attr_type(&self, registry: &BindingRegistry) -> Result<AttrType> {
        A::attr_type(registry)
    }

    fn read(&self, model: &M, registry: &BindingRegistry) -> Result<Value> {
        (self.get)(model).to_value(registry)
    }

    fn write(&self, model: &mut M, value: Value, registry: &BindingRegistry) -> Result<()> {
        *(self.get_mut)(model) = A::from_value(value, registry)?;
        Ok(())
    }
}

/// Declare a model binding: `model_field!("key" => field)`
#[macro_export]
macro_rules! model_field {
    ($key:literal => $field:ident) => {
        $crate::ModelField::<Self>::new($key, |m| &m.$field, |m| &mut m.$field)
    };
}
