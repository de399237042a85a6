//! Binding registry
//!
//! The registry holds one binding table per struct type: the domain
//! bindings of [`Domain`] types and the attribute bindings of [`Model`]
//! types. Tables are built from the types' `bindings()` declarations on
//! first use and cached for the registry's lifetime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scalebridge_core::BindingRegistry;
//!
//! // Process-wide instance
//! let registry = BindingRegistry::shared();
//!
//! // Or an injected one
//! let registry = std::sync::Arc::new(BindingRegistry::new());
//!
//! let table = registry.domain::<Namespace>()?;
//! let descriptor = registry.field_by_key::<Namespace>("default_data_services_vpool")?;
//! ```
//!
//! ## Thread Safety
//!
//! Lookups take a read lock. A missing table is built outside any lock and
//! then published under the write lock; when two threads race on the same
//! type, the first published table wins and both callers receive it.

use crate::error::{Error, Result};
use crate::traits::{Domain, DomainField, FieldDescriptor, Kind, Model, ModelField};
use crate::value::{AttrType, Attributes, ObjectType, Value};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type TableMap = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static SHARED: OnceLock<Arc<BindingRegistry>> = OnceLock::new();

thread_local! {
    /// Model types whose tables are being built on this thread
    static BUILDING_MODELS: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Registry of per-type binding tables
#[derive(Default)]
pub struct BindingRegistry {
    /// Domain binding tables, keyed by struct type
    domains: TableMap,

    /// Model binding tables, keyed by model type
    models: TableMap,
}

impl BindingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn shared() -> Arc<Self> {
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Binding table of domain type `T`
    ///
    /// # Errors
    ///
    /// - `DuplicateBinding`: a key is declared on two fields
    /// - `UnsupportedKind`: a field kind has no tri-state counterpart
    pub fn domain<T: Domain>(&self) -> Result<Arc<DomainBindings<T>>> {
        cached(&self.domains, TypeId::of::<T>(), DomainBindings::<T>::build)
    }

    /// Binding table of model type `M`
    pub fn model<M: Model>(&self) -> Result<Arc<ModelBindings<M>>> {
        let id = TypeId::of::<M>();
        cached(&self.models, id, || {
            let cyclic = BUILDING_MODELS.with(|building| {
                let mut building = building.borrow_mut();
                if building.contains(&id) {
                    return true;
                }
                building.push(id);
                false
            });
            if cyclic {
                return Err(Error::unsupported_kind(
                    format!("recursive model {}", Self::type_label::<M>()),
                    "object",
                ));
            }

            let built = ModelBindings::<M>::build(self);
            BUILDING_MODELS.with(|building| {
                building.borrow_mut().retain(|entry| *entry != id);
            });
            built
        })
    }

    /// Descriptor of the field of `T` bound to `key`
    ///
    /// Fails with `FieldNotFound` when no field carries the key.
    pub fn field_by_key<T: Domain>(&self, key: &str) -> Result<FieldDescriptor> {
        let bindings = self.domain::<T>()?;
        bindings.field_by_key(key).map(|field| field.descriptor().clone())
    }

    /// Number of cached tables (domain, model)
    pub fn cached_tables(&self) -> (usize, usize) {
        let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner).len();
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner).len();
        (domains, models)
    }

    /// Check if no table has been built yet
    pub fn is_empty(&self) -> bool {
        self.cached_tables() == (0, 0)
    }

    /// Short name of `T`: module path and generic arguments stripped
    pub fn type_label<T: ?Sized>() -> &'static str {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (domains, models) = self.cached_tables();
        f.debug_struct("BindingRegistry")
            .field("domains", &domains)
            .field("models", &models)
            .finish()
    }
}

/// Look up a table, building and publishing it on a miss
fn cached<B, F>(map: &TableMap, id: TypeId, build: F) -> Result<Arc<B>>
where
    B: Send + Sync + 'static,
    F: FnOnce() -> Result<B>,
{
    let hit = map
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    if let Some(table) = hit {
        return downcast(table);
    }

    let built: Arc<dyn Any + Send + Sync> = Arc::new(build()?);
    let published = map
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(id)
        .or_insert(built)
        .clone();
    downcast(published)
}

fn downcast<B: Send + Sync + 'static>(table: Arc<dyn Any + Send + Sync>) -> Result<Arc<B>> {
    table
        .downcast::<B>()
        .map_err(|_| Error::other("binding table stored under the wrong type"))
}

/// Reject kinds with no tri-state counterpart
fn validate_kind(kind: &Kind) -> Result<()> {
    match kind {
        Kind::Optional(inner) if matches!(**inner, Kind::Optional(_)) => {
            Err(Error::unsupported_kind(kind, "any attribute type"))
        }
        Kind::Optional(inner) | Kind::Sequence(inner) => validate_kind(inner),
        _ => Ok(()),
    }
}

/// Binding table of one domain struct type
pub struct DomainBindings<T> {
    type_name: &'static str,
    fields: Vec<DomainField<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T> std::fmt::Debug for DomainBindings<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainBindings")
            .field("type_name", &self.type_name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<T: Domain> DomainBindings<T> {
    fn build() -> Result<Self> {
        let type_name = BindingRegistry::type_label::<T>();
        let fields = T::bindings();
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            let descriptor = field.descriptor();
            if index.insert(descriptor.key, position).is_some() {
                return Err(Error::DuplicateBinding {
                    type_name: type_name.to_string(),
                    key: descriptor.key.to_string(),
                });
            }
            validate_kind(&descriptor.kind).map_err(|e| e.in_field(type_name, descriptor.key))?;
        }

        tracing::debug!(type_name, fields = fields.len(), "Registered domain bindings");
        Ok(Self {
            type_name,
            fields,
            index,
        })
    }

    /// Short type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field bound to `key`, if any
    pub fn get(&self, key: &str) -> Option<&DomainField<T>> {
        self.index.get(key).map(|&position| &self.fields[position])
    }

    /// Field bound to `key`, or `FieldNotFound`
    pub fn field_by_key(&self, key: &str) -> Result<&DomainField<T>> {
        self.get(key)
            .ok_or_else(|| Error::field_not_found(self.type_name, key))
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[DomainField<T>] {
        &self.fields
    }

    /// Descriptors of all fields in declaration order
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields
            .iter()
            .map(|field| field.descriptor().clone())
            .collect()
    }
}

/// Binding table of one model struct type
pub struct ModelBindings<M> {
    type_name: &'static str,
    fields: Vec<ModelField<M>>,
    index: HashMap<&'static str, usize>,
    object_type: ObjectType,
}

impl<M: Model> ModelBindings<M> {
    fn build(registry: &BindingRegistry) -> Result<Self> {
        let type_name = BindingRegistry::type_label::<M>();
        let fields = M::bindings();
        let mut index = HashMap::with_capacity(fields.len());
        let mut object_type = ObjectType::new();

        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.key(), position).is_some() {
                return Err(Error::DuplicateBinding {
                    type_name: type_name.to_string(),
                    key: field.key().to_string(),
                });
            }
            let attr_type: AttrType = field
                .attr_type(registry)
                .map_err(|e| e.in_field(type_name, field.key()))?;
            object_type.insert(field.key(), attr_type);
        }

        tracing::debug!(type_name, fields = fields.len(), "Registered model bindings");
        Ok(Self {
            type_name,
            fields,
            index,
            object_type,
        })
    }

    /// Short type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Object type formed by all bound attributes
    pub fn object_type(&self) -> &ObjectType {
        &self.object_type
    }

    /// Binding keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key())
    }

    /// Read every bound attribute of `model`
    pub fn to_attributes(&self, model: &M, registry: &BindingRegistry) -> Result<Attributes> {
        self.fields
            .iter()
            .map(|field| {
                let value = field
                    .read(model, registry)
                    .map_err(|e| e.in_field(self.type_name, field.key()))?;
                Ok::<_, Error>((field.key().to_string(), value))
            })
            .collect()
    }

    /// Build a fresh model from an attribute map
    ///
    /// Keys without a binding are ignored; bound keys missing from the map
    /// stay Null.
    pub fn from_attributes(&self, attributes: Attributes, registry: &BindingRegistry) -> Result<M> {
        let mut model = M::default();
        for (key, value) in attributes {
            match self.index.get(key.as_str()) {
                Some(&position) => {
                    let field = &self.fields[position];
                    field
                        .write(&mut model, value, registry)
                        .map_err(|e| e.in_field(self.type_name, &key))?;
                }
                None => {
                    tracing::debug!(type_name = self.type_name, %key, "Ignoring unbound attribute");
                }
            }
        }
        Ok(model)
    }

    /// Value of one attribute of `model`
    pub fn read(&self, model: &M, key: &str, registry: &BindingRegistry) -> Result<Value> {
        let position = self
            .index
            .get(key)
            .ok_or_else(|| Error::field_not_found(self.type_name, key))?;
        self.fields[*position].read(model, registry)
    }
}
