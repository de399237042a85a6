// # scalebridge-core
//
// Generic struct transcoder between domain structs and tri-state values.
//
// ## Architecture Overview
//
// Resources fetched from the management API are plain structs; the plugin
// framework persists state as tri-state values where every attribute may
// be Null, Unknown, or concrete. This library converts between the two
// without per-resource code:
//
// - **Domain / Model**: binding declarations on both kinds of struct
// - **BindingRegistry**: per-type binding tables, built once and cached
// - **Encoder**: domain struct → tri-state model (forward)
// - **Decoder**: tri-state model → domain struct (reverse)
// - **Transcoder**: entry point owning a registry and a conversion policy
// - **Schema**: attribute declarations with defaults
// - **StateStore**: persistence of tri-state snapshots
//
// ## Design Principles
//
// 1. **Declarative**: a new resource kind is a set of binding declarations
// 2. **Keyed by binding**: fields match by binding key, never by Rust name
// 3. **No silent loss**: numeric narrowing and unsigned overflow are errors
// 4. **All-or-nothing**: a failing field aborts the whole conversion

pub mod collection;
pub mod config;
pub mod error;
pub mod forward;
pub mod numeric;
pub mod registry;
pub mod reverse;
pub mod schema;
pub mod state;
pub mod traits;
pub mod transcoder;
pub mod value;

#[cfg(test)]
mod fixtures;

// Re-export core types for convenience
pub use config::{AbsentPolicy, BridgeConfig, NarrowingPolicy, StateStoreConfig, TranscodeConfig};
pub use error::{Error, Result};
pub use forward::Encoder;
pub use registry::{BindingRegistry, DomainBindings, ModelBindings};
pub use reverse::Decoder;
pub use schema::{AttributeSchema, Presence, Schema};
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{
    Datum, Domain, DomainField, DomainObject, DomainType, FieldDescriptor, FloatKind, IntKind,
    Kind, Model, ModelField, StateRecord, StateStore, StructRef,
};
pub use transcoder::Transcoder;
pub use value::{
    Attr, AttrType, Attributes, BoolValue, FloatValue, Int64Value, ListValue, ObjectType,
    ObjectValue, SetValue, StringValue, Tri, Value,
};
