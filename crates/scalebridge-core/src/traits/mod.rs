//! Core traits for the transcoder
//!
//! This module defines the binding declarations and storage interfaces.
//!
//! - [`Domain`] / [`DomainType`]: plain structs exchanged with the management API
//! - [`Model`]: structs of tri-state attributes persisted by the plugin framework
//! - [`StateStore`]: persistence of tri-state snapshots

pub mod domain;
pub mod model;
pub mod state_store;

pub use domain::{
    Datum, Domain, DomainField, DomainObject, DomainType, FieldDescriptor, FloatKind, IntKind,
    Kind, StructRef,
};
pub use model::{Model, ModelField};
pub use state_store::{StateRecord, StateStore};
