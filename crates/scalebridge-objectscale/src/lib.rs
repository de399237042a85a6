// # ObjectScale Resources
//
// Binding declarations for the ObjectScale namespace resource and the
// namespace and account data sources.
//
// Nothing in this crate converts values by hand. Each resource kind is a
// pair of declarations: a domain struct shaped like the management API JSON
// and a tri-state model shaped like the provider schema. The transcoder in
// `scalebridge-core` does the rest.
//
// ## Resource Kinds
//
// - `objectscale_namespace` resource: `Namespace` <-> `NamespaceResourceModel`
// - `objectscale_namespace` data source: `[Namespace]` -> `NamespaceDatasourceModel`
// - `objectscale_account` data source: `[Account]` -> `AccountDatasourceModel`
//
// ## Security Requirements
//
// - The namespace root user password never appears in logs or `Debug` output

pub mod convert;
pub mod models;
pub mod schema;

use scalebridge_core::{BindingRegistry, Result};
use tracing::debug;

pub use convert::{
    ACCOUNT_DATASOURCE_ID, NAMESPACE_DATASOURCE_ID, account_datasource, apply_plan_defaults,
    namespace_datasource, namespace_from_plan, namespace_state,
};
pub use models::{
    Account, AccountDatasourceEntity, AccountDatasourceModel, Attribute, AttributeModel, Link,
    LinkModel, Namespace, NamespaceDatasourceModel, NamespaceEntity, NamespaceResourceModel,
    RetentionClass, RetentionClassModel, RetentionClasses, RetentionClassesModel, UserMapping,
    UserMappingModel,
};
pub use schema::{account_datasource_schema, namespace_datasource_schema, namespace_resource_schema};

/// Type name of the namespace resource and data source
pub const NAMESPACE_TYPE: &str = "objectscale_namespace";

/// Type name of the account data source
pub const ACCOUNT_TYPE: &str = "objectscale_account";

/// State address of a namespace resource instance
pub fn namespace_address(name: &str) -> String {
    format!("{}.{}", NAMESPACE_TYPE, name)
}

/// Build and check every ObjectScale binding table up front
///
/// Verifies that each schema agrees with its model and that every schema
/// default fits its attribute. Lookups afterwards hit the cache.
pub fn register(registry: &BindingRegistry) -> Result<()> {
    registry.domain::<Link>()?;
    registry.domain::<Attribute>()?;
    registry.domain::<UserMapping>()?;
    registry.domain::<RetentionClass>()?;
    registry.domain::<RetentionClasses>()?;
    registry.domain::<Namespace>()?;
    registry.domain::<Account>()?;

    let resource = namespace_resource_schema();
    resource.validate_defaults()?;
    resource.check_model::<NamespaceResourceModel>(registry)?;

    let namespaces = namespace_datasource_schema();
    namespaces.validate_defaults()?;
    namespaces.check_model::<NamespaceDatasourceModel>(registry)?;

    let accounts = account_datasource_schema();
    accounts.validate_defaults()?;
    accounts.check_model::<AccountDatasourceModel>(registry)?;

    let (domains, models) = registry.cached_tables();
    debug!(domains, models, "Registered ObjectScale bindings");
    Ok(())
}
