//! ObjectScale resource types
//!
//! Two families live here. The domain structs mirror the management API
//! JSON and are what the HTTP client hands back. The tri-state models mirror
//! the provider schemas and are what the plugin framework stores. The
//! transcoder moves data between them by binding key.

use scalebridge_core::{
    BoolValue, Domain, DomainField, Int64Value, ListValue, Model, ModelField, ObjectValue,
    StringValue, domain_field, domain_type, model_field,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain structs (management API)
// ---------------------------------------------------------------------------

/// Self link of a management API object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Domain for Link {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![domain_field!("rel" => rel), domain_field!("href" => href)]
    }
}

/// Attribute matched by a user mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub key: String,
    pub value: Vec<String>,
}

impl Domain for Attribute {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![domain_field!("key" => key), domain_field!("value" => value)]
    }
}

/// Mapping of external domain users into a namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMapping {
    pub domain: String,
    pub groups: Vec<String>,
    pub attributes: Vec<Attribute>,
}

impl Domain for UserMapping {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("domain" => domain),
            domain_field!("groups" => groups),
            domain_field!("attributes" => attributes),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionClass {
    pub name: String,
    /// Retention period in seconds
    pub period: i64,
}

impl Domain for RetentionClass {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![domain_field!("name" => name), domain_field!("period" => period)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionClasses {
    pub retention_class: Vec<RetentionClass>,
}

impl Domain for RetentionClasses {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![domain_field!("retention_class" => retention_class)]
    }
}

/// Namespace as returned by the management API
///
/// The root user password is only ever populated in the response to a
/// create call. It never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub id: String,
    pub name: String,
    pub link: Link,
    pub global: bool,
    pub remote: bool,
    /// Milliseconds since the epoch
    pub creation_time: i64,
    pub inactive: bool,
    pub internal: bool,
    pub default_data_services_vpool: String,
    pub allowed_vpools_list: Vec<String>,
    pub disallowed_vpools_list: Vec<String>,
    pub namespace_admins: String,
    pub external_group_admins: String,
    pub is_encryption_enabled: bool,
    pub is_stale_allowed: bool,
    pub is_object_lock_with_ado_allowed: bool,
    pub is_compliance_enabled: bool,
    pub default_bucket_block_size: i64,
    pub notification_size: i64,
    pub block_size: i64,
    pub notification_size_in_count: i64,
    pub block_size_in_count: i64,
    pub default_audit_delete_expiration: i64,
    pub user_mapping: Vec<UserMapping>,
    pub retention_classes: RetentionClasses,
    pub root_user_name: String,
    pub root_user_password: String,
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.root_user_password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Namespace")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("link", &self.link)
            .field("global", &self.global)
            .field("remote", &self.remote)
            .field("creation_time", &self.creation_time)
            .field("inactive", &self.inactive)
            .field("internal", &self.internal)
            .field("default_data_services_vpool", &self.default_data_services_vpool)
            .field("allowed_vpools_list", &self.allowed_vpools_list)
            .field("disallowed_vpools_list", &self.disallowed_vpools_list)
            .field("namespace_admins", &self.namespace_admins)
            .field("external_group_admins", &self.external_group_admins)
            .field("is_encryption_enabled", &self.is_encryption_enabled)
            .field("is_stale_allowed", &self.is_stale_allowed)
            .field("is_object_lock_with_ado_allowed", &self.is_object_lock_with_ado_allowed)
            .field("is_compliance_enabled", &self.is_compliance_enabled)
            .field("default_bucket_block_size", &self.default_bucket_block_size)
            .field("notification_size", &self.notification_size)
            .field("block_size", &self.block_size)
            .field("notification_size_in_count", &self.notification_size_in_count)
            .field("block_size_in_count", &self.block_size_in_count)
            .field("default_audit_delete_expiration", &self.default_audit_delete_expiration)
            .field("user_mapping", &self.user_mapping)
            .field("retention_classes", &self.retention_classes)
            .field("root_user_name", &self.root_user_name)
            .field("root_user_password", &password)
            .finish()
    }
}

impl Domain for Namespace {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("id" => id),
            domain_field!("name" => name),
            domain_field!("link" => link),
            domain_field!("global" => global),
            domain_field!("remote" => remote),
            domain_field!("creation_time" => creation_time),
            domain_field!("inactive" => inactive),
            domain_field!("internal" => internal),
            domain_field!("default_data_services_vpool" => default_data_services_vpool),
            domain_field!("allowed_vpools_list" => allowed_vpools_list),
            domain_field!("disallowed_vpools_list" => disallowed_vpools_list),
            domain_field!("namespace_admins" => namespace_admins),
            domain_field!("external_group_admins" => external_group_admins),
            domain_field!("is_encryption_enabled" => is_encryption_enabled),
            domain_field!("is_stale_allowed" => is_stale_allowed),
            domain_field!("is_object_lock_with_ado_allowed" => is_object_lock_with_ado_allowed),
            domain_field!("is_compliance_enabled" => is_compliance_enabled),
            domain_field!("default_bucket_block_size" => default_bucket_block_size),
            domain_field!("notification_size" => notification_size),
            domain_field!("block_size" => block_size),
            domain_field!("notification_size_in_count" => notification_size_in_count),
            domain_field!("block_size_in_count" => block_size_in_count),
            domain_field!("default_audit_delete_expiration" => default_audit_delete_expiration),
            domain_field!("user_mapping" => user_mapping),
            domain_field!("retention_classes" => retention_classes),
            domain_field!("root_user_name" => root_user_name),
            domain_field!("root_user_password" => root_user_password),
        ]
    }
}

/// IAM account as returned by the management API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub alias: String,
    pub description: String,
    pub encryption_enabled: bool,
}

impl Domain for Account {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("account_id" => account_id),
            domain_field!("alias" => alias),
            domain_field!("description" => description),
            domain_field!("encryption_enabled" => encryption_enabled),
        ]
    }
}

domain_type!(
    Link,
    Attribute,
    UserMapping,
    RetentionClass,
    RetentionClasses,
    Namespace,
    Account,
);

// ---------------------------------------------------------------------------
// Tri-state models (provider state)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkModel {
    pub rel: StringValue,
    pub href: StringValue,
}

impl Model for LinkModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("rel" => rel), model_field!("href" => href)]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeModel {
    pub key: StringValue,
    pub value: ListValue<StringValue>,
}

impl Model for AttributeModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("key" => key), model_field!("value" => value)]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserMappingModel {
    pub domain: StringValue,
    pub groups: ListValue<StringValue>,
    pub attributes: ListValue<ObjectValue<AttributeModel>>,
}

impl Model for UserMappingModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("domain" => domain),
            model_field!("groups" => groups),
            model_field!("attributes" => attributes),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionClassModel {
    pub name: StringValue,
    pub period: Int64Value,
}

impl Model for RetentionClassModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("name" => name), model_field!("period" => period)]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionClassesModel {
    pub retention_class: ListValue<ObjectValue<RetentionClassModel>>,
}

impl Model for RetentionClassesModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("retention_class" => retention_class)]
    }
}

/// State of the `objectscale_namespace` resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceResourceModel {
    pub id: StringValue,
    pub name: StringValue,
    pub link: ObjectValue<LinkModel>,
    pub global: BoolValue,
    pub remote: BoolValue,
    pub creation_time: Int64Value,
    pub inactive: BoolValue,
    pub internal: BoolValue,
    pub default_data_services_vpool: StringValue,
    pub allowed_vpools_list: ListValue<StringValue>,
    pub disallowed_vpools_list: ListValue<StringValue>,
    pub namespace_admins: StringValue,
    pub external_group_admins: StringValue,
    pub is_encryption_enabled: BoolValue,
    pub is_stale_allowed: BoolValue,
    pub is_object_lock_with_ado_allowed: BoolValue,
    pub is_compliance_enabled: BoolValue,
    pub default_bucket_block_size: Int64Value,
    pub notification_size: Int64Value,
    pub block_size: Int64Value,
    pub notification_size_in_count: Int64Value,
    pub block_size_in_count: Int64Value,
    pub default_audit_delete_expiration: Int64Value,
    pub user_mapping: ListValue<ObjectValue<UserMappingModel>>,
    pub retention_classes: ObjectValue<RetentionClassesModel>,
    pub root_user_name: StringValue,
    pub root_user_password: StringValue,
}

impl Model for NamespaceResourceModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("id" => id),
            model_field!("name" => name),
            model_field!("link" => link),
            model_field!("global" => global),
            model_field!("remote" => remote),
            model_field!("creation_time" => creation_time),
            model_field!("inactive" => inactive),
            model_field!("internal" => internal),
            model_field!("default_data_services_vpool" => default_data_services_vpool),
            model_field!("allowed_vpools_list" => allowed_vpools_list),
            model_field!("disallowed_vpools_list" => disallowed_vpools_list),
            model_field!("namespace_admins" => namespace_admins),
            model_field!("external_group_admins" => external_group_admins),
            model_field!("is_encryption_enabled" => is_encryption_enabled),
            model_field!("is_stale_allowed" => is_stale_allowed),
            model_field!("is_object_lock_with_ado_allowed" => is_object_lock_with_ado_allowed),
            model_field!("is_compliance_enabled" => is_compliance_enabled),
            model_field!("default_bucket_block_size" => default_bucket_block_size),
            model_field!("notification_size" => notification_size),
            model_field!("block_size" => block_size),
            model_field!("notification_size_in_count" => notification_size_in_count),
            model_field!("block_size_in_count" => block_size_in_count),
            model_field!("default_audit_delete_expiration" => default_audit_delete_expiration),
            model_field!("user_mapping" => user_mapping),
            model_field!("retention_classes" => retention_classes),
            model_field!("root_user_name" => root_user_name),
            model_field!("root_user_password" => root_user_password),
        ]
    }
}

/// One namespace in the `objectscale_namespace` data source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceEntity {
    pub name: StringValue,
    pub id: StringValue,
    pub global: BoolValue,
    pub remote: BoolValue,
    pub link: ObjectValue<LinkModel>,
    pub creation_time: Int64Value,
}

impl Model for NamespaceEntity {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("name" => name),
            model_field!("id" => id),
            model_field!("global" => global),
            model_field!("remote" => remote),
            model_field!("link" => link),
            model_field!("creation_time" => creation_time),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceDatasourceModel {
    pub id: StringValue,
    pub namespaces: ListValue<ObjectValue<NamespaceEntity>>,
}

impl Model for NamespaceDatasourceModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("id" => id), model_field!("namespaces" => namespaces)]
    }
}

/// One account in the `objectscale_account` data source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDatasourceEntity {
    pub account_id: StringValue,
    pub alias: StringValue,
    pub description: StringValue,
    pub encryption_enabled: BoolValue,
}

impl Model for AccountDatasourceEntity {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("account_id" => account_id),
            model_field!("alias" => alias),
            model_field!("description" => description),
            model_field!("encryption_enabled" => encryption_enabled),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDatasourceModel {
    pub id: StringValue,
    pub accounts: ListValue<ObjectValue<AccountDatasourceEntity>>,
}

impl Model for AccountDatasourceModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("id" => id), model_field!("accounts" => accounts)]
    }
}
