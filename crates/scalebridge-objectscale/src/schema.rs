//! Provider schemas for the ObjectScale resource and data sources

use scalebridge_core::{AttrType, AttributeSchema, Attributes, Presence, Schema, Value};

fn computed_string(description: &str) -> AttributeSchema {
    AttributeSchema::string(Presence::Computed).with_description(description)
}

fn computed_bool(description: &str) -> AttributeSchema {
    AttributeSchema::boolean(Presence::Computed).with_description(description)
}

fn defaulted_bool(description: &str) -> AttributeSchema {
    AttributeSchema::boolean(Presence::OptionalComputed)
        .with_default(false)
        .with_description(description)
}

/// Sizes use -1 for "not limited"
fn defaulted_size(description: &str) -> AttributeSchema {
    AttributeSchema::int64(Presence::OptionalComputed)
        .with_default(-1)
        .with_description(description)
}

fn link_schema() -> Schema {
    Schema::new("Link.")
        .with_attribute("rel", computed_string("Rel."))
        .with_attribute("href", computed_string("Href."))
}

fn user_mapping_schema() -> Schema {
    let attribute = Schema::new("Attribute.")
        .with_attribute(
            "key",
            AttributeSchema::string(Presence::OptionalComputed).with_description("Key."),
        )
        .with_attribute(
            "value",
            AttributeSchema::list(AttrType::String, Presence::OptionalComputed)
                .with_description("Value."),
        );

    Schema::new("UserMapping.")
        .with_attribute(
            "domain",
            AttributeSchema::string(Presence::OptionalComputed).with_description("Domain."),
        )
        .with_attribute(
            "groups",
            AttributeSchema::list(AttrType::String, Presence::OptionalComputed)
                .with_description("Groups."),
        )
        .with_attribute(
            "attributes",
            AttributeSchema::list_nested(attribute, Presence::OptionalComputed)
                .with_description("Attributes."),
        )
}

fn retention_classes_schema() -> Schema {
    let retention_class = Schema::new("RetentionClass.")
        .with_attribute(
            "name",
            AttributeSchema::string(Presence::Required).with_description("Name."),
        )
        .with_attribute(
            "period",
            AttributeSchema::int64(Presence::Required).with_description("Period."),
        );

    Schema::new("RetentionClasses.").with_attribute(
        "retention_class",
        AttributeSchema::list_nested(retention_class, Presence::Required)
            .with_description("RetentionClass."),
    )
}

/// Schema of the `objectscale_namespace` resource
pub fn namespace_resource_schema() -> Schema {
    let mut no_retention_classes = Attributes::new();
    no_retention_classes.insert("retention_class".to_string(), Value::List(Vec::new()));

    Schema::new("Namespace.")
        .with_attribute(
            "name",
            AttributeSchema::string(Presence::Required).with_description("Name."),
        )
        .with_attribute("id", computed_string("Id."))
        .with_attribute("global", computed_bool("Global."))
        .with_attribute("remote", computed_bool("Remote."))
        .with_attribute(
            "link",
            AttributeSchema::single_nested(link_schema(), Presence::Computed)
                .with_description("Link."),
        )
        .with_attribute(
            "creation_time",
            AttributeSchema::int64(Presence::Computed).with_description("CreationTime."),
        )
        .with_attribute("inactive", computed_bool("Inactive."))
        .with_attribute("internal", computed_bool("Internal."))
        .with_attribute(
            "default_data_services_vpool",
            AttributeSchema::string(Presence::Required)
                .with_description("DefaultDataServicesVpool."),
        )
        .with_attribute(
            "allowed_vpools_list",
            AttributeSchema::list(AttrType::String, Presence::Computed)
                .with_description("AllowedVpoolsList."),
        )
        .with_attribute(
            "disallowed_vpools_list",
            AttributeSchema::list(AttrType::String, Presence::Computed)
                .with_description("DisallowedVpoolsList."),
        )
        .with_attribute(
            "namespace_admins",
            AttributeSchema::string(Presence::OptionalComputed)
                .with_default("")
                .with_description("NamespaceAdmins."),
        )
        .with_attribute(
            "user_mapping",
            AttributeSchema::list_nested(user_mapping_schema(), Presence::OptionalComputed)
                .with_default(Value::List(Vec::new()))
                .with_description("UserMapping."),
        )
        .with_attribute("is_encryption_enabled", defaulted_bool("IsEncryptionEnabled."))
        .with_attribute(
            "default_bucket_block_size",
            defaulted_size("DefaultBucketBlockSize."),
        )
        .with_attribute(
            "external_group_admins",
            AttributeSchema::string(Presence::OptionalComputed)
                .with_default("")
                .with_description("ExternalGroupAdmins."),
        )
        .with_attribute("is_stale_allowed", defaulted_bool("IsStaleAllowed."))
        .with_attribute(
            "is_object_lock_with_ado_allowed",
            defaulted_bool("IsObjectLockWithAdoAllowed."),
        )
        .with_attribute("is_compliance_enabled", defaulted_bool("IsComplianceEnabled."))
        .with_attribute("notification_size", defaulted_size("NotificationSize."))
        .with_attribute("block_size", defaulted_size("BlockSize."))
        .with_attribute(
            "notification_size_in_count",
            defaulted_size("NotificationSizeInCount."),
        )
        .with_attribute("block_size_in_count", defaulted_size("BlockSizeInCount."))
        .with_attribute(
            "default_audit_delete_expiration",
            AttributeSchema::int64(Presence::OptionalComputed)
                .with_default(0)
                .with_description("DefaultAuditDeleteExpiration."),
        )
        .with_attribute(
            "retention_classes",
            AttributeSchema::single_nested(retention_classes_schema(), Presence::OptionalComputed)
                .with_default(no_retention_classes)
                .with_description("RetentionClasses."),
        )
        .with_attribute("root_user_name", computed_string("RootUserName."))
        .with_attribute("root_user_password", computed_string("RootUserPassword."))
}

/// Schema of the `objectscale_namespace` data source
pub fn namespace_datasource_schema() -> Schema {
    let namespace = Schema::new("Namespace.")
        .with_attribute("name", computed_string("Name."))
        .with_attribute("id", computed_string("Id."))
        .with_attribute("global", computed_bool("Global."))
        .with_attribute("remote", computed_bool("Remote."))
        .with_attribute(
            "link",
            AttributeSchema::single_nested(link_schema(), Presence::Computed)
                .with_description("Link."),
        )
        .with_attribute(
            "creation_time",
            AttributeSchema::int64(Presence::Computed).with_description("CreationTime."),
        );

    Schema::new("Namespace.")
        .with_attribute("id", computed_string("Identifier"))
        .with_attribute(
            "namespaces",
            AttributeSchema::list_nested(namespace, Presence::Computed)
                .with_description("List of Namespaces"),
        )
}

/// Schema of the `objectscale_account` data source
pub fn account_datasource_schema() -> Schema {
    let account = Schema::new("Account.")
        .with_attribute("account_id", computed_string("AccountId."))
        .with_attribute("alias", computed_string("Alias."))
        .with_attribute("description", computed_string("Description."))
        .with_attribute("encryption_enabled", computed_bool("EncryptionEnabled."));

    Schema::new("Account.")
        .with_attribute("id", computed_string("Identifier"))
        .with_attribute(
            "accounts",
            AttributeSchema::list_nested(account, Presence::Computed)
                .with_description("List of Accounts"),
        )
}
