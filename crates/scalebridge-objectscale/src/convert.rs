//! Conversions between API objects and provider state
//!
//! Every function here is a thin composition of transcoder calls. None of
//! them knows a field name except where the provider rules say a field must
//! be forced (fresh vpool lists on create, fixed data source ids).

use scalebridge_core::{ListValue, ObjectValue, Result, StringValue, Transcoder};
use tracing::debug;

use crate::models::{
    Account, AccountDatasourceEntity, AccountDatasourceModel, Namespace, NamespaceDatasourceModel,
    NamespaceEntity, NamespaceResourceModel,
};
use crate::schema::namespace_resource_schema;

/// Identifier of the namespace data source
pub const NAMESPACE_DATASOURCE_ID: &str = "namespace_datasource";

/// Identifier of the account data source
pub const ACCOUNT_DATASOURCE_ID: &str = "account_datasource";

/// Fill unset optional attributes of a plan with their schema defaults
pub fn apply_plan_defaults(
    transcoder: &Transcoder,
    plan: &NamespaceResourceModel,
) -> Result<NamespaceResourceModel> {
    let registry = transcoder.registry();
    let bindings = registry.model::<NamespaceResourceModel>()?;

    let mut attributes = bindings.to_attributes(plan, registry)?;
    namespace_resource_schema().apply_defaults(&mut attributes);
    bindings.from_attributes(attributes, registry)
}

/// Build the create request body from a resource plan
///
/// Only user-configurable attributes are carried over. Computed attributes
/// in the plan are Unknown or stale and are left at their zero values; the
/// vpool lists always start empty.
pub fn namespace_from_plan(
    transcoder: &Transcoder,
    plan: &NamespaceResourceModel,
) -> Result<Namespace> {
    let plan = apply_plan_defaults(transcoder, plan)?;
    let decoded: Namespace = transcoder.decode(&plan)?;

    debug!(
        name = %decoded.name,
        user_mappings = decoded.user_mapping.len(),
        retention_classes = decoded.retention_classes.retention_class.len(),
        "Built namespace from plan"
    );

    Ok(Namespace {
        name: decoded.name,
        default_data_services_vpool: decoded.default_data_services_vpool,
        namespace_admins: decoded.namespace_admins,
        external_group_admins: decoded.external_group_admins,
        is_encryption_enabled: decoded.is_encryption_enabled,
        is_stale_allowed: decoded.is_stale_allowed,
        is_object_lock_with_ado_allowed: decoded.is_object_lock_with_ado_allowed,
        is_compliance_enabled: decoded.is_compliance_enabled,
        default_bucket_block_size: decoded.default_bucket_block_size,
        notification_size: decoded.notification_size,
        block_size: decoded.block_size,
        notification_size_in_count: decoded.notification_size_in_count,
        block_size_in_count: decoded.block_size_in_count,
        default_audit_delete_expiration: decoded.default_audit_delete_expiration,
        user_mapping: decoded.user_mapping,
        retention_classes: decoded.retention_classes,
        allowed_vpools_list: Vec::new(),
        disallowed_vpools_list: Vec::new(),
        ..Default::default()
    })
}

/// Resource state for a namespace returned by the API
pub fn namespace_state(
    transcoder: &Transcoder,
    namespace: &Namespace,
) -> Result<NamespaceResourceModel> {
    transcoder.encode(namespace)
}

/// State of the namespace data source
pub fn namespace_datasource(
    transcoder: &Transcoder,
    namespaces: &[Namespace],
) -> Result<NamespaceDatasourceModel> {
    let entities = namespaces
        .iter()
        .enumerate()
        .map(|(index, namespace)| {
            transcoder
                .encode::<_, NamespaceEntity>(namespace)
                .map(ObjectValue::known)
                .map_err(|e| e.at_index(index))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(count = entities.len(), "Read namespace data source");

    Ok(NamespaceDatasourceModel {
        id: StringValue::from(NAMESPACE_DATASOURCE_ID),
        namespaces: ListValue::known(entities),
    })
}

/// State of the account data source
pub fn account_datasource(
    transcoder: &Transcoder,
    accounts: &[Account],
) -> Result<AccountDatasourceModel> {
    let entities = accounts
        .iter()
        .enumerate()
        .map(|(index, account)| {
            transcoder
                .encode::<_, AccountDatasourceEntity>(account)
                .map(ObjectValue::known)
                .map_err(|e| e.at_index(index))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(count = entities.len(), "Read account data source");

    Ok(AccountDatasourceModel {
        id: StringValue::from(ACCOUNT_DATASOURCE_ID),
        accounts: ListValue::known(entities),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Attribute, AttributeModel, Link, RetentionClass, RetentionClassModel,
        RetentionClassesModel, UserMapping, UserMappingModel,
    };
    use scalebridge_core::{Int64Value, Tri};

    fn plan() -> NamespaceResourceModel {
        NamespaceResourceModel {
            name: StringValue::from("ns1"),
            default_data_services_vpool: StringValue::from("urn:vpool:1"),
            block_size: Int64Value::Value(1024),
            id: StringValue::Unknown,
            link: ObjectValue::unknown(),
            allowed_vpools_list: ListValue::known(vec![StringValue::from("stale")]),
            user_mapping: ListValue::known(vec![ObjectValue::known(UserMappingModel {
                domain: StringValue::from("corp"),
                groups: ListValue::known(vec![StringValue::from("admins")]),
                attributes: ListValue::known(vec![ObjectValue::known(AttributeModel {
                    key: StringValue::from("dept"),
                    value: ListValue::known(vec![StringValue::from("eng")]),
                })]),
            })]),
            ..Default::default()
        }
    }

    fn namespace() -> Namespace {
        Namespace {
            id: "ns1".to_string(),
            name: "ns1".to_string(),
            link: Link {
                rel: "self".to_string(),
                href: "/object/namespaces/namespace/ns1".to_string(),
            },
            creation_time: 1_700_000_000_000,
            default_data_services_vpool: "urn:vpool:1".to_string(),
            default_bucket_block_size: -1,
            retention_classes: crate::models::RetentionClasses {
                retention_class: vec![RetentionClass {
                    name: "short".to_string(),
                    period: 86400,
                }],
            },
            user_mapping: vec![UserMapping {
                domain: "corp".to_string(),
                groups: vec!["admins".to_string()],
                attributes: vec![Attribute {
                    key: "dept".to_string(),
                    value: vec!["eng".to_string()],
                }],
            }],
            root_user_name: "root".to_string(),
            root_user_password: "s3cret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_namespace_from_plan() {
        let transcoder = Transcoder::with_defaults();
        let namespace = namespace_from_plan(&transcoder, &plan()).unwrap();

        assert_eq!(namespace.name, "ns1");
        assert_eq!(namespace.default_data_services_vpool, "urn:vpool:1");
        assert_eq!(namespace.block_size, 1024);
        assert_eq!(namespace.user_mapping[0].attributes[0].value, vec!["eng"]);

        // Defaults from the schema
        assert_eq!(namespace.notification_size, -1);
        assert_eq!(namespace.default_audit_delete_expiration, 0);
        assert!(namespace.retention_classes.retention_class.is_empty());

        // Computed attributes never reach the request
        assert!(namespace.id.is_empty());
        assert!(namespace.allowed_vpools_list.is_empty());
    }

    #[test]
    fn test_namespace_from_plan_with_unknown_retention_classes() {
        let transcoder = Transcoder::with_defaults();
        let plan = NamespaceResourceModel {
            retention_classes: ObjectValue::unknown(),
            user_mapping: ListValue::unknown(),
            ..plan()
        };

        let namespace = namespace_from_plan(&transcoder, &plan).unwrap();
        assert!(namespace.retention_classes.retention_class.is_empty());
        assert!(namespace.user_mapping.is_empty());
    }

    #[test]
    fn test_namespace_state() {
        let transcoder = Transcoder::with_defaults();
        let state = namespace_state(&transcoder, &namespace()).unwrap();

        assert_eq!(state.id, Tri::from("ns1"));
        assert_eq!(state.creation_time, Tri::Value(1_700_000_000_000));
        assert_eq!(state.default_bucket_block_size, Tri::Value(-1));
        assert_eq!(state.link.get().unwrap().rel, Tri::from("self"));
        assert_eq!(
            state.retention_classes.get(),
            Some(&RetentionClassesModel {
                retention_class: ListValue::known(vec![ObjectValue::known(RetentionClassModel {
                    name: StringValue::from("short"),
                    period: Int64Value::Value(86400),
                })]),
            })
        );
        assert_eq!(state.allowed_vpools_list.elements().map(<[_]>::len), Some(0));

        let back: Namespace = transcoder.decode(&state).unwrap();
        assert_eq!(back, namespace());
    }

    #[test]
    fn test_namespace_datasource() {
        let transcoder = Transcoder::with_defaults();
        let second = Namespace {
            id: "ns2".to_string(),
            name: "ns2".to_string(),
            global: true,
            ..Default::default()
        };

        let model = namespace_datasource(&transcoder, &[namespace(), second]).unwrap();
        assert_eq!(model.id, Tri::from(NAMESPACE_DATASOURCE_ID));

        let entities = model.namespaces.elements().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].get().unwrap().global, Tri::Value(true));
        assert_eq!(
            entities[0].get().unwrap().link.get().unwrap().href,
            Tri::from("/object/namespaces/namespace/ns1")
        );
    }

    #[test]
    fn test_empty_datasource_is_known_and_empty() {
        let transcoder = Transcoder::with_defaults();
        let model = account_datasource(&transcoder, &[]).unwrap();
        assert_eq!(model.id, Tri::from(ACCOUNT_DATASOURCE_ID));
        assert_eq!(model.accounts.elements().map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_account_datasource() {
        let transcoder = Transcoder::with_defaults();
        let accounts = vec![Account {
            account_id: "osai1".to_string(),
            alias: "ops".to_string(),
            description: String::new(),
            encryption_enabled: true,
        }];

        let model = account_datasource(&transcoder, &accounts).unwrap();
        let entity = model.accounts.elements().unwrap()[0].get().unwrap().clone();
        assert_eq!(entity.account_id, Tri::from("osai1"));
        assert_eq!(entity.description, Tri::from(""));
        assert_eq!(entity.encryption_enabled, Tri::Value(true));
    }
}
