//! Shared fixtures for transcoder contract tests
//!
//! A small bucket resource with the shapes that matter: nested struct,
//! optional struct, sequences of structs and primitives, unsigned and
//! narrow integers, and both float widths.

#![allow(dead_code)]

use scalebridge_core::{
    domain_field, domain_type, model_field, BindingRegistry, BoolValue, Domain, DomainField,
    FloatValue, Int64Value, ListValue, Model, ModelField, ObjectValue, SetValue, StringValue,
    TranscodeConfig, Transcoder,
};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    pub id: String,
    pub level: u8,
}

impl Domain for Owner {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![domain_field!("id" => id), domain_field!("level" => level)]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quota {
    pub limit_gb: f64,
    pub warn_ratio: f32,
    pub blocked: bool,
}

impl Domain for Quota {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("limit_gb" => limit_gb),
            domain_field!("warn_ratio" => warn_ratio),
            domain_field!("blocked" => blocked),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    pub name: String,
    pub size_bytes: u64,
    pub replicas: i16,
    pub quota: Quota,
    pub owner: Option<Owner>,
    pub readers: Vec<Owner>,
    pub tags: Vec<String>,
    pub zones: Vec<String>,
    pub versioned: Option<bool>,
}

impl Domain for Bucket {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("name" => name),
            domain_field!("size_bytes" => size_bytes),
            domain_field!("replicas" => replicas),
            domain_field!("quota" => quota),
            domain_field!("owner" => owner),
            domain_field!("readers" => readers),
            domain_field!("tags" => tags),
            domain_field!("zones" => zones),
            domain_field!("versioned" => versioned),
        ]
    }
}

domain_type!(Owner, Quota, Bucket);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerModel {
    pub id: StringValue,
    pub level: Int64Value,
}

impl Model for OwnerModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![model_field!("id" => id), model_field!("level" => level)]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaModel {
    pub limit_gb: FloatValue,
    pub warn_ratio: FloatValue,
    pub blocked: BoolValue,
}

impl Model for QuotaModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("limit_gb" => limit_gb),
            model_field!("warn_ratio" => warn_ratio),
            model_field!("blocked" => blocked),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketModel {
    pub name: StringValue,
    pub size_bytes: Int64Value,
    pub replicas: Int64Value,
    pub quota: ObjectValue<QuotaModel>,
    pub owner: ObjectValue<OwnerModel>,
    pub readers: ListValue<ObjectValue<OwnerModel>>,
    pub tags: ListValue<StringValue>,
    pub zones: SetValue<StringValue>,
    pub versioned: BoolValue,
}

impl Model for BucketModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("name" => name),
            model_field!("size_bytes" => size_bytes),
            model_field!("replicas" => replicas),
            model_field!("quota" => quota),
            model_field!("owner" => owner),
            model_field!("readers" => readers),
            model_field!("tags" => tags),
            model_field!("zones" => zones),
            model_field!("versioned" => versioned),
        ]
    }
}

/// A transcoder over a fresh registry with default policy
pub fn transcoder() -> Transcoder {
    Transcoder::new(Arc::new(BindingRegistry::new()), TranscodeConfig::default())
        .expect("default config is valid")
}

/// A fully populated bucket
pub fn sample_bucket() -> Bucket {
    Bucket {
        name: "logs".to_string(),
        size_bytes: 5_000_000_000,
        replicas: 3,
        quota: Quota {
            limit_gb: 512.125,
            warn_ratio: 0.8,
            blocked: false,
        },
        owner: Some(Owner {
            id: "alice".to_string(),
            level: 2,
        }),
        readers: vec![
            Owner {
                id: "bob".to_string(),
                level: 1,
            },
            Owner {
                id: "carol".to_string(),
                level: 1,
            },
        ],
        tags: vec!["prod".to_string(), "eu".to_string()],
        zones: vec!["z1".to_string(), "z2".to_string()],
        versioned: Some(true),
    }
}
