// Shared unit-test types: a server with every supported field kind and its
// tri-state model.

use crate::value::{BoolValue, FloatValue, Int64Value, ListValue, ObjectValue, SetValue, StringValue};
use crate::{Domain, DomainField, Model, ModelField, domain_field, domain_type, model_field};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub email: String,
    pub priority: i8,
}

impl Domain for Contact {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("email" => email),
            domain_field!("priority" => priority),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    pub name: String,
    pub port: u16,
    pub weight: f64,
    pub ratio: Option<f32>,
    pub tags: Vec<String>,
    pub labels: Vec<String>,
    pub owner: Option<Contact>,
    pub contacts: Vec<Contact>,
    pub big: u64,
    pub enabled: bool,
    pub retries: i32,
    /// Not bound
    pub internal: String,
}

impl Domain for Server {
    fn bindings() -> Vec<DomainField<Self>> {
        vec![
            domain_field!("name" => name),
            domain_field!("port" => port),
            domain_field!("weight" => weight),
            domain_field!("ratio" => ratio),
            domain_field!("tags" => tags),
            domain_field!("labels" => labels),
            domain_field!("owner" => owner),
            domain_field!("contacts" => contacts),
            domain_field!("big" => big),
            domain_field!("enabled" => enabled),
            domain_field!("retries" => retries),
        ]
    }
}

domain_type!(Contact, Server);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactModel {
    pub email: StringValue,
    pub priority: Int64Value,
}

impl Model for ContactModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("email" => email),
            model_field!("priority" => priority),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerModel {
    pub name: StringValue,
    pub port: Int64Value,
    pub weight: FloatValue,
    pub ratio: FloatValue,
    pub tags: ListValue<StringValue>,
    pub labels: SetValue<StringValue>,
    pub owner: ObjectValue<ContactModel>,
    pub contacts: ListValue<ObjectValue<ContactModel>>,
    pub big: Int64Value,
    pub enabled: BoolValue,
    pub retries: Int64Value,
}

impl Model for ServerModel {
    fn bindings() -> Vec<ModelField<Self>> {
        vec![
            model_field!("name" => name),
            model_field!("port" => port),
            model_field!("weight" => weight),
            model_field!("ratio" => ratio),
            model_field!("tags" => tags),
            model_field!("labels" => labels),
            model_field!("owner" => owner),
            model_field!("contacts" => contacts),
            model_field!("big" => big),
            model_field!("enabled" => enabled),
            model_field!("retries" => retries),
        ]
    }
}
