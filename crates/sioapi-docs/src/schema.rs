use serde::Serialize;
use serde_json::Value;
use sioapi_schema::{FieldDef, FieldType, ModelSchema};

use crate::ordered::OrderedMap;

/// AsyncAPI schema object rendered from a model, fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OrderedMap<SchemaObject>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaObject {
    pub fn from_model(model: &ModelSchema) -> Self {
        let mut properties = OrderedMap::new();
        for field in &model.fields {
            properties.insert(field.name.clone(), Self::from_field(field));
        }

        Self {
            title: Some(model.name.clone()),
            kind: Some("object".to_string()),
            description: model.description.clone(),
            properties: Some(properties),
            required: model
                .required_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
            ..Self::default()
        }
    }

    fn from_field(field: &FieldDef) -> Self {
        Self {
            description: field.description.clone(),
            default: field.default.clone(),
            example: field.example.clone(),
            ..Self::from_type(&field.ty)
        }
    }

    fn from_type(ty: &FieldType) -> Self {
        match ty {
            FieldType::Model(model) => Self::from_model(model),
            FieldType::Array(item) => Self {
                kind: Some("array".to_string()),
                items: Some(Box::new(Self::from_type(item))),
                ..Self::default()
            },
            other => Self {
                kind: other.json_type().map(str::to_string),
                format: other.format().map(str::to_string),
                ..Self::default()
            },
        }
    }
}
