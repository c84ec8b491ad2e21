use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Declared type of a single model field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// String holding an absolute URI.
    Url,
    /// Non-empty filesystem path string.
    Path,
    Array(Box<FieldType>),
    /// Nested structured model.
    Model(Arc<ModelSchema>),
    /// Accepts any JSON value.
    Any,
}

impl FieldType {
    /// Array of `item`.
    pub fn array_of(item: FieldType) -> Self {
        FieldType::Array(Box::new(item))
    }

    /// Nested model field for a [`Model`] type.
    pub fn model<T: Model>() -> Self {
        FieldType::Model(Arc::new(T::schema()))
    }

    /// Short human-readable type name, e.g. `url` or `array<string>`.
    pub fn type_name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Url => "url".to_string(),
            FieldType::Path => "path".to_string(),
            FieldType::Array(item) => format!("array<{}>", item.type_name()),
            FieldType::Model(model) => model.name.clone(),
            FieldType::Any => "any".to_string(),
        }
    }

    /// JSON Schema primitive type keyword, if the field has one.
    pub fn json_type(&self) -> Option<&'static str> {
        match self {
            FieldType::String | FieldType::Url | FieldType::Path => Some("string"),
            FieldType::Integer => Some("integer"),
            FieldType::Number => Some("number"),
            FieldType::Boolean => Some("boolean"),
            FieldType::Array(_) => Some("array"),
            FieldType::Model(_) => Some("object"),
            FieldType::Any => None,
        }
    }

    /// JSON Schema `format` keyword, if the field has one.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            FieldType::Url => Some("uri"),
            FieldType::Path => Some("path"),
            _ => None,
        }
    }

    fn json_schema(&self, strict: bool) -> Map<String, Value> {
        let mut schema = match self {
            FieldType::Model(model) => match model.to_json_schema(strict) {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        };

        if let Some(kind) = self.json_type() {
            schema.insert("type".to_string(), Value::String(kind.to_string()));
        }
        if let Some(format) = self.format() {
            schema.insert("format".to_string(), Value::String(format.to_string()));
        }
        if let FieldType::Array(item) = self {
            schema.insert("items".to_string(), Value::Object(item.json_schema(strict)));
        }
        schema
    }
}

/// A single named field of a [`ModelSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// Required fields must be present and non-null. Optional fields accept `null`.
    pub required: bool,
    /// Filled into the payload when an optional field is absent.
    pub default: Option<Value>,
    pub description: Option<String>,
    pub example: Option<Value>,
}

impl FieldDef {
    /// A field that must be present.
    pub fn required(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default: None,
            description: None,
            example: None,
        }
    }

    /// A field that may be absent or `null`.
    pub fn optional(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Set a default value. A field with a default is never required.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, value: impl Into<Value>) -> Self {
        self.example = Some(value.into());
        self
    }

    fn json_schema(&self, strict: bool) -> Value {
        let mut schema = self.ty.json_schema(strict);

        if !self.required {
            if let Some(Value::String(kind)) = schema.remove("type") {
                schema.insert(
                    "type".to_string(),
                    Value::Array(vec![Value::String(kind), Value::String("null".to_string())]),
                );
            }
        }
        if let Some(description) = &self.description {
            schema.insert(
                "description".to_string(),
                Value::String(description.clone()),
            );
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        if let Some(example) = &self.example {
            schema.insert("examples".to_string(), Value::Array(vec![example.clone()]));
        }
        Value::Object(schema)
    }
}

/// A named structured type: the unit of request and acknowledgement validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: String,
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field. A later field with the same name replaces the earlier one,
    /// so derived models can override fields of a base model.
    pub fn field(mut self, field: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Copy every field of `base` into this model, keeping fields already declared.
    pub fn extend(mut self, base: &ModelSchema) -> Self {
        for field in &base.fields {
            if self.field_named(&field.name).is_none() {
                self.fields.push(field.clone());
            }
        }
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object. `strict` forbids undeclared properties.
    pub fn to_json_schema(&self, strict: bool) -> Value {
        let mut schema = Map::new();
        schema.insert("title".to_string(), Value::String(self.name.clone()));
        if let Some(description) = &self.description {
            schema.insert(
                "description".to_string(),
                Value::String(description.clone()),
            );
        }
        schema.insert("type".to_string(), Value::String("object".to_string()));

        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.json_schema(strict)))
            .collect();
        schema.insert("properties".to_string(), Value::Object(properties));

        let required: Vec<Value> = self
            .required_fields()
            .into_iter()
            .map(|name| Value::String(name.to_string()))
            .collect();
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if strict {
            schema.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        Value::Object(schema)
    }
}

/// A Rust type with a declared [`ModelSchema`].
///
/// The schema is the type token used when a handler's request or acknowledgement
/// schema is inferred from its signature.
pub trait Model: Serialize + DeserializeOwned {
    fn schema() -> ModelSchema;

    fn schema_ref() -> SchemaRef {
        SchemaRef::Concrete(Arc::new(Self::schema()))
    }
}

/// Which schema, if any, governs one side of an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SchemaRef {
    /// Explicitly no validation.
    None,
    /// Not supplied or not determinable. Validation is skipped.
    #[default]
    Unresolved,
    Concrete(Arc<ModelSchema>),
}

impl SchemaRef {
    pub fn of<T: Model>() -> Self {
        T::schema_ref()
    }

    pub fn model(schema: ModelSchema) -> Self {
        SchemaRef::Concrete(Arc::new(schema))
    }

    pub fn concrete(&self) -> Option<&Arc<ModelSchema>> {
        match self {
            SchemaRef::Concrete(schema) => Some(schema),
            SchemaRef::None | SchemaRef::Unresolved => None,
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, SchemaRef::Concrete(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, SchemaRef::Unresolved)
    }

    /// Model name, or `none` / `unresolved`.
    pub fn display_name(&self) -> &str {
        match self {
            SchemaRef::None => "none",
            SchemaRef::Unresolved => "unresolved",
            SchemaRef::Concrete(schema) => &schema.name,
        }
    }
}

impl From<ModelSchema> for SchemaRef {
    fn from(schema: ModelSchema) -> Self {
        SchemaRef::model(schema)
    }
}
