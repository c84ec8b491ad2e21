use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::error::{Result, SchemaError};
use crate::model::{FieldType, ModelSchema};

/// Upper bound on individual failures quoted in one validation message.
const MAX_REPORTED_ERRORS: usize = 4;

/// A model schema compiled into a reusable validator.
pub struct CompiledSchema {
    schema: Arc<ModelSchema>,
    validator: Validator,
}

impl CompiledSchema {
    /// Compile `schema` with explicit config.
    pub fn compile(schema: Arc<ModelSchema>, config: &ValidatorConfig) -> Result<Self> {
        let json_schema = schema.to_json_schema(config.strict_mode);

        let validator = jsonschema::options()
            .should_validate_formats(config.validate_formats)
            .with_format("path", is_path)
            .build(&json_schema)
            .map_err(|err| SchemaError::CompileFailed(format!("{}: {err}", schema.name)))?;

        tracing::trace!(model = %schema.name, strict = config.strict_mode, "compiled model schema");
        Ok(Self { schema, validator })
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Validate `value` and return it with declared defaults filled in.
    pub fn validate(&self, value: &Value) -> Result<Value> {
        let failures: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect();

        if !failures.is_empty() {
            return Err(SchemaError::ValidationFailed {
                model: self.schema.name.clone(),
                message: describe_failures(&self.schema.name, &failures),
            });
        }

        let mut normalized = value.clone();
        apply_defaults(&self.schema, &mut normalized);
        Ok(normalized)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("model", &self.schema.name)
            .finish()
    }
}

fn is_path(value: &str) -> bool {
    !value.is_empty() && !value.contains('\0')
}

fn describe_failures(model: &str, failures: &[String]) -> String {
    let count = failures.len();
    let plural = if count == 1 { "" } else { "s" };
    let mut message = format!("{count} validation error{plural} for {model}: ");
    for (idx, failure) in failures.iter().take(MAX_REPORTED_ERRORS).enumerate() {
        if idx > 0 {
            message.push_str("; ");
        }
        message.push_str(failure);
    }
    if count > MAX_REPORTED_ERRORS {
        message.push_str(&format!("; and {} more", count - MAX_REPORTED_ERRORS));
    }
    message
}

fn apply_defaults(schema: &ModelSchema, value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    for field in &schema.fields {
        match map.get_mut(&field.name) {
            Some(present) => apply_nested_defaults(&field.ty, present),
            None => {
                if let Some(default) = &field.default {
                    map.insert(field.name.clone(), default.clone());
                }
            }
        }
    }
}

fn apply_nested_defaults(ty: &FieldType, value: &mut Value) {
    match ty {
        FieldType::Model(model) => apply_defaults(model, value),
        FieldType::Array(item) => {
            if let Value::Array(items) = value {
                for entry in items {
                    apply_nested_defaults(item, entry);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::FieldDef;

    fn download_request() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::new("DownloadFileRequest")
                .field(FieldDef::required("url", FieldType::Url))
                .field(FieldDef::required("location", FieldType::Path))
                .field(FieldDef::optional("check_hash", FieldType::Boolean).with_default(false)),
        )
    }

    fn compile(schema: Arc<ModelSchema>) -> CompiledSchema {
        CompiledSchema::compile(schema, &ValidatorConfig::default()).unwrap()
    }

    #[test]
    fn valid_payload_gets_defaults() {
        let compiled = compile(download_request());
        let normalized = compiled
            .validate(&json!({"url": "https://x/y.jpg", "location": "/tmp/y.jpg"}))
            .unwrap();

        assert_eq!(normalized["check_hash"], json!(false));
        assert_eq!(normalized["url"], json!("https://x/y.jpg"));
    }

    #[test]
    fn explicit_value_is_not_overwritten_by_default() {
        let compiled = compile(download_request());
        let normalized = compiled
            .validate(&json!({"url": "https://x/y.jpg", "location": "/tmp/y.jpg", "check_hash": true}))
            .unwrap();

        assert_eq!(normalized["check_hash"], json!(true));
    }

    #[test]
    fn missing_required_field_is_named() {
        let compiled = compile(download_request());
        let err = compiled
            .validate(&json!({"location": "/tmp/y.jpg"}))
            .unwrap_err();

        assert_eq!(err.model(), Some("DownloadFileRequest"));
        let message = err.to_string();
        assert!(message.starts_with("1 validation error for DownloadFileRequest"));
        assert!(message.contains("url"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let compiled = compile(download_request());
        assert!(!compiled.is_valid(&json!({"url": "not a url", "location": "/tmp/y.jpg"})));
    }

    #[test]
    fn format_checks_can_be_disabled() {
        let config = ValidatorConfig {
            validate_formats: false,
            ..ValidatorConfig::default()
        };
        let compiled = CompiledSchema::compile(download_request(), &config).unwrap();
        assert!(compiled.is_valid(&json!({"url": "not a url", "location": "/tmp/y.jpg"})));
    }

    #[test]
    fn wrong_types_are_all_reported() {
        let compiled = compile(download_request());
        let err = compiled
            .validate(&json!({"url": 1, "location": 2, "check_hash": "yes"}))
            .unwrap_err();

        assert!(err.to_string().starts_with("3 validation errors"));
    }

    #[test]
    fn non_object_payload_fails() {
        let compiled = compile(download_request());
        assert!(compiled.validate(&json!("just a string")).is_err());
        assert!(compiled.validate(&Value::Null).is_err());
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let payload = json!({"url": "https://x/y.jpg", "location": "/tmp/y.jpg", "extra": 1});

        let permissive = compile(download_request());
        assert!(permissive.is_valid(&payload));

        let strict = CompiledSchema::compile(
            download_request(),
            &ValidatorConfig {
                strict_mode: true,
                ..ValidatorConfig::default()
            },
        )
        .unwrap();
        assert!(matches!(
            strict.validate(&payload),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn nested_model_defaults_are_applied() {
        let data = Arc::new(
            ModelSchema::new("Data")
                .field(FieldDef::optional("is_accepted", FieldType::Boolean).with_default(true)),
        );
        let outer = Arc::new(
            ModelSchema::new("Accepted").field(FieldDef::required("data", FieldType::Model(data))),
        );

        let compiled = compile(outer);
        let normalized = compiled.validate(&json!({"data": {}})).unwrap();
        assert_eq!(normalized["data"]["is_accepted"], json!(true));
    }

    #[test]
    fn empty_path_is_rejected() {
        let compiled = compile(download_request());
        assert!(!compiled.is_valid(&json!({"url": "https://x/y.jpg", "location": ""})));
    }

    #[test]
    fn failure_message_is_truncated() {
        let failures: Vec<String> = (0..6).map(|i| format!("problem {i}")).collect();
        let message = describe_failures("M", &failures);
        assert!(message.starts_with("6 validation errors for M: problem 0"));
        assert!(message.ends_with("; and 2 more"));
        assert!(!message.contains("problem 4"));
    }
}
