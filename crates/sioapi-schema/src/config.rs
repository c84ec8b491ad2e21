/// Controls how model schemas are compiled into validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// When true, objects reject properties not declared by the model.
    pub strict_mode: bool,
    /// When true, `format` keywords (`uri`, `path`) are asserted, not just annotated.
    pub validate_formats: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            validate_formats: true,
        }
    }
}
