/// Top-level API metadata, supplied once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub version: String,
    pub server_url: String,
    pub server_name: String,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Demo Chat API".to_string(),
            description: "Demo Chat API".to_string(),
            version: "1.0.0".to_string(),
            server_url: "http://localhost:5000".to_string(),
            server_name: "BACKEND".to_string(),
        }
    }
}
