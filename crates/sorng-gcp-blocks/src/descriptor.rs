//! Declarative description of a single Google Cloud REST operation.
//!
//! A descriptor is plain data: it is built once (from the built-in catalogs or
//! from static configuration) and never mutated afterwards. The invoker is the
//! only code that interprets it.

use serde::{Deserialize, Serialize};

/// HTTP methods used by the Google Cloud REST surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// How the request payload is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyMode {
    /// No body is ever sent.
    #[default]
    None,
    /// The caller supplies one pre-structured value under `requestBody`.
    WholeBody,
    /// The body is assembled from the declared `input_fields`.
    AssembledFields,
}

/// Advisory JSON shape of an input field. Not enforced at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldShape {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    #[default]
    Any,
}

/// One named body field of an `assembledFields` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub shape: FieldShape,
}

impl InputField {
    pub fn new(name: &str, shape: FieldShape) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            shape,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Which credential forms an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialModes {
    #[serde(default = "yes")]
    pub access_token: bool,
    #[serde(default = "yes")]
    pub service_account_key: bool,
}

fn yes() -> bool {
    true
}

impl Default for CredentialModes {
    fn default() -> Self {
        Self {
            access_token: true,
            service_account_key: true,
        }
    }
}

impl CredentialModes {
    /// Only a service account key is accepted; a supplied token is ignored.
    pub fn key_only() -> Self {
        Self {
            access_token: false,
            service_account_key: true,
        }
    }
}

/// Static metadata for one REST call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Discovery-style identifier, e.g. `pubsub.projects.topics.create`.
    pub id: String,
    /// Host prefix: `https://{service}.googleapis.com`.
    pub service: String,
    pub method: HttpMethod,
    /// Path relative to the service root, e.g. `v1/{+name}`.
    pub path_template: String,
    #[serde(default)]
    pub body_mode: BodyMode,
    #[serde(default)]
    pub input_fields: Vec<InputField>,
    /// Input names sent as query-string parameters when present.
    #[serde(default)]
    pub query_fields: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub credential_modes: CredentialModes,
}

impl OperationDescriptor {
    pub fn new(id: &str, service: &str, method: HttpMethod, path_template: &str) -> Self {
        Self {
            id: id.to_string(),
            service: service.to_string(),
            method,
            path_template: path_template.to_string(),
            body_mode: BodyMode::None,
            input_fields: Vec::new(),
            query_fields: Vec::new(),
            scopes: Vec::new(),
            credential_modes: CredentialModes::default(),
        }
    }

    pub fn with_whole_body(mut self) -> Self {
        self.body_mode = BodyMode::WholeBody;
        self
    }

    pub fn with_fields(mut self, fields: Vec<InputField>) -> Self {
        self.body_mode = BodyMode::AssembledFields;
        self.input_fields = fields;
        self
    }

    pub fn with_query(mut self, names: &[&str]) -> Self {
        self.query_fields = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_credential_modes(mut self, modes: CredentialModes) -> Self {
        self.credential_modes = modes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let d: OperationDescriptor = serde_json::from_str(
            r#"{"id":"x.get","service":"x","method":"GET","pathTemplate":"v1/{+name}"}"#,
        )
        .unwrap();
        assert_eq!(d.method, HttpMethod::Get);
        assert_eq!(d.body_mode, BodyMode::None);
        assert!(d.input_fields.is_empty());
        assert_eq!(d.credential_modes, CredentialModes::default());
    }

    #[test]
    fn partial_credential_modes_default_to_allowed() {
        let m: CredentialModes = serde_json::from_str(r#"{"accessToken":false}"#).unwrap();
        assert_eq!(m, CredentialModes::key_only());
    }

    #[test]
    fn builder_sets_body_mode() {
        let d = OperationDescriptor::new("a", "pubsub", HttpMethod::Patch, "v1/{+name}")
            .with_fields(vec![InputField::new("topic", FieldShape::Object).required()]);
        assert_eq!(d.body_mode, BodyMode::AssembledFields);
        assert!(d.input_fields[0].required);
        assert_eq!(reqwest::Method::from(d.method), reqwest::Method::PATCH);
        assert_eq!(d.method.as_str(), "PATCH");
    }
}
