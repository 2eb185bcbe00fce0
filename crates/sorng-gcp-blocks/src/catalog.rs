//! Registry of operation descriptors.
//!
//! Descriptors come from the built-in Monitoring / Pub/Sub / Cloud Run tables
//! or from static YAML/JSON configuration loaded once at start-up.

use crate::descriptor::{BodyMode, OperationDescriptor};
use crate::template;
use crate::{monitoring, pubsub, run};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("duplicate operation id '{0}'")]
    Duplicate(String),
    #[error("invalid operation '{id}': {reason}")]
    Invalid { id: String, reason: String },
}

/// On-disk catalog layout: `operations: [ ... ]`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    operations: Vec<OperationDescriptor>,
}

/// Immutable lookup table of descriptors keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    operations: HashMap<String, OperationDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and malformed descriptors.
    pub fn new(descriptors: Vec<OperationDescriptor>) -> Result<Self, CatalogError> {
        let mut operations = HashMap::with_capacity(descriptors.len());
        for d in descriptors {
            validate(&d)?;
            if operations.contains_key(&d.id) {
                return Err(CatalogError::Duplicate(d.id));
            }
            operations.insert(d.id.clone(), d);
        }
        debug!("GCP catalog loaded with {} operations", operations.len());
        Ok(Self { operations })
    }

    /// Monitoring v3, Pub/Sub v1 and Cloud Run v2 operations.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut all = monitoring::operations();
        all.extend(pubsub::operations());
        all.extend(run::operations());
        Self::new(all)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.operations)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.operations)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Merge another catalog in; ids must stay unique. On a duplicate
    /// nothing is merged.
    pub fn extend(&mut self, other: Catalog) -> Result<(), CatalogError> {
        let mut clashes: Vec<&String> = other
            .operations
            .keys()
            .filter(|id| self.operations.contains_key(*id))
            .collect();
        clashes.sort_unstable();
        if let Some(id) = clashes.first() {
            return Err(CatalogError::Duplicate((*id).clone()));
        }
        self.operations.extend(other.operations);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&OperationDescriptor> {
        self.operations.get(id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Sorted operation ids.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

fn validate(d: &OperationDescriptor) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::Invalid {
        id: d.id.clone(),
        reason,
    };
    if d.id.is_empty() {
        return Err(invalid("id is empty".to_string()));
    }
    if d.service.is_empty() {
        return Err(invalid("service is empty".to_string()));
    }
    template::placeholder_names(&d.path_template).map_err(|e| invalid(e.to_string()))?;
    if d.body_mode == BodyMode::AssembledFields && d.input_fields.is_empty() {
        return Err(invalid("assembledFields mode declares no input fields".to_string()));
    }
    Ok(())
}
