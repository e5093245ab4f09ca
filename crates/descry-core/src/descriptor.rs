//! Descriptor model and the checked conversion from parsed YAML.
//!
//! Descriptor files are deserialized into a generic `serde_yaml::Value`
//! first, then converted explicitly so a malformed file surfaces a
//! structural error for that one file instead of a crash.

use serde::Serialize;
use std::collections::BTreeMap;

/// One YAML-defined entity record submitted for validation.
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    /// Entity identifier, non-empty.
    pub identifier: String,

    /// Blueprint (remote schema) the entity claims to conform to, non-empty.
    pub blueprint: String,

    /// Declared property values, possibly empty.
    pub properties: BTreeMap<String, serde_yaml::Value>,

    /// Declared relations, possibly empty.
    pub relations: BTreeMap<String, serde_yaml::Value>,
}

/// Structural failures of a descriptor file.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("descriptor root must be a mapping")]
    NotAMapping,

    #[error("field '{0}' must be a non-empty string")]
    BadField(&'static str),

    #[error("field '{0}' must be a mapping")]
    BadSection(&'static str),
}

impl Descriptor {
    /// Convert a parsed YAML tree into a descriptor.
    ///
    /// `identifier` and `blueprint` must be present as non-empty strings;
    /// `properties` and `relations` are optional mappings defaulting to
    /// empty.
    pub fn from_value(value: &serde_yaml::Value) -> Result<Self, DescriptorError> {
        let mapping = value.as_mapping().ok_or(DescriptorError::NotAMapping)?;

        let identifier = required_string(mapping, "identifier")?;
        let blueprint = required_string(mapping, "blueprint")?;
        let properties = optional_mapping(mapping, "properties")?;
        let relations = optional_mapping(mapping, "relations")?;

        Ok(Self {
            identifier,
            blueprint,
            properties,
            relations,
        })
    }

    /// Full descriptor body as JSON, for the legacy validation endpoint.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn required_string(
    mapping: &serde_yaml::Mapping,
    key: &'static str,
) -> Result<String, DescriptorError> {
    match mapping.get(key) {
        Some(serde_yaml::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(DescriptorError::BadField(key)),
    }
}

fn optional_mapping(
    mapping: &serde_yaml::Mapping,
    key: &'static str,
) -> Result<BTreeMap<String, serde_yaml::Value>, DescriptorError> {
    match mapping.get(key) {
        None | Some(serde_yaml::Value::Null) => Ok(BTreeMap::new()),
        Some(serde_yaml::Value::Mapping(m)) => {
            let mut out = BTreeMap::new();
            for (k, v) in m {
                // Non-string keys are legal YAML but not legal descriptors.
                let k = k
                    .as_str()
                    .ok_or(DescriptorError::BadSection(key))?
                    .to_string();
                out.insert(k, v.clone());
            }
            Ok(out)
        }
        Some(_) => Err(DescriptorError::BadSection(key)),
    }
}
