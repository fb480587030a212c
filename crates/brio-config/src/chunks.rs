//! Static code-splitting groups (`build.rollupOptions.output.manualChunks`).

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Chunk name to the module specifiers bundled into it.
///
/// A specifier belongs to at most one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualChunks {
    groups: IndexMap<String, Vec<String>>,
}

impl ManualChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, rejecting duplicate names and specifiers already claimed
    /// by another group.
    pub fn insert(&mut self, name: impl Into<String>, modules: Vec<String>) -> Result<()> {
        let name = name.into();
        if self.groups.contains_key(&name) {
            return Err(ConfigError::DuplicateKey {
                section: "build.rollupOptions.output.manualChunks".to_string(),
                key: name,
            });
        }
        self.groups.insert(name, modules);
        if let Err(err) = self.validate() {
            self.groups.pop();
            return Err(err);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut owner: HashMap<&str, &str> = HashMap::new();

        for (name, modules) in &self.groups {
            if name.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "manual chunk names cannot be empty".to_string(),
                    hint: None,
                });
            }

            let mut in_group = HashSet::new();
            for specifier in modules {
                if specifier.trim().is_empty() {
                    return Err(ConfigError::SchemaValidation {
                        message: format!("manual chunk '{}' contains an empty module specifier", name),
                        hint: Some("Remove empty strings from the chunk's module list".to_string()),
                    });
                }
                if !in_group.insert(specifier.as_str()) {
                    return Err(ConfigError::SchemaValidation {
                        message: format!(
                            "module '{}' is listed twice in manual chunk '{}'",
                            specifier, name
                        ),
                        hint: None,
                    });
                }
                if let Some(first) = owner.insert(specifier.as_str(), name.as_str()) {
                    return Err(ConfigError::DuplicateChunkMember {
                        specifier: specifier.clone(),
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Name of the chunk a specifier is assigned to.
    pub fn chunk_for(&self, specifier: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, modules)| modules.iter().any(|m| m == specifier))
            .map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
