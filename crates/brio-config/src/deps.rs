//! Dependency pre-bundling hints (`optimizeDeps`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeDeps {
    #[serde(default)]
    pub include: Vec<String>,
}

impl OptimizeDeps {
    pub fn validate(&self) -> Result<()> {
        if self.include.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::SchemaValidation {
                message: "optimizeDeps.include cannot contain empty specifiers".to_string(),
                hint: Some("Remove empty strings from 'optimizeDeps.include'".to_string()),
            });
        }
        Ok(())
    }

    /// Validated list with repeats removed, first occurrence kept. Each
    /// removed repeat is returned as a warning.
    pub fn resolve(&self) -> Result<(OptimizeDeps, Vec<String>)> {
        self.validate()?;

        let mut seen = HashSet::new();
        let mut include = Vec::with_capacity(self.include.len());
        let mut warnings = Vec::new();

        for specifier in &self.include {
            if seen.insert(specifier.as_str()) {
                include.push(specifier.clone());
            } else {
                tracing::warn!(specifier = %specifier, "duplicate optimizeDeps.include entry ignored");
                warnings.push(format!(
                    "optimizeDeps.include lists '{}' more than once",
                    specifier
                ));
            }
        }

        Ok((OptimizeDeps { include }, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_repeats_with_warning() {
        let deps = OptimizeDeps {
            include: vec!["react".into(), "axios".into(), "react".into()],
        };
        let (resolved, warnings) = deps.resolve().unwrap();
        assert_eq!(resolved.include, vec!["react", "axios"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("react"));
    }

    #[test]
    fn empty_specifier_is_rejected() {
        let deps = OptimizeDeps {
            include: vec!["react".into(), "".into()],
        };
        assert!(deps.resolve().is_err());
    }
}
