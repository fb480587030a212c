//! Module-path aliases (`resolve.alias`).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Symbolic token to filesystem path, in declaration order.
///
/// Tokens are unique: inserting a token twice is an error rather than an
/// overwrite. Targets may be relative in the document; [`AliasTable::resolve_against`]
/// turns them into absolute, lexically normalised paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: IndexMap<String, PathBuf>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, target: impl Into<PathBuf>) -> Result<()> {
        let token = token.into();
        let target = target.into();

        if token.trim().is_empty() {
            return Err(ConfigError::InvalidAlias {
                token,
                message: "alias token cannot be empty".to_string(),
            });
        }
        if target.as_os_str().is_empty() {
            return Err(ConfigError::InvalidAlias {
                token,
                message: "alias target cannot be empty".to_string(),
            });
        }
        if self.entries.contains_key(&token) {
            return Err(ConfigError::DuplicateKey {
                section: "resolve.alias".to_string(),
                key: token,
            });
        }

        self.entries.insert(token, target);
        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<&Path> {
        self.entries.get(token).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check tokens and targets without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        let mut checked = AliasTable::new();
        for (token, target) in self.iter() {
            checked.insert(token, target)?;
        }
        Ok(())
    }

    /// Join relative targets onto `root` and normalise `.`/`..` segments.
    ///
    /// Every resolved target must be absolute, so `root` should be too.
    pub fn resolve_against(&self, root: &Path) -> Result<AliasTable> {
        let mut resolved = AliasTable::new();

        for (token, target) in self.iter() {
            let joined = if target.is_absolute() {
                target.to_path_buf()
            } else {
                root.join(target)
            };
            let cleaned = joined.clean();

            if !cleaned.is_absolute() {
                return Err(ConfigError::InvalidAlias {
                    token: token.to_string(),
                    message: format!(
                        "target '{}' does not resolve to an absolute path",
                        target.display()
                    ),
                });
            }

            if let Some((other, _)) = resolved.iter().find(|(_, path)| *path == cleaned) {
                tracing::warn!(
                    token,
                    other,
                    path = %cleaned.display(),
                    "two aliases point at the same path"
                );
            }

            resolved.insert(token, cleaned)?;
        }

        Ok(resolved)
    }

    /// Rewrite an import specifier through the table.
    ///
    /// A token applies to the specifier itself or to `token/...`; the longest
    /// applicable token wins.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        let (token, target) = self
            .iter()
            .filter(|(token, _)| {
                specifier == *token
                    || specifier
                        .strip_prefix(token)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|(token, _)| token.len())?;

        let rest = specifier[token.len()..].trim_start_matches('/');
        if rest.is_empty() {
            Some(target.to_path_buf())
        } else {
            Some(target.join(rest))
        }
    }
}
