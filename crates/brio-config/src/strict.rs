//! Duplicate-key detection for JSON documents.
//!
//! `serde_json::Value` keeps the last occurrence of a repeated key, which
//! would let a second `"@"` alias silently replace the first. Documents are
//! walked once with this checker before they are converted into a `Value`.
//! TOML needs no equivalent: its parser already rejects duplicate keys.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::{ConfigError, Result};

/// Reject duplicate object keys below `scope` (a dotted path such as
/// `"brio"`; empty checks the whole document).
pub fn reject_duplicate_keys(json: &str, scope: &str) -> Result<()> {
    let found = RefCell::new(None);
    let checker = Checker {
        path: String::new(),
        scope,
        found: &found,
    };

    let mut deserializer = serde_json::Deserializer::from_str(json);
    let outcome = checker.deserialize(&mut deserializer);

    if let Some((section, key)) = found.into_inner() {
        return Err(ConfigError::DuplicateKey { section, key });
    }

    outcome.map_err(|e| ConfigError::InvalidValue {
        field: "json".to_string(),
        hint: Some(format!("Invalid JSON: {}", e)),
    })
}

struct Checker<'a> {
    path: String,
    scope: &'a str,
    found: &'a RefCell<Option<(String, String)>>,
}

impl Checker<'_> {
    fn child(&self, segment: &str) -> Self {
        let path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.path, segment)
        };
        Checker {
            path,
            scope: self.scope,
            found: self.found,
        }
    }

    fn in_scope(&self) -> bool {
        self.scope.is_empty()
            || self.path == self.scope
            || self.path.starts_with(&format!("{}.", self.scope))
    }

    /// In scope, or an ancestor of it: repeating such a key would replace
    /// the whole scoped section.
    fn reaches_scope(&self) -> bool {
        self.in_scope() || self.scope.starts_with(&format!("{}.", self.path))
    }
}

impl<'de> DeserializeSeed<'de> for Checker<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Checker<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_i64<E>(self, _: i64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_u64<E>(self, _: u64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_f64<E>(self, _: f64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_str<E>(self, _: &str) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut index = 0usize;
        while seq
            .next_element_seed(self.child(&index.to_string()))?
            .is_some()
        {
            index += 1;
        }
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            let child = self.child(&key);
            if !seen.insert(key.clone()) && child.reaches_scope() {
                let section = if self.path.is_empty() {
                    "document".to_string()
                } else {
                    self.path.clone()
                };
                *self.found.borrow_mut() = Some((section, key.clone()));
                return Err(de::Error::custom(format_args!("duplicate key '{}'", key)));
            }
            map.next_value_seed(child)?;
        }
        Ok(())
    }
}
