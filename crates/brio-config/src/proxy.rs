//! Development proxy rules.
//!
//! `server.proxy` maps a URL path prefix to a backend origin. The raw document
//! form is [`ProxyOptions`]; [`ProxyRule`] is the validated, immutable form the
//! dev server forwards with.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Result};

/// Proxy lifecycle events a rule can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProxyEvent {
    /// The upstream connection failed or did not complete.
    Error,
    /// The request is about to be sent upstream.
    RequestForwarded,
    /// The upstream response head arrived.
    ResponseReceived,
}

impl ProxyEvent {
    pub fn all() -> BTreeSet<ProxyEvent> {
        [Self::Error, Self::RequestForwarded, Self::ResponseReceived]
            .into_iter()
            .collect()
    }
}

/// One `server.proxy.<prefix>` entry as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyOptions {
    pub target: String,

    #[serde(default)]
    pub change_origin: bool,

    #[serde(default = "default_secure")]
    pub secure: bool,

    #[serde(default = "ProxyEvent::all")]
    pub hooks: BTreeSet<ProxyEvent>,
}

fn default_secure() -> bool {
    true
}

impl ProxyOptions {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            change_origin: false,
            secure: true,
            hooks: ProxyEvent::all(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRule {
    pub match_prefix: String,
    pub target: Url,
    pub change_origin: bool,
    pub secure: bool,
    pub hooks: BTreeSet<ProxyEvent>,
    #[serde(skip)]
    host: String,
}

impl ProxyRule {
    pub fn new(prefix: impl Into<String>, options: &ProxyOptions) -> Result<Self> {
        let prefix = prefix.into();
        let invalid = |message: String| ConfigError::InvalidProxyRule {
            prefix: prefix.clone(),
            message,
        };

        if !prefix.starts_with('/') {
            return Err(invalid("path prefix must start with '/'".to_string()));
        }

        let target = Url::parse(options.target.trim()).map_err(|e| {
            invalid(format!(
                "target '{}' is not a valid absolute URL: {}",
                options.target, e
            ))
        })?;

        if !matches!(target.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "target scheme '{}' is not supported (use http or https)",
                target.scheme()
            )));
        }

        let host = match (target.host_str(), target.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(invalid("target has no host".to_string())),
        };

        if target.query().is_some() || target.fragment().is_some() {
            return Err(invalid(
                "target must not carry a query string or fragment".to_string(),
            ));
        }

        Ok(Self {
            match_prefix: prefix,
            target,
            change_origin: options.change_origin,
            secure: options.secure,
            hooks: options.hooks.clone(),
            host,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.match_prefix)
    }

    pub fn observes(&self, event: ProxyEvent) -> bool {
        self.hooks.contains(&event)
    }

    /// Target `host[:port]`, the value `Host` is rewritten to when
    /// `change_origin` is set. Default ports are omitted.
    pub fn host_header(&self) -> &str {
        &self.host
    }

    /// Upstream URL for an incoming `path?query`. The path is appended to the
    /// target's own base path unchanged.
    pub fn forward_url(&self, path_and_query: &str) -> std::result::Result<Url, url::ParseError> {
        let base = self.target.as_str().trim_end_matches('/');
        let tail = if path_and_query.starts_with('/') {
            path_and_query.to_string()
        } else {
            format!("/{}", path_and_query)
        };
        Url::parse(&format!("{}{}", base, tail))
    }

    /// Whether `url` still lies under the target base path plus this rule's
    /// prefix. URL parsing resolves `..` and `%2e%2e` segments, so a matched
    /// request path can land outside the prefix.
    pub fn keeps_prefix(&self, url: &Url) -> bool {
        let base = self.target.path().trim_end_matches('/');
        url.path()
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with(&self.match_prefix))
    }
}

/// Rules in declaration order. The first declared matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &IndexMap<String, ProxyOptions>) -> Result<Self> {
        let mut table = Self::new();
        for (prefix, rule) in options {
            table.push(ProxyRule::new(prefix.clone(), rule)?)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, rule: ProxyRule) -> Result<()> {
        if self.rules.iter().any(|r| r.match_prefix == rule.match_prefix) {
            return Err(ConfigError::DuplicateKey {
                section: "server.proxy".to_string(),
                key: rule.match_prefix,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
