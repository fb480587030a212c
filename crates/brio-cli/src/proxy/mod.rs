//! Development proxy.
//!
//! [`ProxyEngine`] forwards requests matching a `server.proxy` rule to the
//! rule's target and reports each request's lifecycle to a [`ProxyObserver`].
//! Observers only watch: they cannot change the outgoing request or the
//! relayed response, and a panicking observer never aborts forwarding.

mod engine;
mod observer;

pub use engine::ProxyEngine;
pub use observer::{LoggingObserver, ProxyObserver};

use axum::http::StatusCode;
use thiserror::Error;
use url::Url;

/// Failures on the proxy data path.
///
/// Apart from [`ProxyError::Client`], which happens while the engine is
/// built, these are answered with an error response and never stop the
/// server.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to build upstream client for '{prefix}': {source}")]
    Client {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot build upstream URL for '{path}': {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("'{path}' resolves to {url}, outside proxy prefix '{prefix}'")]
    OutsidePrefix { path: String, prefix: String, url: Url },

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("upstream {url} timed out: {source}")]
    Timeout {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream {url} failed: {source}")]
    Upstream {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl ProxyError {
    /// Status sent to the original caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Body(_) | Self::OutsidePrefix { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    pub(crate) fn from_upstream(url: Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url, source }
        } else {
            Self::Upstream { url, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_errors_are_client_errors() {
        assert_eq!(
            ProxyError::Body("stream closed".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn escaping_the_prefix_is_a_client_error() {
        let err = ProxyError::OutsidePrefix {
            path: "/api/../admin".to_string(),
            prefix: "/api".to_string(),
            url: Url::parse("http://localhost:8001/admin").unwrap(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("/api/../admin"));
    }

    #[test]
    fn url_errors_are_bad_gateway() {
        let err = ProxyError::Url {
            path: "/api/x".to_string(),
            source: url::ParseError::EmptyHost,
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("/api/x"));
    }
}
