use axum::http::request::Parts;

use super::ProxyError;
use crate::logger::PROXY_TARGET;

/// Watches the lifecycle of proxied requests.
///
/// Every method receives the incoming request head. Calls for one request
/// happen on the task serving it, one at a time; calls for different requests
/// may interleave. Implementations must not block.
pub trait ProxyObserver: Send + Sync {
    /// The upstream connection failed or did not complete.
    fn on_error(&self, error: &ProxyError, incoming: &Parts) {
        let _ = (error, incoming);
    }

    /// The request is about to be sent upstream.
    fn on_request_forwarded(&self, outgoing: &reqwest::Request, incoming: &Parts) {
        let _ = (outgoing, incoming);
    }

    /// The upstream response head arrived and is about to be relayed.
    fn on_response_received(&self, response: &reqwest::Response, incoming: &Parts) {
        let _ = (response, incoming);
    }
}

/// Emits one `tracing` record per lifecycle event under the `brio::proxy`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl ProxyObserver for LoggingObserver {
    fn on_error(&self, error: &ProxyError, incoming: &Parts) {
        tracing::error!(
            target: PROXY_TARGET,
            method = %incoming.method,
            path = %request_path(incoming),
            "proxy error: {}",
            error
        );
    }

    fn on_request_forwarded(&self, outgoing: &reqwest::Request, incoming: &Parts) {
        tracing::info!(
            target: PROXY_TARGET,
            upstream = %outgoing.url(),
            "Sending request to the target: {} {}",
            incoming.method,
            request_path(incoming)
        );
    }

    fn on_response_received(&self, response: &reqwest::Response, incoming: &Parts) {
        tracing::info!(
            target: PROXY_TARGET,
            "Received response from the target: {} {}",
            response.status().as_u16(),
            request_path(incoming)
        );
    }
}

fn request_path(incoming: &Parts) -> &str {
    incoming
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| incoming.uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(out.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        out.text()
    }

    fn incoming(method: Method, uri: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn forwarded_record_names_method_and_path() {
        let parts = incoming(Method::GET, "/api/users");
        let outgoing = reqwest::Request::new(
            Method::GET,
            "http://localhost:8001/api/users".parse().unwrap(),
        );

        let logs = capture(|| LoggingObserver.on_request_forwarded(&outgoing, &parts));
        assert!(logs.contains("GET /api/users"), "{logs}");
        assert!(logs.contains("brio::proxy"), "{logs}");
    }

    #[test]
    fn response_record_names_status_and_path() {
        let parts = incoming(Method::POST, "/api/login?next=%2F");
        let response = reqwest::Response::from(
            axum::http::Response::builder()
                .status(201)
                .body("")
                .unwrap(),
        );

        let logs = capture(|| LoggingObserver.on_response_received(&response, &parts));
        assert!(logs.contains("201 /api/login?next=%2F"), "{logs}");
    }

    #[test]
    fn error_record_carries_detail() {
        let parts = incoming(Method::GET, "/api/users");
        let error = ProxyError::Body("connection reset".to_string());

        let logs = capture(|| LoggingObserver.on_error(&error, &parts));
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("connection reset"), "{logs}");
    }
}
