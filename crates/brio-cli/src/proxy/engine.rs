use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response, header};
use brio_config::{ProxyEvent, ProxyRule, ProxyTable};
use reqwest::redirect::Policy;

use super::{LoggingObserver, ProxyError, ProxyObserver};
use crate::logger::PROXY_TARGET;

/// Largest request body the proxy buffers before forwarding.
const MAX_REQUEST_BODY: usize = 64 * 1024 * 1024;

const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

struct Route {
    rule: ProxyRule,
    client: reqwest::Client,
}

/// Forwards requests to the first declared rule whose prefix matches.
///
/// Each rule gets its own upstream client so `secure = false` only relaxes
/// certificate checks for that rule's target.
pub struct ProxyEngine {
    routes: Vec<Route>,
    observer: Arc<dyn ProxyObserver>,
}

impl ProxyEngine {
    pub fn new(table: &ProxyTable, observer: Arc<dyn ProxyObserver>) -> Result<Self, ProxyError> {
        let routes = table
            .rules()
            .iter()
            .map(|rule| {
                let client = reqwest::Client::builder()
                    .redirect(Policy::none())
                    .danger_accept_invalid_certs(!rule.secure)
                    .connect_timeout(UPSTREAM_CONNECT_TIMEOUT)
                    .no_proxy()
                    .build()
                    .map_err(|source| ProxyError::Client {
                        prefix: rule.match_prefix.clone(),
                        source,
                    })?;
                Ok(Route {
                    rule: rule.clone(),
                    client,
                })
            })
            .collect::<Result<Vec<_>, ProxyError>>()?;

        Ok(Self { routes, observer })
    }

    /// Engine reporting through [`LoggingObserver`].
    pub fn with_logging(table: &ProxyTable) -> Result<Self, ProxyError> {
        Self::new(table, Arc::new(LoggingObserver))
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn match_rule(&self, path: &str) -> Option<&ProxyRule> {
        self.route(path).map(|route| &route.rule)
    }

    fn route(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.rule.matches(path))
    }

    /// Forward `request` upstream.
    ///
    /// Returns `None` when no rule matches. Otherwise the caller always gets
    /// a terminal response: the relayed upstream response, or an error
    /// response when forwarding failed.
    pub async fn forward(&self, request: Request<Body>) -> Option<Response<Body>> {
        let route = self.route(request.uri().path())?;
        let rule = &route.rule;
        let (parts, body) = request.into_parts();

        match self.send(route, &parts, body).await {
            Ok(response) => Some(response),
            Err(error) => {
                self.notify(rule, ProxyEvent::Error, |observer| {
                    observer.on_error(&error, &parts)
                });
                Some(error_response(&error))
            }
        }
    }

    async fn send(
        &self,
        route: &Route,
        parts: &Parts,
        body: Body,
    ) -> Result<Response<Body>, ProxyError> {
        let rule = &route.rule;
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());

        let url = rule.forward_url(path).map_err(|source| ProxyError::Url {
            path: path.to_string(),
            source,
        })?;
        if !rule.keeps_prefix(&url) {
            return Err(ProxyError::OutsidePrefix {
                path: path.to_string(),
                prefix: rule.match_prefix.clone(),
                url,
            });
        }

        let body = axum::body::to_bytes(body, MAX_REQUEST_BODY)
            .await
            .map_err(|e| ProxyError::Body(e.to_string()))?;

        let outgoing = route
            .client
            .request(parts.method.clone(), url.clone())
            .headers(outgoing_headers(rule, &parts.headers))
            .body(body)
            .build()
            .map_err(|source| ProxyError::from_upstream(url.clone(), source))?;

        self.notify(rule, ProxyEvent::RequestForwarded, |observer| {
            observer.on_request_forwarded(&outgoing, parts)
        });

        let upstream = route
            .client
            .execute(outgoing)
            .await
            .map_err(|source| ProxyError::from_upstream(url, source))?;

        self.notify(rule, ProxyEvent::ResponseReceived, |observer| {
            observer.on_response_received(&upstream, parts)
        });

        Ok(relay(upstream))
    }

    fn notify(&self, rule: &ProxyRule, event: ProxyEvent, hook: impl FnOnce(&dyn ProxyObserver)) {
        if !rule.observes(event) {
            return;
        }
        let observer = self.observer.as_ref();
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| hook(observer))) {
            tracing::error!(
                target: PROXY_TARGET,
                event = ?event,
                "proxy observer panicked: {}",
                panic_message(panic.as_ref())
            );
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Names listed in the `Connection` header are hop-by-hop as well.
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let listed = connection_tokens(headers);
    let mut out = headers.clone();
    for name in HOP_BY_HOP.iter().chain(listed.iter()) {
        out.remove(name);
    }
    out
}

fn outgoing_headers(rule: &ProxyRule, incoming: &HeaderMap) -> HeaderMap {
    let mut headers = end_to_end(incoming);
    // The body is re-sent from a buffer; the client sets its own length.
    headers.remove(header::CONTENT_LENGTH);

    if rule.change_origin {
        headers.remove(header::HOST);
        if let Ok(host) = HeaderValue::from_str(rule.host_header()) {
            headers.insert(header::HOST, host);
        }
    }
    headers
}

fn relay(upstream: reqwest::Response) -> Response<Body> {
    let status = upstream.status();
    let headers = end_to_end(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn error_response(error: &ProxyError) -> Response<Body> {
    let status = error.status();
    let mut response = Response::new(Body::from(Bytes::from(format!(
        "{}: {}",
        status.canonical_reason().unwrap_or("Proxy Error"),
        error
    ))));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
