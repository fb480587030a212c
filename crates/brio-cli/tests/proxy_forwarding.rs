//! Forwarding tests against a wiremock upstream.

use std::collections::{BTreeSet, HashMap};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{Request, StatusCode, header};
use brio_cli::proxy::{ProxyEngine, ProxyError, ProxyObserver};
use brio_config::{ProxyEvent, ProxyOptions, ProxyTable};
use indexmap::IndexMap;
use wiremock::matchers::{body_string, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(String, ProxyEvent)>>,
}

impl Recorder {
    fn record(&self, incoming: &Parts, event: ProxyEvent) {
        self.events
            .lock()
            .unwrap()
            .push((incoming.uri.path().to_string(), event));
    }

    fn events(&self) -> Vec<(String, ProxyEvent)> {
        self.events.lock().unwrap().clone()
    }
}

impl ProxyObserver for Recorder {
    fn on_error(&self, _error: &ProxyError, incoming: &Parts) {
        self.record(incoming, ProxyEvent::Error);
    }

    fn on_request_forwarded(&self, _outgoing: &reqwest::Request, incoming: &Parts) {
        self.record(incoming, ProxyEvent::RequestForwarded);
    }

    fn on_response_received(&self, _response: &reqwest::Response, incoming: &Parts) {
        self.record(incoming, ProxyEvent::ResponseReceived);
    }
}

struct Panicker;

impl ProxyObserver for Panicker {
    fn on_error(&self, _error: &ProxyError, _incoming: &Parts) {
        panic!("error hook");
    }

    fn on_request_forwarded(&self, _outgoing: &reqwest::Request, _incoming: &Parts) {
        panic!("forwarded hook");
    }

    fn on_response_received(&self, _response: &reqwest::Response, _incoming: &Parts) {
        panic!("response hook");
    }
}

fn table(prefix: &str, options: ProxyOptions) -> ProxyTable {
    let mut map = IndexMap::new();
    map.insert(prefix.to_string(), options);
    ProxyTable::from_options(&map).expect("valid proxy table")
}

fn api_rule(target: &str, change_origin: bool) -> ProxyTable {
    let mut options = ProxyOptions::new(target);
    options.change_origin = change_origin;
    table("/api", options)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, "localhost:3002")
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A target nothing listens on.
fn dead_target() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn forwards_api_request_with_rewritten_host() {
    let upstream = MockServer::start().await;
    let expected_host = upstream.address().to_string();
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header_is("host", expected_host.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"id":1}]"#))
        .expect(1)
        .mount(&upstream)
        .await;

    let recorder = Arc::new(Recorder::default());
    let engine = ProxyEngine::new(&api_rule(&upstream.uri(), true), recorder.clone()).unwrap();

    let response = engine.forward(get("/api/users")).await.expect("rule matches");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"[{"id":1}]"#);

    assert_eq!(
        recorder.events(),
        vec![
            ("/api/users".to_string(), ProxyEvent::RequestForwarded),
            ("/api/users".to_string(), ProxyEvent::ResponseReceived),
        ]
    );
}

#[tokio::test]
async fn preserves_host_without_change_origin() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/users"))
        .and(header_is("host", "localhost:3002"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;

    let engine = ProxyEngine::with_logging(&api_rule(&upstream.uri(), false)).unwrap();
    let response = engine.forward(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn forwards_path_query_and_body_unchanged() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(query_param("q", "a b"))
        .and(body_string(r#"{"page":2}"#))
        .respond_with(ResponseTemplate::new(201).insert_header("x-upstream", "yes"))
        .expect(1)
        .mount(&upstream)
        .await;

    let engine = ProxyEngine::with_logging(&api_rule(&upstream.uri(), true)).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/search?q=a%20b")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"page":2}"#))
        .unwrap();

    let response = engine.forward(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-upstream"], "yes");
}

#[tokio::test]
async fn relays_redirects_instead_of_following() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/login"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/api/home"))
        .mount(&upstream)
        .await;

    let engine = ProxyEngine::with_logging(&api_rule(&upstream.uri(), true)).unwrap();
    let response = engine.forward(get("/api/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/api/home");
}

#[tokio::test]
async fn unmatched_paths_are_not_forwarded() {
    let upstream = MockServer::start().await;
    let recorder = Arc::new(Recorder::default());
    let engine = ProxyEngine::new(&api_rule(&upstream.uri(), true), recorder.clone()).unwrap();

    assert!(engine.forward(get("/assets/app.js")).await.is_none());
    assert!(recorder.events().is_empty());
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn dot_segments_cannot_escape_the_prefix() {
    let upstream = MockServer::start().await;
    Mock::given(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&upstream)
        .await;

    let recorder = Arc::new(Recorder::default());
    let engine = ProxyEngine::new(&api_rule(&upstream.uri(), true), recorder.clone()).unwrap();

    for uri in ["/api/../admin", "/api/%2e%2e/admin"] {
        let response = engine.forward(get(uri)).await.expect("prefix matches");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(body_text(response).await.contains("outside proxy prefix '/api'"));
    }

    assert_eq!(
        recorder.events(),
        vec![
            ("/api/../admin".to_string(), ProxyEvent::Error),
            ("/api/%2e%2e/admin".to_string(), ProxyEvent::Error),
        ]
    );
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_upstream_answers_bad_gateway() {
    let recorder = Arc::new(Recorder::default());
    let engine = ProxyEngine::new(&api_rule(&dead_target(), true), recorder.clone()).unwrap();

    let response = engine.forward(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.starts_with("Bad Gateway"));

    assert_eq!(
        recorder.events(),
        vec![
            ("/api/users".to_string(), ProxyEvent::RequestForwarded),
            ("/api/users".to_string(), ProxyEvent::Error),
        ]
    );
}

#[tokio::test]
async fn panicking_observer_does_not_abort_forwarding() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&upstream)
        .await;

    let engine = ProxyEngine::new(&api_rule(&upstream.uri(), true), Arc::new(Panicker)).unwrap();
    let response = engine.forward(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    let failing = ProxyEngine::new(&api_rule(&dead_target(), true), Arc::new(Panicker)).unwrap();
    let response = failing.forward(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn only_configured_hooks_fire() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/users"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let mut options = ProxyOptions::new(upstream.uri());
    options.hooks = BTreeSet::from([ProxyEvent::ResponseReceived]);
    let recorder = Arc::new(Recorder::default());
    let engine = ProxyEngine::new(&table("/api", options), recorder.clone()).unwrap();

    engine.forward(get("/api/users")).await.unwrap();
    assert_eq!(
        recorder.events(),
        vec![("/api/users".to_string(), ProxyEvent::ResponseReceived)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hooks_fire_once_in_order_under_concurrency() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;

    let recorder = Arc::new(Recorder::default());
    let engine =
        Arc::new(ProxyEngine::new(&api_rule(&upstream.uri(), true), recorder.clone()).unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let engine = engine.clone();
        tasks.spawn(async move {
            let response = engine.forward(get(&format!("/api/items/{}", i))).await;
            response.map(|r| r.status())
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), Some(StatusCode::OK));
    }

    let mut per_path: HashMap<String, Vec<ProxyEvent>> = HashMap::new();
    for (path, event) in recorder.events() {
        per_path.entry(path).or_default().push(event);
    }
    assert_eq!(per_path.len(), 32);
    for (path, events) in per_path {
        assert_eq!(
            events,
            vec![ProxyEvent::RequestForwarded, ProxyEvent::ResponseReceived],
            "{path}"
        );
    }
}
