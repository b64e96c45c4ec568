#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Extension, Router,
};
use tower::ServiceExt;

use routemeter_core::{MethodDecl, MetricAnnotation, MetricRegistry, ResourceInfo, ResourceType};
use routemeter_gateway::app_state::AppState;
use routemeter_gateway::instrument::MetricsFeature;
use routemeter_gateway::pipeline::MatchedResource;
use routemeter_gateway::router::{build_router, ResourceRouter};
use routemeter_gateway::{config, services::orders};

const CONFIG: &str = r#"
version: 1
resources:
  - type: com.example.BaseResource
    methods:
      - name: listOrders
        metered: {}
  - type: com.example.OrderService
    extends: com.example.BaseResource
    methods:
      - name: placeOrder
        params: [String]
        timed: {}
        metered: { name: orders.rate, absolute: true }
      - name: getOrder
        params: [u64]
        timed: { name: lookup }
"#;

fn app(cfg: &str) -> (Router, Arc<MetricRegistry>) {
    let registry = Arc::new(MetricRegistry::new());
    let cfg = config::load_from_str(cfg).expect("config");
    let state = AppState::with_registry(cfg, Arc::clone(&registry)).expect("state");
    (build_router(state).expect("router"), registry)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.to_string()))
        .expect("request builder should succeed")
}

fn get_req(uri: &str) -> Request<Body> {
    empty_req("GET", uri)
}

fn empty_req(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builder should succeed")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn requests_update_the_bound_metrics() {
    let (app, registry) = app(CONFIG);

    let response = app.clone().oneshot(post("/orders", "book")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_string(response).await, "1");

    let response = app.clone().oneshot(get_req("/orders/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "book");

    let response = app.clone().oneshot(get_req("/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 1);
    assert_eq!(registry.get_timer("com.example.OrderService.placeOrder").unwrap().count(), 1);
    assert_eq!(registry.get_timer("com.example.OrderService.lookup").unwrap().count(), 1);
    assert_eq!(registry.get_meter("com.example.BaseResource.listOrders").unwrap().count(), 1);
}

#[tokio::test]
async fn error_responses_are_still_timed() {
    let (app, registry) = app(CONFIG);

    let response = app.clone().oneshot(get_req("/orders/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(post("/orders", "  ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(registry.get_timer("com.example.OrderService.lookup").unwrap().count(), 1);
    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 1);
}

#[tokio::test]
async fn unmatched_routes_touch_no_metrics() {
    let (app, registry) = app(CONFIG);

    let response = app.oneshot(get_req("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 0);
    assert_eq!(registry.get_timer("com.example.OrderService.placeOrder").unwrap().count(), 0);
}

#[tokio::test]
async fn method_not_allowed_touches_no_metrics() {
    let (app, registry) = app(CONFIG);

    let response = app.clone().oneshot(empty_req("DELETE", "/orders/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let response = app.oneshot(empty_req("PUT", "/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(registry.get_timer("com.example.OrderService.lookup").unwrap().count(), 0);
    assert_eq!(registry.get_timer("com.example.OrderService.placeOrder").unwrap().count(), 0);
    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 0);
    assert_eq!(registry.get_meter("com.example.BaseResource.listOrders").unwrap().count(), 0);
}

#[tokio::test]
async fn wrong_method_on_a_single_binding_leaves_its_metrics_alone() {
    let ty = Arc::new(
        ResourceType::new("a.R").method(
            MethodDecl::new("read")
                .timed(MetricAnnotation::absolute("r.time"))
                .metered(MetricAnnotation::absolute("r.rate")),
        ),
    );
    let registry = Arc::new(MetricRegistry::new());
    let app: Router = ResourceRouter::new()
        .feature(Arc::new(MetricsFeature::new(Arc::clone(&registry))))
        .route("/r", Method::GET, ResourceInfo::new(ty, "read", orders::NO_PARAMS), || async { "r" })
        .expect("binds")
        .into_router();

    let response = app.clone().oneshot(empty_req("DELETE", "/r")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(registry.get_meter("r.rate").unwrap().count(), 0);
    assert_eq!(registry.get_timer("r.time").unwrap().count(), 0);

    let response = app.oneshot(get_req("/r")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.get_meter("r.rate").unwrap().count(), 1);
    assert_eq!(registry.get_timer("r.time").unwrap().count(), 1);
}

#[tokio::test]
async fn metrics_endpoint_renders_the_registry() {
    let (app, _registry) = app(CONFIG);

    app.clone().oneshot(post("/orders", "book")).await.unwrap();
    let response = app.oneshot(get_req("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_string(response).await;
    assert!(text.contains("# TYPE orders_rate_total counter"));
    assert!(text.contains("orders_rate_total 1\n"));
    assert!(text.contains("com_example_OrderService_placeOrder_duration_micros_count 1\n"));
}

#[tokio::test]
async fn built_in_declaration_applies_without_config() {
    let (app, registry) = app("version: 1\n");

    app.clone().oneshot(post("/orders", "pen")).await.unwrap();
    app.oneshot(get_req("/healthz")).await.unwrap();

    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 1);
    assert_eq!(registry.get_timer("com.example.OrderService.getOrder").unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_all_counted() {
    let (app, registry) = app(CONFIG);

    let mut tasks = Vec::new();
    for i in 0..32 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let response = app.oneshot(post("/orders", &format!("item-{i}"))).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(registry.get_meter("orders.rate").unwrap().count(), 32);
    assert_eq!(registry.get_timer("com.example.OrderService.placeOrder").unwrap().count(), 32);
}

async fn whoami(Extension(matched): Extension<MatchedResource>) -> String {
    matched.0.to_string()
}

#[tokio::test]
async fn handlers_see_the_matched_resource_method() {
    let ty = Arc::new(ResourceType::new("a.Who").method(MethodDecl::new("whoami").timed(MetricAnnotation::default())));
    let feature = Arc::new(MetricsFeature::new(Arc::new(MetricRegistry::new())));

    let app: Router = ResourceRouter::new()
        .feature(feature)
        .route("/who", Method::GET, ResourceInfo::new(ty, "whoami", orders::NO_PARAMS), whoami)
        .expect("binds")
        .into_router();

    let response = app.oneshot(get_req("/who")).await.unwrap();
    assert_eq!(body_string(response).await, "a.Who.whoami()");
}

#[test]
fn binding_an_unknown_method_fails_startup() {
    let ty = Arc::new(ResourceType::new("a.Who"));
    let feature = Arc::new(MetricsFeature::new(Arc::new(MetricRegistry::new())));

    let result = ResourceRouter::<()>::new()
        .feature(feature)
        .route("/who", Method::GET, ResourceInfo::new(ty, "whoami", orders::NO_PARAMS), || async { "x" });

    let Err(err) = result else { panic!("binding must fail") };
    assert_eq!(err.code().as_str(), "BINDING");
}

#[test]
fn relative_paths_are_rejected() {
    let ty = Arc::new(ResourceType::new("a.Who").method(MethodDecl::new("whoami")));
    let result = ResourceRouter::<()>::new().route(
        "who",
        Method::GET,
        ResourceInfo::new(ty, "whoami", orders::NO_PARAMS),
        || async { "x" },
    );
    let Err(err) = result else { panic!("binding must fail") };
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn binding_the_same_method_twice_on_a_path_is_rejected() {
    let ty = Arc::new(ResourceType::new("a.R").method(MethodDecl::new("a")).method(MethodDecl::new("b")));

    let first = ResourceRouter::<()>::new()
        .route("/r", Method::GET, ResourceInfo::new(Arc::clone(&ty), "a", orders::NO_PARAMS), || async { "a" })
        .expect("first binding succeeds");

    let result = first.route("/r", Method::GET, ResourceInfo::new(Arc::clone(&ty), "b", orders::NO_PARAMS), || async {
        "b"
    });
    let Err(err) = result else { panic!("duplicate binding must fail") };
    assert_eq!(err.code().as_str(), "CONFIG");
    assert_eq!(err.to_string(), "bad config: GET /r is already bound");
}

#[test]
fn other_methods_on_a_bound_path_are_allowed() {
    let ty = Arc::new(ResourceType::new("a.R").method(MethodDecl::new("a")).method(MethodDecl::new("b")));

    let result = ResourceRouter::<()>::new()
        .route("/r", Method::GET, ResourceInfo::new(Arc::clone(&ty), "a", orders::NO_PARAMS), || async { "a" })
        .and_then(|r| r.route("/r", Method::POST, ResourceInfo::new(ty, "b", orders::NO_PARAMS), || async { "b" }));
    assert!(result.is_ok());
}
