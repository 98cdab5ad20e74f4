//! End-to-end routing through `App::dispatch`.

use std::sync::{Arc, Mutex};

use http::{Method, StatusCode, Uri};
use palladio::prelude::*;
use palladio::router::RouteConfigError;

/// Shared record of which handlers ran.
type Log = Arc<Mutex<Vec<String>>>;

fn request(method: Method, path: &str) -> Request {
    let uri: Uri = path.parse().unwrap();
    Request::new(method, uri)
}

/// Handler that echoes its parameters as JSON.
fn echo() -> Arc<dyn Handler> {
    handler_fn(|_req, res, params| {
        Box::pin(async move {
            let body: serde_json::Map<String, serde_json::Value> = params
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect();
            res.json(&body)
        })
    })
}

fn tagged(log: &Log, tag: &'static str) -> Arc<dyn Handler> {
    let log = Arc::clone(log);
    handler_fn(move |_req, res, _params| {
        let log = Arc::clone(&log);
        Box::pin(async move {
            log.lock().unwrap().push(tag.to_string());
            res.text(tag);
            Ok(())
        })
    })
}

#[tokio::test]
async fn test_int_param_matches() {
    let mut app = App::new();
    app.route("/items/{id:int}").handle(echo()).unwrap();

    let response = app
        .dispatch_uncancellable(request(Method::GET, "/items/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body, serde_json::json!({ "id": "42" }));
}

#[tokio::test]
async fn test_int_param_conversion_failure_is_not_found() {
    let mut app = App::new();
    app.route("/items/{id:int}").handle(echo()).unwrap();

    for path in ["/items/abc", "/items/42/extra", "/items"] {
        let err = app
            .dispatch_uncancellable(request(Method::GET, path))
            .await
            .unwrap_err();
        assert!(
            matches!(err, PalladioError::NotFound { .. }),
            "{path} should not match"
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_params_reach_handler_typed() {
    let mut app = App::new();
    app.route("/files/{owner}/{rest:path}")
        .handle(handler_fn(|_req, res, params| {
            Box::pin(async move {
                res.text(format!(
                    "{}:{}",
                    params.get_str("owner").unwrap_or_default(),
                    params.get_str("rest").unwrap_or_default()
                ));
                Ok(())
            })
        }))
        .unwrap();

    let response = app
        .dispatch_uncancellable(request(Method::GET, "/files/ada/notes/2024/todo.txt"))
        .await
        .unwrap();
    assert_eq!(response.body(), "ada:notes/2024/todo.txt");
}

#[test]
fn test_duplicate_pattern_rejected() {
    let mut app = App::new();
    app.route("/x").handle(echo()).unwrap();

    let err = app.route("/x").handle(echo()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Route(RouteConfigError::DuplicatePattern { .. })
    ));
}

#[test]
fn test_duplicate_name_rejected() {
    let mut app = App::new();
    app.route("/a").name("home").handle(echo()).unwrap();

    let err = app.route("/b").name("home").handle(echo()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Route(RouteConfigError::DuplicateName { .. })
    ));
    assert_eq!(app.router().len(), 1);
}

#[test]
fn test_malformed_pattern_rejected() {
    let mut app = App::new();
    for pattern in ["", "items", "/a/{id}/{id}", "/a/{id:money}", "/{rest:path}/tail"] {
        assert!(
            app.route(pattern).handle(echo()).is_err(),
            "{pattern:?} should be rejected"
        );
    }
    assert!(app.router().is_empty());
}

#[tokio::test]
async fn test_first_registered_wins() {
    let log = Log::default();
    let mut app = App::new();
    app.route("/users/{name}").handle(tagged(&log, "by-name")).unwrap();
    app.route("/users/me").handle(tagged(&log, "me")).unwrap();

    let response = app
        .dispatch_uncancellable(request(Method::GET, "/users/me"))
        .await
        .unwrap();
    assert_eq!(response.body(), "by-name");
    assert_eq!(*log.lock().unwrap(), vec!["by-name".to_string()]);
}

#[tokio::test]
async fn test_method_not_allowed_lists_allowed() {
    let mut app = App::new();
    app.route("/items").methods(["get", "post"]).handle(echo()).unwrap();

    let err = app
        .dispatch_uncancellable(request(Method::DELETE, "/items"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    let envelope = serde_json::to_value(err.to_envelope(None)).unwrap();
    assert_eq!(
        envelope["error"]["details"]["allowed"],
        serde_json::json!(["GET", "POST"])
    );
}

#[tokio::test]
async fn test_view_dispatches_per_method() {
    let log = Log::default();
    let mut app = App::new();
    app.route("/things")
        .view(
            View::new()
                .get(tagged(&log, "list"))
                .post(tagged(&log, "create")),
        )
        .unwrap();

    let listed = app
        .dispatch_uncancellable(request(Method::GET, "/things"))
        .await
        .unwrap();
    let created = app
        .dispatch_uncancellable(request(Method::POST, "/things"))
        .await
        .unwrap();
    assert_eq!(listed.body(), "list");
    assert_eq!(created.body(), "create");

    let err = app
        .dispatch_uncancellable(request(Method::PUT, "/things"))
        .await
        .unwrap_err();
    assert!(matches!(err, PalladioError::MethodNotAllowed { .. }));
}

#[tokio::test]
async fn test_catch_all_view_allows_every_method() {
    let log = Log::default();
    let mut app = App::new();
    let route = app
        .route("/any")
        .view(View::new().handle(tagged(&log, "any")).get(tagged(&log, "get")))
        .unwrap();
    assert!(route.methods().is_all());

    let got = app
        .dispatch_uncancellable(request(Method::GET, "/any"))
        .await
        .unwrap();
    let patched = app
        .dispatch_uncancellable(request(Method::PATCH, "/any"))
        .await
        .unwrap();
    assert_eq!(got.body(), "get");
    assert_eq!(patched.body(), "any");
}

#[test]
fn test_reverse_lookup_is_total() {
    let mut app = App::new();
    app.route("/items/{id:int}/{format=json}")
        .name("item")
        .handle(echo())
        .unwrap();

    let params: Params = [("id", 7_i64)].into_iter().collect();
    assert_eq!(app.url_for("item", &params).unwrap(), "/items/7/json");

    assert!(matches!(
        app.url_for("nope", &params),
        Err(AppError::RouteNotFound(e)) if e.name == "nope"
    ));
    assert!(matches!(
        app.url_for("item", &Params::new()),
        Err(AppError::Pattern(_))
    ));
    assert!(app.get_route_or_404("nope").is_err());
}

#[tokio::test]
async fn test_shared_app_serves_concurrently() {
    let mut app = App::new();
    app.route("/items/{id:int}").handle(echo()).unwrap();
    let app = Arc::new(app);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                let response = app
                    .dispatch_uncancellable(request(Method::GET, &format!("/items/{i}")))
                    .await
                    .unwrap();
                let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
                assert_eq!(body["id"], i.to_string());
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}
