//! Validation hooks wired through `App`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::{Method, StatusCode, Uri};
use palladio::prelude::*;
use palladio::validation::{CompiledValidator, SchemaError, ValidationError};
use serde_json::{json, Value};

fn post(path: &'static str, body: &'static str) -> Request {
    Request::new(Method::POST, Uri::from_static(path)).with_body(body)
}

fn counting(calls: &Arc<AtomicUsize>) -> Arc<dyn Handler> {
    let calls = Arc::clone(calls);
    handler_fn(move |_req, res, _params| {
        calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            res.set_status(StatusCode::CREATED);
            Ok(())
        })
    })
}

/// Accepts any document that has every listed top-level key.
struct KeysPresent;

impl ValidationBackend for KeysPresent {
    fn compile(&self, schema: &Value) -> Result<CompiledValidator, SchemaError> {
        let keys: Vec<String> = schema
            .as_array()
            .ok_or_else(|| SchemaError::new("keys", "schema must be an array of keys"))?
            .iter()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect();

        Ok(CompiledValidator::new(move |doc: &Value| {
            let missing: Vec<String> = keys
                .iter()
                .filter(|k| doc.get(k.as_str()).is_none())
                .map(|k| format!("missing key {k}"))
                .collect();
            if missing.is_empty() {
                Ok(())
            } else {
                Err(ValidationError::new(missing))
            }
        }))
    }
}

#[tokio::test]
async fn test_missing_required_field_blocks_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.route("/items")
        .methods(["POST"])
        .validate(&json!({ "required": ["price"] }), None)
        .unwrap()
        .handle(counting(&calls))
        .unwrap();

    let err = app
        .dispatch_uncancellable(post("/items", "{}"))
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    let messages = err.validation_messages().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("price"));
}

#[tokio::test]
async fn test_conforming_body_reaches_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.route("/items")
        .validate(&json!({ "required": ["price"] }), None)
        .unwrap()
        .handle(counting(&calls))
        .unwrap();

    let response = app
        .dispatch_uncancellable(post("/items", r#"{"price": 3}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_every_violation_reported() {
    let mut app = App::new();
    app.route("/items")
        .validate(&json!({ "required": ["price", "name"] }), None)
        .unwrap()
        .handle(counting(&Arc::default()))
        .unwrap();

    let err = app
        .dispatch_uncancellable(post("/items", "{}"))
        .await
        .unwrap_err();
    assert_eq!(err.validation_messages().map(<[String]>::len), Some(2));

    let envelope = serde_json::to_value(err.to_envelope(Some("req-1"))).unwrap();
    assert_eq!(envelope["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(envelope["error"]["details"]["errors"].as_array().map(Vec::len), Some(2));
    assert_eq!(envelope["request_id"], "req-1");
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.route("/items")
        .validate(&json!({ "type": "object" }), None)
        .unwrap()
        .handle(counting(&calls))
        .unwrap();

    let err = app
        .dispatch_uncancellable(post("/items", "{not json"))
        .await
        .unwrap_err();
    assert!(matches!(err, PalladioError::BadRequest { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_backend_fails_at_registration() {
    let mut app = App::new();
    let err = app
        .route("/items")
        .validate(&json!({}), Some("fastjsonschema"))
        .err()
        .unwrap();
    assert!(matches!(err, AppError::UnknownBackend(e) if e.name == "fastjsonschema"));
    assert!(app.router().is_empty());
}

#[test]
fn test_unknown_default_backend_fails_at_registration() {
    let mut app = App::new();
    app.set_default_backend("missing");
    let err = app.validation_hook(&json!({}), None).err().unwrap();
    assert!(matches!(err, AppError::UnknownBackend(e) if e.name == "missing"));
}

#[test]
fn test_malformed_schema_fails_at_registration() {
    let mut app = App::new();
    let result = app.route("/items").validate(&json!({ "required": "price" }), None);
    assert!(matches!(result, Err(AppError::Schema(_))));
}

#[tokio::test]
async fn test_registering_default_changes_resolution() {
    let mut app = App::new();
    app.register_backend("keys", KeysPresent, true);
    assert_eq!(app.default_backend_name(), Some("keys"));

    app.route("/items")
        .validate(&json!(["price", "name"]), None)
        .unwrap()
        .handle(counting(&Arc::default()))
        .unwrap();

    let err = app
        .dispatch_uncancellable(post("/items", r#"{"price": 1}"#))
        .await
        .unwrap_err();
    assert_eq!(
        err.validation_messages().unwrap(),
        &["missing key name".to_string()]
    );

    // A named backend still resolves independently of the default.
    assert!(app
        .validation_hook(&json!({ "required": ["x"] }), Some("jsonschema"))
        .is_ok());
}

#[test]
fn test_registering_without_default_keeps_default() {
    let mut app = App::new();
    app.register_backend("keys", KeysPresent, false);
    assert_eq!(app.default_backend_name(), Some("jsonschema"));

    // The custom backend rejects a JSON Schema object at compile time.
    let result = app.validation_hook(&json!({ "required": ["x"] }), Some("keys"));
    assert!(matches!(result, Err(AppError::Schema(e)) if e.backend == "keys"));
}

#[test]
fn test_identical_schemas_share_compiled_validator() {
    let mut app = App::new();
    let schema = json!({ "required": ["price"] });
    app.route("/a").validate(&schema, None).unwrap().handle(counting(&Arc::default())).unwrap();
    app.route("/b").validate(&schema, None).unwrap().handle(counting(&Arc::default())).unwrap();
    assert_eq!(app.backends().cached_len(), 1);
}

#[test]
fn test_config_disables_cache_and_sets_default() {
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [validation]
            default_backend = "jsonschema_draft7"
            cache_compiled = false
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();

    let mut app = App::from_config(&config);
    let route = app
        .route("/items")
        .validate(&json!({ "properties": { "kind": { "const": "item" } } }), None)
        .unwrap()
        .handle(counting(&Arc::default()))
        .unwrap();
    assert_eq!(route.target().hooks().before().len(), 1);
    assert_eq!(app.backends().cached_len(), 0);
}

#[tokio::test]
async fn test_validate_existing_named_route() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.route("/items").name("items").handle(counting(&calls)).unwrap();
    app.validate("items", &json!({ "required": ["price"] }), None)
        .unwrap();

    let err = app
        .dispatch_uncancellable(post("/items", "{}"))
        .await
        .unwrap_err();
    assert!(err.validation_messages().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_view_validates_only_the_post_body() {
    let reads = Arc::new(AtomicUsize::new(0));
    let creates = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.route("/items")
        .validate_for(Method::POST, &json!({ "required": ["price"] }), None)
        .unwrap()
        .view(View::new().get(counting(&reads)).post(counting(&creates)))
        .unwrap();

    // No body on GET, and no schema runs for it.
    let get = Request::new(Method::GET, Uri::from_static("/items"));
    let res = app.dispatch_uncancellable(get).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(reads.load(Ordering::SeqCst), 1);

    let err = app
        .dispatch_uncancellable(post("/items", "{}"))
        .await
        .unwrap_err();
    assert!(err.validation_messages().unwrap()[0].contains("price"));
    assert_eq!(creates.load(Ordering::SeqCst), 0);

    app.dispatch_uncancellable(post("/items", r#"{"price": 4}"#))
        .await
        .unwrap();
    assert_eq!(creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_validate_method_on_named_view_route() {
    let mut app = App::new();
    app.route("/items")
        .name("items")
        .view(View::new().get(counting(&Arc::default())).put(counting(&Arc::default())))
        .unwrap();
    app.validate_method("items", Method::PUT, &json!({ "required": ["name"] }), None)
        .unwrap();

    let get = Request::new(Method::GET, Uri::from_static("/items"));
    assert!(app.dispatch_uncancellable(get).await.is_ok());

    let put = Request::new(Method::PUT, Uri::from_static("/items")).with_body("{}");
    let err = app.dispatch_uncancellable(put).await.unwrap_err();
    assert!(matches!(err, PalladioError::Validation { .. }));
}
