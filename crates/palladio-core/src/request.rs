//! The request abstraction seen by hooks and handlers.
//!
//! Hooks and handlers receive `&Request`, so several of them may read the
//! body. The first read drains the underlying stream and every later read
//! returns the same outcome: the buffered bytes, or the same read error.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::body::Body;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::error::{PalladioError, PalladioResult};

/// Boxed error type used for streaming bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An inbound request.
///
/// # Example
///
/// ```
/// use palladio_core::Request;
/// use http::{Method, Uri};
///
/// # tokio_test::block_on(async {
/// let request = Request::new(Method::POST, Uri::from_static("/items"))
///     .with_body(r#"{"price": 3}"#);
///
/// let body = request.json().await.unwrap();
/// assert_eq!(body["price"], 3);
/// # });
/// ```
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    /// Undrained body stream, taken on first read
    stream: Mutex<Option<BoxBody<Bytes, BoxError>>>,
    /// Outcome of the first read; a failed stream stays failed
    buffered: OnceCell<Result<Bytes, String>>,
}

impl Request {
    /// Creates a request with an empty body.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            stream: Mutex::new(None),
            buffered: OnceCell::new_with(Some(Ok(Bytes::new()))),
        }
    }

    /// Converts an `http::Request` with a streaming body.
    ///
    /// The body is not read until a hook or handler asks for it.
    pub fn from_http<B>(request: http::Request<B>) -> Self
    where
        B: Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            stream: Mutex::new(Some(body.map_err(Into::into).boxed())),
            buffered: OnceCell::new(),
        }
    }

    /// Replaces the body with already-buffered bytes.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.stream = Mutex::new(None);
        self.buffered = OnceCell::new_with(Some(Ok(body.into())));
        self
    }

    /// Replaces the body with a JSON document.
    #[must_use]
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        let body = value.to_string();
        self.with_header(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .with_body(body)
    }

    /// Replaces the body with a stream that is read lazily.
    #[must_use]
    pub fn with_stream<B>(mut self, body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        self.stream = Mutex::new(Some(body.map_err(Into::into).boxed()));
        self.buffered = OnceCell::new();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The URI path, used for routing.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Reads the whole body, awaiting the stream on first call.
    ///
    /// # Errors
    ///
    /// Returns [`PalladioError::BadRequest`] if the stream fails. Every later
    /// read returns the same error.
    pub async fn body_bytes(&self) -> PalladioResult<Bytes> {
        let outcome = self
            .buffered
            .get_or_init(|| async {
                let stream = self.stream.lock().take();
                let Some(stream) = stream else {
                    return Ok(Bytes::new());
                };
                stream
                    .collect()
                    .await
                    .map(http_body_util::Collected::to_bytes)
                    .map_err(|e| format!("failed to read body: {e}"))
            })
            .await;
        outcome.clone().map_err(PalladioError::bad_request)
    }

    /// Decodes the body as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PalladioError::BadRequest`] if the body is empty or is not
    /// valid JSON.
    pub async fn json(&self) -> PalladioResult<serde_json::Value> {
        self.json_as().await
    }

    /// Decodes the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`PalladioError::BadRequest`] if the body is empty or does not
    /// deserialize into `T`.
    pub async fn json_as<T: DeserializeOwned>(&self) -> PalladioResult<T> {
        let bytes = self.body_bytes().await?;
        if bytes.is_empty() {
            return Err(PalladioError::bad_request("request body is empty"));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| PalladioError::bad_request(format!("invalid JSON body: {e}")))
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new(Method::GET, Uri::from_static("/"))
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            stream: Mutex::new(None),
            buffered: OnceCell::new_with(Some(Ok(body))),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .field("buffered", &self.buffered.initialized())
            .finish_non_exhaustive()
    }
}

/// An empty streaming body, for tests and synthetic requests.
#[must_use]
pub fn empty_body() -> BoxBody<Bytes, BoxError> {
    Empty::<Bytes>::new().map_err(Into::into).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{Full, StreamBody};
    use hyper::body::Frame;
    use std::convert::Infallible;

    #[tokio::test]
    async fn test_json_body() {
        let request = Request::new(Method::POST, Uri::from_static("/"))
            .with_json(&serde_json::json!({ "price": 10 }));

        assert_eq!(
            request.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = request.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "price": 10 }));
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let request = Request::new(Method::POST, Uri::from_static("/"));
        let err = request.json().await.unwrap_err();
        assert!(matches!(err, PalladioError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let request = Request::new(Method::POST, Uri::from_static("/")).with_body("{not json");
        let err = request.json().await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON body"));
    }

    #[tokio::test]
    async fn test_stream_body_read_once_and_cached() {
        let chunks = vec![
            Ok::<_, Infallible>(Frame::data(Bytes::from_static(b"{\"a\":"))),
            Ok(Frame::data(Bytes::from_static(b"1}"))),
        ];
        let body = StreamBody::new(futures_util::stream::iter(chunks));
        let request = Request::default().with_stream(body);

        assert_eq!(request.json().await.unwrap()["a"], 1);
        // Second read hits the buffer; the stream is gone.
        assert_eq!(request.body_bytes().await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_stream_failure_is_kept_for_later_reads() {
        let chunks: Vec<Result<Frame<Bytes>, std::io::Error>> = vec![
            Ok(Frame::data(Bytes::from_static(b"{\"a\":"))),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let body = StreamBody::new(futures_util::stream::iter(chunks));
        let request = Request::default().with_stream(body);

        let first = request.body_bytes().await.unwrap_err();
        assert!(first.to_string().contains("reset"));

        let second = request.body_bytes().await.unwrap_err();
        assert!(matches!(second, PalladioError::BadRequest { .. }));
        assert_eq!(first.to_string(), second.to_string());

        let third = request.json().await.unwrap_err();
        assert!(third.to_string().contains("reset"));
    }

    #[tokio::test]
    async fn test_from_http() {
        let http_request = http::Request::builder()
            .method(Method::PUT)
            .uri("/items/3?x=1")
            .body(Full::new(Bytes::from_static(b"[1,2]")))
            .unwrap();
        let request = Request::from_http(http_request);

        assert_eq!(*request.method(), Method::PUT);
        assert_eq!(request.path(), "/items/3");
        let list: Vec<i32> = request.json_as().await.unwrap();
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn test_debug_does_not_read_body() {
        let request = Request::default().with_stream(empty_body());
        let debug = format!("{request:?}");
        assert!(debug.contains("buffered: false"));
    }
}
