//! Mapping HTTP client on top of any tower service.

use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{Request, response::Parts};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use serde::de::DeserializeOwned;
use shaper_core::{
    ArraySerializer, BoxError, DecodableSerializer, Exchange, ImmutableArraySerializer,
    ImmutableMappable, ImmutableObjectSerializer, Mappable, ObjectSerializer, ResponseSerializer,
    Result, SerializerConfig,
};
use tokio::{runtime::Handle, task::JoinHandle};
use tower::ServiceExt;
use tower_service::Service;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::DataResponse;

/// Plain HTTP/1 client from `hyper-util`, as built by [`MappingClient::http`].
pub type HyperService = Client<HttpConnector, Full<Bytes>>;

/// HTTP client that runs a [`ResponseSerializer`] on every response.
///
/// Wraps any `tower` service taking an `http::Request<Full<Bytes>>`, so the
/// caller keeps full control over the transport stack (connection pool,
/// TLS, middleware). Transport failures are forwarded unchanged through
/// [`Error::Transport`](shaper_core::Error::Transport).
///
/// # Example
///
/// ```ignore
/// use shaper::{MappingClient, SerializerConfig};
///
/// let client = MappingClient::http();
/// let request = http::Request::get("http://localhost:8080/users/1")
///     .body(Default::default())?;
///
/// let user: User = client
///     .response_object(request, SerializerConfig::with_key_path("user"))
///     .await
///     .into_result()?;
/// ```
#[derive(Debug, Clone)]
pub struct MappingClient<S> {
    service: S,
    timeout: Option<Duration>,
}

impl MappingClient<HyperService> {
    /// Create a client over a plain HTTP `hyper-util` client with default
    /// settings.
    #[must_use]
    pub fn http() -> Self {
        Self::new(Client::builder(TokioExecutor::new()).build_http())
    }
}

impl<S> MappingClient<S> {
    /// Wrap a service.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self {
            service,
            timeout: None,
        }
    }

    /// Set a timeout covering the request and the body collection.
    ///
    /// An elapsed timeout is reported as a transport error.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Get a reference to the inner service.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.service
    }

    /// Get a mutable reference to the inner service.
    #[must_use]
    pub const fn inner_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Consume the wrapper and return the inner service.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S, B> MappingClient<S>
where
    S: Service<Request<Full<Bytes>>, Response = http::Response<B>> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    // ========================================================================
    // Exchange
    // ========================================================================

    async fn send(&self, request: Request<Full<Bytes>>) -> std::result::Result<(Parts, Bytes), BoxError> {
        let collect = async {
            let response = self.service.clone().oneshot(request).await.map_err(Into::<BoxError>::into)?;
            let (parts, body) = response.into_parts();
            let data = body.collect().await.map_err(Into::<BoxError>::into)?.to_bytes();
            Ok::<_, BoxError>((parts, data))
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, collect).await?,
            None => collect.await,
        }
    }

    async fn exchange<O>(
        &self,
        request: Request<Full<Bytes>>,
        serialize: impl FnOnce(Exchange<'_>) -> Result<O>,
    ) -> DataResponse<O> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let span = info_span!("http_exchange", %method, %uri);

        async move {
            let start = Instant::now();
            let outcome = self.send(request).await;

            // Saturating conversion to u64
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let response = match outcome {
                Ok((parts, data)) => {
                    let status = parts.status.as_u16();
                    if parts.status.is_success() {
                        info!(status, elapsed_ms, "exchange completed");
                    } else {
                        warn!(status, elapsed_ms, "exchange completed with HTTP error");
                    }

                    let result = serialize(Exchange::completed(&method, parts.status, &data));
                    DataResponse::new(method, uri, Some(parts), Some(data), result)
                }
                Err(error) => {
                    warn!(%error, elapsed_ms, "exchange failed");
                    let result = serialize(Exchange::failed(error).with_method(&method));
                    DataResponse::new(method, uri, None, None, result)
                }
            };

            debug!(success = response.is_success(), "response serialized");
            response
        }
        .instrument(span)
        .await
    }

    /// Execute the request and run `serializer` on the response.
    pub async fn response<R: ResponseSerializer>(
        &self,
        request: Request<Full<Bytes>>,
        serializer: &R,
    ) -> DataResponse<R::Output> {
        self.exchange(request, |exchange| serializer.serialize(exchange))
            .await
    }

    // ========================================================================
    // Serializer Shortcuts
    // ========================================================================

    /// Execute the request and map the response onto a [`Mappable`] object.
    pub async fn response_object<T: Mappable>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
    ) -> DataResponse<T> {
        self.response(request, &ObjectSerializer::new(config)).await
    }

    /// Execute the request and map the response onto an existing value.
    pub async fn response_object_into<'t, T: Mappable>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
        target: &'t mut T,
    ) -> DataResponse<&'t mut T> {
        let serializer = ObjectSerializer::new(config);
        self.exchange(request, |exchange| serializer.serialize_into(exchange, target))
            .await
    }

    /// Execute the request and map the response onto an [`ImmutableMappable`]
    /// object.
    pub async fn response_immutable_object<T: ImmutableMappable>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
    ) -> DataResponse<T> {
        self.response(request, &ImmutableObjectSerializer::new(config))
            .await
    }

    /// Execute the request and map the response onto a sequence of
    /// [`Mappable`] objects.
    pub async fn response_array<T: Mappable>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
    ) -> DataResponse<Vec<T>> {
        self.response(request, &ArraySerializer::new(config)).await
    }

    /// Execute the request and map the response onto a sequence of
    /// [`ImmutableMappable`] objects.
    pub async fn response_immutable_array<T: ImmutableMappable>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
    ) -> DataResponse<Vec<T>> {
        self.response(request, &ImmutableArraySerializer::new(config))
            .await
    }

    /// Execute the request and decode the response with `serde`.
    pub async fn response_decodable<T: DeserializeOwned>(
        &self,
        request: Request<Full<Bytes>>,
        config: SerializerConfig,
    ) -> DataResponse<T> {
        self.response(request, &DecodableSerializer::new(config))
            .await
    }

    // ========================================================================
    // Delivery
    // ========================================================================

    /// Run the exchange on the given runtime and hand the response to
    /// `completion` there.
    pub fn response_on<R, F>(
        &self,
        handle: &Handle,
        request: Request<Full<Bytes>>,
        serializer: R,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: ResponseSerializer + 'static,
        R::Output: Send + 'static,
        F: FnOnce(DataResponse<R::Output>) + Send + 'static,
    {
        let client = self.clone();
        handle.spawn(async move {
            let response = client.response(request, &serializer).await;
            completion(response);
        })
    }

    /// Same as [`MappingClient::response_on`], on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn response_on_current<R, F>(
        &self,
        request: Request<Full<Bytes>>,
        serializer: R,
        completion: F,
    ) -> JoinHandle<()>
    where
        R: ResponseSerializer + 'static,
        R::Output: Send + 'static,
        F: FnOnce(DataResponse<R::Output>) + Send + 'static,
    {
        self.response_on(&Handle::current(), request, serializer, completion)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::future::{Ready, ready};
    use std::task::{Context, Poll};

    use assert2::{check, let_assert};
    use shaper_core::{Empty, Error, Map, MapError, StatusCode};
    use tower::service_fn;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping {
        ok: bool,
    }

    impl ImmutableMappable for Ping {
        fn from_map(map: &Map<'_>) -> std::result::Result<Self, MapError> {
            Ok(Self {
                ok: map.value("ok")?,
            })
        }
    }

    /// Answers every request with the same status and body.
    #[derive(Debug, Clone)]
    struct Reply {
        status: StatusCode,
        body: &'static str,
    }

    impl Service<Request<Full<Bytes>>> for Reply {
        type Response = http::Response<Full<Bytes>>;
        type Error = Infallible;
        type Future = Ready<std::result::Result<Self::Response, Infallible>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _request: Request<Full<Bytes>>) -> Self::Future {
            let mut response = http::Response::new(Full::new(Bytes::from_static(self.body.as_bytes())));
            *response.status_mut() = self.status;
            ready(Ok(response))
        }
    }

    fn reply(status: StatusCode, body: &'static str) -> MappingClient<Reply> {
        MappingClient::new(Reply { status, body })
    }

    fn request(method: http::Method) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri("http://localhost/ping")
            .body(Full::default())
            .expect("request")
    }

    #[tokio::test]
    async fn response_with_in_memory_service() {
        let client = reply(StatusCode::OK, r#"{"ok":true}"#);

        let response = client
            .response_immutable_object::<Ping>(request(http::Method::GET), SerializerConfig::default())
            .await;

        check!(response.status() == Some(StatusCode::OK));
        check!(response.uri().path() == "/ping");
        let_assert!(Ok(ping) = response.into_result());
        check!(ping == Ping { ok: true });
    }

    #[tokio::test]
    async fn no_content_with_empty_type() {
        let client = reply(StatusCode::NO_CONTENT, "");

        let response = client
            .response_object::<Empty>(request(http::Method::DELETE), SerializerConfig::default())
            .await;

        check!(response.value() == Some(&Empty));
    }

    #[tokio::test]
    async fn transport_error_is_forwarded() {
        let service = service_fn(|_request: Request<Full<Bytes>>| async {
            Err::<http::Response<Full<Bytes>>, _>(std::io::Error::other("connection reset"))
        });
        let client = MappingClient::new(service);

        let response = client
            .response_object::<Empty>(request(http::Method::GET), SerializerConfig::default())
            .await;

        check!(response.status().is_none());
        let_assert!(Err(Error::Transport(error)) = response.into_result());
        let_assert!(Some(io) = error.downcast_ref::<std::io::Error>());
        check!(io.to_string() == "connection reset");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_a_transport_error() {
        let service = service_fn(|_request: Request<Full<Bytes>>| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, Infallible>(http::Response::new(Full::<Bytes>::default()))
        });
        let client = MappingClient::new(service).with_timeout(Duration::from_secs(1));

        let response = client
            .response_object::<Empty>(request(http::Method::GET), SerializerConfig::default())
            .await;

        let_assert!(Err(Error::Transport(error)) = response.into_result());
        check!(error.is::<tokio::time::error::Elapsed>());
    }
}
