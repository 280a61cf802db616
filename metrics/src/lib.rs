//! Prometheus metrics shared by the check-ins binaries.

mod error;
pub mod settings;

pub use error::{Error, Result};
pub use settings::Settings;

use http::{Method, Request, Response, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::Service;
use tower_layer::Layer;

/// Install the Prometheus exporter listening on the configured endpoint.
/// Must be called from within a tokio runtime.
pub fn start_metrics(settings: &Settings) -> Result {
    PrometheusBuilder::new()
        .with_http_listener(settings.endpoint)
        .install()?;
    tracing::info!(endpoint = %settings.endpoint, "metrics scrape endpoint listening");
    Ok(())
}

/// Evaluate `$e` and record how long it took, in seconds, in the
/// `$metric_name` histogram. Works for `.await` expressions too.
#[macro_export]
macro_rules! record_duration {
    ( $metric_name:expr, $e:expr ) => {{
        let started = std::time::Instant::now();
        let value = $e;
        ::metrics::histogram!($metric_name).record(started.elapsed().as_secs_f64());
        value
    }};
}

/// Build a [`RequestsLayer`] whose metrics are named `<prefix>_count` and
/// `<prefix>_time`.
#[macro_export]
macro_rules! request_layer {
    ( $prefix:literal ) => {{
        $crate::RequestsLayer::new(concat!($prefix, "_count"), concat!($prefix, "_time"))
    }};
}

/// HTTP request metrics:
///
/// * `in_flight`: gauge of requests currently being handled. A request that
///   is dropped before completing is still counted out.
/// * `duration`: histogram of handling time in seconds, labelled with the
///   request `method` and the response `status` class (`2xx`, `4xx`, ..).
#[derive(Clone, Copy, Debug)]
pub struct RequestsLayer {
    in_flight: &'static str,
    duration: &'static str,
}

impl RequestsLayer {
    pub fn new(in_flight: &'static str, duration: &'static str) -> Self {
        Self {
            in_flight,
            duration,
        }
    }
}

impl<S> Layer<S> for RequestsLayer {
    type Service = Requests<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Requests {
            metrics: *self,
            inner,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Requests<S> {
    metrics: RequestsLayer,
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Requests<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let layer = self.metrics;
        let method = request.method().clone();
        let in_flight = InFlight::start(layer.in_flight);

        // the clone may not be ready, call the instance poll_ready was run on
        let ready = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, ready);

        Box::pin(async move {
            let result = inner.call(request).await;
            let status = result
                .as_ref()
                .map_or("error", |response| status_class(response.status()));
            let elapsed = in_flight.finish();
            tracing::debug!(%method, status, ?elapsed, "request metrics recorded");
            metrics::histogram!(
                layer.duration,
                "method" => method_label(&method),
                "status" => status
            )
            .record(elapsed.as_secs_f64());
            result
        })
    }
}

/// In-flight gauge guard, decremented on drop.
struct InFlight {
    gauge: &'static str,
    started: Instant,
}

impl InFlight {
    fn start(gauge: &'static str) -> Self {
        metrics::gauge!(gauge).increment(1.0);
        Self {
            gauge,
            started: Instant::now(),
        }
    }

    fn finish(self) -> std::time::Duration {
        self.started.elapsed()
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics::gauge!(self.gauge).decrement(1.0);
    }
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}
