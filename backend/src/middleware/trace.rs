//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! A well-formed UUID in the inbound `trace-id` header is reused so callers
//! can correlate across services; otherwise a fresh identifier is generated.
//! The identifier is held in task-local storage for the lifetime of the
//! request (see [`TraceId`]) and echoed back on every response.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware adding a `trace-id` header to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use saveablood::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "http_request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let fut = TraceId::scope(trace_id, self.service.call(req));
        Box::pin(
            async move {
                let mut res = fut.await?;
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(%error, %trace_id, "failed to encode trace identifier header");
                    }
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo_trace_id() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn call(req: test::TestRequest) -> (String, String) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;
        let res = test::call_service(&app, req.uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        (header, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn generated_trace_id_is_visible_to_handlers() {
        let (header, body) = call(test::TestRequest::get()).await;
        assert!(TraceId::from_header(&header).is_some());
        assert_eq!(header, body);
    }

    #[actix_web::test]
    async fn inbound_trace_id_is_reused() {
        let supplied = "6f1c1d2e-7a0b-4c55-9d8e-0a1b2c3d4e5f";
        let (header, body) =
            call(test::TestRequest::get().insert_header((TRACE_ID_HEADER, supplied))).await;
        assert_eq!(header, supplied);
        assert_eq!(body, supplied);
    }

    #[actix_web::test]
    async fn malformed_inbound_trace_id_is_replaced() {
        let (header, _) =
            call(test::TestRequest::get().insert_header((TRACE_ID_HEADER, "drop table"))).await;
        assert_ne!(header, "drop table");
        assert!(TraceId::from_header(&header).is_some());
    }

    #[actix_web::test]
    async fn errors_capture_the_request_trace_id() {
        use crate::domain::{ApiResult, Error};

        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { ApiResult::<HttpResponse>::Err(Error::not_found("gone")) }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(header.as_str()));
    }
}
