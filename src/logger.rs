use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Instant;
use tracing::Instrument;

pub const TRANSACTION_ID_HEADER: &str = "transaction-id";

/// Request logging middleware.
/// Assigns each request a transaction id (taken from the `transaction-id`
/// header when the caller sends one), runs the rest of the chain inside a
/// span carrying it, and echoes it back in the response headers.
pub struct TransactionIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TransactionIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TransactionIdMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(TransactionIdMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct TransactionIdMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TransactionIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let transaction_id = req
            .headers()
            .get(TRANSACTION_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "http_request",
            transaction_id = %transaction_id,
            method = %req.method(),
            path = %req.path(),
        );

        let service = self.service.clone();

        Box::pin(
            async move {
                tracing::info!("Request started");

                let mut res = service.call(req).await?;

                if let Ok(value) = HeaderValue::from_str(&transaction_id) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRANSACTION_ID_HEADER), value);
                }

                tracing::info!(
                    status = res.status().as_u16(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Request completed"
                );

                Ok(res)
            }
            .instrument(span),
        )
    }
}
