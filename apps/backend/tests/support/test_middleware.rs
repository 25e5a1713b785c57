//! Test-only middleware that injects a SharedTxn into request extensions so
//! every handler reuses the test's transaction through `with_txn()`.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use simulation_backend::db::txn::SharedTxn;

#[derive(Clone)]
pub struct TestTxnInjector {
    shared: Option<SharedTxn>,
}

impl TestTxnInjector {
    pub fn new(shared: SharedTxn) -> Self {
        Self {
            shared: Some(shared),
        }
    }

    /// Pass-through when `shared` is `None`.
    pub fn maybe(shared: Option<SharedTxn>) -> Self {
        Self { shared }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TestTxnInjector
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TestTxnInjectorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TestTxnInjectorMiddleware {
            service,
            shared: self.shared.clone(),
        }))
    }
}

pub struct TestTxnInjectorMiddleware<S> {
    service: S,
    shared: Option<SharedTxn>,
}

impl<S, B> Service<ServiceRequest> for TestTxnInjectorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(shared) = &self.shared {
            req.extensions_mut().insert(shared.clone());
        }
        Box::pin(self.service.call(req))
    }
}
