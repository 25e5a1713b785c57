use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use simulation_backend::db::txn::SharedTxn;
use simulation_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use simulation_backend::routes;
use simulation_backend::state::app_state::AppState;

use super::test_middleware::TestTxnInjector;

/// Builder for test Actix services wired like `main.rs`.
pub struct TestAppBuilder {
    state: AppState,
    shared_txn: Option<SharedTxn>,
}

impl TestAppBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            shared_txn: None,
        }
    }

    /// Route every handler's `with_txn` through `shared`.
    pub fn with_shared_txn(mut self, shared: SharedTxn) -> Self {
        self.shared_txn = Some(shared);
        self
    }

    pub async fn build(
        self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
        let data = web::Data::new(self.state);
        let injector = TestTxnInjector::maybe(self.shared_txn);

        test::init_service(
            App::new()
                .wrap(injector)
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .configure(routes::configure),
        )
        .await
    }
}

pub fn create_test_app(state: AppState) -> TestAppBuilder {
    TestAppBuilder::new(state)
}
