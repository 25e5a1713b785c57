use actix_web::{web, App, HttpServer};
use simulation_backend::config::db::{DbKind, RuntimeEnv};
use simulation_backend::infra::state::build_state;
use simulation_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use simulation_backend::{routes, telemetry};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the process environment; nothing is read from files.
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };
    let db_kind = match std::env::var("BACKEND_DB_KIND")
        .unwrap_or_else(|_| "postgres".to_string())
        .parse::<DbKind>()
    {
        Ok(kind) => kind,
        Err(e) => {
            error!(error = %e, "invalid BACKEND_DB_KIND");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(db_kind)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %host, port, db_kind = ?db_kind, "simulation backend listening");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
