use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,sqlx=warn,sea_orm=warn";

/// Install the global subscriber for the server binary.
///
/// Filter comes from `RUST_LOG`. Output is JSON unless `LOG_FORMAT=text`.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let text = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("text"))
        .unwrap_or(false);

    let base = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if text {
        registry.with(base).init();
    } else {
        registry.with(base.json().with_current_span(true)).init();
    }
}
