use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use payroll_api::auth::{self, TokenService};
use payroll_api::config::Settings;
use payroll_api::database::DbPool;
use payroll_api::handlers;
use payroll_api::provider::{WebhookVerifier, YellowCardClient};
use payroll_api::repository::Repositories;
use payroll_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,payroll_api=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    let settings = Settings::load()?;
    info!("configuration loaded");

    let db = DbPool::connect(&settings.database).await?;
    db.ensure_schema().await?;
    info!("database connection established");

    let op_timeout = Duration::from_secs(settings.database.operation_timeout_seconds);
    let repos = Arc::new(Repositories::new(&db, op_timeout));
    repos.ensure_indexes().await?;

    let tokens = Arc::new(TokenService::new(&settings.auth));
    let payments = Arc::new(YellowCardClient::new(&settings.provider));
    let webhook_verifier = Arc::new(WebhookVerifier::new(settings.provider.secret_key.clone()));

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    let grace = Duration::from_secs(settings.server.shutdown_grace_seconds);

    let state = AppState {
        settings,
        db: db.clone(),
        repos,
        tokens,
        payments,
        webhook_verifier,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(grace))
        .await?;

    db.close().await;
    info!("shutdown complete");
    Ok(())
}

fn build_router(state: AppState) -> Router {
    // Token-less routes: probes, registration/login, and the webhook,
    // which authenticates by body signature instead of bearer token.
    let public_routes = Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/status-check", get(handlers::health::status_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/webhook/yellow-card",
            post(handlers::webhook::yellow_card_webhook),
        );

    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/employee/", post(handlers::employee::create_employee))
        .route(
            "/employee/{employeeId}",
            put(handlers::employee::update_employee).delete(handlers::employee::delete_employee),
        )
        .route(
            "/disbursements/{employeeId}",
            post(handlers::disbursement::create_disbursement),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}

/// Resolves on SIGINT/SIGTERM. Once triggered, a watchdog forces process
/// exit if in-flight requests exceed the grace period.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining in-flight requests");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::error!("graceful shutdown timed out, forcing exit");
        std::process::exit(1);
    });
}
