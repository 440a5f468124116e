//! Studio API
//!
//! HTTP backend for the fitness studio: class booking, hall hire,
//! memberships, payments, and outbound email.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/classes` - Class catalog with live availability
//! - `GET /api/v1/classes/{id}` - Single class with live availability
//! - `POST /api/v1/classes/{id}/book` - Book a seat
//! - `GET /api/v1/bookings` - Current user's confirmed bookings
//! - `POST /api/v1/bookings/{id}/cancel` - Cancel a booking
//! - `POST /api/v1/bookings/{id}/attendance` - Mark attendance (staff)
//! - `POST /api/v1/membership/enrol` - Enrol on a membership tier
//! - `POST /api/v1/membership/change` - Change membership tier
//! - `GET /api/v1/membership/allowance` - Remaining class allowance
//! - `GET /hall-hire/packages` - Hall-hire package catalog
//! - `POST /hall-hire/book` - Submit a hall-hire booking
//! - `POST /hall-hire/{id}/confirm` - Confirm a pending booking (staff)
//! - `POST /hall-hire/{id}/cancel` - Cancel a hall-hire booking (staff)
//! - `POST /stripe/create-payment-intent` - One-off payment
//! - `POST /stripe/create-subscription` - Membership subscription
//! - `POST /stripe/cancel-subscription` - Cancel a subscription
//! - `POST /email/send-email` - Relay an email through the provider
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use studio_db::pg::Repositories;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("studio_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Studio API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and repositories
    let pool = studio_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    let repos = Repositories::new(pool.clone());

    // Create application state
    let state = AppState::new(repos, pool, config.clone());

    // Seed the class catalog and publish the first availability snapshot
    state.bookings.seed_catalog().await?;

    // Build HTTP router and serve
    let app = build_router(state, metrics_handle);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // API v1 routes (gateway identity required)
    let api_v1 = Router::new()
        .route("/classes", get(handlers::list_classes))
        .route("/classes/{id}", get(handlers::get_class))
        .route("/classes/{id}/book", post(handlers::book_class))
        .route("/bookings", get(handlers::list_bookings))
        .route("/bookings/{id}/cancel", post(handlers::cancel_booking))
        .route("/bookings/{id}/attendance", post(handlers::mark_attendance))
        .route("/membership/enrol", post(handlers::enrol))
        .route("/membership/change", post(handlers::change_tier))
        .route("/membership/allowance", get(handlers::remaining_allowance));

    // Public routes (hall-hire enquiry form, payments, email relay)
    let public_routes = Router::new()
        .route("/hall-hire/packages", get(handlers::list_packages))
        .route("/hall-hire/book", post(handlers::book_hall))
        .route("/hall-hire/{id}/confirm", post(handlers::confirm_hall_booking))
        .route("/hall-hire/{id}/cancel", post(handlers::cancel_hall_booking))
        .route(
            "/stripe/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route(
            "/stripe/create-subscription",
            post(handlers::create_subscription),
        )
        .route(
            "/stripe/cancel-subscription",
            post(handlers::cancel_subscription),
        )
        .route("/email/send-email", post(handlers::send_email));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .merge(public_routes)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Booking and payment operations should complete well under 200ms
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("studio_operation_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!(
        "studio_bookings_created_total",
        "Total class bookings confirmed"
    );
    metrics::describe_counter!(
        "studio_bookings_cancelled_total",
        "Total class bookings cancelled"
    );
    metrics::describe_counter!(
        "studio_hall_bookings_created_total",
        "Total hall-hire bookings created"
    );
    metrics::describe_counter!(
        "studio_payment_intents_created_total",
        "Total payment intents created"
    );
    metrics::describe_counter!(
        "studio_subscriptions_cancelled_total",
        "Total subscriptions cancelled"
    );
    metrics::describe_counter!("studio_emails_sent_total", "Total emails relayed");
    metrics::describe_histogram!(
        "studio_operation_duration_seconds",
        "Operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
