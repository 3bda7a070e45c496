//! Audiowall service binary.
//!
//! Loads configuration from the environment, connects to PostgreSQL, wires
//! the payment gateways and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use audiowall::adapters::gateways::{
    PaystackConfig, PaystackGateway, RazorpayConfig, RazorpayGateway,
};
use audiowall::adapters::http::{api_router, AppState};
use audiowall::adapters::postgres::{
    PostgresBundleCatalog, PostgresCatalogLookup, PostgresLedgerStore,
};
use audiowall::config::AppConfig;
use audiowall::domain::catalog::Currency;
use audiowall::ports::GatewayRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "starting audiowall"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    let razorpay = RazorpayGateway::new(RazorpayConfig::new(
        config.payment.razorpay_key_id.clone(),
        config.payment.razorpay_key_secret.clone(),
        config.payment.razorpay_webhook_secret.clone(),
    ));
    let paystack = PaystackGateway::new(PaystackConfig::new(
        config.payment.paystack_secret_key.clone(),
    ));

    let gateways = GatewayRegistry::new()
        .register(Currency::new("INR"), Arc::new(razorpay))
        .register(Currency::new("NGN"), Arc::new(paystack));

    let state = AppState {
        ledger: Arc::new(PostgresLedgerStore::new(pool.clone())),
        catalog: Arc::new(PostgresCatalogLookup::new(pool.clone())),
        bundles: Arc::new(PostgresBundleCatalog::new(pool)),
        gateways: Arc::new(gateways),
        default_currency: Currency::new(&config.wallet.default_currency),
        welcome_coins: config.wallet.welcome_coins,
    };

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
