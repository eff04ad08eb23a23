use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use amwalpay::checkout::{self, CheckoutService};
use amwalpay::config::{Config, ConfigProvider};
use amwalpay::core::traits::{AuditLog, TracingAuditLog};
use amwalpay::orders::{InMemoryOrderGateway, OrderGateway};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize tracing; RUST_LOG wins over LOG_LEVEL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("amwalpay={},actix_web=info", config.app.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting AmwalPay checkout service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("AmwalPay environment: {}", config.amwalpay.environment);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let orders: Arc<dyn OrderGateway> = Arc::new(InMemoryOrderGateway::new());
    let audit: Arc<dyn AuditLog> = Arc::new(TracingAuditLog::new(config.amwalpay.debug()));

    let service = web::Data::new(
        CheckoutService::from_config(
            &config.amwalpay,
            config.checkout.callback_url.clone(),
            orders,
            audit,
        )
        .expect("Failed to initialise AmwalPay checkout"),
    );
    let checkout_config = web::Data::new(config.checkout.clone());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(service.clone())
            .app_data(checkout_config.clone())
            .configure(checkout::configure)
            .route("/health", web::get().to(health_check))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "amwalpay"
    }))
}
