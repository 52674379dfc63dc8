//! WhatsApp Gateway - Entry point.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsapp_client::{BridgeClient, EventReceiver, InitializeOptions, Transport};
use whatsapp_gateway::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    Dispatcher, LifecycleListener, PhoneNormalizer, ReadinessTracker,
};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log.level);

    info!("Starting WhatsApp Gateway");

    let bridge = match BridgeClient::new(&config.whatsapp.bridge_url) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create bridge client: {}", e);
            std::process::exit(1);
        }
    };

    if !bridge.health_check().await {
        warn!(
            "WhatsApp bridge not reachable at {} - will keep polling",
            config.whatsapp.bridge_url
        );
    }

    let transport: Arc<dyn Transport> = Arc::new(bridge.clone());
    let readiness = Arc::new(ReadinessTracker::new(config.auto_reply.enabled));

    // Lifecycle events drive readiness from a background task
    let listener = LifecycleListener::new(
        transport.clone(),
        readiness.clone(),
        config.auto_reply.clone(),
    );
    let options = InitializeOptions {
        headless: config.whatsapp.headless,
        args: config.whatsapp.browser_args(),
    };
    let receiver = EventReceiver::new(bridge, config.whatsapp.poll_interval);
    let events = tokio::spawn(async move {
        listener.initialize(&options).await;
        listener.run(receiver.stream()).await;
    });

    let dispatcher = Arc::new(Dispatcher::new(
        transport,
        readiness,
        PhoneNormalizer::new(
            &config.whatsapp.default_country_code,
            &config.whatsapp.address_domain,
        ),
        config.otp.message.clone(),
    ));

    let state = AppState::new(dispatcher);
    let rate_limit = RateLimitState::from_config(&config.rate_limit);
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server: http://{}", addr);
    info!("Health: http://{}/health", addr);
    info!("Send OTP: http://{}/send-otp", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    events.abort();

    if let Err(e) = result {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Shutting down...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
