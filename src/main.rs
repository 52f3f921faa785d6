use actix_web::{App, HttpServer, web};
use esim_api::application::auth_service::AuthService;
use esim_api::application::esim_service::EsimService;
use esim_api::data::memory::InMemoryActivationRepository;
use esim_api::data::user_repository::InMemoryUserRepository;
use esim_api::infrastructure::clock::{Clock, SystemClock};
use esim_api::infrastructure::config::AppConfig;
use esim_api::infrastructure::logging::{LogFormat, init_logging};
use esim_api::infrastructure::token::TokenAuthority;
use esim_api::presentation::handlers::AppState;
use esim_api::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use esim_api::presentation::routes::{ROUTE_SUMMARY, configure, cors};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> std::io::Result<()> {
    // `.env` may set RUST_LOG and LOG_FORMAT, so it is loaded first.
    dotenv::dotenv().ok();
    init_logging(LogFormat::from_env());
    info!("Logging initialized successfully");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!(
        host = %config.host,
        port = config.port,
        access_token_ttl_secs = config.access_token_ttl.num_seconds(),
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tokens = Arc::new(TokenAuthority::new(
        &config.jwt_secret,
        config.access_token_ttl,
        clock.clone(),
    ));

    info!("Creating in-memory repositories");
    let auth_service = AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens.clone());
    let esim_service = EsimService::new(Arc::new(InMemoryActivationRepository::new()), clock);

    let state = web::Data::new(AppState {
        esim_service,
        auth_service: Arc::new(auth_service),
    });
    info!("Application state initialized");

    let cors_origins = config.cors_origins.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(tokens.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors(&cors_origins))
            .configure(configure)
    });

    let bind_addr = format!("{}:{}", config.host, config.port);
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind((config.host.as_str(), config.port))?;

    info!(address = %bind_addr, routes = %ROUTE_SUMMARY, "Starting HTTP server");
    server.run().await
}
