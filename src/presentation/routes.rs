use crate::presentation::auth::{login, logout, me, refresh, register};
use crate::presentation::handlers::{
    ApiError, activate_esim, company_info, esim_balance, esim_usage, health_check, root,
};
use actix_cors::Cors;
use actix_web::{http::header, web};

pub const ROUTE_SUMMARY: &str = "GET /, GET /api/health, GET /api/company, \
    POST /api/esim/activate, GET /api/esim/{id}/balance, GET /api/esim/{id}/usage, \
    POST /api/auth/register, POST /api/auth/login, GET /api/auth/me, \
    POST /api/auth/logout, POST /api/auth/refresh";

/// Mounts every route. Shared by the binary and the integration tests.
/// Body extraction failures get the same `{error, details}` shape as every
/// other 400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    cfg.app_data(json_config).route("/", web::get().to(root)).service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/company", web::get().to(company_info))
            .route("/esim/activate", web::post().to(activate_esim))
            .route("/esim/{activation_id}/balance", web::get().to(esim_balance))
            .route("/esim/{activation_id}/usage", web::get().to(esim_usage))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login))
                    .route("/me", web::get().to(me))
                    .route("/logout", web::post().to(logout))
                    .route("/refresh", web::post().to(refresh)),
            ),
    );
}

/// CORS layer for the configured origin list. Credentials are allowed, so
/// origins are matched exactly.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .supports_credentials()
}
