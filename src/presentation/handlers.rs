use crate::application::auth_service::AuthService;
use crate::application::esim_service::EsimService;
use crate::data::memory::InMemoryActivationRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::esim::ActivateEsim;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const API_VERSION: &str = "1.0.0";

pub const COMPANY_NAME: &str = "ESIM MYANMAR COMPANY LIMITED";

// AppState holding the services
pub struct AppState {
    pub esim_service: EsimService<InMemoryActivationRepository>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            // Duplicate registration is reported as 400, not 409
            ApiError::Conflict(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            ApiError::Validation(_) => {
                warn!(error = %error_msg, status = %status, "Validation error")
            }
            ApiError::Conflict(_) => {
                warn!(error = %error_msg, status = %status, "Conflict")
            }
            ApiError::Unauthorized(_) => {
                warn!(error = %error_msg, status = %status, "Unauthorized")
            }
            ApiError::NotFound(_) => {
                warn!(error = %error_msg, status = %status, "Resource not found")
            }
            ApiError::Internal(_) => {
                error!(error = %error_msg, status = %status, "Internal error")
            }
        }

        // Internal details stay in the log
        let message = match self {
            ApiError::Internal(_) => "Internal server error",
            other => other.message(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details: serde_json::json!({ "message": message }),
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::AlreadyExists => ApiError::Conflict("Email already registered".to_string()),
            DomainError::WeakCredential(msg) | DomainError::Validation(msg) => {
                ApiError::Validation(msg)
            }
            DomainError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            DomainError::AccountDisabled => ApiError::Unauthorized("Account is disabled".to_string()),
            DomainError::InvalidToken => ApiError::Unauthorized("Invalid token".to_string()),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(other) => ApiError::Internal(other.to_string()),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move { user.ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string())) })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
    company: String,
    api_version: String,
}

#[derive(Serialize)]
struct CompanyInfo {
    name: &'static str,
    address: &'static str,
    phone: &'static str,
    website: &'static str,
    email: &'static str,
}

const COMPANY_INFO: CompanyInfo = CompanyInfo {
    name: COMPANY_NAME,
    address: "Parami Road, No-70/A, Ward (16), Hlaing Township, Yangon, Myanmar",
    phone: "(+95) 96 50000172",
    website: "https://www.esim.com.mm",
    email: "info@esim.com.mm",
};

#[instrument]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "eSIM Myanmar API",
        "company": COMPANY_NAME,
        "version": API_VERSION,
        "docs": "/docs",
    }))
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        company: COMPANY_NAME.to_string(),
        api_version: API_VERSION.to_string(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument]
pub async fn company_info() -> HttpResponse {
    HttpResponse::Ok().json(COMPANY_INFO)
}

#[instrument(skip(state, req), fields(plan_id = %req.plan_id))]
pub async fn activate_esim(
    state: web::Data<AppState>,
    req: web::Json<ActivateEsim>,
) -> Result<HttpResponse, ApiError> {
    info!(plan_id = %req.plan_id, "Processing eSIM activation");
    let response = state
        .esim_service
        .activate(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to activate eSIM");
            e
        })?;
    info!(activation_id = %response.activation_id, "eSIM activation accepted");
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state), fields(activation_id = %*path))]
pub async fn esim_balance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let activation_id = path.into_inner();
    let balance = state.esim_service.balance(&activation_id).await?;
    Ok(HttpResponse::Ok().json(balance))
}

#[instrument(skip(state), fields(activation_id = %*path))]
pub async fn esim_usage(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let activation_id = path.into_inner();
    let usage = state.esim_service.usage(&activation_id).await?;
    Ok(HttpResponse::Ok().json(usage))
}
