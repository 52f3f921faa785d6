use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{Duration, TimeZone, Utc};
use esim_api::application::auth_service::AuthService;
use esim_api::application::esim_service::EsimService;
use esim_api::data::memory::InMemoryActivationRepository;
use esim_api::data::user_repository::InMemoryUserRepository;
use esim_api::domain::esim::{ActivateEsim, ActivationResponse, ActivationStatus, Balance, Usage};
use esim_api::infrastructure::clock::{Clock, ManualClock};
use esim_api::infrastructure::token::TokenAuthority;
use esim_api::presentation::handlers::AppState;
use esim_api::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use esim_api::presentation::routes::{configure, cors};
use std::sync::Arc;

macro_rules! setup_test {
    () => {{
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let tokens = Arc::new(TokenAuthority::new(
            "test-secret-key-for-testing-only",
            Duration::minutes(30),
            clock.clone(),
        ));

        let auth_service = AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens.clone());
        let esim_service =
            EsimService::new(Arc::new(InMemoryActivationRepository::new()), clock.clone());

        let state = web::Data::new(AppState {
            esim_service,
            auth_service: Arc::new(auth_service),
        });

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(tokens))
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(configure),
        )
        .await;

        (app, clock)
    }};
}

fn activation(plan_id: &str) -> ActivateEsim {
    ActivateEsim {
        plan_id: plan_id.to_string(),
        device_imei: "356938035643809".to_string(),
        customer_email: "traveller@example.com".to_string(),
    }
}

#[actix_web::test]
async fn test_root_describes_service() {
    let (app, _) = setup_test!();

    let req = test::TestRequest::get().uri("/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "eSIM Myanmar API");
    assert_eq!(body["company"], "ESIM MYANMAR COMPANY LIMITED");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["docs"], "/docs");
}

#[actix_web::test]
async fn test_health_check() {
    let (app, _) = setup_test!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["api_version"], "1.0.0");
    assert_eq!(body["company"], "ESIM MYANMAR COMPANY LIMITED");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_company_info() {
    let (app, _) = setup_test!();

    let req = test::TestRequest::get().uri("/api/company").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "ESIM MYANMAR COMPANY LIMITED");
    assert_eq!(body["website"], "https://www.esim.com.mm");
    assert_eq!(body["email"], "info@esim.com.mm");
}

#[actix_web::test]
async fn test_activate_then_query_balance_and_usage() {
    let (app, clock) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/esim/activate")
        .set_json(&activation("tourist-7d"))
        .to_request();
    let activated: ActivationResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(activated.status, ActivationStatus::Pending);
    assert!(activated.activation_code.starts_with("ESM"));
    assert_eq!(activated.activation_code.len(), 11);
    assert_eq!(
        activated.expires_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap()
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/esim/{}/balance", activated.activation_id))
        .to_request();
    let balance: Balance = test::call_and_read_body_json(&app, req).await;
    assert_eq!(balance.activation_id, activated.activation_id);
    assert_eq!(balance.data_remaining_gb, 5.0);
    assert_eq!(balance.days_remaining, 7);

    clock.advance(Duration::days(2));
    let req = test::TestRequest::get()
        .uri(&format!("/api/esim/{}/usage", activated.activation_id))
        .to_request();
    let usage: Usage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(usage.data_total_gb, 5);
    assert_eq!(usage.usage_percentage, 0.0);
    assert_eq!(usage.last_updated, clock.now());

    let req = test::TestRequest::get()
        .uri(&format!("/api/esim/{}/balance", activated.activation_id))
        .to_request();
    let balance: Balance = test::call_and_read_body_json(&app, req).await;
    assert_eq!(balance.days_remaining, 5);
}

#[actix_web::test]
async fn test_activate_unknown_plan() {
    let (app, _) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/esim/activate")
        .set_json(&activation("lifetime-unlimited"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["message"], "Invalid plan ID");
}

#[actix_web::test]
async fn test_activate_requires_device_imei() {
    let (app, _) = setup_test!();

    let mut body = activation("business-30d");
    body.device_imei = String::new();
    let req = test::TestRequest::post()
        .uri("/api/esim/activate")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_activation_is_not_found() {
    let (app, _) = setup_test!();

    for uri in ["/api/esim/nope/balance", "/api/esim/nope/usage"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_each_activation_gets_its_own_id() {
    let (app, _) = setup_test!();

    let mut ids = Vec::new();
    for plan in ["tourist-7d", "business-30d", "extended-90d"] {
        let req = test::TestRequest::post()
            .uri("/api/esim/activate")
            .set_json(&activation(plan))
            .to_request();
        let activated: ActivationResponse = test::call_and_read_body_json(&app, req).await;
        ids.push(activated.activation_id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[actix_web::test]
async fn test_activate_malformed_json_has_error_body() {
    let (app, _) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/esim/activate")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"plan_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
    assert!(body["details"]["message"].is_string());
}

#[actix_web::test]
async fn test_cors_preflight_allows_configured_origin_only() {
    let origins = vec![
        "https://www.esim.com.mm".to_string(),
        "http://localhost:3000".to_string(),
    ];
    let app = test::init_service(App::new().wrap(cors(&origins)).configure(configure)).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/esim/activate")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/esim/activate")
        .insert_header((header::ORIGIN, "https://evil.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(!resp.status().is_success());
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
