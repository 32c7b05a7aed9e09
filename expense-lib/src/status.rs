use actix_web::{get, web, HttpResponse, Responder};
use expense_repo::HealthCheck;
use std::sync::Arc;
use tracing::warn;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the expense tracker API"
    }))
}

#[get("/health")]
pub async fn health(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
    } else {
        warn!("Health check failed");
        HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
    }
}
