use actix_cors::Cors;
use actix_web::web::{Data, ServiceConfig};
use expense_repo::expense_repo::ExpenseRepo;
use expense_repo::user_repo::UserRepo;
use expense_repo::HealthCheck;
use std::sync::Arc;

pub mod config;
mod error;
pub mod expense;
mod extractors;
mod status;
pub mod tracing;
pub mod user;

/// Registers every route along with the repositories the handlers need.
pub fn app_config_func(
    user_repo: Arc<dyn UserRepo>,
    expense_repo: Arc<dyn ExpenseRepo>,
    health_check: Arc<dyn HealthCheck>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(Data::new(user_repo))
            .app_data(Data::new(expense_repo))
            .app_data(Data::new(health_check))
            .app_data(extractors::json_config())
            .app_data(extractors::query_config())
            .app_data(extractors::path_config())
            .service(status::index)
            .service(status::health)
            .service(user::user_service())
            .service(expense::expense_service());
    }
}

/// The API is called from browser pages served anywhere, including `file://`.
pub fn create_cors() -> Cors {
    Cors::permissive()
}
