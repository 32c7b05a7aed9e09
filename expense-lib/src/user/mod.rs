mod handlers;

use actix_web::{web, Scope};
use serde::Deserialize;

pub use expense_repo::user_repo::UserId;

/// Login is by username and email together, there are no passwords.
#[derive(Deserialize, Debug)]
pub struct Credentials {
    pub username: String,
    pub email: String,
}

pub fn user_service() -> Scope {
    web::scope("/users")
        .service(handlers::signup)
        .service(handlers::login)
        .service(handlers::get_user)
        .service(handlers::delete_user)
}
