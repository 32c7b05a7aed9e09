use crate::error::HandlerError;
use crate::user::{Credentials, UserId};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use expense_repo::user_repo::{NewUser, UserRepo};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::RootSpan;

#[post("/signup")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    root_span: RootSpan,
    new_user: web::Json<NewUser>,
) -> Result<impl Responder, HandlerError> {
    let user = user_repo.create_user(new_user.into_inner()).await?;
    root_span.record("user_id", user.user_id);
    info!(username = %user.username, "User signed up");
    Ok(HttpResponse::Created().json(user))
}

#[post("/login")]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    root_span: RootSpan,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    let Some(user) = user_repo
        .find_user(&credentials.username, &credentials.email)
        .await?
    else {
        warn!(username = %credentials.username, "Login failed");
        return Err(HandlerError::InvalidCredentials);
    };
    root_span.record("user_id", user.user_id);
    Ok(HttpResponse::Ok().json(user))
}

#[get("/{user_id}")]
pub async fn get_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user = user_repo.get_user(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    root_span: RootSpan,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);
    user_repo.delete_user(user_id).await?;
    info!("Deleted user and their expenses");
    Ok(HttpResponse::NoContent().finish())
}
