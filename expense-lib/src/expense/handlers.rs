use crate::error::HandlerError;
use crate::expense::{ExpenseQuery, ExpenseRequest};
use crate::user::UserId;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use expense_repo::expense_repo::{ExpenseRepo, Source};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::RootSpan;

#[post("/{source}")]
pub async fn create_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    source: web::Path<String>,
    request: web::Json<ExpenseRequest>,
) -> Result<impl Responder, HandlerError> {
    let source: Source = source.parse()?;
    let request = request.into_inner();
    let user_id = request.user_id;
    root_span.record("user_id", user_id);

    let new_expense = request.into_new_expense(source)?;
    let expense = expense_repo.create_expense(user_id, new_expense).await?;
    root_span.record("user_expense_id", expense.user_expense_id);
    info!(%source, "Recorded expense");
    Ok(HttpResponse::Created().json(expense))
}

#[get("/{user_id}")]
pub async fn get_expenses(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    user_id: web::Path<UserId>,
    query: web::Query<ExpenseQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);

    let (filter, page_options) = query.into_inner().into_parts()?;
    let expenses = expense_repo
        .get_expenses(user_id, filter, page_options)
        .await?;
    Ok(HttpResponse::Ok().json(expenses))
}

#[get("/{user_id}/categories")]
pub async fn get_categories(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);

    let categories = expense_repo.get_categories(user_id).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[get("/{user_id}/total")]
pub async fn get_total(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    user_id: web::Path<UserId>,
    query: web::Query<ExpenseQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    root_span.record("user_id", user_id);

    let (filter, _) = query.into_inner().into_parts()?;
    let total = expense_repo.get_total(user_id, filter).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "total": total })))
}

#[get("/{user_id}/{user_expense_id}")]
pub async fn get_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    path: web::Path<(UserId, i32)>,
) -> Result<impl Responder, HandlerError> {
    let (user_id, user_expense_id) = path.into_inner();
    root_span
        .record("user_id", user_id)
        .record("user_expense_id", user_expense_id);

    let expense = expense_repo.get_expense(user_id, user_expense_id).await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[delete("/{user_id}/{user_expense_id}")]
pub async fn delete_expense(
    expense_repo: web::Data<Arc<dyn ExpenseRepo>>,
    root_span: RootSpan,
    path: web::Path<(UserId, i32)>,
) -> Result<impl Responder, HandlerError> {
    let (user_id, user_expense_id) = path.into_inner();
    root_span
        .record("user_id", user_id)
        .record("user_expense_id", user_expense_id);

    let expense = expense_repo
        .delete_expense(user_id, user_expense_id)
        .await?;
    info!("Deleted expense");
    Ok(HttpResponse::Ok().json(expense))
}
