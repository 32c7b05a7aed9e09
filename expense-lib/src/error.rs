use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use expense_repo::expense_repo::{ExpenseRepoError, InvalidSource};
use expense_repo::user_repo::UserRepoError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    UserRepoError(#[from] UserRepoError),
    #[error(transparent)]
    ExpenseRepoError(#[from] ExpenseRepoError),
    #[error(transparent)]
    InvalidSource(#[from] InvalidSource),
    #[error("Invalid username or email")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::UserRepoError(e) => match e {
                UserRepoError::UserNotFound(_) => StatusCode::NOT_FOUND,
                UserRepoError::UsernameTaken(_) | UserRepoError::EmailTaken(_) => {
                    StatusCode::CONFLICT
                }
                UserRepoError::InvalidUser(_) => StatusCode::BAD_REQUEST,
                UserRepoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HandlerError::ExpenseRepoError(e) => match e {
                ExpenseRepoError::ExpenseNotFound(..) | ExpenseRepoError::UserNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ExpenseRepoError::InvalidExpense(_) => StatusCode::BAD_REQUEST,
                ExpenseRepoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HandlerError::InvalidSource(_) | HandlerError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = ?self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(serde_json::json!({ "error": message }))
    }
}
