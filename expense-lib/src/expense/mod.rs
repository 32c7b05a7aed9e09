mod handlers;

use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::{web, Scope};
use chrono::{DateTime, Utc};
use expense_repo::expense_repo::{Filter, NewExpense, PageOptions, Source};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /expenses/{source}`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExpenseRequest {
    pub user_id: UserId,
    pub amount: Decimal,
    pub category: String,
    pub merchant: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

impl ExpenseRequest {
    /// Positivity is checked on the amount as it will be stored, after rounding.
    pub fn into_new_expense(self, source: Source) -> Result<NewExpense, HandlerError> {
        let new_expense = NewExpense::new(
            self.amount,
            self.category,
            self.merchant,
            self.transaction_date,
            source,
        )
        .normalize()?;
        if new_expense.amount <= Decimal::ZERO {
            return Err(HandlerError::BadRequest(
                "The amount spent must be positive".to_string(),
            ));
        }
        Ok(new_expense)
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ExpenseQuery {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub source: Option<Source>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ExpenseQuery {
    pub fn into_parts(self) -> Result<(Filter, Option<PageOptions>), HandlerError> {
        let page_options = match (self.offset, self.limit) {
            (None, None) => None,
            (offset, limit) => {
                let offset = offset.unwrap_or(0);
                let limit = limit.unwrap_or(i64::MAX);
                if offset < 0 || limit < 0 {
                    return Err(HandlerError::BadRequest(
                        "offset and limit cannot be negative".to_string(),
                    ));
                }
                Some(PageOptions { offset, limit })
            }
        };
        let filter = Filter {
            from: self.from,
            until: self.until,
            category: self.category,
            source: self.source,
        };
        Ok((filter, page_options))
    }
}

pub fn expense_service() -> Scope {
    web::scope("/expenses")
        .service(handlers::create_expense)
        .service(handlers::get_expenses)
        .service(handlers::get_categories)
        .service(handlers::get_total)
        .service(handlers::get_expense)
        .service(handlers::delete_expense)
}
