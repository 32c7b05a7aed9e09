use crate::user_repo::UserId;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Digits after the decimal point stored for an amount.
pub const AMOUNT_SCALE: u32 = 2;
/// Total digits stored for an amount.
pub const AMOUNT_PRECISION: u32 = 10;
pub const MAX_CATEGORY_LENGTH: usize = 50;
pub const MAX_MERCHANT_LENGTH: usize = 100;

#[derive(Clone, Copy, Debug)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Default, Clone, Debug)]
pub struct Filter {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub source: Option<Source>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        from: None,
        until: None,
        category: None,
        source: None,
    };

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(from) = self.from {
            if expense.transaction_date < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if expense.transaction_date > until {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &expense.category != category {
                return false;
            }
        }
        if let Some(source) = self.source {
            if expense.source != source {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait ExpenseRepo: Sync + Send {
    async fn get_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError>;

    /// Returns the user's expenses, highest `user_expense_id` first.
    async fn get_expenses(
        &self,
        user_id: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Expense>, ExpenseRepoError>;

    async fn create_expense(
        &self,
        user_id: UserId,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError>;

    async fn delete_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError>;

    async fn get_categories(&self, user_id: UserId) -> Result<Vec<String>, ExpenseRepoError>;

    async fn get_total(&self, user_id: UserId, filter: Filter)
        -> Result<Decimal, ExpenseRepoError>;
}

#[derive(Error, Debug)]
pub enum ExpenseRepoError {
    #[error("Expense {1} of user {0} not found")]
    ExpenseNotFound(UserId, i32),
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Manual,
    Sms,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Manual, Source::Sms];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Source::Manual => "manual",
            Source::Sms => "sms",
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown expense source {0:?}, expected one of \"manual\", \"sms\"")]
pub struct InvalidSource(pub String);

impl FromStr for Source {
    type Err = InvalidSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| InvalidSource(s.to_owned()))
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Expense {
    pub user_id: UserId,
    pub user_expense_id: i32,
    pub amount: Decimal,
    pub category: String,
    pub merchant: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub source: Source,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub merchant: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub source: Source,
}

impl NewExpense {
    pub const fn new(
        amount: Decimal,
        category: String,
        merchant: Option<String>,
        transaction_date: Option<DateTime<Utc>>,
        source: Source,
    ) -> NewExpense {
        NewExpense {
            amount,
            category,
            merchant,
            transaction_date,
            source,
        }
    }

    /// Checks column limits and rounds the amount and date to the stored precision.
    pub fn normalize(mut self) -> Result<NewExpense, ExpenseRepoError> {
        if self.category.chars().count() > MAX_CATEGORY_LENGTH {
            return Err(ExpenseRepoError::InvalidExpense(format!(
                "category is longer than {} characters",
                MAX_CATEGORY_LENGTH
            )));
        }
        if let Some(merchant) = &self.merchant {
            if merchant.chars().count() > MAX_MERCHANT_LENGTH {
                return Err(ExpenseRepoError::InvalidExpense(format!(
                    "merchant is longer than {} characters",
                    MAX_MERCHANT_LENGTH
                )));
            }
        }
        self.amount = normalize_amount(self.amount)?;
        self.transaction_date = self.transaction_date.map(|date| date.trunc_subsecs(6));
        Ok(self)
    }

    /// Timestamps keep microsecond precision, like a Postgres `TIMESTAMPTZ`.
    pub fn to_expense(
        self,
        user_id: UserId,
        user_expense_id: i32,
        transaction_date: DateTime<Utc>,
    ) -> Expense {
        Expense {
            user_id,
            user_expense_id,
            amount: self.amount,
            category: self.category,
            merchant: self.merchant,
            transaction_date: self
                .transaction_date
                .unwrap_or(transaction_date)
                .trunc_subsecs(6),
            source: self.source,
        }
    }
}

fn normalize_amount(amount: Decimal) -> Result<Decimal, ExpenseRepoError> {
    let mut rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let limit = Decimal::from(10_i64.pow(AMOUNT_PRECISION - AMOUNT_SCALE));
    if rounded.abs() >= limit {
        return Err(ExpenseRepoError::InvalidExpense(format!(
            "amount {} does not fit in {} digits",
            amount, AMOUNT_PRECISION
        )));
    }
    rounded.rescale(AMOUNT_SCALE);
    Ok(rounded)
}
