use crate::expense_repo::ExpenseRepoError::{ExpenseNotFound, UserNotFound};
use crate::expense_repo::{
    Expense, ExpenseRepo, ExpenseRepoError, Filter, NewExpense, PageOptions, Source,
};
use crate::sqlx_repo::{violated_constraint, SQLxRepo, EXPENSE_USER_CONSTRAINT};
use crate::user_repo::UserId;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{query_as, query_scalar, Postgres, QueryBuilder};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct ExpenseEntry {
    #[allow(dead_code)]
    expense_id: i32,
    user_id: i32,
    user_expense_id: i32,
    amount: Decimal,
    category: String,
    merchant: Option<String>,
    transaction_date: DateTime<Utc>,
    source: String,
}

impl TryFrom<ExpenseEntry> for Expense {
    type Error = ExpenseRepoError;

    fn try_from(value: ExpenseEntry) -> Result<Self, Self::Error> {
        let source: Source = value.source.parse().map_err(|e| anyhow!("{}", e))?;
        Ok(Expense {
            user_id: value.user_id,
            user_expense_id: value.user_expense_id,
            amount: value.amount,
            category: value.category,
            merchant: value.merchant,
            transaction_date: value.transaction_date,
            source,
        })
    }
}

fn push_filter(query_builder: &mut QueryBuilder<'_, Postgres>, filter: Filter) {
    if let Some(from) = filter.from {
        query_builder
            .push(" AND transaction_date >= ")
            .push_bind(from);
    }
    if let Some(until) = filter.until {
        query_builder
            .push(" AND transaction_date <= ")
            .push_bind(until);
    }
    if let Some(category) = filter.category {
        query_builder.push(" AND category = ").push_bind(category);
    }
    if let Some(source) = filter.source {
        query_builder.push(" AND source = ").push_bind(source.as_str());
    }
}

#[async_trait]
impl ExpenseRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError> {
        let entry: Option<ExpenseEntry> =
            query_as("SELECT * FROM expenses WHERE user_id = $1 AND user_expense_id = $2")
                .bind(user_id)
                .bind(user_expense_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get expense {}", user_expense_id))?;
        entry
            .ok_or(ExpenseNotFound(user_id, user_expense_id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn get_expenses(
        &self,
        user_id: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Expense>, ExpenseRepoError> {
        let mut query_builder = QueryBuilder::new("SELECT * FROM expenses WHERE user_id = ");
        query_builder.push_bind(user_id);
        push_filter(&mut query_builder, filter);
        query_builder.push(" ORDER BY user_expense_id DESC");
        if let Some(po) = page_options {
            query_builder
                .push(" OFFSET ")
                .push_bind(po.offset)
                .push(" LIMIT ")
                .push_bind(po.limit);
        }

        let entries: Vec<ExpenseEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get expenses for user {}", user_id))?;
        entries.into_iter().map(Expense::try_from).collect()
    }

    #[instrument(skip(self, new_expense))]
    async fn create_expense(
        &self,
        user_id: UserId,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError> {
        let new_expense = new_expense.normalize()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        // Locking the owner serializes numbering of that user's expenses.
        let owner: Option<i32> =
            query_scalar("SELECT user_id FROM users WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await
                .with_context(|| format!("Unable to lock user {}", user_id))?;
        if owner.is_none() {
            return Err(UserNotFound(user_id));
        }

        let result: Result<ExpenseEntry, sqlx::Error> = query_as(
            "INSERT INTO expenses(user_id, user_expense_id, amount, category, merchant, transaction_date, source) \
             VALUES ($1, (SELECT COALESCE(MAX(user_expense_id), 0) + 1 FROM expenses WHERE user_id = $1), $2, $3, $4, COALESCE($5, NOW()), $6) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(new_expense.amount)
        .bind(&new_expense.category)
        .bind(&new_expense.merchant)
        .bind(new_expense.transaction_date)
        .bind(new_expense.source.as_str())
        .fetch_one(&mut *tx)
        .await;

        let entry = match result {
            Ok(entry) => entry,
            Err(e) if violated_constraint(&e) == Some(EXPENSE_USER_CONSTRAINT) => {
                return Err(UserNotFound(user_id))
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Unable to insert expense").into()),
        };
        tx.commit().await.context("Unable to commit expense")?;

        entry.try_into()
    }

    #[instrument(skip(self))]
    async fn delete_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError> {
        let entry: Option<ExpenseEntry> = query_as(
            "DELETE FROM expenses WHERE user_id = $1 AND user_expense_id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(user_expense_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete expense {}", user_expense_id))?;
        entry
            .ok_or(ExpenseNotFound(user_id, user_expense_id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn get_categories(&self, user_id: UserId) -> Result<Vec<String>, ExpenseRepoError> {
        let categories: Vec<String> = query_scalar(
            "SELECT category FROM expenses WHERE user_id = $1 GROUP BY category ORDER BY category COLLATE \"C\"",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get categories for user {}", user_id))?;
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn get_total(
        &self,
        user_id: UserId,
        filter: Filter,
    ) -> Result<Decimal, ExpenseRepoError> {
        let mut query_builder =
            QueryBuilder::new("SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE user_id = ");
        query_builder.push_bind(user_id);
        push_filter(&mut query_builder, filter);

        let total: Decimal = query_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to get total for user {}", user_id))?;
        Ok(total)
    }
}
