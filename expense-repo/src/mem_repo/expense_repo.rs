use crate::expense_repo::ExpenseRepoError::{ExpenseNotFound, UserNotFound};
use crate::expense_repo::{
    Expense, ExpenseRepo, ExpenseRepoError, Filter, NewExpense, PageOptions,
};
use crate::mem_repo::MemRepo;
use crate::user_repo::UserId;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

#[async_trait]
impl ExpenseRepo for MemRepo {
    async fn get_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .expenses
            .get(&(user_id, user_expense_id))
            .cloned()
            .ok_or(ExpenseNotFound(user_id, user_expense_id))
    }

    async fn get_expenses(
        &self,
        user_id: UserId,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Expense>, ExpenseRepoError> {
        let read_guard = self.read_lock()?;

        let mut expenses: Box<dyn Iterator<Item = &Expense> + '_> = Box::new(
            read_guard
                .expenses
                .range((user_id, i32::MIN)..=(user_id, i32::MAX))
                .rev()
                .map(|(_, e)| e)
                .filter(|e| filter.matches(e)),
        );

        if let Some(page_options) = page_options {
            expenses = Box::new(
                expenses
                    .skip(page_options.offset as usize)
                    .take(page_options.limit as usize),
            );
        }

        Ok(expenses.cloned().collect())
    }

    async fn create_expense(
        &self,
        user_id: UserId,
        new_expense: NewExpense,
    ) -> Result<Expense, ExpenseRepoError> {
        let new_expense = new_expense.normalize()?;
        let mut write_guard = self.write_lock()?;

        if !write_guard.users.contains_key(&user_id) {
            return Err(UserNotFound(user_id));
        }

        let user_expense_id = write_guard
            .expenses
            .range((user_id, i32::MIN)..=(user_id, i32::MAX))
            .next_back()
            .map(|((_, id), _)| id + 1)
            .unwrap_or(1);

        let expense = new_expense.to_expense(user_id, user_expense_id, Utc::now());
        write_guard
            .expenses
            .insert((user_id, user_expense_id), expense.clone());
        Ok(expense)
    }

    async fn delete_expense(
        &self,
        user_id: UserId,
        user_expense_id: i32,
    ) -> Result<Expense, ExpenseRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .expenses
            .remove(&(user_id, user_expense_id))
            .ok_or(ExpenseNotFound(user_id, user_expense_id))
    }

    async fn get_categories(&self, user_id: UserId) -> Result<Vec<String>, ExpenseRepoError> {
        let categories: BTreeSet<String> = self
            .get_expenses(user_id, Filter::NONE, None)
            .await?
            .into_iter()
            .map(|e| e.category)
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn get_total(
        &self,
        user_id: UserId,
        filter: Filter,
    ) -> Result<Decimal, ExpenseRepoError> {
        let total = self
            .get_expenses(user_id, filter, None)
            .await?
            .into_iter()
            .map(|e| e.amount)
            .sum::<Decimal>();
        Ok(total)
    }
}
