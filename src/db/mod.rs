use async_trait::async_trait;
use uuid::Uuid;

pub mod contribution;
pub mod expense;
pub mod ledger;

#[cfg(test)]
pub mod memory;

use contribution::{
    Contribution, ContributionStatus, ContributionWithMember, NewContribution, Resolution,
};
use expense::{Expense, ExpenseWithWithdrawer, LedgerTotals, NewExpense};

/// Storage seam for the contributions and expenses tables.
///
/// Every method is a single statement against the store; there is no
/// multi-statement transaction anywhere in the ledger.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn insert_contribution(&self, new: NewContribution) -> Result<Contribution, sqlx::Error>;

    /// Newest first. `None` lists every status.
    async fn list_contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionWithMember>, sqlx::Error>;

    async fn list_user_contributions(&self, user_id: Uuid) -> Result<Vec<Contribution>, sqlx::Error>;

    /// Applies `resolution` only if the row is still pending. `None` means
    /// nothing was updated, either because the row is missing or because it
    /// was already resolved.
    async fn resolve_pending_contribution(
        &self,
        id: Uuid,
        resolution: &Resolution,
    ) -> Result<Option<Contribution>, sqlx::Error>;

    async fn contribution_status(&self, id: Uuid) -> Result<Option<ContributionStatus>, sqlx::Error>;

    async fn insert_expense(&self, new: NewExpense) -> Result<Expense, sqlx::Error>;

    async fn list_expenses(&self) -> Result<Vec<ExpenseWithWithdrawer>, sqlx::Error>;

    async fn totals(&self) -> Result<LedgerTotals, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}
