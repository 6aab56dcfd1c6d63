//! Contribution lifecycle, expense register and fund summary.
//!
//! Every operation takes the caller's [`Identity`] as already verified by the
//! auth layer, applies the role rules from [`access`] before touching the
//! store, and issues a single repository call for each write.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub mod access;
pub mod validate;

use access::Identity;

use crate::db::contribution::{
    Contribution, ContributionStatus, ContributionWithMember, NewContribution, PaymentMethod,
    Resolution,
};
use crate::db::expense::{Expense, ExpenseWithWithdrawer, NewExpense};
use crate::db::LedgerRepository;
use crate::error::{LedgerError, LedgerResult};

/// A member's self-reported payment, waiting for review.
#[derive(Debug, Clone)]
pub struct ContributionSubmission {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_id: Option<String>,
    pub month: Option<String>,
    pub screenshot_url: Option<String>,
}

/// A payment an admin enters on a member's behalf.
#[derive(Debug, Clone)]
pub struct ManualContribution {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExpenseEntry {
    pub amount: Decimal,
    pub purpose: Option<String>,
    pub withdrawn_by_user_id: Option<Uuid>,
    pub receipt_url: Option<String>,
    pub note: Option<String>,
}

/// Derived fund position. Amounts stay decimal until serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_fund: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_balance: Decimal,
}

pub struct LedgerService {
    repo: Arc<dyn LedgerRepository>,
}

impl LedgerService {
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        Self { repo }
    }

    pub async fn submit_contribution(
        &self,
        actor: &Identity,
        submission: ContributionSubmission,
    ) -> LedgerResult<Contribution> {
        let amount = validate::check_amount(submission.amount)?;
        let month = validate::check_month(submission.month)?;
        let reference_id = validate::reference_id(submission.reference_id)?;

        let contribution = self
            .repo
            .insert_contribution(NewContribution {
                user_id: actor.id,
                amount,
                method: submission.method,
                reference_id,
                note: None,
                screenshot_url: submission.screenshot_url,
                month,
                status: ContributionStatus::Pending,
            })
            .await?;

        tracing::info!(
            contribution_id = %contribution.id,
            user_id = %actor.id,
            amount = %contribution.amount,
            "contribution submitted for approval"
        );
        Ok(contribution)
    }

    /// Admin entries skip review: they are stored approved, with no
    /// screenshot and no recorded approver.
    pub async fn record_manual_contribution(
        &self,
        actor: &Identity,
        entry: ManualContribution,
    ) -> LedgerResult<Contribution> {
        access::require_admin(actor, "record manual contributions")?;
        let amount = validate::check_amount(entry.amount)?;
        let reference_id = validate::reference_id(entry.reference_id)?;

        let contribution = self
            .repo
            .insert_contribution(NewContribution {
                user_id: entry.user_id,
                amount,
                method: entry.method,
                reference_id,
                note: validate::non_blank(entry.note),
                screenshot_url: None,
                month: None,
                status: ContributionStatus::Approved,
            })
            .await?;

        tracing::info!(
            contribution_id = %contribution.id,
            user_id = %entry.user_id,
            admin_id = %actor.id,
            amount = %contribution.amount,
            "manual contribution recorded"
        );
        Ok(contribution)
    }

    pub async fn list_contributions(
        &self,
        actor: &Identity,
        status_filter: Option<&str>,
    ) -> LedgerResult<Vec<ContributionWithMember>> {
        let scope = access::contribution_scope(actor, status_filter)?;
        Ok(self.repo.list_contributions(scope.status_filter()).await?)
    }

    pub async fn list_my_contributions(&self, actor: &Identity) -> LedgerResult<Vec<Contribution>> {
        Ok(self.repo.list_user_contributions(actor.id).await?)
    }

    /// Moves a pending contribution to `decision`. A contribution that is
    /// already approved or rejected is left untouched and reported as a
    /// conflict.
    pub async fn resolve_contribution(
        &self,
        actor: &Identity,
        contribution_id: Uuid,
        decision: &str,
        rejected_reason: Option<String>,
    ) -> LedgerResult<Contribution> {
        access::require_admin(actor, "approve or reject contributions")?;
        let decision = validate::parse_decision(decision)?;

        let resolution = Resolution {
            decision,
            resolved_by: actor.id,
            rejected_reason: match decision {
                ContributionStatus::Rejected => validate::non_blank(rejected_reason),
                _ => None,
            },
        };

        if let Some(contribution) = self
            .repo
            .resolve_pending_contribution(contribution_id, &resolution)
            .await?
        {
            tracing::info!(
                contribution_id = %contribution.id,
                admin_id = %actor.id,
                status = %contribution.status,
                "contribution resolved"
            );
            return Ok(contribution);
        }

        match self.repo.contribution_status(contribution_id).await? {
            None => Err(LedgerError::NotFound("Contribution not found".to_string())),
            Some(current) => {
                tracing::warn!(
                    contribution_id = %contribution_id,
                    admin_id = %actor.id,
                    current = %current,
                    requested = %decision,
                    "contribution already resolved"
                );
                Err(LedgerError::Conflict(format!(
                    "Contribution is already {current}"
                )))
            }
        }
    }

    /// Expenses take effect immediately; there is no review step.
    pub async fn record_expense(&self, actor: &Identity, entry: ExpenseEntry) -> LedgerResult<Expense> {
        access::require_admin(actor, "record expenses")?;
        let amount = validate::check_amount(entry.amount)?;
        let purpose = validate::required_text("Purpose", entry.purpose)?;
        let receipt_url = validate::receipt_url(entry.receipt_url)?;

        let expense = self
            .repo
            .insert_expense(NewExpense {
                amount,
                purpose,
                withdrawn_by_user_id: entry.withdrawn_by_user_id.unwrap_or(actor.id),
                receipt_url,
                note: validate::non_blank(entry.note),
            })
            .await?;

        tracing::info!(
            expense_id = %expense.id,
            admin_id = %actor.id,
            amount = %expense.amount,
            "expense recorded"
        );
        Ok(expense)
    }

    pub async fn list_expenses(&self) -> LedgerResult<Vec<ExpenseWithWithdrawer>> {
        Ok(self.repo.list_expenses().await?)
    }

    /// Recomputed from the rows on every call.
    pub async fn compute_summary(&self) -> LedgerResult<FinancialSummary> {
        let totals = self.repo.totals().await?;
        Ok(FinancialSummary {
            total_fund: totals.total_fund,
            total_expenses: totals.total_expenses,
            current_balance: totals.total_fund - totals.total_expenses,
        })
    }

    pub async fn ping(&self) -> LedgerResult<()> {
        Ok(self.repo.ping().await?)
    }
}
