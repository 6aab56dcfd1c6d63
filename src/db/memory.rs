//! In-memory ledger store used by the unit and route tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::contribution::{
    Contribution, ContributionStatus, ContributionWithMember, NewContribution, Resolution,
};
use super::expense::{Expense, ExpenseWithWithdrawer, LedgerTotals, NewExpense};
use super::LedgerRepository;

#[derive(Default)]
struct Tables {
    members: HashMap<Uuid, (String, String)>,
    // insertion order doubles as the date tiebreak
    contributions: Vec<Contribution>,
    expenses: Vec<Expense>,
}

#[derive(Default)]
pub struct MemoryLedger {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, id: Uuid, name: &str, phone: &str) {
        self.tables
            .lock()
            .unwrap()
            .members
            .insert(id, (name.to_string(), phone.to_string()));
    }

    /// Makes every following call fail like a dropped connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for MemoryLedger {
    async fn insert_contribution(&self, new: NewContribution) -> Result<Contribution, sqlx::Error> {
        self.check()?;
        let contribution = Contribution {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            amount: new.amount,
            date: Utc::now(),
            method: Some(new.method),
            reference_id: new.reference_id,
            status: new.status,
            note: new.note,
            screenshot_url: new.screenshot_url,
            month: new.month,
            approved_by: None,
            approved_at: None,
            rejected_reason: None,
        };
        self.tables
            .lock()
            .unwrap()
            .contributions
            .push(contribution.clone());
        Ok(contribution)
    }

    async fn list_contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionWithMember>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<(usize, ContributionWithMember)> = tables
            .contributions
            .iter()
            .enumerate()
            .filter(|(_, c)| status.map_or(true, |s| c.status == s))
            .map(|(seq, c)| {
                let member = tables.members.get(&c.user_id);
                (
                    seq,
                    ContributionWithMember {
                        contribution: c.clone(),
                        member_name: member.map(|(name, _)| name.clone()),
                        member_phone: member.map(|(_, phone)| phone.clone()),
                    },
                )
            })
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.contribution
                .date
                .cmp(&a.contribution.date)
                .then(b_seq.cmp(a_seq))
        });
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn list_user_contributions(&self, user_id: Uuid) -> Result<Vec<Contribution>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<(usize, Contribution)> = tables
            .contributions
            .iter()
            .enumerate()
            .filter(|(_, c)| c.user_id == user_id)
            .map(|(seq, c)| (seq, c.clone()))
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| b.date.cmp(&a.date).then(b_seq.cmp(a_seq)));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn resolve_pending_contribution(
        &self,
        id: Uuid,
        resolution: &Resolution,
    ) -> Result<Option<Contribution>, sqlx::Error> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .contributions
            .iter_mut()
            .find(|c| c.id == id && c.status == ContributionStatus::Pending)
        else {
            return Ok(None);
        };
        row.status = resolution.decision;
        row.approved_by = Some(resolution.resolved_by);
        row.approved_at = Some(Utc::now());
        row.rejected_reason = resolution.rejected_reason.clone();
        Ok(Some(row.clone()))
    }

    async fn contribution_status(&self, id: Uuid) -> Result<Option<ContributionStatus>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .contributions
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status))
    }

    async fn insert_expense(&self, new: NewExpense) -> Result<Expense, sqlx::Error> {
        self.check()?;
        let expense = Expense {
            id: Uuid::new_v4(),
            amount: new.amount,
            purpose: new.purpose,
            withdrawn_by_user_id: Some(new.withdrawn_by_user_id),
            date: Utc::now(),
            receipt_url: new.receipt_url,
            note: new.note,
        };
        self.tables.lock().unwrap().expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list_expenses(&self) -> Result<Vec<ExpenseWithWithdrawer>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<(usize, ExpenseWithWithdrawer)> = tables
            .expenses
            .iter()
            .enumerate()
            .map(|(seq, e)| {
                let withdrawn_by_name = e
                    .withdrawn_by_user_id
                    .and_then(|id| tables.members.get(&id))
                    .map(|(name, _)| name.clone());
                (
                    seq,
                    ExpenseWithWithdrawer {
                        expense: e.clone(),
                        withdrawn_by_name,
                    },
                )
            })
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.expense.date.cmp(&a.expense.date).then(b_seq.cmp(a_seq))
        });
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn totals(&self) -> Result<LedgerTotals, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let total_fund = tables
            .contributions
            .iter()
            .filter(|c| c.status == ContributionStatus::Approved)
            .map(|c| c.amount)
            .sum::<Decimal>();
        let total_expenses = tables.expenses.iter().map(|e| e.amount).sum::<Decimal>();
        Ok(LedgerTotals {
            total_fund,
            total_expenses,
        })
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}
