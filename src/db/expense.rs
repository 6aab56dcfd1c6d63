use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub purpose: String,
    pub withdrawn_by_user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub receipt_url: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ExpenseWithWithdrawer {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub expense: Expense,
    pub withdrawn_by_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub purpose: String,
    pub withdrawn_by_user_id: Uuid,
    pub receipt_url: Option<String>,
    pub note: Option<String>,
}

/// Both ledger sums, read in one statement so they share a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct LedgerTotals {
    pub total_fund: Decimal,
    pub total_expenses: Decimal,
}
