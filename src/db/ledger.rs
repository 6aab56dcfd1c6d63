use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::contribution::{
    Contribution, ContributionMemberRow, ContributionRow, ContributionStatus,
    ContributionWithMember, NewContribution, Resolution,
};
use super::expense::{Expense, ExpenseWithWithdrawer, LedgerTotals, NewExpense};
use super::LedgerRepository;

// Database repository
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn insert_contribution(&self, new: NewContribution) -> Result<Contribution, sqlx::Error> {
        sqlx::query_as::<_, ContributionRow>(
            r#"
            INSERT INTO contributions
                (id, user_id, amount, method, reference_id, note, screenshot_url, month, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.amount)
        .bind(new.method.as_str())
        .bind(new.reference_id)
        .bind(new.note)
        .bind(new.screenshot_url)
        .bind(new.month)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    async fn list_contributions(
        &self,
        status: Option<ContributionStatus>,
    ) -> Result<Vec<ContributionWithMember>, sqlx::Error> {
        let mut query_builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.*, u.name AS member_name, u.phone AS member_phone
            FROM contributions c
            LEFT JOIN users u ON c.user_id = u.id
            "#,
        );
        if let Some(status) = status {
            query_builder.push(" WHERE c.status = ").push_bind(status.as_str());
        }
        query_builder.push(" ORDER BY c.date DESC, c.id DESC");

        query_builder
            .build_query_as::<ContributionMemberRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContributionWithMember::try_from)
            .collect()
    }

    async fn list_user_contributions(&self, user_id: Uuid) -> Result<Vec<Contribution>, sqlx::Error> {
        sqlx::query_as::<_, ContributionRow>(
            "SELECT * FROM contributions WHERE user_id = $1 ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Contribution::try_from)
        .collect()
    }

    async fn resolve_pending_contribution(
        &self,
        id: Uuid,
        resolution: &Resolution,
    ) -> Result<Option<Contribution>, sqlx::Error> {
        // status, approver and timestamp move together in one conditional update
        sqlx::query_as::<_, ContributionRow>(
            r#"
            UPDATE contributions
            SET status = $1, approved_by = $2, approved_at = NOW(), rejected_reason = $3
            WHERE id = $4 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(resolution.decision.as_str())
        .bind(resolution.resolved_by)
        .bind(resolution.rejected_reason.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Contribution::try_from)
        .transpose()
    }

    async fn contribution_status(&self, id: Uuid) -> Result<Option<ContributionStatus>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT status FROM contributions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|status| {
                status
                    .parse::<ContributionStatus>()
                    .map_err(|err| sqlx::Error::Decode(Box::new(err)))
            })
            .transpose()
    }

    async fn insert_expense(&self, new: NewExpense) -> Result<Expense, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, amount, purpose, withdrawn_by_user_id, receipt_url, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.amount)
        .bind(new.purpose)
        .bind(new.withdrawn_by_user_id)
        .bind(new.receipt_url)
        .bind(new.note)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_expenses(&self) -> Result<Vec<ExpenseWithWithdrawer>, sqlx::Error> {
        sqlx::query_as::<_, ExpenseWithWithdrawer>(
            r#"
            SELECT e.*, u.name AS withdrawn_by_name
            FROM expenses e
            LEFT JOIN users u ON e.withdrawn_by_user_id = u.id
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn totals(&self) -> Result<LedgerTotals, sqlx::Error> {
        sqlx::query_as::<_, LedgerTotals>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE status = 'approved') AS total_fund,
                (SELECT COALESCE(SUM(amount), 0) FROM expenses) AS total_expenses
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
