use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContributionStatus::Pending => "pending",
            ContributionStatus::Approved => "approved",
            ContributionStatus::Rejected => "rejected",
        }
    }

    /// The only legal moves are pending -> approved and pending -> rejected.
    pub fn can_transition_to(self, next: ContributionStatus) -> bool {
        matches!(
            (self, next),
            (ContributionStatus::Pending, ContributionStatus::Approved)
                | (ContributionStatus::Pending, ContributionStatus::Rejected)
        )
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContributionStatus::Pending),
            "approved" => Ok(ContributionStatus::Approved),
            "rejected" => Ok(ContributionStatus::Rejected),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Self-reported payment channel. Nothing here is verified against a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Bkash,
    Nagad,
    Bank,
    Rocket,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Bkash,
        PaymentMethod::Nagad,
        PaymentMethod::Bank,
        PaymentMethod::Rocket,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Bkash => "bkash",
            PaymentMethod::Nagad => "nagad",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Rocket => "rocket",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub method: Option<PaymentMethod>,
    pub reference_id: Option<String>,
    pub status: ContributionStatus,
    pub note: Option<String>,
    pub screenshot_url: Option<String>,
    pub month: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
}

/// Contribution joined with the owning member's contact details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionWithMember {
    #[serde(flatten)]
    pub contribution: Contribution,
    pub member_name: Option<String>,
    pub member_phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContribution {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub screenshot_url: Option<String>,
    pub month: Option<String>,
    pub status: ContributionStatus,
}

/// An admin's decision on a pending contribution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub decision: ContributionStatus,
    pub resolved_by: Uuid,
    pub rejected_reason: Option<String>,
}

// Raw row shape; status and method are plain text columns.
#[derive(Debug, sqlx::FromRow)]
pub struct ContributionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub method: Option<String>,
    pub reference_id: Option<String>,
    pub status: String,
    pub note: Option<String>,
    pub screenshot_url: Option<String>,
    pub month: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ContributionMemberRow {
    #[sqlx(flatten)]
    pub row: ContributionRow,
    pub member_name: Option<String>,
    pub member_phone: Option<String>,
}

impl TryFrom<ContributionRow> for Contribution {
    type Error = sqlx::Error;

    fn try_from(row: ContributionRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ContributionStatus>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let method = row
            .method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Contribution {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            date: row.date,
            method,
            reference_id: row.reference_id,
            status,
            note: row.note,
            screenshot_url: row.screenshot_url,
            month: row.month,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            rejected_reason: row.rejected_reason,
        })
    }
}

impl TryFrom<ContributionMemberRow> for ContributionWithMember {
    type Error = sqlx::Error;

    fn try_from(row: ContributionMemberRow) -> Result<Self, Self::Error> {
        Ok(ContributionWithMember {
            contribution: row.row.try_into()?,
            member_name: row.member_name,
            member_phone: row.member_phone,
        })
    }
}
