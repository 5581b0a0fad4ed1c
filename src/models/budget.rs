use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Renewal period of a budget. The persisted strings are part of the record
/// store layout and must round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetPeriod {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "fortnightly")]
    Fortnightly,
    #[serde(rename = "4-weekly")]
    FourWeekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Fortnightly => "fortnightly",
            BudgetPeriod::FourWeekly => "4-weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "fortnightly" => Ok(BudgetPeriod::Fortnightly),
            "4-weekly" => Ok(BudgetPeriod::FourWeekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            _ => Err(AppError::validation(format!("Invalid budget period: {}", s))),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Spending,
    Subscription,
}

impl BudgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetKind::Spending => "spending",
            BudgetKind::Subscription => "subscription",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "spending" => Ok(BudgetKind::Spending),
            "subscription" => Ok(BudgetKind::Subscription),
            _ => Err(format!("Invalid budget kind: {}", s)),
        }
    }
}

/// A recurring budget. `renew_anchor` is the date that fixes the cycle:
/// its weekday for weekly periods, its day-of-month for monthly periods,
/// and the exact phase origin for fortnightly / 4-weekly periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub kind: BudgetKind,
    pub period: BudgetPeriod,
    pub goal_amount: f64,
    pub renew_anchor: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a budget. `period` and `renew_anchor` arrive as the
/// persisted string forms and are parsed by the service; a missing anchor
/// gets a period-appropriate default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCreateInput {
    pub name: String,
    pub kind: Option<BudgetKind>,
    pub period: String,
    pub goal_amount: f64,
    pub renew_anchor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdateInput {
    pub name: Option<String>,
    pub kind: Option<BudgetKind>,
    pub period: Option<String>,
    pub goal_amount: Option<f64>,
    pub renew_anchor: Option<String>,
}
