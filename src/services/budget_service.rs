use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::repositories::budget_repository::{BudgetRepository, BudgetRow};
use crate::db::repositories::transaction_repository::{TransactionRepository, TransactionRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::budget::{
    Budget, BudgetCreateInput, BudgetKind, BudgetPeriod, BudgetUpdateInput,
};
use crate::models::transaction::{Transaction, TransactionCreateInput};
use crate::services::cycle_service::{self, AnchorInput, CycleWindow};
use crate::services::date_utils;

/// Default renewal weekday when a budget switches to weekly without an
/// explicit anchor: Monday, matching the picker default.
const DEFAULT_WEEKLY_RENEWAL_DAY: u8 = 1;

/// A budget joined with its derived current cycle and the spend inside
/// it. Never persisted; recomputed on every read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCycleOverview {
    pub budget: Budget,
    pub window: CycleWindow,
    pub spent: f64,
    pub remaining: f64,
}

pub struct BudgetService {
    db: DbPool,
}

impl BudgetService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_budget(&self, input: BudgetCreateInput) -> AppResult<Budget> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Budget name cannot be empty"));
        }
        if !(input.goal_amount > 0.0) {
            return Err(AppError::validation("Budget amount must be greater than 0"));
        }

        let period = BudgetPeriod::from_str(&input.period)?;
        let today = Utc::now().date_naive();
        let anchor = match input.renew_anchor.as_deref() {
            Some(raw) => date_utils::parse_iso_date(raw)?,
            Option::None => default_anchor(period, today)?,
        };

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let row = BudgetRow {
            id: id.clone(),
            name,
            kind: input.kind.unwrap_or(BudgetKind::Spending).as_str().to_string(),
            period: period.as_str().to_string(),
            goal_amount: input.goal_amount,
            renew_anchor: date_utils::format_iso_date(anchor),
            created_at: date_utils::format_timestamp(now),
            updated_at: date_utils::format_timestamp(now),
        };

        self.db.with_connection(|conn| BudgetRepository::insert(conn, &row))?;

        self.get_budget(&id)
    }

    pub fn get_budget(&self, id: &str) -> AppResult<Budget> {
        let row = self
            .db
            .with_connection(|conn| BudgetRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        row_to_budget(row)
    }

    pub fn list_budgets(&self) -> AppResult<Vec<Budget>> {
        let rows = self.db.with_connection(BudgetRepository::list)?;
        rows.into_iter().map(row_to_budget).collect()
    }

    /// A new anchor supplied here takes effect for the *current* window
    /// immediately: fortnightly / 4-weekly cycles re-phase on the spot
    /// rather than at the next renewal.
    pub fn update_budget(&self, id: &str, input: BudgetUpdateInput) -> AppResult<Budget> {
        let mut budget = self.get_budget(id)?;
        let today = Utc::now().date_naive();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Budget name cannot be empty"));
            }
            budget.name = name;
        }
        if let Some(kind) = input.kind {
            budget.kind = kind;
        }
        if let Some(goal_amount) = input.goal_amount {
            if !(goal_amount > 0.0) {
                return Err(AppError::validation("Budget amount must be greater than 0"));
            }
            budget.goal_amount = goal_amount;
        }

        let period_changed = match input.period.as_deref() {
            Some(raw) => {
                let period = BudgetPeriod::from_str(raw)?;
                let changed = period != budget.period;
                budget.period = period;
                changed
            }
            Option::None => false,
        };

        match input.renew_anchor.as_deref() {
            Some(raw) => budget.renew_anchor = date_utils::parse_iso_date(raw)?,
            Option::None if period_changed => {
                // A period switch invalidates the old anchor's meaning;
                // fall back to the period's default.
                budget.renew_anchor = default_anchor(budget.period, today)?;
            }
            Option::None => {}
        }

        budget.updated_at = Utc::now();
        let row = budget_to_row(&budget);
        self.db.with_connection(|conn| BudgetRepository::update(conn, &row))?;

        Ok(budget)
    }

    /// Removes the budget's transactions first, then the budget itself.
    pub fn delete_budget(&self, id: &str) -> AppResult<()> {
        self.db.with_connection(|conn| {
            TransactionRepository::delete_for_budget(conn, id)?;
            BudgetRepository::delete(conn, id)
        })
    }

    pub fn add_transaction(&self, input: TransactionCreateInput) -> AppResult<Transaction> {
        if !(input.amount > 0.0) {
            return Err(AppError::validation(
                "Transaction amount must be greater than 0",
            ));
        }

        // The budget must exist; transactions against a deleted budget
        // would never surface anywhere.
        self.get_budget(&input.budget_id)?;

        let created_at = date_utils::parse_optional_timestamp(input.created_at.as_ref())?
            .unwrap_or_else(Utc::now);

        let row = TransactionRow {
            id: Uuid::new_v4().to_string(),
            budget_id: input.budget_id.clone(),
            amount: input.amount,
            description: input
                .description
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: date_utils::format_timestamp(created_at),
        };

        self.db.with_connection(|conn| TransactionRepository::insert(conn, &row))?;

        row_to_transaction(row)
    }

    pub fn list_transactions(&self, budget_id: &str) -> AppResult<Vec<Transaction>> {
        let rows = self
            .db
            .with_connection(|conn| TransactionRepository::list_for_budget(conn, budget_id))?;
        rows.into_iter().map(row_to_transaction).collect()
    }

    /// The budget's current cycle as of `today`, with the spend recorded
    /// inside it. Derived entirely from the stored anchor.
    pub fn cycle_overview(&self, budget_id: &str, today: NaiveDate) -> AppResult<BudgetCycleOverview> {
        let budget = self.get_budget(budget_id)?;
        let window = cycle_service::current_cycle_window(budget.period, budget.renew_anchor, today);

        let spent = self.db.with_connection(|conn| {
            TransactionRepository::sum_for_budget_between(
                conn,
                budget_id,
                &date_utils::format_timestamp(date_utils::day_start(window.start)),
                &date_utils::format_timestamp(date_utils::day_end(window.end)),
            )
        })?;

        let remaining = budget.goal_amount - spent;
        Ok(BudgetCycleOverview {
            budget,
            window,
            spent,
            remaining,
        })
    }
}

fn default_anchor(period: BudgetPeriod, today: NaiveDate) -> AppResult<NaiveDate> {
    let input = match period {
        BudgetPeriod::Weekly => AnchorInput::Weekday(DEFAULT_WEEKLY_RENEWAL_DAY),
        BudgetPeriod::Fortnightly | BudgetPeriod::FourWeekly => AnchorInput::StartDate(today),
        BudgetPeriod::Monthly => AnchorInput::Today,
    };
    cycle_service::retarget_anchor(period, input, today)
}

fn row_to_budget(row: BudgetRow) -> AppResult<Budget> {
    let kind = BudgetKind::from_str(&row.kind).map_err(AppError::validation)?;
    let period = BudgetPeriod::from_str(&row.period)?;
    Ok(Budget {
        id: row.id,
        name: row.name,
        kind,
        period,
        goal_amount: row.goal_amount,
        renew_anchor: date_utils::parse_iso_date(&row.renew_anchor)?,
        created_at: date_utils::parse_timestamp(&row.created_at)?,
        updated_at: date_utils::parse_timestamp(&row.updated_at)?,
    })
}

fn budget_to_row(budget: &Budget) -> BudgetRow {
    BudgetRow {
        id: budget.id.clone(),
        name: budget.name.clone(),
        kind: budget.kind.as_str().to_string(),
        period: budget.period.as_str().to_string(),
        goal_amount: budget.goal_amount,
        renew_anchor: date_utils::format_iso_date(budget.renew_anchor),
        created_at: date_utils::format_timestamp(budget.created_at),
        updated_at: date_utils::format_timestamp(budget.updated_at),
    }
}

fn row_to_transaction(row: TransactionRow) -> AppResult<Transaction> {
    Ok(Transaction {
        created_at: date_utils::parse_timestamp(&row.created_at)?,
        id: row.id,
        budget_id: row.budget_id,
        amount: row.amount,
        description: row.description,
    })
}
