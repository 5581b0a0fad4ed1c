use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::params;
use serde::Serialize;
use uuid::Uuid;

use crate::db::repositories::impulse_repository::{ImpulseRepository, ImpulseRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::impulse::{Impulse, ImpulseCreateInput, ImpulseKind, ImpulseUpdateInput};
use crate::services::date_utils;
use crate::services::score_service::{self, DailyBucket, ScoreTotals};
use crate::services::week_range::{self, WeekRange};

/// One history page, ready for direct display: week totals, a dense
/// seven-bucket chart series, the scale denominator, and the week's
/// impulses newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekHistory {
    pub range: WeekRange,
    pub totals: ScoreTotals,
    pub buckets: Vec<DailyBucket>,
    pub max_daily_count: u32,
    pub impulses: Vec<Impulse>,
}

pub struct ImpulseService {
    db: DbPool,
}

impl ImpulseService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn log_impulse(&self, input: ImpulseCreateInput) -> AppResult<Impulse> {
        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::validation("Impulse description cannot be empty"));
        }

        let created_at = date_utils::parse_optional_timestamp(input.created_at.as_ref())?
            .unwrap_or_else(Utc::now);
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let row = ImpulseRow {
            id: id.clone(),
            goal_id: input.goal_id.clone(),
            description,
            kind: input.kind.as_str().to_string(),
            acted_on: input.acted_on,
            notes: input.notes.as_ref().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: date_utils::format_timestamp(created_at),
            updated_at: date_utils::format_timestamp(now),
        };

        self.db.with_connection(|conn| {
            let goal_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM goals WHERE id = ?)",
                params![&input.goal_id],
                |row| row.get(0),
            )?;
            if !goal_exists {
                return Err(AppError::validation(format!(
                    "Goal not found: {}",
                    input.goal_id
                )));
            }

            ImpulseRepository::insert(conn, &row)
        })?;

        self.get_impulse(&id)
    }

    pub fn get_impulse(&self, id: &str) -> AppResult<Impulse> {
        let row = self
            .db
            .with_connection(|conn| ImpulseRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        row_to_impulse(row)
    }

    pub fn update_impulse(&self, id: &str, input: ImpulseUpdateInput) -> AppResult<Impulse> {
        let mut impulse = self.get_impulse(id)?;

        if let Some(description) = input.description {
            let description = description.trim().to_string();
            if description.is_empty() {
                return Err(AppError::validation("Impulse description cannot be empty"));
            }
            impulse.description = description;
        }
        if let Some(kind) = input.kind {
            impulse.kind = kind;
        }
        if let Some(acted_on) = input.acted_on {
            impulse.acted_on = acted_on;
        }
        if let Some(notes) = input.notes {
            impulse.notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        }
        impulse.updated_at = Utc::now();

        let row = impulse_to_row(&impulse);
        self.db
            .with_connection(|conn| ImpulseRepository::update(conn, &row))?;

        Ok(impulse)
    }

    pub fn delete_impulse(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| ImpulseRepository::delete(conn, id))
    }

    /// Impulses in `[from, to]`, newest first.
    pub fn list_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Impulse>> {
        let rows = self.db.with_connection(|conn| {
            ImpulseRepository::list_between(
                conn,
                &date_utils::format_timestamp(from),
                &date_utils::format_timestamp(to),
            )
        })?;

        rows.into_iter().map(row_to_impulse).collect()
    }

    /// The calendar day containing `now`.
    pub fn list_today(&self, now: DateTime<Utc>) -> AppResult<Vec<Impulse>> {
        self.list_range(date_utils::start_of_day(now), date_utils::end_of_day(now))
    }

    /// The Monday-start week containing `ref_date`, aggregated for the
    /// history view. Step `ref_date` by ±7 days to page.
    pub fn week_history(&self, ref_date: NaiveDate) -> AppResult<WeekHistory> {
        let range = week_range::week_range_containing(ref_date);
        let impulses = self.list_range(range.start, range.end)?;

        let totals = score_service::score(&impulses);
        let buckets = score_service::bucket_by_day(
            &impulses,
            range.start.date_naive(),
            range.end.date_naive(),
        );
        let max_daily_count = score_service::max_daily_count(&buckets);

        Ok(WeekHistory {
            range,
            totals,
            buckets,
            max_daily_count,
            impulses,
        })
    }
}

fn row_to_impulse(row: ImpulseRow) -> AppResult<Impulse> {
    let kind = ImpulseKind::from_str(&row.kind).map_err(AppError::validation)?;
    Ok(Impulse {
        id: row.id,
        goal_id: row.goal_id,
        description: row.description,
        kind,
        acted_on: row.acted_on,
        notes: row.notes,
        created_at: date_utils::parse_timestamp(&row.created_at)?,
        updated_at: date_utils::parse_timestamp(&row.updated_at)?,
    })
}

fn impulse_to_row(impulse: &Impulse) -> ImpulseRow {
    ImpulseRow {
        id: impulse.id.clone(),
        goal_id: impulse.goal_id.clone(),
        description: impulse.description.clone(),
        kind: impulse.kind.as_str().to_string(),
        acted_on: impulse.acted_on,
        notes: impulse.notes.clone(),
        created_at: date_utils::format_timestamp(impulse.created_at),
        updated_at: date_utils::format_timestamp(impulse.updated_at),
    }
}
