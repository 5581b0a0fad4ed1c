use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::goal::{Goal, GoalCreateInput, GoalUpdateInput};

pub struct GoalService {
    db: DbPool,
}

impl GoalService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_goal(&self, input: GoalCreateInput) -> AppResult<Goal> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Goal title cannot be empty"));
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        self.db.with_connection(|conn| {
            // New goals go to the end of the list.
            let next_order: i64 = conn.query_row(
                "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM goals",
                [],
                |row| row.get(0),
            )?;

            conn.execute(
                r#"
                INSERT INTO goals (id, title, image_url, sort_order, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    &id,
                    &title,
                    &input.image_url,
                    next_order,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                ],
            )?;

            Ok(())
        })?;

        self.get_goal(&id)
    }

    pub fn get_goal(&self, id: &str) -> AppResult<Goal> {
        self.db.with_connection(|conn| {
            Ok(conn.query_row(
                r#"
                SELECT id, title, image_url, sort_order, created_at, updated_at
                FROM goals
                WHERE id = ?
                "#,
                params![id],
                Self::map_goal_row,
            )?)
        })
    }

    pub fn list_goals(&self) -> AppResult<Vec<Goal>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, image_url, sort_order, created_at, updated_at
                 FROM goals ORDER BY sort_order ASC, title ASC",
            )?;

            let goals = stmt.query_map([], Self::map_goal_row)?;

            Ok(goals.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_goal(&self, id: &str, input: GoalUpdateInput) -> AppResult<Goal> {
        self.db.with_connection(|conn| {
            let now = Utc::now();

            let mut updates = Vec::new();
            let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(title) = input.title {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(AppError::validation("Goal title cannot be empty"));
                }
                updates.push("title = ?");
                params_vec.push(Box::new(title));
            }
            if let Some(image_url) = input.image_url {
                updates.push("image_url = ?");
                params_vec.push(Box::new(image_url));
            }

            if updates.is_empty() {
                return Ok(());
            }

            updates.push("updated_at = ?");
            params_vec.push(Box::new(now.to_rfc3339()));
            params_vec.push(Box::new(id.to_string()));

            let query = format!("UPDATE goals SET {} WHERE id = ?", updates.join(", "));

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            let affected = conn.execute(&query, params_refs.as_slice())?;

            if affected == 0 {
                return Err(AppError::not_found());
            }

            Ok(())
        })?;

        self.get_goal(id)
    }

    /// Deleting a goal keeps its impulses; the history view shows them
    /// with an unknown goal.
    pub fn delete_goal(&self, id: &str) -> AppResult<()> {
        self.db.with_connection(|conn| {
            let affected = conn.execute("DELETE FROM goals WHERE id = ?", params![id])?;

            if affected == 0 {
                return Err(AppError::not_found());
            }

            Ok(())
        })
    }

    /// Rewrite sort positions to match the given id order.
    pub fn reorder_goals(&self, ordered_ids: &[String]) -> AppResult<Vec<Goal>> {
        self.db.with_connection(|conn| {
            let now = Utc::now();
            for (index, id) in ordered_ids.iter().enumerate() {
                let affected = conn.execute(
                    "UPDATE goals SET sort_order = ?, updated_at = ? WHERE id = ?",
                    params![index as i64, now.to_rfc3339(), id],
                )?;
                if affected == 0 {
                    return Err(AppError::validation(format!("Unknown goal id: {}", id)));
                }
            }
            Ok(())
        })?;

        self.list_goals()
    }

    fn map_goal_row(row: &rusqlite::Row) -> Result<Goal, rusqlite::Error> {
        Ok(Goal {
            id: row.get(0)?,
            title: row.get(1)?,
            image_url: row.get(2)?,
            sort_order: row.get(3)?,
            created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<_, String>(4)?)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<_, String>(5)?)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
