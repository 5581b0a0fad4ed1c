use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct BudgetRow {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub period: String,
    pub goal_amount: f64,
    pub renew_anchor: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for BudgetRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            kind: row.get("kind")?,
            period: row.get("period")?,
            goal_amount: row.get("goal_amount")?,
            renew_anchor: row.get("renew_anchor")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, kind, period, goal_amount, renew_anchor, created_at, updated_at";

pub struct BudgetRepository;

impl BudgetRepository {
    pub fn insert(conn: &Connection, row: &BudgetRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO budgets (id, name, kind, period, goal_amount, renew_anchor, created_at, updated_at)
                VALUES (:id, :name, :kind, :period, :goal_amount, :renew_anchor, :created_at, :updated_at)
            "#,
            named_params! {
                ":id": row.id,
                ":name": row.name,
                ":kind": row.kind,
                ":period": row.period,
                ":goal_amount": row.goal_amount,
                ":renew_anchor": row.renew_anchor,
                ":created_at": row.created_at,
                ":updated_at": row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<BudgetRow>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM budgets WHERE id = ?1");
        let mut stmt = conn.prepare(&sql)?;

        let row = stmt
            .query_row([id], |row| BudgetRow::try_from(row))
            .optional()?;

        Ok(row)
    }

    pub fn list(conn: &Connection) -> AppResult<Vec<BudgetRow>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM budgets ORDER BY name ASC");
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], |row| BudgetRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn update(conn: &Connection, row: &BudgetRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE budgets SET
                    name = :name,
                    kind = :kind,
                    period = :period,
                    goal_amount = :goal_amount,
                    renew_anchor = :renew_anchor,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": row.id,
                ":name": row.name,
                ":kind": row.kind,
                ":period": row.period,
                ":goal_amount": row.goal_amount,
                ":renew_anchor": row.renew_anchor,
                ":updated_at": row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM budgets WHERE id = ?1", [id])?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
