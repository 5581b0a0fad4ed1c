use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct TransactionRow {
    pub id: String,
    pub budget_id: String,
    pub amount: f64,
    pub description: Option<String>,
    pub created_at: String,
}

impl TryFrom<&Row<'_>> for TransactionRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            budget_id: row.get("budget_id")?,
            amount: row.get("amount")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct TransactionRepository;

impl TransactionRepository {
    pub fn insert(conn: &Connection, row: &TransactionRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO transactions (id, budget_id, amount, description, created_at)
                VALUES (:id, :budget_id, :amount, :description, :created_at)
            "#,
            named_params! {
                ":id": row.id,
                ":budget_id": row.budget_id,
                ":amount": row.amount,
                ":description": row.description,
                ":created_at": row.created_at,
            },
        )?;

        Ok(())
    }

    pub fn list_for_budget(conn: &Connection, budget_id: &str) -> AppResult<Vec<TransactionRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, budget_id, amount, description, created_at FROM transactions
             WHERE budget_id = ?1
             ORDER BY created_at DESC",
        )?;

        let rows = stmt
            .query_map([budget_id], |row| TransactionRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Sum of amounts for a budget in `[from, to]` (RFC 3339 UTC bounds).
    pub fn sum_for_budget_between(
        conn: &Connection,
        budget_id: &str,
        from: &str,
        to: &str,
    ) -> AppResult<f64> {
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions
             WHERE budget_id = :budget_id AND created_at >= :from AND created_at <= :to",
            named_params! {":budget_id": budget_id, ":from": from, ":to": to},
            |row| row.get(0),
        )?;

        Ok(total)
    }

    pub fn delete_for_budget(conn: &Connection, budget_id: &str) -> AppResult<usize> {
        let affected = conn.execute("DELETE FROM transactions WHERE budget_id = ?1", [budget_id])?;
        Ok(affected)
    }
}
