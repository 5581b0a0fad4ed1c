use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ImpulseRow {
    pub id: String,
    pub goal_id: String,
    pub description: String,
    pub kind: String,
    pub acted_on: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for ImpulseRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            goal_id: row.get("goal_id")?,
            description: row.get("description")?,
            kind: row.get("kind")?,
            acted_on: row.get("acted_on")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, goal_id, description, kind, acted_on, notes, created_at, updated_at";

pub struct ImpulseRepository;

impl ImpulseRepository {
    pub fn insert(conn: &Connection, row: &ImpulseRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO impulses (id, goal_id, description, kind, acted_on, notes, created_at, updated_at)
                VALUES (:id, :goal_id, :description, :kind, :acted_on, :notes, :created_at, :updated_at)
            "#,
            named_params! {
                ":id": row.id,
                ":goal_id": row.goal_id,
                ":description": row.description,
                ":kind": row.kind,
                ":acted_on": row.acted_on,
                ":notes": row.notes,
                ":created_at": row.created_at,
                ":updated_at": row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<ImpulseRow>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM impulses WHERE id = ?1");
        let mut stmt = conn.prepare(&sql)?;

        let row = stmt
            .query_row([id], |row| ImpulseRow::try_from(row))
            .optional()?;

        Ok(row)
    }

    /// Impulses whose timestamps fall in `[from, to]`, newest first. The
    /// bounds are RFC 3339 UTC strings, which order lexicographically.
    pub fn list_between(conn: &Connection, from: &str, to: &str) -> AppResult<Vec<ImpulseRow>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM impulses
             WHERE created_at >= :from AND created_at <= :to
             ORDER BY created_at DESC"
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(
                named_params! {":from": from, ":to": to},
                |row| ImpulseRow::try_from(row),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn update(conn: &Connection, row: &ImpulseRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE impulses SET
                    description = :description,
                    kind = :kind,
                    acted_on = :acted_on,
                    notes = :notes,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": row.id,
                ":description": row.description,
                ":kind": row.kind,
                ":acted_on": row.acted_on,
                ":notes": row.notes,
                ":updated_at": row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM impulses WHERE id = ?1", [id])?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
