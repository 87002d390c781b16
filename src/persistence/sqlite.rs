//! Database repository for signed-in users.

use super::{QuestionRepository, RepositoryError};
use crate::core::{GameResult, QuestionSet};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Per-user repository backed by SQLite.
///
/// Every operation that reads or writes user data needs an owner. Sets and
/// results are stored as JSON documents keyed by id; saves are upserts.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS question_sets (
                 id TEXT PRIMARY KEY,
                 user_id TEXT NOT NULL,
                 body TEXT NOT NULL,
                 created_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS games (
                 id TEXT PRIMARY KEY,
                 user_id TEXT NOT NULL,
                 set_id TEXT,
                 body TEXT NOT NULL,
                 finished_at TEXT NOT NULL
             );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bodies(&self, sql: &str, owner: &str) -> Result<Vec<String>, RepositoryError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![owner], |row| row.get::<_, String>(0))?;

        let mut bodies = Vec::new();
        for row in rows {
            bodies.push(row?);
        }
        Ok(bodies)
    }
}

impl QuestionRepository for SqliteRepository {
    fn list(&self, owner: Option<&str>) -> Result<Vec<QuestionSet>, RepositoryError> {
        let owner = owner.ok_or(RepositoryError::MissingOwner)?;
        self.bodies(
            "SELECT body FROM question_sets WHERE user_id = ?1 ORDER BY created_at DESC",
            owner,
        )?
        .iter()
        .map(|body| serde_json::from_str(body).map_err(RepositoryError::from))
        .collect()
    }

    fn save(&self, set: &QuestionSet, owner: Option<&str>) -> Result<(), RepositoryError> {
        let owner = owner.ok_or(RepositoryError::MissingOwner)?;
        let mut owned = set.clone();
        owned.user_id = Some(owner.to_string());
        let body = serde_json::to_string(&owned)?;

        let changed = self.conn().execute(
            "INSERT INTO question_sets (id, user_id, body, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body
             WHERE question_sets.user_id = excluded.user_id",
            params![set.id, owner, body, set.created_at.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotOwner { id: set.id.clone() });
        }
        Ok(())
    }

    /// Deletion is by id alone; set ids are expected to be unguessable
    /// UUIDs assigned when a set is created.
    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.conn()
            .execute("DELETE FROM question_sets WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_history(&self, owner: Option<&str>) -> Result<Vec<GameResult>, RepositoryError> {
        let owner = owner.ok_or(RepositoryError::MissingOwner)?;
        self.bodies(
            "SELECT body FROM games WHERE user_id = ?1 ORDER BY finished_at DESC",
            owner,
        )?
        .iter()
        .map(|body| serde_json::from_str(body).map_err(RepositoryError::from))
        .collect()
    }

    fn append_history(
        &self,
        result: &GameResult,
        owner: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let owner = owner.ok_or(RepositoryError::MissingOwner)?;
        let body = serde_json::to_string(result)?;
        let set_id = Some(result.question_set_id.as_str()).filter(|id| !id.is_empty());

        self.conn().execute(
            "INSERT OR REPLACE INTO games (id, user_id, set_id, body, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.id.to_string(),
                owner,
                set_id,
                body,
                result.completed_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }
}
