//! SQLite persistence for the chat authorization list.
//!
//! One table, three operations: register-or-ignore, status query, and
//! approval. Status is an explicit two-state machine: registration
//! creates a `pending` row, approval flips it to `authorized`, and no
//! operation ever removes authorization.

use crate::types::{UserRecord, UserStatus};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// SQLite-backed store of registered chat users.
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("User store ready");
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'pending'
            )",
            [],
        )?;
        Ok(())
    }

    /// Register a user as pending, or do nothing if already known.
    ///
    /// Returns true when a new row was created. An existing row keeps
    /// its status untouched, so re-registering cannot demote an
    /// authorized user.
    pub fn register_or_ignore(
        &self,
        user_id: i64,
        username: &str,
    ) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (user_id, username, status) VALUES (?1, ?2, ?3)",
            params![user_id, username, UserStatus::Pending.as_str()],
        )?;
        if inserted > 0 {
            debug!("Registered user {} as pending", user_id);
        }
        Ok(inserted > 0)
    }

    /// Current status of a user, or None when unregistered.
    pub fn status(&self, user_id: i64) -> Result<Option<UserStatus>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM users WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status.as_deref().and_then(UserStatus::from_str))
    }

    /// True when the user may request signals.
    pub fn is_authorized(&self, user_id: i64) -> Result<bool, rusqlite::Error> {
        Ok(self.status(user_id)? == Some(UserStatus::Authorized))
    }

    /// Flip a pending user to authorized.
    ///
    /// Returns true when a pending row was updated; false for unknown
    /// users and for users who are already authorized.
    pub fn approve(&self, user_id: i64) -> Result<bool, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE users SET status = ?1 WHERE user_id = ?2 AND status = ?3",
            params![
                UserStatus::Authorized.as_str(),
                user_id,
                UserStatus::Pending.as_str()
            ],
        )?;
        if updated > 0 {
            info!("Authorized user {}", user_id);
        }
        Ok(updated > 0)
    }

    /// All authorized users, in registration order.
    pub fn authorized_users(&self) -> Result<Vec<UserRecord>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, username, status FROM users
             WHERE status = ?1 ORDER BY user_id",
        )?;
        let rows = stmt.query_map(params![UserStatus::Authorized.as_str()], |row| {
            let status: String = row.get(2)?;
            Ok(UserRecord {
                user_id: row.get(0)?,
                username: row.get(1)?,
                status: UserStatus::from_str(&status).unwrap_or(UserStatus::Pending),
            })
        })?;
        rows.collect()
    }
}
