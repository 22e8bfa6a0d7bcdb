//! SQLite-backed strike store via libsql. Implements StrikeStore.
//!
//! Two tables: `strikes` keyed by (chat_id, user_id) and `chat_settings` keyed by chat_id.
//! SQLite admits one writer at a time, so all writes go through a single connection behind
//! an async mutex; reads open their own connection and run concurrently under WAL.
//! The writer uses `synchronous=FULL`: a strike count is returned only after its commit is on disk.

use crate::domain::{ChatSettings, DomainError};
use crate::ports::StrikeStore;
use libsql::{params, Connection, Database, TransactionBehavior};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

const STRIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS strikes (
    chat_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    strikes INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (chat_id, user_id)
)"#;

const CHAT_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS chat_settings (
    chat_id INTEGER PRIMARY KEY,
    welcome_text TEXT,
    rules_text TEXT
)"#;

/// Milliseconds a connection waits for a lock held by another process before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

fn storage(e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// SQLite strike store. One database file; safe to share via Arc.
pub struct SqliteStrikeStore {
    db: Database,
    writer: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStrikeStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// Call this once at startup.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage)?;
        }
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(storage)?;

        let writer = db.connect().map_err(storage)?;
        // journal_mode is persistent in the file; the other pragmas are per connection.
        run_pragma(&writer, "PRAGMA journal_mode=WAL").await?;
        run_pragma(&writer, "PRAGMA synchronous=FULL").await?;
        run_pragma(&writer, &format!("PRAGMA busy_timeout={BUSY_TIMEOUT_MS}")).await?;

        writer.execute(STRIKES_TABLE, ()).await.map_err(storage)?;
        writer
            .execute(CHAT_SETTINGS_TABLE, ())
            .await
            .map_err(storage)?;

        info!(path = %db_path.display(), "SQLite strike store ready (WAL, synchronous=FULL)");

        Ok(Self {
            db,
            writer: Mutex::new(writer),
            db_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn reader(&self) -> Result<Connection, DomainError> {
        let conn = self.db.connect().map_err(storage)?;
        run_pragma(&conn, &format!("PRAGMA busy_timeout={BUSY_TIMEOUT_MS}")).await?;
        Ok(conn)
    }

    async fn upsert_setting(
        &self,
        chat_id: i64,
        column: SettingColumn,
        text: &str,
    ) -> Result<(), DomainError> {
        let sql = match column {
            SettingColumn::Welcome => {
                r#"
                INSERT INTO chat_settings (chat_id, welcome_text) VALUES (?1, ?2)
                ON CONFLICT (chat_id) DO UPDATE SET welcome_text = excluded.welcome_text
                "#
            }
            SettingColumn::Rules => {
                r#"
                INSERT INTO chat_settings (chat_id, rules_text) VALUES (?1, ?2)
                ON CONFLICT (chat_id) DO UPDATE SET rules_text = excluded.rules_text
                "#
            }
        };
        let writer = self.writer.lock().await;
        writer
            .execute(sql, params![chat_id, text])
            .await
            .map_err(storage)?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum SettingColumn {
    Welcome,
    Rules,
}

/// PRAGMA returns a row (the new value); use query and consume rows (execute fails when rows are returned).
async fn run_pragma(conn: &Connection, sql: &str) -> Result<(), DomainError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DomainError::Storage(format!("{sql} failed: {e}")))?;
    while rows.next().await.map_err(storage)?.is_some() {}
    Ok(())
}

fn to_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

#[async_trait::async_trait]
impl StrikeStore for SqliteStrikeStore {
    async fn increment_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError> {
        let now = chrono::Utc::now().timestamp();
        let writer = self.writer.lock().await;
        let tx = writer
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .map_err(storage)?;
        tx.execute(
            r#"
            INSERT INTO strikes (chat_id, user_id, strikes, updated_at)
            VALUES (?1, ?2, 1, ?3)
            ON CONFLICT (chat_id, user_id) DO UPDATE SET
                strikes = strikes + 1,
                updated_at = excluded.updated_at
            "#,
            params![chat_id, user_id, now],
        )
        .await
        .map_err(storage)?;

        let strikes = {
            let mut rows = tx
                .query(
                    "SELECT strikes FROM strikes WHERE chat_id = ?1 AND user_id = ?2",
                    params![chat_id, user_id],
                )
                .await
                .map_err(storage)?;
            let row = rows
                .next()
                .await
                .map_err(storage)?
                .ok_or_else(|| DomainError::Storage("strike row missing after upsert".into()))?;
            row.get::<i64>(0).map_err(storage)?
        };
        tx.commit().await.map_err(storage)?;

        debug!(chat_id, user_id, strikes, "strike recorded");
        Ok(to_count(strikes))
    }

    async fn forgive(&self, chat_id: i64, user_id: i64) -> Result<(), DomainError> {
        let now = chrono::Utc::now().timestamp();
        let writer = self.writer.lock().await;
        writer
            .execute(
                "UPDATE strikes SET strikes = 0, updated_at = ?3 WHERE chat_id = ?1 AND user_id = ?2",
                params![chat_id, user_id, now],
            )
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn get_strikes(&self, chat_id: i64, user_id: i64) -> Result<u32, DomainError> {
        let conn = self.reader().await?;
        let mut rows = conn
            .query(
                "SELECT strikes FROM strikes WHERE chat_id = ?1 AND user_id = ?2",
                params![chat_id, user_id],
            )
            .await
            .map_err(storage)?;
        match rows.next().await.map_err(storage)? {
            Some(row) => Ok(to_count(row.get::<i64>(0).map_err(storage)?)),
            None => Ok(0),
        }
    }

    async fn get_chat_settings(&self, chat_id: i64) -> Result<ChatSettings, DomainError> {
        let conn = self.reader().await?;
        let mut rows = conn
            .query(
                "SELECT welcome_text, rules_text FROM chat_settings WHERE chat_id = ?1",
                params![chat_id],
            )
            .await
            .map_err(storage)?;
        match rows.next().await.map_err(storage)? {
            Some(row) => {
                // NULL columns fail the String conversion and come back as None.
                let welcome_text: Option<String> = row.get(0).ok();
                let rules_text: Option<String> = row.get(1).ok();
                Ok(ChatSettings {
                    welcome_text,
                    rules_text,
                })
            }
            None => Ok(ChatSettings::default()),
        }
    }

    async fn set_welcome(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.upsert_setting(chat_id, SettingColumn::Welcome, text)
            .await
    }

    async fn set_rules(&self, chat_id: i64, text: &str) -> Result<(), DomainError> {
        self.upsert_setting(chat_id, SettingColumn::Rules, text)
            .await
    }
}
