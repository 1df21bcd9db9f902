// SQLite-backed livecomment store.
//
// Tables:
// - users, themes, icons, livestreams: owned by the user and livestream
//   subsystems, created here only so a fresh database is usable
// - livecomments: Comment ledger
// - ng_words: NG words per (moderator, livestream)
// - livecomment_reports: Abuse reports

use super::sqlite_unit_of_work::SqliteUnitOfWork;
use crate::core::livecomments::{LivecommentError, LivecommentStore, UnitOfWork};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS themes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        dark_mode BOOLEAN NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS icons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        icon_hash TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS livestreams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        playlist_url TEXT NOT NULL DEFAULT '',
        thumbnail_url TEXT NOT NULL DEFAULT '',
        start_at INTEGER NOT NULL DEFAULT 0,
        end_at INTEGER NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS livecomments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        livestream_id INTEGER NOT NULL,
        comment TEXT NOT NULL,
        tip INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_livecomments_livestream
        ON livecomments(livestream_id, created_at DESC);
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ng_words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        livestream_id INTEGER NOT NULL,
        word TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_ng_words_user_livestream
        ON ng_words(user_id, livestream_id, created_at DESC);
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS livecomment_reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        livestream_id INTEGER NOT NULL,
        livecomment_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );
    "#,
];

#[derive(Clone)]
pub struct SqliteLivecommentStore {
    pool: Pool<Sqlite>,
}

impl SqliteLivecommentStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database and run migrations.
    ///
    /// Bare paths are opened read-write-create; `sqlite:` URLs are used as is.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}?mode=rwc", database_url)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&conn_str)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), LivecommentError> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(|e| LivecommentError::StorageError(e.to_string()))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl LivecommentStore for SqliteLivecommentStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, LivecommentError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LivecommentError::StorageError(e.to_string()))?;
        Ok(Box::new(SqliteUnitOfWork::new(tx)))
    }
}
