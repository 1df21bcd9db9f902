// One SQLite transaction implementing every livecomment storage port.
//
// `sqlx::Transaction` rolls back when dropped without `commit`, which is what
// gives the services their all-or-nothing behaviour.

use crate::core::livecomments::{
    CommentLedger, LivecommentError, LivecommentRecord, Livestream, LivestreamDirectory,
    LivestreamRecord, NewLivecomment, NewNgWord, NewReport, NgWord, NgWordStore,
    ProfileResolver, ReportLedger, ReportRecord, Theme, UnitOfWork, UserProfile,
    FALLBACK_ICON_HASH,
};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, Transaction};

// Well under SQLite's bound-parameter ceiling (32766).
const DELETE_CHUNK_SIZE: usize = 500;

pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteUnitOfWork {
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

fn storage_error(e: sqlx::Error) -> LivecommentError {
    LivecommentError::StorageError(e.to_string())
}

fn livecomment_from_row(row: &SqliteRow) -> LivecommentRecord {
    LivecommentRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        livestream_id: row.get("livestream_id"),
        comment: row.get("comment"),
        tip: row.get("tip"),
        created_at: row.get("created_at"),
    }
}

fn ng_word_from_row(row: &SqliteRow) -> NgWord {
    NgWord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        livestream_id: row.get("livestream_id"),
        word: row.get("word"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), LivecommentError> {
        let SqliteUnitOfWork { tx } = *self;
        tx.commit().await.map_err(storage_error)
    }
}

#[async_trait]
impl LivestreamDirectory for SqliteUnitOfWork {
    async fn get_livestream(
        &mut self,
        livestream_id: i64,
    ) -> Result<LivestreamRecord, LivecommentError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, description, playlist_url, thumbnail_url, start_at, end_at
            FROM livestreams
            WHERE id = ?
            "#,
        )
        .bind(livestream_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| LivecommentError::NotFound("livestream".into()))?;

        Ok(LivestreamRecord {
            id: row.get("id"),
            user_id: row.get("user_id"),
            title: row.get("title"),
            description: row.get("description"),
            playlist_url: row.get("playlist_url"),
            thumbnail_url: row.get("thumbnail_url"),
            start_at: row.get("start_at"),
            end_at: row.get("end_at"),
        })
    }

    async fn assemble_livestream(
        &mut self,
        record: &LivestreamRecord,
    ) -> Result<Livestream, LivecommentError> {
        let owner = self.get_profile(record.user_id).await?;
        Ok(Livestream {
            id: record.id,
            owner,
            title: record.title.clone(),
            description: record.description.clone(),
            playlist_url: record.playlist_url.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            start_at: record.start_at,
            end_at: record.end_at,
        })
    }
}

#[async_trait]
impl ProfileResolver for SqliteUnitOfWork {
    async fn get_profile(&mut self, user_id: i64) -> Result<UserProfile, LivecommentError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.name, u.display_name, u.description,
                   t.id AS theme_id, t.dark_mode, i.icon_hash
            FROM users u
            LEFT JOIN themes t ON t.user_id = u.id
            LEFT JOIN icons i ON i.user_id = u.id
            WHERE u.id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| LivecommentError::NotFound("user".into()))?;

        Ok(UserProfile {
            id: row.get("id"),
            name: row.get("name"),
            display_name: row.get("display_name"),
            description: row.get("description"),
            theme: Theme {
                id: row.get::<Option<i64>, _>("theme_id").unwrap_or_default(),
                dark_mode: row.get::<Option<bool>, _>("dark_mode").unwrap_or_default(),
            },
            icon_hash: row
                .get::<Option<String>, _>("icon_hash")
                .unwrap_or_else(|| FALLBACK_ICON_HASH.to_string()),
        })
    }
}

#[async_trait]
impl CommentLedger for SqliteUnitOfWork {
    async fn insert_comment(
        &mut self,
        comment: NewLivecomment,
    ) -> Result<LivecommentRecord, LivecommentError> {
        let result = sqlx::query(
            r#"
            INSERT INTO livecomments (user_id, livestream_id, comment, tip, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.user_id)
        .bind(comment.livestream_id)
        .bind(&comment.comment)
        .bind(comment.tip)
        .bind(comment.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(LivecommentRecord {
            id: result.last_insert_rowid(),
            user_id: comment.user_id,
            livestream_id: comment.livestream_id,
            comment: comment.comment,
            tip: comment.tip,
            created_at: comment.created_at,
        })
    }

    async fn list_comments(
        &mut self,
        livestream_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<LivecommentRecord>, LivecommentError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, livestream_id, comment, tip, created_at
            FROM livecomments
            WHERE livestream_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(livestream_id)
        .bind(limit)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(rows.iter().map(livecomment_from_row).collect())
    }

    async fn get_comment(
        &mut self,
        livecomment_id: i64,
    ) -> Result<LivecommentRecord, LivecommentError> {
        let row = sqlx::query(
            "SELECT id, user_id, livestream_id, comment, tip, created_at FROM livecomments WHERE id = ?",
        )
        .bind(livecomment_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        row.as_ref()
            .map(livecomment_from_row)
            .ok_or_else(|| LivecommentError::NotFound("livecomment".into()))
    }

    async fn delete_comments(&mut self, ids: &[i64]) -> Result<u64, LivecommentError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0;
        for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("DELETE FROM livecomments WHERE id IN (");
            for (i, id) in chunk.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push_bind(*id);
            }
            builder.push(")");

            let result = builder
                .build()
                .execute(&mut *self.tx)
                .await
                .map_err(storage_error)?;
            deleted += result.rows_affected();
        }

        Ok(deleted)
    }
}

#[async_trait]
impl NgWordStore for SqliteUnitOfWork {
    async fn insert_ng_word(&mut self, word: NewNgWord) -> Result<NgWord, LivecommentError> {
        let result = sqlx::query(
            r#"
            INSERT INTO ng_words (user_id, livestream_id, word, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(word.user_id)
        .bind(word.livestream_id)
        .bind(&word.word)
        .bind(word.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(NgWord {
            id: result.last_insert_rowid(),
            user_id: word.user_id,
            livestream_id: word.livestream_id,
            word: word.word,
            created_at: word.created_at,
        })
    }

    async fn list_ng_words(&mut self, livestream_id: i64) -> Result<Vec<NgWord>, LivecommentError> {
        let rows = sqlx::query(
            "SELECT id, user_id, livestream_id, word, created_at FROM ng_words WHERE livestream_id = ?",
        )
        .bind(livestream_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(rows.iter().map(ng_word_from_row).collect())
    }

    async fn list_ng_words_by_moderator(
        &mut self,
        user_id: i64,
        livestream_id: i64,
    ) -> Result<Vec<NgWord>, LivecommentError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, livestream_id, word, created_at
            FROM ng_words
            WHERE user_id = ? AND livestream_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(livestream_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(rows.iter().map(ng_word_from_row).collect())
    }
}

#[async_trait]
impl ReportLedger for SqliteUnitOfWork {
    async fn insert_report(&mut self, report: NewReport) -> Result<ReportRecord, LivecommentError> {
        let result = sqlx::query(
            r#"
            INSERT INTO livecomment_reports (user_id, livestream_id, livecomment_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(report.user_id)
        .bind(report.livestream_id)
        .bind(report.livecomment_id)
        .bind(report.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(storage_error)?;

        Ok(ReportRecord {
            id: result.last_insert_rowid(),
            user_id: report.user_id,
            livestream_id: report.livestream_id,
            livecomment_id: report.livecomment_id,
            created_at: report.created_at,
        })
    }
}
