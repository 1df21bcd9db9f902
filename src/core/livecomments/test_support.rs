// In-memory store for service tests.
//
// Each unit of work edits a private copy of the tables and only publishes it
// on commit, so a dropped unit of work leaves the shared tables untouched.

use super::livecomment_models::*;
use super::livecomment_store::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub profiles: Vec<UserProfile>,
    pub livestreams: Vec<LivestreamRecord>,
    pub comments: Vec<LivecommentRecord>,
    pub ng_words: Vec<NgWord>,
    pub reports: Vec<ReportRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i64, name: &str) {
        self.tables.lock().unwrap().profiles.push(UserProfile {
            id,
            name: name.to_string(),
            display_name: format!("{name} (display)"),
            description: format!("{name} description"),
            theme: Theme::default(),
            icon_hash: FALLBACK_ICON_HASH.to_string(),
        });
    }

    pub fn add_livestream(&self, id: i64, owner: i64) {
        self.tables.lock().unwrap().livestreams.push(LivestreamRecord {
            id,
            user_id: owner,
            title: format!("stream {id}"),
            description: String::new(),
            playlist_url: String::new(),
            thumbnail_url: String::new(),
            start_at: 0,
            end_at: 0,
        });
    }

    pub fn add_comment(&self, livestream_id: i64, user_id: i64, text: &str, created_at: i64) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.comments.push(LivecommentRecord {
            id,
            user_id,
            livestream_id,
            comment: text.to_string(),
            tip: 0,
            created_at,
        });
        id
    }

    pub fn add_ng_word(&self, user_id: i64, livestream_id: i64, word: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.ng_words.push(NgWord {
            id,
            user_id,
            livestream_id,
            word: word.to_string(),
            created_at: id,
        });
        id
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }

    /// Make every later `delete_comments` call fail with a storage error.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LivecommentStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, LivecommentError> {
        Ok(Box::new(InMemoryUnitOfWork {
            staged: self.snapshot(),
            target: Arc::clone(&self.tables),
            fail_deletes: self.fail_deletes.load(Ordering::SeqCst),
        }))
    }
}

struct InMemoryUnitOfWork {
    staged: Tables,
    target: Arc<Mutex<Tables>>,
    fail_deletes: bool,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), LivecommentError> {
        let this = *self;
        *this.target.lock().unwrap() = this.staged;
        Ok(())
    }
}

#[async_trait]
impl LivestreamDirectory for InMemoryUnitOfWork {
    async fn get_livestream(
        &mut self,
        livestream_id: i64,
    ) -> Result<LivestreamRecord, LivecommentError> {
        self.staged
            .livestreams
            .iter()
            .find(|l| l.id == livestream_id)
            .cloned()
            .ok_or_else(|| LivecommentError::NotFound("livestream".into()))
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
impl ProfileResolver for InMemoryUnitOfWork {
    async fn get_profile(&mut self, user_id: i64) -> Result<UserProfile, LivecommentError> {
        self.staged
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
            .ok_or_else(|| LivecommentError::NotFound("user".into()))
    }
}

#[async_trait]
impl CommentLedger for InMemoryUnitOfWork {
    async fn insert_comment(
        &mut self,
        comment: NewLivecomment,
    ) -> Result<LivecommentRecord, LivecommentError> {
        let record = LivecommentRecord {
            id: self.staged.next_id(),
            user_id: comment.user_id,
            livestream_id: comment.livestream_id,
            comment: comment.comment,
            tip: comment.tip,
            created_at: comment.created_at,
        };
        self.staged.comments.push(record.clone());
        Ok(record)
    }

    async fn list_comments(
        &mut self,
        livestream_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<LivecommentRecord>, LivecommentError> {
        let mut comments: Vec<_> = self
            .staged
            .comments
            .iter()
            .filter(|c| c.livestream_id == livestream_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        if let Some(limit) = limit {
            comments.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(comments)
    }

    async fn get_comment(
        &mut self,
        livecomment_id: i64,
    ) -> Result<LivecommentRecord, LivecommentError> {
        self.staged
            .comments
            .iter()
            .find(|c| c.id == livecomment_id)
            .cloned()
            .ok_or_else(|| LivecommentError::NotFound("livecomment".into()))
    }

    async fn delete_comments(&mut self, ids: &[i64]) -> Result<u64, LivecommentError> {
        if self.fail_deletes {
            return Err(LivecommentError::StorageError("injected delete failure".into()));
        }
        let before = self.staged.comments.len();
        self.staged.comments.retain(|c| !ids.contains(&c.id));
        Ok((before - self.staged.comments.len()) as u64)
    }
}

#[async_trait]
impl NgWordStore for InMemoryUnitOfWork {
    async fn insert_ng_word(&mut self, word: NewNgWord) -> Result<NgWord, LivecommentError> {
        let record = NgWord {
            id: self.staged.next_id(),
            user_id: word.user_id,
            livestream_id: word.livestream_id,
            word: word.word,
            created_at: word.created_at,
        };
        self.staged.ng_words.push(record.clone());
        Ok(record)
    }

    async fn list_ng_words(&mut self, livestream_id: i64) -> Result<Vec<NgWord>, LivecommentError> {
        Ok(self
            .staged
            .ng_words
            .iter()
            .filter(|w| w.livestream_id == livestream_id)
            .cloned()
            .collect())
    }

    async fn list_ng_words_by_moderator(
        &mut self,
        user_id: i64,
        livestream_id: i64,
    ) -> Result<Vec<NgWord>, LivecommentError> {
        let mut words: Vec<_> = self
            .staged
            .ng_words
            .iter()
            .filter(|w| w.user_id == user_id && w.livestream_id == livestream_id)
            .cloned()
            .collect();
        words.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(words)
    }
}

#[async_trait]
impl ReportLedger for InMemoryUnitOfWork {
    async fn insert_report(&mut self, report: NewReport) -> Result<ReportRecord, LivecommentError> {
        let record = ReportRecord {
            id: self.staged.next_id(),
            user_id: report.user_id,
            livestream_id: report.livestream_id,
            livecomment_id: report.livecomment_id,
            created_at: report.created_at,
        };
        self.staged.reports.push(record.clone());
        Ok(record)
    }
}
