// Errors and storage ports for the livecomment subsystem.
//
// Every port method runs inside one unit of work. A unit of work that is
// dropped without `commit` must discard everything it wrote.

use super::livecomment_models::{
    Livestream, LivestreamRecord, LivecommentRecord, NewLivecomment, NewNgWord, NewReport,
    NgWord, ReportRecord, UserProfile,
};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LivecommentError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Comment was rejected as spam")]
    SpamRejected,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl LivecommentError {
    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            LivecommentError::InvalidArgument(_) => 400,
            LivecommentError::Unauthorized(_) => 401,
            LivecommentError::PermissionDenied(_) => 403,
            LivecommentError::NotFound(_) => 404,
            LivecommentError::SpamRejected => 400,
            LivecommentError::StorageError(_) => 500,
        }
    }
}

// ============================================================================
// STORAGE TRAITS (PORTS)
// ============================================================================

/// Lookup of livestreams owned by the broadcast subsystem.
#[async_trait]
pub trait LivestreamDirectory: Send {
    /// Fails with `NotFound` if the livestream does not exist.
    async fn get_livestream(
        &mut self,
        livestream_id: i64,
    ) -> Result<LivestreamRecord, LivecommentError>;

    /// Build the externally visible livestream view.
    async fn assemble_livestream(
        &mut self,
        record: &LivestreamRecord,
    ) -> Result<Livestream, LivecommentError>;
}

#[async_trait]
pub trait ProfileResolver: Send {
    /// Fails with `NotFound` if the user does not exist. A user without an
    /// icon gets `FALLBACK_ICON_HASH`.
    async fn get_profile(&mut self, user_id: i64) -> Result<UserProfile, LivecommentError>;
}

#[async_trait]
pub trait CommentLedger: Send {
    async fn insert_comment(
        &mut self,
        comment: NewLivecomment,
    ) -> Result<LivecommentRecord, LivecommentError>;

    /// Newest first (created_at desc, then id desc), capped at `limit`.
    async fn list_comments(
        &mut self,
        livestream_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<LivecommentRecord>, LivecommentError>;

    /// Fails with `NotFound` if the comment does not exist.
    async fn get_comment(&mut self, livecomment_id: i64)
        -> Result<LivecommentRecord, LivecommentError>;

    /// Delete the given comments, returning how many rows went away.
    /// An empty slice is a no-op.
    async fn delete_comments(&mut self, ids: &[i64]) -> Result<u64, LivecommentError>;
}

#[async_trait]
pub trait NgWordStore: Send {
    /// No ownership check happens here; callers verify it first.
    async fn insert_ng_word(&mut self, word: NewNgWord) -> Result<NgWord, LivecommentError>;

    /// Every NG word registered on the livestream, by any moderator.
    async fn list_ng_words(&mut self, livestream_id: i64) -> Result<Vec<NgWord>, LivecommentError>;

    /// NG words one moderator registered on one livestream, newest first.
    async fn list_ng_words_by_moderator(
        &mut self,
        user_id: i64,
        livestream_id: i64,
    ) -> Result<Vec<NgWord>, LivecommentError>;
}

#[async_trait]
pub trait ReportLedger: Send {
    async fn insert_report(&mut self, report: NewReport) -> Result<ReportRecord, LivecommentError>;
}

/// A single isolated transaction exposing every port.
#[async_trait]
pub trait UnitOfWork:
    CommentLedger + NgWordStore + ReportLedger + ProfileResolver + LivestreamDirectory
{
    async fn commit(self: Box<Self>) -> Result<(), LivecommentError>;
}

/// Source of units of work.
///
/// Implementations must be cheap to clone or share, one per service.
#[async_trait]
pub trait LivecommentStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, LivecommentError>;
}
