// Livecomment service - posting, listing and reporting comments.
//
// Every public method opens exactly one unit of work and commits it as the
// last step. Any `?` before that drops the unit of work, which rolls back.

use super::livecomment_models::{
    Livecomment, LivecommentRecord, LivecommentReport, Livestream, NewLivecomment, NewReport,
    NgWord, PostLivecommentRequest, ReportRecord,
};
use super::livecomment_store::{
    CommentLedger, LivecommentError, LivecommentStore, LivestreamDirectory, NgWordStore,
    ProfileResolver, ReportLedger, UnitOfWork,
};
use super::spam_filter;
use chrono::Utc;

/// Service for the comment-side operations of a livestream.
pub struct LivecommentService<S: LivecommentStore> {
    store: S,
}

impl<S: LivecommentStore> LivecommentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Comments on a livestream, newest first, optionally capped at `limit`.
    pub async fn list_livecomments(
        &self,
        livestream_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Livecomment>, LivecommentError> {
        let mut uow = self.store.begin().await?;

        let livestream_record = uow.get_livestream(livestream_id).await?;
        let livestream = uow.assemble_livestream(&livestream_record).await?;

        let records = uow.list_comments(livestream_id, limit).await?;
        let mut livecomments = Vec::with_capacity(records.len());
        for record in records {
            livecomments.push(fill_with_livestream(&mut *uow, record, &livestream).await?);
        }

        uow.commit().await?;
        Ok(livecomments)
    }

    /// NG words the caller registered on a livestream, newest first.
    pub async fn list_ng_words(
        &self,
        user_id: i64,
        livestream_id: i64,
    ) -> Result<Vec<NgWord>, LivecommentError> {
        let mut uow = self.store.begin().await?;
        let words = uow
            .list_ng_words_by_moderator(user_id, livestream_id)
            .await?;
        uow.commit().await?;
        Ok(words)
    }

    /// Post a comment after checking it against the owner's NG words.
    ///
    /// Rejected comments never reach the ledger.
    pub async fn post_livecomment(
        &self,
        user_id: i64,
        livestream_id: i64,
        request: PostLivecommentRequest,
    ) -> Result<Livecomment, LivecommentError> {
        let mut uow = self.store.begin().await?;

        let livestream = uow.get_livestream(livestream_id).await?;

        let ng_words = uow
            .list_ng_words_by_moderator(livestream.user_id, livestream.id)
            .await?;
        if let Err(err) = spam_filter::check_comment(&request.comment, &ng_words) {
            tracing::warn!(user_id, livestream_id, "rejected livecomment as spam");
            return Err(err);
        }

        let record = uow
            .insert_comment(NewLivecomment {
                user_id,
                livestream_id,
                comment: request.comment,
                tip: request.tip,
                created_at: Utc::now().timestamp(),
            })
            .await?;
        let livecomment = fill_livecomment(&mut *uow, record).await?;

        uow.commit().await?;

        tracing::info!(
            livecomment_id = livecomment.id,
            user_id,
            livestream_id,
            tip = livecomment.tip,
            "posted livecomment"
        );
        Ok(livecomment)
    }

    /// Record an abuse report against a comment on a livestream.
    pub async fn report_livecomment(
        &self,
        user_id: i64,
        livestream_id: i64,
        livecomment_id: i64,
    ) -> Result<LivecommentReport, LivecommentError> {
        let mut uow = self.store.begin().await?;

        uow.get_livestream(livestream_id).await?;
        let comment = uow.get_comment(livecomment_id).await?;
        if comment.livestream_id != livestream_id {
            return Err(LivecommentError::NotFound("livecomment".into()));
        }

        let record = uow
            .insert_report(NewReport {
                user_id,
                livestream_id,
                livecomment_id,
                created_at: Utc::now().timestamp(),
            })
            .await?;
        let report = fill_report(&mut *uow, record).await?;

        uow.commit().await?;

        tracing::info!(
            report_id = report.id,
            user_id,
            livestream_id,
            livecomment_id,
            "reported livecomment"
        );
        Ok(report)
    }
}

// ============================================================================
// RESPONSE ASSEMBLY
// ============================================================================

/// Join a comment row with its author profile and livestream view.
pub async fn fill_livecomment(
    uow: &mut dyn UnitOfWork,
    record: LivecommentRecord,
) -> Result<Livecomment, LivecommentError> {
    let livestream_record = uow.get_livestream(record.livestream_id).await?;
    let livestream = uow.assemble_livestream(&livestream_record).await?;
    fill_with_livestream(uow, record, &livestream).await
}

async fn fill_with_livestream(
    uow: &mut dyn UnitOfWork,
    record: LivecommentRecord,
    livestream: &Livestream,
) -> Result<Livecomment, LivecommentError> {
    let user = uow.get_profile(record.user_id).await?;
    Ok(Livecomment {
        id: record.id,
        user,
        livestream: livestream.clone(),
        comment: record.comment,
        tip: record.tip,
        created_at: record.created_at,
    })
}

pub async fn fill_report(
    uow: &mut dyn UnitOfWork,
    record: ReportRecord,
) -> Result<LivecommentReport, LivecommentError> {
    let reporter = uow.get_profile(record.user_id).await?;
    let comment = uow.get_comment(record.livecomment_id).await?;
    let livecomment = fill_livecomment(uow, comment).await?;
    Ok(LivecommentReport {
        id: record.id,
        reporter,
        livecomment,
        created_at: record.created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
