// Moderation service - NG word registration and retroactive purge.
//
// Registering a word re-scans the whole livestream against every NG word it
// has, not just the new one, and deletes whatever matches. Ownership check,
// insert, scan and delete share one unit of work: a failed pass leaves
// neither the word nor any deletion behind.

use super::livecomment_models::{ModerateRequest, ModerationOutcome, NewNgWord};
use super::livecomment_store::{
    CommentLedger, LivecommentError, LivecommentStore, LivestreamDirectory, NgWordStore,
};
use super::spam_filter;
use chrono::Utc;

pub struct ModerationService<S: LivecommentStore> {
    store: S,
}

impl<S: LivecommentStore> ModerationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register an NG word on a livestream the caller owns and purge every
    /// existing comment that now matches.
    pub async fn moderate(
        &self,
        user_id: i64,
        livestream_id: i64,
        request: ModerateRequest,
    ) -> Result<ModerationOutcome, LivecommentError> {
        if request.ng_word.is_empty() {
            return Err(LivecommentError::InvalidArgument(
                "ng_word must not be empty".into(),
            ));
        }

        let mut uow = self.store.begin().await?;

        let livestream = uow.get_livestream(livestream_id).await?;
        if livestream.user_id != user_id {
            tracing::warn!(
                user_id,
                livestream_id,
                owner_id = livestream.user_id,
                "refused moderation of another streamer's livestream"
            );
            return Err(LivecommentError::PermissionDenied(
                "a streamer can't moderate livestreams that other streamers own".into(),
            ));
        }

        let word = uow
            .insert_ng_word(NewNgWord {
                user_id,
                livestream_id,
                word: request.ng_word,
                created_at: Utc::now().timestamp(),
            })
            .await?;

        let ng_words = uow.list_ng_words(livestream_id).await?;
        let comments = uow.list_comments(livestream_id, None).await?;
        let purged = spam_filter::matching_comment_ids(&comments, &ng_words);

        if !purged.is_empty() {
            uow.delete_comments(&purged).await?;
        }

        uow.commit().await?;

        tracing::info!(
            word_id = word.id,
            user_id,
            livestream_id,
            purged = purged.len(),
            "registered NG word"
        );

        Ok(ModerationOutcome {
            word_id: word.id,
            purged,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
