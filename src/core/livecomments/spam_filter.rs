// NG-word matching.
//
// A comment hits an NG word when the word occurs anywhere in the comment as
// a contiguous, case-sensitive substring. No tokenizing or normalization.
// Submission-time checks and the moderation re-scan both go through here.

use super::livecomment_models::{LivecommentRecord, NgWord};
use super::livecomment_store::LivecommentError;

/// First NG word contained in `comment`, if any.
pub fn find_match<'a>(comment: &str, ng_words: &'a [NgWord]) -> Option<&'a NgWord> {
    ng_words
        .iter()
        .find(|ng_word| comment.contains(ng_word.word.as_str()))
}

pub fn is_spam(comment: &str, ng_words: &[NgWord]) -> bool {
    find_match(comment, ng_words).is_some()
}

/// Reject `comment` with `SpamRejected` if it hits any NG word.
pub fn check_comment(comment: &str, ng_words: &[NgWord]) -> Result<(), LivecommentError> {
    match find_match(comment, ng_words) {
        Some(hit) => {
            tracing::info!(word_id = hit.id, comment, "comment hit NG word");
            Err(LivecommentError::SpamRejected)
        }
        None => Ok(()),
    }
}

/// Ids of the comments that hit any of `ng_words`, in input order.
pub fn matching_comment_ids(comments: &[LivecommentRecord], ng_words: &[NgWord]) -> Vec<i64> {
    comments
        .iter()
        .filter(|c| is_spam(&c.comment, ng_words))
        .map(|c| c.id)
        .collect()
}
