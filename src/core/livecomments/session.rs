// Caller identity.
//
// The transport decodes whatever session it carries into a `Session` and the
// services only ever see the resulting user id.

use super::livecomment_store::LivecommentError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    pub user_id: Option<i64>,
    /// Unix seconds after which the session is no longer valid.
    pub expires_at: Option<i64>,
}

impl Session {
    /// The authenticated user id, or `Unauthorized` if the session is
    /// missing pieces or has expired at `now`.
    pub fn current_user_id(&self, now: i64) -> Result<i64, LivecommentError> {
        let user_id = self.user_id.ok_or_else(|| {
            LivecommentError::Unauthorized("failed to find user-id from session".into())
        })?;
        let expires_at = self.expires_at.ok_or_else(|| {
            LivecommentError::Unauthorized("failed to find expires from session".into())
        })?;

        if now >= expires_at {
            return Err(LivecommentError::Unauthorized("session has expired".into()));
        }

        Ok(user_id)
    }
}
