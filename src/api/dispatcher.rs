// Dispatch of decoded requests onto the livecomment and moderation services.

use super::requests::{decode_body, parse_limit, ApiRequest};
use crate::core::livecomments::{
    LivecommentError, LivecommentService, LivecommentStore, ModerateRequest, ModerationService,
    PostLivecommentRequest,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

/// Status code plus JSON body, HTTP style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn with_body<T: Serialize>(status: u16, body: &T) -> Result<Self, LivecommentError> {
        let body = serde_json::to_value(body)
            .map_err(|e| LivecommentError::StorageError(format!("failed to encode response: {e}")))?;
        Ok(Self { status, body })
    }

    pub fn error(err: &LivecommentError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

pub struct LivecommentApi<S: LivecommentStore> {
    livecomments: LivecommentService<S>,
    moderation: ModerationService<S>,
}

impl<S: LivecommentStore + Clone> LivecommentApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            livecomments: LivecommentService::new(store.clone()),
            moderation: ModerationService::new(store),
        }
    }

    /// Decode one JSON request and handle it.
    pub async fn handle_line(&self, line: &str) -> ApiResponse {
        match serde_json::from_str::<ApiRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => ApiResponse::error(&LivecommentError::InvalidArgument(format!(
                "malformed request: {e}"
            ))),
        }
    }

    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                if err.status_code() >= 500 {
                    tracing::error!("request failed: {}", err);
                } else {
                    tracing::debug!(status = err.status_code(), "request rejected: {}", err);
                }
                ApiResponse::error(&err)
            }
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, LivecommentError> {
        let user_id = request.session().current_user_id(Utc::now().timestamp())?;

        match request {
            ApiRequest::ListLivecomments {
                livestream_id,
                limit,
                ..
            } => {
                let limit = parse_limit(limit.as_deref())?;
                let livecomments = self
                    .livecomments
                    .list_livecomments(livestream_id, limit)
                    .await?;
                ApiResponse::with_body(200, &livecomments)
            }
            ApiRequest::ListNgWords { livestream_id, .. } => {
                let words = self
                    .livecomments
                    .list_ng_words(user_id, livestream_id)
                    .await?;
                ApiResponse::with_body(200, &words)
            }
            ApiRequest::PostLivecomment {
                livestream_id,
                body,
                ..
            } => {
                let body: PostLivecommentRequest = decode_body(body)?;
                let livecomment = self
                    .livecomments
                    .post_livecomment(user_id, livestream_id, body)
                    .await?;
                ApiResponse::with_body(201, &livecomment)
            }
            ApiRequest::ReportLivecomment {
                livestream_id,
                livecomment_id,
                ..
            } => {
                let report = self
                    .livecomments
                    .report_livecomment(user_id, livestream_id, livecomment_id)
                    .await?;
                ApiResponse::with_body(201, &report)
            }
            ApiRequest::Moderate {
                livestream_id,
                body,
                ..
            } => {
                let body: ModerateRequest = decode_body(body)?;
                let outcome = self
                    .moderation
                    .moderate(user_id, livestream_id, body)
                    .await?;
                ApiResponse::with_body(201, &json!({ "word_id": outcome.word_id }))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
