// Request envelopes.
//
// One JSON object per request, tagged by `op`. Path parameters arrive as
// typed fields; the query string `limit` and the JSON bodies arrive raw so
// their validation errors surface as `InvalidArgument`.

use crate::core::livecomments::{LivecommentError, Session};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ApiRequest {
    ListLivecomments {
        #[serde(default)]
        session: Session,
        livestream_id: i64,
        #[serde(default)]
        limit: Option<String>,
    },
    ListNgWords {
        #[serde(default)]
        session: Session,
        livestream_id: i64,
    },
    PostLivecomment {
        #[serde(default)]
        session: Session,
        livestream_id: i64,
        #[serde(default)]
        body: Value,
    },
    ReportLivecomment {
        #[serde(default)]
        session: Session,
        livestream_id: i64,
        livecomment_id: i64,
    },
    Moderate {
        #[serde(default)]
        session: Session,
        livestream_id: i64,
        #[serde(default)]
        body: Value,
    },
}

impl ApiRequest {
    pub fn session(&self) -> &Session {
        match self {
            ApiRequest::ListLivecomments { session, .. }
            | ApiRequest::ListNgWords { session, .. }
            | ApiRequest::PostLivecomment { session, .. }
            | ApiRequest::ReportLivecomment { session, .. }
            | ApiRequest::Moderate { session, .. } => session,
        }
    }
}

/// Parse the optional `limit` query value. Absent or empty means no limit.
pub fn parse_limit(raw: Option<&str>) -> Result<Option<u64>, LivecommentError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| {
            LivecommentError::InvalidArgument(
                "limit query parameter must be a non-negative integer".into(),
            )
        }),
    }
}

/// Decode a JSON request body into `T`.
pub fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, LivecommentError> {
    serde_json::from_value(body).map_err(|e| {
        LivecommentError::InvalidArgument(format!("failed to decode the request body as json: {e}"))
    })
}
