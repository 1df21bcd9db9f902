// Livecomment domain models.
//
// Records mirror database rows one-to-one. The `Livecomment`, `Livestream`
// and `LivecommentReport` views are what callers actually receive: raw rows
// joined with profile and livestream data.

use serde::{Deserialize, Serialize};

/// Icon fingerprint used when a user never uploaded an icon.
pub const FALLBACK_ICON_HASH: &str =
    "d9f8294e9d895f81ce62e73dc7d5dff862a4fa40bd4e0fecf53f7526a8edcac0";

// ============================================================================
// RECORDS
// ============================================================================

/// A stored comment on a livestream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivecommentRecord {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub comment: String,
    /// Tip amount attached to the comment. Not validated.
    pub tip: i64,
    /// Unix seconds.
    pub created_at: i64,
}

/// Everything needed to insert a comment; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLivecomment {
    pub user_id: i64,
    pub livestream_id: i64,
    pub comment: String,
    pub tip: i64,
    pub created_at: i64,
}

/// A banned substring registered by a livestream's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgWord {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub word: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewNgWord {
    pub user_id: i64,
    pub livestream_id: i64,
    pub word: String,
    pub created_at: i64,
}

/// An abuse report. Duplicate reports are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub id: i64,
    pub user_id: i64,
    pub livestream_id: i64,
    pub livecomment_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: i64,
    pub livestream_id: i64,
    pub livecomment_id: i64,
    pub created_at: i64,
}

/// The parts of a livestream row this subsystem reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivestreamRecord {
    pub id: i64,
    /// The streamer who owns the livestream.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub playlist_url: String,
    pub thumbnail_url: String,
    pub start_at: i64,
    pub end_at: i64,
}

// ============================================================================
// VIEWS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub dark_mode: bool,
}

/// Display profile of a user, as returned by the profile resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub theme: Theme,
    pub icon_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Livestream {
    pub id: i64,
    pub owner: UserProfile,
    pub title: String,
    pub description: String,
    pub playlist_url: String,
    pub thumbnail_url: String,
    pub start_at: i64,
    pub end_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Livecomment {
    pub id: i64,
    pub user: UserProfile,
    pub livestream: Livestream,
    pub comment: String,
    pub tip: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivecommentReport {
    pub id: i64,
    pub reporter: UserProfile,
    pub livecomment: Livecomment,
    pub created_at: i64,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

/// Missing fields decode to their zero values; only bad JSON or wrong types
/// are rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct PostLivecommentRequest {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tip: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerateRequest {
    pub ng_word: String,
}

/// Result of a moderation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationOutcome {
    pub word_id: i64,
    /// Ids of the comments removed by the re-scan.
    pub purged: Vec<i64>,
}
