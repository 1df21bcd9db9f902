// Core livecomment module - comments, NG words, reports and moderation.
// Pure domain logic; storage lives behind the ports in `livecomment_store`.

pub mod livecomment_models;
pub mod livecomment_service;
pub mod livecomment_store;
pub mod moderation_service;
pub mod session;
pub mod spam_filter;

#[cfg(test)]
mod test_support;

pub use livecomment_models::*;
pub use livecomment_service::LivecommentService;
pub use livecomment_store::*;
pub use moderation_service::ModerationService;
pub use session::Session;
