// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "livecomments/mod.rs"]
pub mod livecomments;
