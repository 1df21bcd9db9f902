// API layer - request envelopes and dispatch onto the core services.
//
// Transport-agnostic: callers hand over decoded JSON requests and get back a
// status code plus a JSON body.

pub mod dispatcher;
pub mod requests;

pub use dispatcher::{ApiResponse, LivecommentApi};
