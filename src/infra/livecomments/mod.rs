// Livecomment infrastructure - SQLite storage implementation

mod sqlite_livecomment_store;
mod sqlite_unit_of_work;

pub use sqlite_livecomment_store::SqliteLivecommentStore;

#[cfg(test)]
pub(crate) use sqlite_livecomment_store::test_support;
