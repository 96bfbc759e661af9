//! Sync cursor and fetch planning for shardbox.
//!
//! The upstream ERP fetch client lives outside this workspace; what it
//! shares with us is the on-disk cursor (`<data_root>/.last_sync`) and
//! the full-vs-incremental decision. Both contracts live here: the
//! cursor as an injectable [`CursorStore`] so drivers and tests choose
//! where state lives, and the decision as the pure [`plan`] function.

mod cursor;
mod error;
mod plan;

pub use cursor::{CursorStore, FileCursor, CURSOR_FILE_NAME};
pub use error::{SyncError, SyncResult};
pub use plan::{plan, SyncMode, SyncPlan, DEFAULT_WINDOW_DAYS};
