//! Realtime synchronization: the client event loop and its helpers.

mod client;
pub mod search;

pub use client::{Command, RealtimeSyncClient, SyncHandle};
pub use search::{LiveSearch, SearchInput};
