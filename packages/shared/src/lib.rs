//! Shared utilities for the hubsync workspace.

pub mod logger;
pub mod time;
