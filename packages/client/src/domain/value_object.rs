//! Value objects: identifiers and rooms.

use std::fmt;

use super::ValueError;

/// Identifier of a marketplace user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValueError::Empty("UserId"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a chat thread (the order the conversation belongs to)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(String);

impl ThreadId {
    /// Create a thread id, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValueError::Empty("ThreadId"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A broadcast scope on the realtime channel.
///
/// The per-user room is addressed by user id on the wire; every other room
/// is addressed by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    User(UserId),
    Named(String),
}

impl Room {
    /// Room carrying the chat of one order thread
    pub fn for_thread(thread_id: &ThreadId) -> Self {
        Room::Named(format!("order_{}", thread_id.as_str()))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::User(user_id) => write!(f, "user_{}", user_id),
            Room::Named(name) => f.write_str(name),
        }
    }
}

/// The current viewer and the thread they are looking at.
///
/// Fixed for the lifetime of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<UserId>,
    pub thread_id: Option<ThreadId>,
}

impl Session {
    pub fn new(user_id: Option<UserId>, thread_id: Option<ThreadId>) -> Self {
        Self { user_id, thread_id }
    }

    /// Whether `user_id` belongs to the current viewer
    pub fn is_own(&self, user_id: &str) -> bool {
        self.user_id
            .as_ref()
            .is_some_and(|own| own.as_str() == user_id)
    }
}
