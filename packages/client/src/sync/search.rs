//! Debounced live search.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const MIN_QUERY_CHARS: usize = 2;

/// What the search box should do after an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Query too short: hide the results
    Hide,
    /// A search is scheduled for the debounce deadline
    Scheduled,
}

/// Debounce state of the search box.
///
/// Each input re-arms the deadline, so a burst of keystrokes issues a single
/// request for the last value.
#[derive(Debug)]
pub struct LiveSearch {
    debounce: Duration,
    pending: Option<(Instant, String)>,
    latest_issued: Option<String>,
}

impl LiveSearch {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            latest_issued: None,
        }
    }

    /// Register an input event at `now`
    pub fn input(&mut self, text: &str, now: Instant) -> SearchInput {
        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.pending = None;
            self.latest_issued = None;
            return SearchInput::Hide;
        }

        self.pending = Some((now + self.debounce, query.to_string()));
        SearchInput::Scheduled
    }

    /// When the pending search is due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Take the pending query once its deadline has passed
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => {
                let (_, query) = self.pending.take()?;
                self.latest_issued = Some(query.clone());
                Some(query)
            }
            _ => None,
        }
    }

    /// Whether a response for `query` is still wanted
    pub fn accepts(&self, query: &str) -> bool {
        self.latest_issued.as_deref() == Some(query)
    }
}
