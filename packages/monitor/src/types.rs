//! Core data types for the monitor.

/// Identity of the currently published bulletin entry.
///
/// Change detection compares the pair with exact string equality; any
/// difference in either field counts as a new bulletin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Raw href of the entry, as found on the page
    pub link: String,

    /// Trimmed display text of the entry
    pub label: String,
}

impl Announcement {
    pub fn new(link: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            label: label.into(),
        }
    }

    /// Identity assumed before the first ever run.
    pub fn empty() -> Self {
        Self {
            link: String::new(),
            label: String::new(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page still shows the last-notified entry (or no entry at all).
    Unchanged,

    /// A new bulletin was detected; the notification cycle ran and the
    /// state was committed.
    Notified(Announcement),

    /// A new bulletin was detected but the mail failed and the state was
    /// reset, so the next run re-detects the same bulletin.
    Deferred(Announcement),
}
