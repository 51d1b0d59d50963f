//! Change monitor for the ICAA film-shoot bulletin.
//!
//! The Ministry of Culture republishes a PDF bulletin of notified film
//! shoots every few days under a fresh link. Each invocation performs one
//! pass: load the last-notified entry, scrape the page for the current one,
//! and when it changed, download the new bulletin, summarize the added
//! shoots against the previous version and send a notification mail with
//! the PDF attached. Periodicity comes from an external scheduler.

pub mod config;
pub mod error;
pub mod mail;
pub mod page;
pub mod pdf;
pub mod run;
pub mod state;
pub mod summary;
pub mod types;

pub use error::{MonitorError, Result};
pub use types::{Announcement, RunOutcome};
