//! One full monitor pass: detect a bulletin change and notify.
//!
//! The pass is strictly sequential. Page problems (fetch failure, no
//! announcement entry) abort the run with no state mutation. Once a change
//! is detected the run always proceeds to the notification and the state
//! commit, degrading on collaborator failures: a failed download means no
//! attachment, an unreadable PDF means empty text, a failed summary means
//! an empty summary.

use tracing::{error, info, warn};

use crate::error::Result;
use crate::mail::Notifier;
use crate::page::BulletinSource;
use crate::pdf;
use crate::state::StateStore;
use crate::summary::{Summarizer, NO_PREVIOUS_SENTINEL};
use crate::types::RunOutcome;

/// Execute one monitor pass.
pub async fn run(
    store: &StateStore,
    source: &dyn BulletinSource,
    summarizer: &dyn Summarizer,
    notifier: &dyn Notifier,
    reset_state_on_mail_failure: bool,
) -> Result<RunOutcome> {
    info!("starting bulletin check");

    let known = store.load_identity();

    let Some(announcement) = source.latest_announcement().await? else {
        warn!("no announcement entry on the page, nothing to do");
        return Ok(RunOutcome::Unchanged);
    };

    if announcement == known {
        info!(link = %known.link, "bulletin unchanged");
        return Ok(RunOutcome::Unchanged);
    }

    info!(
        link = %announcement.link,
        label = %announcement.label,
        "bulletin changed"
    );

    // A failed download leaves the current slot absent; the run continues
    // without an attachment and with empty current text.
    let current_pdf = store.current_pdf();
    let downloaded = match source
        .download_bulletin(&announcement.link, &current_pdf)
        .await
    {
        Ok(()) => true,
        Err(err) => {
            error!(error = %err, link = %announcement.link, "bulletin download failed");
            false
        }
    };

    let summary = if store.has_previous_pdf() {
        let previous_text = match pdf::extract_text(&store.previous_pdf()).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "previous bulletin unreadable");
                String::new()
            }
        };
        let current_text = if downloaded {
            match pdf::extract_text(&current_pdf).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "current bulletin unreadable");
                    String::new()
                }
            }
        } else {
            String::new()
        };

        match summarizer.diff_summary(&previous_text, &current_text).await {
            Ok(summary) => summary,
            Err(err) => {
                error!(error = %err, "diff summary failed");
                String::new()
            }
        }
    } else {
        NO_PREVIOUS_SENTINEL.to_string()
    };

    // Attachment bytes are read before rotation renames the slot away.
    let bulletin = if downloaded {
        match tokio::fs::read(&current_pdf).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(error = %err, "could not read back downloaded bulletin");
                None
            }
        }
    } else {
        None
    };

    if let Err(err) = notifier.notify(&announcement, &summary, bulletin).await {
        error!(error = %err, "notification mail failed");
        if reset_state_on_mail_failure {
            warn!("resetting state so the next run re-detects this bulletin");
            store.reset_identity();
            return Ok(RunOutcome::Deferred(announcement));
        }
    }

    if let Err(err) = store.rotate_slots() {
        warn!(error = %err, "slot rotation failed");
    }
    if let Err(err) = store.commit_identity(&announcement) {
        error!(error = %err, "state commit failed");
    }

    Ok(RunOutcome::Notified(announcement))
}
