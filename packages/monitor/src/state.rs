//! File-backed run memory: the state file, the history log and the two
//! PDF slots.
//!
//! The state file holds the last-notified identity as two plain lines
//! (`link\nlabel`). The history log appends the same pair once per
//! detected change and is never read back. The slots keep at most the two
//! most recent bulletins.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{MonitorError, Result};
use crate::types::Announcement;

const STATE_FILE: &str = "estado_rodajes.txt";
const HISTORY_FILE: &str = "historial_rodajes.txt";
const CURRENT_PDF: &str = "rodajes_actual.pdf";
const PREVIOUS_PDF: &str = "rodajes_anterior.pdf";

/// Everything the monitor persists between runs, rooted in one directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    data_dir: PathBuf,
}

impl StateStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| MonitorError::fs(&data_dir, e))?;
        Ok(Self { data_dir })
    }

    pub fn current_pdf(&self) -> PathBuf {
        self.data_dir.join(CURRENT_PDF)
    }

    pub fn previous_pdf(&self) -> PathBuf {
        self.data_dir.join(PREVIOUS_PDF)
    }

    pub fn has_previous_pdf(&self) -> bool {
        self.previous_pdf().exists()
    }

    fn state_file(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }

    fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Last notified identity; the empty identity when no state file
    /// exists yet.
    pub fn load_identity(&self) -> Announcement {
        let path = self.state_file();
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let mut lines = contents.lines();
                let link = lines.next().unwrap_or_default().to_string();
                let label = lines.next().unwrap_or_default().to_string();
                Announcement { link, label }
            }
            Err(_) => {
                debug!(path = %path.display(), "no state file, assuming first run");
                Announcement::empty()
            }
        }
    }

    /// Overwrite the state file with `identity` and append the same pair
    /// to the history log.
    pub fn commit_identity(&self, identity: &Announcement) -> Result<()> {
        let state_path = self.state_file();
        fs::write(
            &state_path,
            format!("{}\n{}", identity.link, identity.label),
        )
        .map_err(|e| MonitorError::fs(&state_path, e))?;

        let history_path = self.history_file();
        let mut history = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&history_path)
            .map_err(|e| MonitorError::fs(&history_path, e))?;
        writeln!(history, "{}\n{}", identity.link, identity.label)
            .map_err(|e| MonitorError::fs(&history_path, e))?;

        Ok(())
    }

    /// Rotate the PDF slots: drop "previous", move "current" into its
    /// place. A missing current slot is not an error.
    pub fn rotate_slots(&self) -> Result<()> {
        let current = self.current_pdf();
        let previous = self.previous_pdf();

        if previous.exists() {
            fs::remove_file(&previous).map_err(|e| MonitorError::fs(&previous, e))?;
        }
        if current.exists() {
            fs::rename(&current, &previous).map_err(|e| MonitorError::fs(&current, e))?;
        }

        Ok(())
    }

    /// Remove the state file so the next run re-detects the current
    /// bulletin. Best-effort.
    pub fn reset_identity(&self) {
        let path = self.state_file();
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "failed to reset state file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, StateStore) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn identity_round_trips_through_state_file() {
        let (_dir, store) = store();
        let identity = Announcement::new("/a.pdf", "Jan 2024");

        store.commit_identity(&identity).unwrap();

        assert_eq!(store.load_identity(), identity);
    }

    #[test]
    fn missing_state_file_yields_empty_identity() {
        let (_dir, store) = store();

        assert_eq!(store.load_identity(), Announcement::empty());
    }

    #[test]
    fn commit_appends_one_history_record_per_change() {
        let (dir, store) = store();

        store
            .commit_identity(&Announcement::new("/a.pdf", "Jan"))
            .unwrap();
        store
            .commit_identity(&Announcement::new("/b.pdf", "Feb"))
            .unwrap();

        let history = fs::read_to_string(dir.path().join(HISTORY_FILE)).unwrap();
        assert_eq!(history, "/a.pdf\nJan\n/b.pdf\nFeb\n");
        // The state file only keeps the latest pair.
        assert_eq!(store.load_identity(), Announcement::new("/b.pdf", "Feb"));
    }

    #[test]
    fn rotation_moves_current_into_previous() {
        let (_dir, store) = store();
        fs::write(store.previous_pdf(), b"old bulletin").unwrap();
        fs::write(store.current_pdf(), b"new bulletin").unwrap();

        store.rotate_slots().unwrap();

        assert!(!store.current_pdf().exists());
        assert_eq!(fs::read(store.previous_pdf()).unwrap(), b"new bulletin");
    }

    #[test]
    fn rotation_without_current_is_a_no_op() {
        let (_dir, store) = store();
        fs::write(store.previous_pdf(), b"old bulletin").unwrap();

        store.rotate_slots().unwrap();

        // Nothing to promote, so the stale previous is dropped.
        assert!(!store.previous_pdf().exists());
        assert!(!store.current_pdf().exists());
    }

    #[test]
    fn reset_removes_the_state_file() {
        let (_dir, store) = store();
        store
            .commit_identity(&Announcement::new("/a.pdf", "Jan"))
            .unwrap();

        store.reset_identity();

        assert_eq!(store.load_identity(), Announcement::empty());
        // Resetting twice must not error.
        store.reset_identity();
    }
}
