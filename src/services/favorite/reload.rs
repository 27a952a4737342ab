//! Widget timeline refresh signal.
//!
//! Favorite mutations call [`TimelineReloader::reload_timelines`] so widget
//! processes redraw on their next opportunity. Delivery is fire-and-forget:
//! a failed signal is logged and never fails the write that triggered it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::models::favorite::{format_occurrence, parse_occurrence};

#[cfg_attr(test, mockall::automock)]
pub trait TimelineReloader: Send + Sync {
    fn reload_timelines(&self, kind: &str);
}

/// Drops every signal. Used where no widget is listening.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReloader;

impl TimelineReloader for NoopReloader {
    fn reload_timelines(&self, kind: &str) {
        log::trace!("Timeline reload for {} ignored", kind);
    }
}

/// Stamps `<dir>/<kind>.stamp` with the signal time; widget processes
/// compare it with the stamp they last rendered.
#[derive(Debug, Clone)]
pub struct MarkerFileReloader {
    dir: PathBuf,
}

impl MarkerFileReloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn stamp_path(&self, kind: &str) -> PathBuf {
        stamp_path(&self.dir, kind)
    }
}

impl TimelineReloader for MarkerFileReloader {
    fn reload_timelines(&self, kind: &str) {
        let path = self.stamp_path(kind);
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, format_occurrence(&Utc::now())));

        match result {
            Ok(()) => log::debug!("Requested timeline reload for {}", kind),
            Err(err) => log::warn!("Failed to signal timeline reload at {}: {}", path.display(), err),
        }
    }
}

/// When `kind` was last asked to reload, if ever.
pub fn last_reload(dir: &Path, kind: &str) -> Option<DateTime<Utc>> {
    let contents = std::fs::read_to_string(stamp_path(dir, kind)).ok()?;
    parse_occurrence(contents.trim())
}

fn stamp_path(dir: &Path, kind: &str) -> PathBuf {
    dir.join(format!("{}.stamp", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let timelines = dir.path().join("timelines");
        let reloader = MarkerFileReloader::new(&timelines);

        assert_eq!(last_reload(&timelines, "favEvents"), None);

        let before = Utc::now() - chrono::Duration::seconds(1);
        reloader.reload_timelines("favEvents");

        let stamped = last_reload(&timelines, "favEvents").unwrap();
        assert!(stamped >= before);
        assert_eq!(last_reload(&timelines, "upcoming"), None);
    }

    #[test]
    fn test_marker_file_failure_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        MarkerFileReloader::new(blocker.join("timelines")).reload_timelines("favEvents");
    }
}
