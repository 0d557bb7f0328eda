//! Event journal - persists coordinator events to a JSONL file
//!
//! The journal subscribes to the EventBus and appends every event as a
//! timestamped JSON line, for debugging a page session after the fact.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use super::bus::EventBus;
use super::types::{CoordEvent, EventLogEntry};

/// Event journal that appends events to one JSONL file
pub struct EventJournal {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl EventJournal {
    /// Open (or create) a journal file for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "EventJournal::open");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create journal directory")?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(format!("Failed to open journal {}", path.display()))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events written by this journal
    pub fn written(&self) -> usize {
        self.written
    }

    /// Append one event as a JSON line
    pub fn write_event(&mut self, event: &CoordEvent) -> Result<()> {
        debug!(event_type = event.event_type(), "EventJournal::write_event");
        let entry = EventLogEntry::new(event.clone());
        let json = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Consume events until the bus is dropped
    ///
    /// This is meant to be spawned as a background task.
    pub async fn run(mut self, mut rx: broadcast::Receiver<CoordEvent>) -> usize {
        debug!(path = ?self.path, "EventJournal::run: starting");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = self.write_event(&event) {
                        error!(error = %e, "EventJournal: failed to write event");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "EventJournal: lagged behind, missed events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("EventJournal: channel closed, shutting down");
                    break;
                }
            }
        }

        let _ = self.writer.flush();
        self.written
    }
}

/// Read all entries back from a journal file
pub fn read_journal(path: impl AsRef<Path>) -> Result<Vec<EventLogEntry>> {
    let path = path.as_ref();
    debug!(?path, "read_journal: reading journal");

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).context("Failed to read journal")?;
    let mut entries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<EventLogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(line, error = %e, "read_journal: failed to parse line");
            }
        }
    }

    debug!(count = entries.len(), "read_journal: loaded entries");
    Ok(entries)
}

/// Subscribe a journal to the bus and spawn it as a background task
///
/// The subscription is taken before spawning, so no event emitted after
/// this call returns is missed. The task yields the number of events written.
pub fn spawn_event_journal(bus: &EventBus, path: impl AsRef<Path>) -> Result<tokio::task::JoinHandle<usize>> {
    let journal = EventJournal::open(path)?;
    let rx = bus.subscribe();
    Ok(tokio::spawn(journal.run(rx)))
}
