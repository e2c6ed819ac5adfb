// Copyright 2025 Cowboy AI, LLC.

//! File-backed event store
//!
//! Each raffle's stream lives in its own `raffle_<id>.json` file inside the
//! store directory, as a JSON array of [`StoredEvent`] records. Appends read
//! the whole stream, extend it and write it back through a temporary file.

use crate::domain_events::RaffleEvent;
use crate::entity::RaffleId;
use crate::errors::RaffleError;
use crate::infrastructure::event_store::{sequence_events, EventStore, EventStoreError, StoredEvent};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const FILE_PREFIX: &str = "raffle_";
const FILE_EXTENSION: &str = "json";

/// Event store persisting one JSON file per raffle
#[derive(Debug)]
pub struct FileEventStore {
    directory: PathBuf,
    pretty: bool,
    write_lock: Mutex<()>,
}

impl FileEventStore {
    /// Open a store rooted at `directory`, creating it if needed
    pub async fn open(directory: impl Into<PathBuf>) -> Result<Self, EventStoreError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).await?;
        debug!(directory = %directory.display(), "Opened file event store");

        Ok(Self {
            directory,
            pretty: true,
            write_lock: Mutex::new(()),
        })
    }

    /// Write compact instead of indented JSON
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Directory holding the stream files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `aggregate_id`'s stream
    pub fn stream_path(&self, aggregate_id: RaffleId) -> PathBuf {
        self.directory
            .join(format!("{FILE_PREFIX}{aggregate_id}.{FILE_EXTENSION}"))
    }

    async fn read_stream(&self, aggregate_id: RaffleId) -> Result<Vec<StoredEvent>, EventStoreError> {
        let path = self.stream_path(aggregate_id);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            debug!(path = %path.display(), "Treating blank stream file as empty");
            return Ok(Vec::new());
        }

        decode_stream(&contents)
    }

    async fn write_stream(&self, aggregate_id: RaffleId, stream: &[StoredEvent]) -> Result<(), EventStoreError> {
        let path = self.stream_path(aggregate_id);
        let temp = path.with_extension("json.tmp");

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(stream)?
        } else {
            serde_json::to_vec(stream)?
        };

        fs::write(&temp, bytes).await?;
        fs::rename(&temp, &path).await?;
        Ok(())
    }
}

/// Decode a stream file, naming unknown event kinds instead of failing opaquely
fn decode_stream(contents: &str) -> Result<Vec<StoredEvent>, EventStoreError> {
    let records = match serde_json::from_str::<Value>(contents)? {
        Value::Array(records) => records,
        other => {
            return Err(EventStoreError::Corrupted(format!(
                "expected an array of events, found {}",
                json_kind(&other)
            )))
        }
    };

    records
        .into_iter()
        .map(|record| {
            let kind = record
                .get("event")
                .and_then(|event| event.get("type"))
                .and_then(Value::as_str)
                .ok_or_else(|| EventStoreError::Corrupted("stored event has no type tag".to_string()))?;

            if !RaffleEvent::KINDS.contains(&kind) {
                return Err(RaffleError::UnhandledEventKind(kind.to_string()).into());
            }

            Ok(serde_json::from_value(record)?)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_stream_file_name(name: &str) -> Option<RaffleId> {
    name.strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXTENSION)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn append_events(
        &self,
        aggregate_id: RaffleId,
        events: Vec<RaffleEvent>,
        expected_version: u64,
    ) -> Result<u64, EventStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut stream = self.read_stream(aggregate_id).await?;
        let current = stream.len() as u64;
        if current != expected_version {
            return Err(EventStoreError::ConcurrencyConflict {
                expected: expected_version,
                current,
            });
        }

        if events.is_empty() {
            return Ok(current);
        }

        stream.extend(sequence_events(aggregate_id, current, events));
        self.write_stream(aggregate_id, &stream).await?;

        let version = stream.len() as u64;
        debug!(%aggregate_id, version, "Appended events to file");
        Ok(version)
    }

    async fn load_events(&self, aggregate_id: RaffleId) -> Result<Vec<StoredEvent>, EventStoreError> {
        self.read_stream(aggregate_id).await
    }

    async fn aggregate_ids(&self) -> Result<Vec<RaffleId>, EventStoreError> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!(file = ?file_name, "Skipping non UTF-8 file name in event store");
                continue;
            };

            match parse_stream_file_name(name) {
                Some(id) => ids.push(id),
                None if name.ends_with(".tmp") => {}
                None => warn!(file = name, "Skipping unrecognised file in event store"),
            }
        }

        ids.sort();
        Ok(ids)
    }
}
