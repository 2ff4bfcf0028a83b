use crate::common::{DomainError, DomainResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{MissionLogRecord, MissionLogSink};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// Keeps every record in memory. Used by tests and for post-run inspection.
#[derive(Debug, Default)]
pub struct InMemoryMissionLog {
    records: Mutex<Vec<MissionLogRecord>>,
}

impl InMemoryMissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MissionLogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MissionLogSink for InMemoryMissionLog {
    fn record(&self, record: MissionLogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

/// Emits each record as a structured `tracing` event.
pub struct TracingMissionLog;

impl MissionLogSink for TracingMissionLog {
    fn record(&self, record: MissionLogRecord) {
        tracing::info!(
            target: "mission_log",
            player = %record.player_name,
            time = %record.current_time,
            lat = %record.latitude,
            lon = %record.longitude,
            alt = %record.altitude,
            azimuth = %record.azimuth,
            battery = %record.battery,
            state = %record.state,
            mission_id = %record.mission_id,
            mission_status = %record.mission_status,
            "status report"
        );
    }
}

/// Destination for records leaving the tick loop.
#[async_trait]
pub trait MissionLogWriter: Send + Sync {
    async fn write(&self, record: &MissionLogRecord) -> DomainResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionLogFormat {
    #[default]
    Csv,
    JsonLines,
}

/// Appends records to a file, one per line. A CSV file gets its header when created.
pub struct FileMissionLog {
    path: PathBuf,
    format: MissionLogFormat,
}

impl FileMissionLog {
    pub fn new<P: Into<PathBuf>>(path: P, format: MissionLogFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Bytes to append for `record`, header first when the file is new.
    fn encode(&self, record: &MissionLogRecord, is_new: bool) -> DomainResult<Vec<u8>> {
        match self.format {
            MissionLogFormat::Csv => csv_rows(record, is_new),
            MissionLogFormat::JsonLines => {
                let mut line = serde_json::to_vec(record)?;
                line.push(b'\n');
                Ok(line)
            }
        }
    }
}

#[async_trait]
impl MissionLogWriter for FileMissionLog {
    async fn write(&self, record: &MissionLogRecord) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        }
        let is_new = tokio::fs::metadata(&self.path).await.is_err();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                DomainError::InfrastructureError(format!(
                    "Failed to open mission log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let bytes = self.encode(record, is_new)?;
        file.write_all(&bytes)
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        file.flush()
            .await
            .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        Ok(())
    }
}

fn csv_rows(record: &MissionLogRecord, with_header: bool) -> DomainResult<Vec<u8>> {
    let csv_error = |e: csv::Error| DomainError::InfrastructureError(format!("CSV: {}", e));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if with_header {
        writer
            .write_record(MissionLogRecord::HEADER)
            .map_err(csv_error)?;
    }
    writer.write_record(record.fields()).map_err(csv_error)?;
    writer
        .into_inner()
        .map_err(|e| DomainError::InfrastructureError(format!("CSV: {}", e)))
}

struct BufferedMissionLog {
    sender: mpsc::Sender<MissionLogRecord>,
}

impl MissionLogSink for BufferedMissionLog {
    fn record(&self, record: MissionLogRecord) {
        // drop on full; the tick never waits on disk
        let _ = self.sender.try_send(record);
    }
}

/// Non-blocking sink forwarding records to `writer` from a background tokio task.
/// Write failures are reported through `logger`. Must be called within a tokio runtime.
pub fn init_buffered_mission_log(
    writer: Arc<dyn MissionLogWriter>,
    capacity: usize,
    logger: DynLogger,
) -> Arc<dyn MissionLogSink> {
    let (tx, mut rx) = mpsc::channel::<MissionLogRecord>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            if let Err(e) = writer.write(&record).await {
                logger.error(&format!("Mission log write failed: {}", e));
            }
        }
    });

    Arc::new(BufferedMissionLog { sender: tx })
}
