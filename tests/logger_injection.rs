use fleet_dispatch::adapters::outbound::{
    init_buffered_logger, init_buffered_mission_log, init_noop_logger, FileMissionLog,
    MissionLogFormat,
};
use fleet_dispatch::domains::logger::DomainLogger;
use fleet_dispatch::domains::mission::{MissionLogRecord, MissionLogSink};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

fn record(player: &str, mission_id: &str) -> MissionLogRecord {
    MissionLogRecord {
        player_name: player.to_string(),
        current_time: "2024-01-01_10-00-00".to_string(),
        latitude: "1.5".to_string(),
        longitude: "0".to_string(),
        altitude: "5".to_string(),
        azimuth: "0".to_string(),
        battery: "99.5".to_string(),
        state: "TakeOff".to_string(),
        mission_id: mission_id.to_string(),
        mission_status: "InProgress".to_string(),
        arrival_date_time: "2024-01-01_09-59-00".to_string(),
        action: "PickAndDelivery".to_string(),
        priority: "0".to_string(),
        package_weight: "1.25".to_string(),
    }
}

#[tokio::test]
async fn test_buffered_and_noop_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let bridge = capture.clone() as Arc<dyn DomainLogger>;

    let buffered = init_buffered_logger(bridge.clone(), 8);

    buffered.info("one");
    buffered.warn("two");
    buffered.error("three");

    // give the background task a moment
    tokio::time::sleep(Duration::from_millis(50)).await;

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.contains("INFO:one")));
    assert!(msgs.iter().any(|m| m.contains("WARN:two")));
    assert!(msgs.iter().any(|m| m.contains("ERR:three")));

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}

#[tokio::test]
async fn test_buffered_mission_log_writes_csv_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("missions.csv");
    let capture = Arc::new(BridgeCapture::new());

    let sink = init_buffered_mission_log(
        Arc::new(FileMissionLog::new(&path, MissionLogFormat::Csv)),
        16,
        capture.clone(),
    );
    sink.record(record("drone-1", "m-1"));
    sink.record(record("drone-2", MissionLogRecord::MISSING));

    tokio::time::sleep(Duration::from_millis(100)).await;

    let text = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], MissionLogRecord::HEADER.join(","));
    assert!(lines[1].starts_with("drone-1,"));
    assert!(lines[2].contains(",NaN,"));
    assert!(capture.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_json_lines_mission_log_has_no_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missions.jsonl");

    let sink = init_buffered_mission_log(
        Arc::new(FileMissionLog::new(&path, MissionLogFormat::JsonLines)),
        16,
        init_noop_logger(),
    );
    sink.record(record("drone-1", "m-1"));

    tokio::time::sleep(Duration::from_millis(100)).await;

    let text = tokio::fs::read_to_string(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(value["playerName"], "drone-1");
    assert_eq!(value["missionId"], "m-1");
}

#[tokio::test]
async fn test_mission_log_write_failure_reaches_logger() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be
    let path = dir.path().join("occupied");
    std::fs::create_dir(&path).unwrap();
    let capture = Arc::new(BridgeCapture::new());

    let sink = init_buffered_mission_log(
        Arc::new(FileMissionLog::new(&path, MissionLogFormat::Csv)),
        4,
        capture.clone(),
    );
    sink.record(record("drone-1", "m-1"));

    tokio::time::sleep(Duration::from_millis(100)).await;

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:Mission log write failed")));
}
