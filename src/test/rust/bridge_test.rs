use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use bridge_obs_to_mqtt::{
    BridgeService, BridgeSettings, ConnectionState, DomainError, PrometheusReporter, SceneMonitor,
    SceneView, StatusPublisher, StatusSnapshot, StatusSource,
};

/// Status source that replays a scripted sequence of snapshots, one per tick
struct ScriptedStatusSource {
    snapshots: Mutex<VecDeque<StatusSnapshot>>,
}

impl ScriptedStatusSource {
    fn new(snapshots: Vec<StatusSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn poll_status(&self) -> Result<StatusSnapshot, DomainError> {
        let mut queue = self.snapshots.lock().unwrap();
        Ok(queue.pop_front().unwrap_or_default())
    }
}

struct FixedSceneMonitor;

#[async_trait]
impl SceneMonitor for FixedSceneMonitor {
    async fn scene_view(&self) -> Result<SceneView, DomainError> {
        Ok(SceneView::empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Recorded {
    Apply,
    Publish(String, String),
    Disconnect,
}

/// Publisher that records every call; optionally simulates a broker that
/// never accepts the connection
struct RecordingPublisher {
    log: Arc<Mutex<Vec<Recorded>>>,
    reachable: bool,
}

impl RecordingPublisher {
    fn new(log: Arc<Mutex<Vec<Recorded>>>) -> Self {
        Self {
            log,
            reachable: true,
        }
    }

    fn unreachable(log: Arc<Mutex<Vec<Recorded>>>) -> Self {
        Self {
            log,
            reachable: false,
        }
    }
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn apply(&mut self, _settings: &BridgeSettings) -> Result<(), DomainError> {
        self.log.lock().unwrap().push(Recorded::Apply);
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<(), DomainError> {
        if !self.reachable {
            return Err(DomainError::PublishFailed("no broker session".to_string()));
        }
        self.log
            .lock()
            .unwrap()
            .push(Recorded::Publish(topic.to_string(), payload));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), DomainError> {
        self.log.lock().unwrap().push(Recorded::Disconnect);
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        if self.reachable {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    fn reconnect_check(&self) {}
}

fn settings_with_sources(sources: &[&str]) -> BridgeSettings {
    BridgeSettings::new(
        "localhost".to_string(),
        1883,
        "obs/status".to_string(),
        Duration::from_secs(5),
        sources.iter().map(|source| source.to_string()).collect(),
    )
    .unwrap()
}

fn service_with(snapshots: Vec<StatusSnapshot>, publisher: RecordingPublisher) -> BridgeService {
    BridgeService::new(
        Arc::new(ScriptedStatusSource::new(snapshots)),
        Arc::new(FixedSceneMonitor),
        Box::new(publisher),
        Arc::new(PrometheusReporter::new()),
    )
}

fn recording(streaming: bool) -> StatusSnapshot {
    StatusSnapshot {
        recording: true,
        streaming,
        paused: false,
        replay_buffer: false,
        fps: 30.0,
        frame_time_ns: 2_000_000,
        frames: 1_000,
        lagged_frames: 2,
    }
}

fn status_publishes(log: &[Recorded]) -> Vec<String> {
    log.iter()
        .filter_map(|entry| match entry {
            Recorded::Publish(topic, payload) if topic == "obs/status" => Some(payload.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_apply_settings_publishes_current_status() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(vec![], RecordingPublisher::new(log.clone()));

    service.apply_settings(settings_with_sources(&[])).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0], Recorded::Apply);
    assert_eq!(
        log[1],
        Recorded::Publish(
            "obs/status".to_string(),
            serde_json::to_string(&StatusSnapshot::zeroed()).unwrap(),
        )
    );
    assert_eq!(service.current_state(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_idle_ticks_publish_nothing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![StatusSnapshot::zeroed(), StatusSnapshot::zeroed()],
        RecordingPublisher::new(log.clone()),
    );

    service.apply_settings(settings_with_sources(&[])).await.unwrap();
    service.tick().await.unwrap();
    service.tick().await.unwrap();

    // Only the publish from apply_settings itself
    assert_eq!(status_publishes(&log.lock().unwrap()).len(), 1);
}

#[tokio::test]
async fn test_steady_status_published_while_recording() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![recording(false), recording(false)],
        RecordingPublisher::new(log.clone()),
    );

    service.apply_settings(settings_with_sources(&[])).await.unwrap();
    service.tick().await.unwrap();
    service.tick().await.unwrap();

    let published = status_publishes(&log.lock().unwrap());
    assert_eq!(published.len(), 3);
    assert!(published[1].contains("\"recording\":true"));
    assert!(published[2].contains("\"recording\":true"));
}

#[tokio::test]
async fn test_final_publish_on_recording_stop_then_silence() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![
            recording(false),
            StatusSnapshot::zeroed(),
            StatusSnapshot::zeroed(),
        ],
        RecordingPublisher::new(log.clone()),
    );

    service.apply_settings(settings_with_sources(&[])).await.unwrap();
    service.tick().await.unwrap(); // recording: steady publish
    service.tick().await.unwrap(); // stopped: one final publish
    service.tick().await.unwrap(); // still stopped: silence

    let published = status_publishes(&log.lock().unwrap());
    assert_eq!(published.len(), 3);
    assert!(published[2].contains("\"recording\":false"));
}

#[tokio::test]
async fn test_stream_stop_while_recording_publishes_final_and_steady() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![recording(true), recording(false)],
        RecordingPublisher::new(log.clone()),
    );

    service.apply_settings(settings_with_sources(&[])).await.unwrap();
    service.tick().await.unwrap();

    let before = status_publishes(&log.lock().unwrap()).len();
    service.tick().await.unwrap();
    let published = status_publishes(&log.lock().unwrap());

    // Streaming ended but recording continues: final edge publish plus the
    // steady one
    assert_eq!(published.len(), before + 2);
    assert!(published[before].contains("\"streaming\":false"));
}

#[tokio::test]
async fn test_simultaneous_stop_publishes_single_final() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![recording(true), StatusSnapshot::zeroed()],
        RecordingPublisher::new(log.clone()),
    );

    service.apply_settings(settings_with_sources(&[])).await.unwrap();
    service.tick().await.unwrap();

    let before = status_publishes(&log.lock().unwrap()).len();
    service.tick().await.unwrap();

    assert_eq!(status_publishes(&log.lock().unwrap()).len(), before + 1);
}

#[tokio::test]
async fn test_unreachable_broker_keeps_bridge_functional() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(
        vec![StatusSnapshot::zeroed(), recording(false)],
        RecordingPublisher::unreachable(log.clone()),
    );

    let applied = service.apply_settings(settings_with_sources(&[])).await;
    assert!(applied.is_ok());
    assert_eq!(service.current_state(), ConnectionState::Disconnected);

    // Idle tick has nothing to publish
    assert!(service.tick().await.is_ok());

    // An active tick surfaces the publish failure to the caller
    assert!(service.tick().await.is_err());
    assert!(status_publishes(&log.lock().unwrap()).is_empty());
}

#[tokio::test]
async fn test_shutdown_publishes_zeroed_status_then_blackout_then_disconnect() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut service = service_with(vec![], RecordingPublisher::new(log.clone()));

    service
        .apply_settings(settings_with_sources(&["cam-left", "cam-right"]))
        .await
        .unwrap();
    service.shutdown().await.unwrap();

    let log = log.lock().unwrap();
    let tail = &log[log.len() - 4..];
    assert_eq!(
        tail[0],
        Recorded::Publish(
            "obs/status".to_string(),
            serde_json::to_string(&StatusSnapshot::zeroed()).unwrap(),
        )
    );
    assert_eq!(
        tail[1],
        Recorded::Publish("cmnd/cam-left/COLOR".to_string(), "000000".to_string())
    );
    assert_eq!(
        tail[2],
        Recorded::Publish("cmnd/cam-right/COLOR".to_string(), "000000".to_string())
    );
    assert_eq!(tail[3], Recorded::Disconnect);
    assert_eq!(service.current_state(), ConnectionState::Disconnected);
}
