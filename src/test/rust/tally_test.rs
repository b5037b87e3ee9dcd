use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use bridge_obs_to_mqtt::{
    BridgeService, BridgeSettings, ConnectionState, DomainError, PrometheusReporter, SceneCue,
    SceneMonitor, SceneView, StatusPublisher, StatusSnapshot, StatusSource, TallyBoard, TallyColor,
};

struct IdleStatusSource;

#[async_trait]
impl StatusSource for IdleStatusSource {
    async fn poll_status(&self) -> Result<StatusSnapshot, DomainError> {
        Ok(StatusSnapshot::zeroed())
    }
}

/// Scene monitor with a swappable view and a query counter
struct FakeSceneMonitor {
    view: Mutex<SceneView>,
    queries: Mutex<usize>,
}

impl FakeSceneMonitor {
    fn new(view: SceneView) -> Self {
        Self {
            view: Mutex::new(view),
            queries: Mutex::new(0),
        }
    }

    fn set_view(&self, view: SceneView) {
        *self.view.lock().unwrap() = view;
    }

    fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

#[async_trait]
impl SceneMonitor for FakeSceneMonitor {
    async fn scene_view(&self) -> Result<SceneView, DomainError> {
        *self.queries.lock().unwrap() += 1;
        Ok(self.view.lock().unwrap().clone())
    }
}

/// Publisher that records (topic, payload) pairs
struct RecordingPublisher {
    log: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn apply(&mut self, _settings: &BridgeSettings) -> Result<(), DomainError> {
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<(), DomainError> {
        self.log
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), DomainError> {
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    fn reconnect_check(&self) {}
}

fn sources(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn view(program: &[&str], preview: &[&str]) -> SceneView {
    SceneView::new(
        Some("live".to_string()),
        Some("backstage".to_string()),
        sources(program),
        sources(preview),
    )
}

fn tally_entries(log: &[(String, String)]) -> Vec<(String, String)> {
    log.iter()
        .filter(|(topic, _)| topic.starts_with("cmnd/"))
        .cloned()
        .collect()
}

async fn tally_service(
    monitor: Arc<FakeSceneMonitor>,
    tally_sources: &[&str],
) -> (BridgeService, Arc<Mutex<Vec<(String, String)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let publisher = RecordingPublisher { log: log.clone() };
    let mut service = BridgeService::new(
        Arc::new(IdleStatusSource),
        monitor,
        Box::new(publisher),
        Arc::new(PrometheusReporter::new()),
    );

    let settings = BridgeSettings::new(
        "localhost".to_string(),
        1883,
        "obs/status".to_string(),
        Duration::from_secs(5),
        tally_sources.iter().map(|source| source.to_string()).collect(),
    )
    .unwrap();
    service.apply_settings(settings).await.unwrap();

    (service, log)
}

#[test]
fn test_color_priority_program_beats_preview() {
    assert_eq!(TallyColor::resolve(false, false), TallyColor::Idle);
    assert_eq!(TallyColor::resolve(true, false), TallyColor::Preview);
    assert_eq!(TallyColor::resolve(false, true), TallyColor::Program);
    assert_eq!(TallyColor::resolve(true, true), TallyColor::Program);
}

#[test]
fn test_color_hex_payloads() {
    assert_eq!(TallyColor::Idle.hex(), "000000");
    assert_eq!(TallyColor::Preview.hex(), "00ff00");
    assert_eq!(TallyColor::Program.hex(), "ff0000");
}

#[test]
fn test_tally_topic_shape() {
    assert_eq!(TallyBoard::topic_for("cam-left"), "cmnd/cam-left/COLOR");
}

#[tokio::test]
async fn test_first_cue_publishes_every_source() {
    let monitor = Arc::new(FakeSceneMonitor::new(view(&["cam-left"], &["cam-right"])));
    let (mut service, log) = tally_service(monitor, &["cam-left", "cam-right"]).await;

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();

    let tallies = tally_entries(&log.lock().unwrap());
    assert_eq!(
        tallies,
        vec![
            ("cmnd/cam-left/COLOR".to_string(), "ff0000".to_string()),
            ("cmnd/cam-right/COLOR".to_string(), "00ff00".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_repeat_cue_publishes_only_moved_sources() {
    let monitor = Arc::new(FakeSceneMonitor::new(view(&["cam-left"], &["cam-right"])));
    let (mut service, log) = tally_service(monitor.clone(), &["cam-left", "cam-right"]).await;

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();
    let first_round = tally_entries(&log.lock().unwrap()).len();

    // cam-right joins the program scene; cam-left stays red
    monitor.set_view(view(&["cam-left", "cam-right"], &["cam-right"]));
    service
        .on_scene_cue(SceneCue::PreviewChanged("backstage".to_string()))
        .await
        .unwrap();

    let tallies = tally_entries(&log.lock().unwrap());
    assert_eq!(tallies.len(), first_round + 1);
    assert_eq!(
        tallies[first_round],
        ("cmnd/cam-right/COLOR".to_string(), "ff0000".to_string())
    );
}

#[tokio::test]
async fn test_unchanged_view_publishes_nothing() {
    let monitor = Arc::new(FakeSceneMonitor::new(view(&["cam-left"], &[])));
    let (mut service, log) = tally_service(monitor, &["cam-left"]).await;

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();
    let first_round = tally_entries(&log.lock().unwrap()).len();

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();

    assert_eq!(tally_entries(&log.lock().unwrap()).len(), first_round);
}

#[tokio::test]
async fn test_empty_board_skips_scene_queries() {
    let monitor = Arc::new(FakeSceneMonitor::new(view(&["cam-left"], &[])));
    let (mut service, log) = tally_service(monitor.clone(), &[]).await;

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();

    assert_eq!(monitor.query_count(), 0);
    assert!(tally_entries(&log.lock().unwrap()).is_empty());
}

#[tokio::test]
async fn test_source_leaving_all_scenes_goes_idle() {
    let monitor = Arc::new(FakeSceneMonitor::new(view(&["cam-left"], &[])));
    let (mut service, log) = tally_service(monitor.clone(), &["cam-left"]).await;

    service
        .on_scene_cue(SceneCue::ProgramChanged("live".to_string()))
        .await
        .unwrap();

    monitor.set_view(view(&[], &[]));
    service
        .on_scene_cue(SceneCue::ProgramChanged("interstitial".to_string()))
        .await
        .unwrap();

    let tallies = tally_entries(&log.lock().unwrap());
    assert_eq!(
        tallies.last(),
        Some(&("cmnd/cam-left/COLOR".to_string(), "000000".to_string()))
    );
}
