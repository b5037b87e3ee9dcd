use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant};

use crate::domain::entities::{ConnectionLifecycle, StatusTracker, TallyBoard};
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{MetricsReporter, SceneCue, SceneMonitor, StatusPublisher, StatusSource};
use crate::domain::value_objects::{
    BridgeSettings, ConnectionState, StatusSnapshot, TallyColor,
};

/// Application service orchestrating the status and tally bridge
pub struct BridgeService {
    status_source: Arc<dyn StatusSource>,
    scene_monitor: Arc<dyn SceneMonitor>,
    publisher: Box<dyn StatusPublisher>,
    metrics: Arc<dyn MetricsReporter>,
    settings: BridgeSettings,
    tracker: StatusTracker,
    board: TallyBoard,
    lifecycle: ConnectionLifecycle,
}

impl BridgeService {
    pub fn new(
        status_source: Arc<dyn StatusSource>,
        scene_monitor: Arc<dyn SceneMonitor>,
        publisher: Box<dyn StatusPublisher>,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        let settings = BridgeSettings::default();
        let board = TallyBoard::new(settings.tally_sources());

        Self {
            status_source,
            scene_monitor,
            publisher,
            metrics,
            settings,
            tracker: StatusTracker::new(),
            board,
            lifecycle: ConnectionLifecycle::new(),
        }
    }

    pub fn current_state(&self) -> ConnectionState {
        *self.lifecycle.current_state()
    }

    /// Apply new settings (use case): reconnect the publisher, announce the
    /// current status once, and rebuild the tally board. An unreachable
    /// broker leaves the bridge disconnected but functional.
    pub async fn apply_settings(&mut self, settings: BridgeSettings) -> Result<()> {
        tracing::info!(
            broker = %settings.broker_host(),
            port = settings.broker_port(),
            topic = %settings.topic(),
            "Applying settings"
        );

        self.lifecycle.transition_to_connecting();
        self.metrics.report_state_change(self.lifecycle.current_state());

        self.publisher.apply(&settings).await?;
        self.board = TallyBoard::new(settings.tally_sources());
        self.settings = settings;
        self.observe_connection();

        if self.publisher.connection_state().is_connected() {
            self.publish_status().await?;
        }

        Ok(())
    }

    /// One polling pass (use case): refresh the snapshot and publish
    /// according to the recording/streaming edges
    pub async fn tick(&mut self) -> Result<()> {
        self.publisher.reconnect_check();
        self.observe_connection();

        let snapshot = self.status_source.poll_status().await?;
        let plan = self.tracker.record(snapshot);

        if plan.final_message {
            tracing::info!("Recording/streaming stopped, publishing final status");
            self.publish_status().await?;
        }
        if plan.steady_message {
            self.publish_status().await?;
        }

        Ok(())
    }

    /// React to a scene change (use case): re-resolve every configured
    /// source's tally color and publish the ones that moved
    pub async fn on_scene_cue(&mut self, cue: SceneCue) -> Result<()> {
        self.metrics.report_scene_event();
        if self.board.is_empty() {
            return Ok(());
        }

        let view = self.scene_monitor.scene_view().await?;
        tracing::debug!(
            cue = ?cue,
            program = ?view.program_scene(),
            preview = ?view.preview_scene(),
            "Re-evaluating tally colors"
        );

        for (source, color) in self.board.evaluate(&view) {
            self.publish_tally(&source, color).await?;
            self.board.mark_published(&source, color);
        }

        Ok(())
    }

    /// Teardown (use case): publish a zeroed status, black out every tracked
    /// tally source, then disconnect, in that order
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Publishing final zeroed status before disconnect");

        let payload = Self::encode_status(&StatusSnapshot::zeroed())?;
        if let Err(e) = self.publisher.publish(self.settings.topic(), payload).await {
            self.metrics.report_publish_failure();
            tracing::error!("Final status publish failed: {}", e);
        } else {
            self.metrics.report_status_publish();
        }

        for (source, color) in self.board.blackout() {
            if let Err(e) = self
                .publisher
                .publish(&TallyBoard::topic_for(&source), color.hex().to_string())
                .await
            {
                self.metrics.report_publish_failure();
                tracing::error!("Tally blackout for {} failed: {}", source, e);
            } else {
                self.metrics.report_tally_publish();
                self.board.mark_published(&source, color);
            }
        }

        self.publisher.disconnect().await?;
        self.lifecycle
            .transition_to_disconnected(Some("Bridge stopped".to_string()));
        self.metrics.report_state_change(self.lifecycle.current_state());

        tracing::info!("Bridge stopped");
        Ok(())
    }

    /// Main loop: multiplex the status interval, scene cues, runtime
    /// settings updates, and the shutdown signal
    pub async fn run(
        mut self,
        mut cues: mpsc::Receiver<SceneCue>,
        mut settings_rx: mpsc::Receiver<BridgeSettings>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()> {
        let mut ticker = interval_at(
            Instant::now() + self.settings.interval(),
            self.settings.interval(),
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!("Status update failed: {}", e);
                    }
                }
                Some(cue) = cues.recv() => {
                    if let Err(e) = self.on_scene_cue(cue).await {
                        tracing::error!("Tally update failed: {}", e);
                    }
                }
                Some(settings) = settings_rx.recv() => {
                    match self.apply_settings(settings).await {
                        Ok(()) => {
                            if ticker.period() != self.settings.interval() {
                                ticker = interval_at(
                                    Instant::now() + self.settings.interval(),
                                    self.settings.interval(),
                                );
                            }
                        }
                        Err(e) => tracing::error!("Settings apply failed: {}", e),
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::info!("Shutdown requested, tearing down");
                    break;
                }
            }
        }

        self.shutdown().await
    }

    /// Log and report broker state transitions observed since the last check
    fn observe_connection(&mut self) {
        let state = self.publisher.connection_state();
        if state != *self.lifecycle.current_state() {
            match state {
                ConnectionState::Connecting => self.lifecycle.transition_to_connecting(),
                ConnectionState::Connected => self.lifecycle.transition_to_connected(),
                ConnectionState::Disconnected => self.lifecycle.transition_to_disconnected(None),
            }
            tracing::info!("MQTT connection state: {}", state);
            self.metrics.report_state_change(&state);
        }

        if let Some(uptime) = self.lifecycle.uptime() {
            self.metrics.report_uptime(uptime.as_secs_f64());
        }
    }

    async fn publish_status(&mut self) -> Result<()> {
        let payload = Self::encode_status(self.tracker.current())?;
        match self.publisher.publish(self.settings.topic(), payload).await {
            Ok(()) => {
                self.metrics.report_status_publish();
                Ok(())
            }
            Err(e) => {
                self.metrics.report_publish_failure();
                Err(e)
            }
        }
    }

    async fn publish_tally(&mut self, source: &str, color: TallyColor) -> Result<()> {
        let topic = TallyBoard::topic_for(source);
        match self.publisher.publish(&topic, color.hex().to_string()).await {
            Ok(()) => {
                self.metrics.report_tally_publish();
                Ok(())
            }
            Err(e) => {
                self.metrics.report_publish_failure();
                Err(e)
            }
        }
    }

    fn encode_status(snapshot: &StatusSnapshot) -> Result<String> {
        serde_json::to_string(snapshot)
            .map_err(|e| DomainError::PublishFailed(format!("status encode: {}", e)))
    }
}
