use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{pin_mut, Stream, StreamExt};
use obws::events::Event;
use obws::Client;
use tokio::sync::{mpsc, RwLock};

use super::ObsEndpoint;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{SceneCue, SceneMonitor, StatusSource};
use crate::domain::value_objects::{SceneView, StatusSnapshot};

/// Scene cues buffered between the event forwarder and the service
const CUE_BUFFER: usize = 32;

/// obs-websocket reports average frame render time in milliseconds
const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// obws-backed adapter implementing both host-facing ports. The websocket
/// session is opened lazily and dropped on the first failed query, so the
/// next status tick reconnects.
pub struct ObsGateway {
    endpoint: ObsEndpoint,
    client: Arc<RwLock<Option<Client>>>,
    cue_tx: mpsc::Sender<SceneCue>,
}

impl ObsGateway {
    pub fn new(endpoint: ObsEndpoint) -> (Self, mpsc::Receiver<SceneCue>) {
        let (cue_tx, cue_rx) = mpsc::channel(CUE_BUFFER);
        let gateway = Self {
            endpoint,
            client: Arc::new(RwLock::new(None)),
            cue_tx,
        };
        (gateway, cue_rx)
    }

    async fn ensure_connected(&self) -> Result<()> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        let mut guard = self.client.write().await;
        if guard.is_some() {
            return Ok(());
        }

        tracing::info!(
            "Connecting to OBS at {}:{}",
            self.endpoint.host,
            self.endpoint.port
        );
        let client = Client::connect(
            self.endpoint.host.as_str(),
            self.endpoint.port,
            self.endpoint.password.as_deref(),
        )
        .await
        .map_err(|e| DomainError::HostConnectFailed(e.to_string()))?;

        match client.events() {
            Ok(events) => {
                let cue_tx = self.cue_tx.clone();
                tokio::spawn(Self::forward_events(events, cue_tx));
            }
            Err(e) => tracing::warn!("OBS event stream unavailable: {}", e),
        }

        *guard = Some(client);
        tracing::info!("OBS connection established");
        Ok(())
    }

    /// Translate program/preview change events into scene cues. The stream
    /// ends when the websocket session drops.
    async fn forward_events(events: impl Stream<Item = Event>, cue_tx: mpsc::Sender<SceneCue>) {
        pin_mut!(events);
        while let Some(event) = events.next().await {
            let cue = match event {
                Event::CurrentProgramSceneChanged { id } => SceneCue::ProgramChanged(id.name),
                Event::CurrentPreviewSceneChanged { id } => SceneCue::PreviewChanged(id.name),
                _ => continue,
            };
            if cue_tx.send(cue).await.is_err() {
                return;
            }
        }
        tracing::warn!("OBS event stream ended");
    }

    async fn drop_client(&self) {
        if let Some(mut client) = self.client.write().await.take() {
            client.disconnect().await;
            tracing::info!("Dropped OBS session after a failed query");
        }
    }

    async fn query_status(client: &Client) -> Result<StatusSnapshot> {
        let record = client
            .recording()
            .status()
            .await
            .map_err(|e| DomainError::StatusQueryFailed(e.to_string()))?;
        let stream = client
            .streaming()
            .status()
            .await
            .map_err(|e| DomainError::StatusQueryFailed(e.to_string()))?;
        let replay_active = client
            .replay_buffer()
            .status()
            .await
            .map_err(|e| DomainError::StatusQueryFailed(e.to_string()))?;
        let stats = client
            .general()
            .stats()
            .await
            .map_err(|e| DomainError::StatusQueryFailed(e.to_string()))?;

        Ok(StatusSnapshot {
            recording: record.active,
            streaming: stream.active,
            paused: record.paused,
            replay_buffer: replay_active,
            fps: stats.active_fps,
            frame_time_ns: (stats.average_frame_render_time * NANOS_PER_MILLI) as u64,
            frames: u64::from(stats.render_total_frames),
            lagged_frames: u64::from(stats.render_skipped_frames),
        })
    }

    async fn query_scene_view(client: &Client) -> Result<SceneView> {
        let scene_list = client
            .scenes()
            .list()
            .await
            .map_err(|e| DomainError::SceneQueryFailed(e.to_string()))?;

        let program = scene_list
            .current_program_scene
            .as_ref()
            .map(|scene| scene.name.clone());
        let preview = scene_list
            .current_preview_scene
            .as_ref()
            .map(|scene| scene.name.clone());

        let program_sources = match &program {
            Some(name) => Self::scene_sources(client, name).await?,
            None => HashSet::new(),
        };
        let preview_sources = match &preview {
            Some(name) => Self::scene_sources(client, name).await?,
            None => HashSet::new(),
        };

        Ok(SceneView::new(program, preview, program_sources, preview_sources))
    }

    async fn scene_sources(client: &Client, scene: &str) -> Result<HashSet<String>> {
        let items = client
            .scene_items()
            .list(scene.into())
            .await
            .map_err(|e| DomainError::SceneQueryFailed(e.to_string()))?;

        Ok(items.into_iter().map(|item| item.source_name).collect())
    }
}

#[async_trait]
impl StatusSource for ObsGateway {
    async fn poll_status(&self) -> Result<StatusSnapshot> {
        self.ensure_connected().await?;

        let guard = self.client.read().await;
        let client = guard
            .as_ref()
            .ok_or_else(|| DomainError::StatusQueryFailed("no OBS session".to_string()))?;

        match Self::query_status(client).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                drop(guard);
                self.drop_client().await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SceneMonitor for ObsGateway {
    async fn scene_view(&self) -> Result<SceneView> {
        self.ensure_connected().await?;

        let guard = self.client.read().await;
        let client = guard
            .as_ref()
            .ok_or_else(|| DomainError::SceneQueryFailed("no OBS session".to_string()))?;

        match Self::query_scene_view(client).await {
            Ok(view) => Ok(view),
            Err(e) => {
                drop(guard);
                self.drop_client().await;
                Err(e)
            }
        }
    }
}
