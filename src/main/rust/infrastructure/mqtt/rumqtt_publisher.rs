use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::{oneshot, watch, Notify};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::StatusPublisher;
use crate::domain::value_objects::{BridgeSettings, ConnectionState};

/// Broker keep-alive window
const KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Delivery class for all bridge publishes: fire-and-forget, no retained
/// messages
const PUBLISH_QOS: QoS = QoS::AtMostOnce;
const PUBLISH_RETAIN: bool = false;

/// Pending-request capacity of the client channel; publishes queued while
/// disconnected flush after the next successful reconnect
const REQUEST_CAPACITY: usize = 100;

/// How long apply() waits for the broker handshake before reporting back
const CONNECT_WAIT: Duration = Duration::from_secs(5);

struct MqttSession {
    client: AsyncClient,
    shutdown_tx: oneshot::Sender<()>,
    driver: JoinHandle<()>,
}

/// rumqttc-backed publisher. One driver task per broker session services the
/// client event loop; after a connection error the driver parks until the
/// next status tick's reconnect check wakes it.
pub struct RumqttPublisher {
    session: Option<MqttSession>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    state_rx: watch::Receiver<ConnectionState>,
    reconnect_gate: Arc<Notify>,
}

impl RumqttPublisher {
    pub fn new() -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        Self {
            session: None,
            state_tx: Arc::new(state_tx),
            state_rx,
            reconnect_gate: Arc::new(Notify::new()),
        }
    }

    async fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            if self.connection_state().is_connected() {
                let _ = session.client.disconnect().await;
            }
            let _ = session.shutdown_tx.send(());
            let _ = session.driver.await;
        }
        let _ = self.state_tx.send(ConnectionState::Disconnected);
    }

    /// Service the client event loop until shutdown. Connection errors park
    /// the loop on the reconnect gate instead of retrying immediately.
    async fn drive(
        mut eventloop: EventLoop,
        state: Arc<watch::Sender<ConnectionState>>,
        gate: Arc<Notify>,
        mut shutdown_rx: oneshot::Receiver<()>,
        first_tx: oneshot::Sender<std::result::Result<(), String>>,
    ) {
        let mut first_tx = Some(first_tx);

        loop {
            tokio::select! {
                biased;
                polled = eventloop.poll() => match polled {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!("MQTT connection successful");
                        let _ = state.send(ConnectionState::Connected);
                        if let Some(tx) = first_tx.take() {
                            let _ = tx.send(Ok(()));
                        }
                    }
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                        tracing::info!("MQTT disconnected");
                        let _ = state.send(ConnectionState::Disconnected);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("MQTT connection error: {}", e);
                        let _ = state.send(ConnectionState::Disconnected);
                        if let Some(tx) = first_tx.take() {
                            let _ = tx.send(Err(e.to_string()));
                        }

                        // Hold here until the next status tick asks for a retry
                        tokio::select! {
                            biased;
                            _ = &mut shutdown_rx => break,
                            _ = gate.notified() => {
                                let _ = state.send(ConnectionState::Connecting);
                            }
                        }
                    }
                },
                _ = &mut shutdown_rx => break,
            }
        }

        let _ = state.send(ConnectionState::Disconnected);
    }
}

impl Default for RumqttPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusPublisher for RumqttPublisher {
    async fn apply(&mut self, settings: &BridgeSettings) -> Result<()> {
        self.teardown().await;

        let client_id = format!("obs-status-bridge-{}", Uuid::new_v4());
        let mut options = MqttOptions::new(
            client_id,
            settings.broker_host(),
            settings.broker_port(),
        );
        options.set_keep_alive(KEEP_ALIVE);

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (first_tx, first_rx) = oneshot::channel();

        let _ = self.state_tx.send(ConnectionState::Connecting);
        let driver = tokio::spawn(Self::drive(
            eventloop,
            self.state_tx.clone(),
            self.reconnect_gate.clone(),
            shutdown_rx,
            first_tx,
        ));
        self.session = Some(MqttSession {
            client,
            shutdown_tx,
            driver,
        });

        // A bad hostname or a refused broker surfaces as the driver's first
        // poll error; the session stays up so the next status tick retries.
        match tokio::time::timeout(CONNECT_WAIT, first_rx).await {
            Ok(Ok(Err(reason))) => tracing::error!(
                "Broker connection to {}:{} failed: {}",
                settings.broker_host(),
                settings.broker_port(),
                reason
            ),
            Ok(_) => {}
            Err(_) => tracing::warn!(
                "Broker connection to {}:{} still pending",
                settings.broker_host(),
                settings.broker_port()
            ),
        }

        Ok(())
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<()> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| DomainError::PublishFailed("no broker session".to_string()))?;

        session
            .client
            .try_publish(topic, PUBLISH_QOS, PUBLISH_RETAIN, payload)
            .map_err(|e| DomainError::PublishFailed(e.to_string()))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.teardown().await;
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    fn reconnect_check(&self) {
        if self.session.is_some() && !self.connection_state().is_connected() {
            self.reconnect_gate.notify_one();
        }
    }
}
