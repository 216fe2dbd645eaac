use crate::subscription::protocol::{
    Channel, ClientMessage, MapSnapshotMessage, StatsUpdateMessage, TouristSnapshotMessage,
};
use crate::tracking::{Dashboard, Snapshot};
use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Manages a single WebSocket connection with channel subscriptions
pub struct ConnectionManager {
    /// Channels this connection is subscribed to; empty means all
    subscriptions: HashSet<Channel>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: HashSet::new(),
        }
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Sends the current snapshot of every surface on connect, then forwards
    /// each replacement until the client leaves or the dashboard unmounts.
    /// On unmount the socket is closed with a Close frame.
    pub async fn handle(mut self, mut socket: WebSocket, dashboard: Arc<Dashboard>) {
        info!("WebSocket connection established");

        let mut map_rx = dashboard.map.subscribe();
        let mut tourists_rx = dashboard.tourists.subscribe();
        let mut stats_rx = dashboard.stats.subscribe();
        let mut unmounted = dashboard.unmounted();

        if let Err(e) = self.send_initial(&mut socket, &dashboard).await {
            error!(error = %e, "Failed to send initial snapshots");
            return;
        }

        loop {
            tokio::select! {
                _ = async { let _ = unmounted.wait_for(|done| *done).await; } => {
                    info!("Dashboard unmounted, closing WebSocket");
                    if let Err(e) = socket.send(Message::Close(None)).await {
                        warn!(error = %e, "Failed to send close frame");
                    }
                    break;
                }

                // Handle incoming client messages
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.handle_client_message(&text) {
                                warn!(error = %e, "Ignoring malformed client message");
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                result = map_rx.recv() => {
                    match self
                        .forward(&mut socket, Channel::Map, result, |s| MapSnapshotMessage::from(s))
                        .await
                    {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            error!(error = %e, "Failed to send map snapshot");
                            break;
                        }
                    }
                }

                result = tourists_rx.recv() => {
                    match self
                        .forward(&mut socket, Channel::Tourists, result, |s| {
                            TouristSnapshotMessage::from(s)
                        })
                        .await
                    {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            error!(error = %e, "Failed to send tourist snapshot");
                            break;
                        }
                    }
                }

                result = stats_rx.recv() => {
                    match self
                        .forward(&mut socket, Channel::Stats, result, |s| {
                            StatsUpdateMessage::from(s)
                        })
                        .await
                    {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            error!(error = %e, "Failed to send stats update");
                            break;
                        }
                    }
                }
            }
        }

        info!("WebSocket connection closed");
    }

    async fn send_initial(
        &self,
        socket: &mut WebSocket,
        dashboard: &Dashboard,
    ) -> anyhow::Result<()> {
        if self.is_subscribed(Channel::Map) {
            send_json(socket, &MapSnapshotMessage::from(dashboard.map.current().as_ref())).await?;
        }
        if self.is_subscribed(Channel::Tourists) {
            send_json(
                socket,
                &TouristSnapshotMessage::from(dashboard.tourists.current().as_ref()),
            )
            .await?;
        }
        if self.is_subscribed(Channel::Stats) {
            send_json(socket, &StatsUpdateMessage::from(dashboard.stats.current().as_ref())).await?;
        }
        Ok(())
    }

    /// Forward one broadcast result. `Ok(false)` means the feed is gone.
    async fn forward<T, M>(
        &self,
        socket: &mut WebSocket,
        channel: Channel,
        result: Result<Arc<Snapshot<T>>, broadcast::error::RecvError>,
        to_message: impl FnOnce(&Snapshot<T>) -> M,
    ) -> anyhow::Result<bool>
    where
        M: Serialize,
    {
        match result {
            Ok(snapshot) => {
                if self.is_subscribed(channel) {
                    send_json(socket, &to_message(snapshot.as_ref())).await?;
                }
                Ok(true)
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Only the latest snapshot matters; the next one supersedes
                warn!(channel = ?channel, skipped = skipped, "WebSocket lagged, skipped snapshots");
                Ok(true)
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!(channel = ?channel, "Snapshot channel closed");
                Ok(false)
            }
        }
    }

    /// Handle client message (subscribe/unsubscribe)
    pub fn handle_client_message(&mut self, text: &str) -> anyhow::Result<()> {
        let msg: ClientMessage = serde_json::from_str(text)?;

        match msg {
            ClientMessage::Subscribe { channel } => {
                info!(channel = ?channel, "Client subscribed to channel");
                self.subscriptions.insert(channel);
            }
            ClientMessage::Unsubscribe { channel } => {
                info!(channel = ?channel, "Client unsubscribed from channel");
                self.subscriptions.remove(&channel);
            }
        }

        Ok(())
    }

    /// Check if updates on `channel` should be forwarded to this connection
    pub fn is_subscribed(&self, channel: Channel) -> bool {
        // If no subscriptions, forward everything
        self.subscriptions.is_empty() || self.subscriptions.contains(&channel)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn send_json<M: Serialize>(socket: &mut WebSocket, msg: &M) -> anyhow::Result<()> {
    let json = serde_json::to_string(msg)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}
