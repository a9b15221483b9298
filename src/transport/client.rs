use crate::transport::protocol::ClientCommand;
use futures::{SinkExt, StreamExt};
use std::fmt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Inbound channel capacity (messages waiting for the event loop)
const EVENT_BUFFER: usize = 256;

/// Event delivered from the transport task to the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Socket opened
    Connected,
    /// Raw text frame from the server
    Message(String),
    /// Socket closed or connect attempt failed; a retry follows
    Disconnected(String),
}

/// Connection state as seen by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Open => "LIVE",
            ConnectionState::Closed => "DISCONNECTED",
        }
    }
}

/// Outbound send failures
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Socket is not open; nothing was sent
    NotConnected(ConnectionState),
    /// Transport task has exited
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotConnected(state) => {
                write!(f, "connection to the server is not established ({})", state.label())
            }
            TransportError::ChannelClosed => write!(f, "transport task is no longer running"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Event-loop side of the transport: queues commands for the socket task.
///
/// Connection state is not tracked here; the event loop derives it from
/// [`TransportEvent`]s and gates sends on it.
pub struct TransportHandle {
    commands: mpsc::UnboundedSender<ClientCommand>,
    task: JoinHandle<()>,
}

impl TransportHandle {
    /// Queue a command for the server. Commands still queued when a new
    /// session opens are dropped.
    pub fn send(&self, command: ClientCommand) -> Result<(), TransportError> {
        self.commands
            .send(command)
            .map_err(|_| TransportError::ChannelClosed)
    }

    /// Stop the transport task
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Spawn the transport task.
///
/// The task connects to `url`, forwards every text frame as
/// [`TransportEvent::Message`], writes queued commands, and reconnects
/// `reconnect_delay` after any disconnect. It exits once the event receiver
/// or the handle is dropped.
pub fn spawn(
    url: String,
    reconnect_delay: Duration,
) -> (TransportHandle, mpsc::Receiver<TransportEvent>) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run(url, reconnect_delay, event_tx, command_rx));

    let handle = TransportHandle {
        commands: command_tx,
        task,
    };

    (handle, event_rx)
}

/// Why a session ended
enum SessionEnd {
    /// Socket dropped; reconnect
    Closed(String),
    /// Event loop is gone; exit the task
    Shutdown,
}

async fn run(
    url: String,
    reconnect_delay: Duration,
    events: mpsc::Sender<TransportEvent>,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
) {
    loop {
        info!(url = %url, "Connecting to simulation server");

        let reason = match connect_async(url.as_str()).await {
            Ok((socket, _response)) => {
                info!(url = %url, "WebSocket connection established");
                if events.send(TransportEvent::Connected).await.is_err() {
                    return;
                }

                // Commands queued before this session are stale
                while let Ok(command) = commands.try_recv() {
                    warn!(action = command.action(), "Dropping command queued while disconnected");
                }

                match session(socket, &events, &mut commands).await {
                    SessionEnd::Closed(reason) => reason,
                    SessionEnd::Shutdown => {
                        info!("Transport shutting down");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "WebSocket connect failed");
                e.to_string()
            }
        };

        if events
            .send(TransportEvent::Disconnected(reason))
            .await
            .is_err()
        {
            return;
        }

        info!(delay_ms = reconnect_delay.as_millis() as u64, "Reconnecting after delay");
        tokio::time::sleep(reconnect_delay).await;
    }
}

/// Pump one open socket until it closes or the event loop goes away
async fn session(
    mut socket: Socket,
    events: &mpsc::Sender<TransportEvent>,
    commands: &mut mpsc::UnboundedReceiver<ClientCommand>,
) -> SessionEnd {
    loop {
        tokio::select! {
            // Frames from the server
            frame = socket.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(TransportEvent::Message(text)).await.is_err() {
                            let _ = socket.close(None).await;
                            return SessionEnd::Shutdown;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!(frame = ?frame, "Server closed WebSocket");
                        return SessionEnd::Closed("closed by server".to_string());
                    }
                    Some(Ok(_)) => {
                        // Ignore binary, ping, pong frames
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        return SessionEnd::Closed(e.to_string());
                    }
                    None => {
                        info!("WebSocket stream ended");
                        return SessionEnd::Closed("connection closed".to_string());
                    }
                }
            }

            // Commands from the event loop
            command = commands.recv() => {
                match command {
                    Some(command) => {
                        let json = match serde_json::to_string(&command) {
                            Ok(json) => json,
                            Err(e) => {
                                error!(error = %e, "Failed to encode command");
                                continue;
                            }
                        };
                        if let Err(e) = socket.send(Message::Text(json)).await {
                            error!(error = %e, action = command.action(), "Failed to send command");
                            return SessionEnd::Closed(e.to_string());
                        }
                        debug!(action = command.action(), "Command sent");
                    }
                    None => {
                        let _ = socket.close(None).await;
                        return SessionEnd::Shutdown;
                    }
                }
            }
        }
    }
}
