//! Connection channel: one persistent WebSocket carrying JSON text frames.
//!
//! The socket lives on its own thread with a small tokio runtime so the
//! frame loop never blocks. Decoding happens at this boundary; the rest of
//! the client only ever sees typed [`ServerMessage`] values. There is no
//! automatic reconnect: close and error events are logged and the channel
//! goes quiet.

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{
    decode_server_message, encode_client_message, ClientMessage, DecodeError, ServerMessage,
};
use std::thread;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub struct Connection {
    outbound_tx: UnboundedSender<ClientMessage>,
    inbound_rx: UnboundedReceiver<ServerMessage>,
    closed: bool,
}

impl Connection {
    /// Spawns the network thread and starts connecting to `url`. The `open`
    /// handshake message is sent as soon as the socket is up.
    pub fn open(url: &str) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let url = url.to_string();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("failed to start network runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(run_channel(&url, inbound_tx, outbound_rx));
        });

        Connection {
            outbound_tx,
            inbound_rx,
            closed: false,
        }
    }

    pub fn send(&self, msg: ClientMessage) -> Result<(), Box<dyn std::error::Error>> {
        self.outbound_tx.send(msg)?;
        Ok(())
    }

    /// Next decoded inbound message, if one is waiting. Never blocks.
    pub fn try_recv(&mut self) -> Option<ServerMessage> {
        match self.inbound_rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    self.closed = true;
                    warn!("connection channel closed");
                }
                None
            }
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed && !self.outbound_tx.is_closed()
    }
}

async fn run_channel(
    url: &str,
    inbound_tx: UnboundedSender<ServerMessage>,
    mut outbound_rx: UnboundedReceiver<ClientMessage>,
) {
    let (socket, _) = match connect_async(url).await {
        Ok(connected) => connected,
        Err(e) => {
            error!("failed to connect to {}: {}", url, e);
            return;
        }
    };
    info!("connected to {}", url);

    let (mut sink, mut stream) = socket.split();

    match encode_client_message(&ClientMessage::Open) {
        Ok(text) => {
            if let Err(e) = sink.send(Message::Text(text)).await {
                error!("failed to send open message: {}", e);
                return;
            }
        }
        Err(e) => {
            error!("failed to encode open message: {}", e);
            return;
        }
    }

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_server_message(&text) {
                    Ok(msg) => {
                        if inbound_tx.send(msg).is_err() {
                            // Game loop is gone; nothing left to deliver to.
                            break;
                        }
                    }
                    Err(DecodeError::UnknownTag(tag)) => {
                        debug!("ignoring unknown event tag '{}'", tag);
                    }
                    Err(e) => warn!("dropped inbound frame: {}", e),
                },
                Some(Ok(Message::Ping(payload))) => {
                    let _ = sink.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) => {
                    info!("close event from server");
                    break;
                }
                Some(Ok(_)) => {} // non-text frames are not part of the protocol
                Some(Err(e)) => {
                    error!("error event on channel: {}", e);
                    break;
                }
                None => {
                    info!("channel stream ended");
                    break;
                }
            },

            queued = outbound_rx.recv() => match queued {
                Some(msg) => match encode_client_message(&msg) {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            error!("failed to send message: {}", e);
                            break;
                        }
                    }
                    Err(e) => error!("failed to encode outbound message: {}", e),
                },
                None => {
                    // Connection handle dropped; shut the socket down.
                    let _ = sink.close().await;
                    break;
                }
            },
        }
    }
}
