use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Minimum spacing between outbound move requests (leading-edge throttle).
pub const MOVE_SEND_WINDOW_MS: u64 = 500;

/// Server-assigned, opaque per-connection identifier.
pub type ClientId = String;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent tile one step in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit tile delta for this direction. Each axis moves independently:
    /// left/right change only x, up/down change only y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// One known client (local or remote) and its last-known tile.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub id: ClientId,
    pub pos: GridPosition,
}

/// New position for a single actor inside a batched `move` message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MovedTo {
    pub pos: GridPosition,
}

/// Inbound messages, dispatched on the `event` tag.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Batched position updates; zero or more independent actors per message.
    Move { result: HashMap<ClientId, MovedTo> },
    /// Handshake completion: the local id and spawn tile.
    ConnectionEstablished { id: ClientId, pos: GridPosition },
    /// Snapshot of peers already connected when we joined.
    ExistUserlist { clients: HashMap<ClientId, GridPosition> },
    /// A single peer joined after us.
    NewUser { id: ClientId, pos: GridPosition },
}

const KNOWN_SERVER_TAGS: [&str; 4] =
    ["move", "connection-established", "exist-userlist", "new-user"];

/// Outbound messages. On the wire each is wrapped in the
/// `{"event":"message","data":{...}}` envelope by [`encode_client_message`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Sent once, immediately after the channel opens.
    Open,
    /// Request to move one tile; the server answers via a later `move` broadcast.
    Move { id: ClientId, direction: Direction },
    /// Sent once, after local rendering setup completes.
    AfterCreate { id: ClientId },
}

#[derive(Serialize)]
struct ClientEnvelope<'a> {
    event: &'static str,
    data: &'a ClientMessage,
}

pub fn encode_client_message(msg: &ClientMessage) -> serde_json::Result<String> {
    serde_json::to_string(&ClientEnvelope {
        event: "message",
        data: msg,
    })
}

/// Why an inbound text frame could not be turned into a [`ServerMessage`].
///
/// `UnknownTag` is expected traffic (newer servers may add tags) and is
/// ignored silently; the other variants are dropped with a logged warning.
/// None of them close the channel.
#[derive(Debug)]
pub enum DecodeError {
    /// Frame is not valid JSON at all.
    Syntax(serde_json::Error),
    /// No string-valued `event` field to dispatch on.
    MissingTag,
    /// Tag outside the known set.
    UnknownTag(String),
    /// Known tag but the payload is missing or mistyped fields.
    Malformed(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Syntax(e) => write!(f, "invalid JSON: {}", e),
            DecodeError::MissingTag => write!(f, "missing event tag"),
            DecodeError::UnknownTag(tag) => write!(f, "unknown event tag '{}'", tag),
            DecodeError::Malformed(e) => write!(f, "malformed payload: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Parses one inbound text frame, classifying failures so the channel can
/// ignore unknown tags and log the rest without falling over.
pub fn decode_server_message(text: &str) -> Result<ServerMessage, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::Syntax)?;
    let tag = value
        .get("event")
        .and_then(|v| v.as_str())
        .ok_or(DecodeError::MissingTag)?;
    if !KNOWN_SERVER_TAGS.contains(&tag) {
        return Err(DecodeError::UnknownTag(tag.to_string()));
    }
    serde_json::from_value(value).map_err(DecodeError::Malformed)
}
