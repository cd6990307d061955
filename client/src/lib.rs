//! # Tile-grid multiplayer client
//!
//! Client-side of a tile-grid multiplayer game: it renders a small tile
//! world, walks a player-controlled actor around it, and keeps every
//! connected client's grid position in sync over a persistent WebSocket
//! channel. The server is authoritative: a key press becomes a `move`
//! request, and the local actor only advances when the server's `move`
//! broadcast comes back. There is no client-side prediction by design.
//!
//! ## Module organization
//!
//! - [`registry`] — table of every known client's id and last-known tile,
//!   with the local player's id marked.
//! - [`grid`] — the grid/pathing contract ([`grid::GridWorld`]) plus the
//!   in-memory [`grid::TileGrid`] walkability and occupancy model.
//! - [`input`] — the input gate: per-direction blocked-tile checks and the
//!   leading-edge throttle on outbound move requests.
//! - [`sync`] — the inbound protocol state machine; the only consumer of
//!   decoded server messages.
//! - [`network`] — the connection channel: WebSocket framing, JSON decode
//!   at the boundary, close/error logging.
//! - [`rendering`] — flat-quad tile/actor renderer and sprite allocation.
//! - [`session`] — per-frame wiring of all of the above.

pub mod grid;
pub mod input;
pub mod network;
pub mod registry;
pub mod rendering;
pub mod session;
pub mod sync;
