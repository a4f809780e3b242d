//! # Goban Harness Core
//!
//! Shared domain types and contracts for the Goban load-test harness:
//!
//! - **Types**: credentials, sessions, match tickets, room handles and
//!   polled game snapshots
//! - **Errors**: the harness-wide error taxonomy
//! - **Credentials**: process-wide unique test identity generation
//! - **Polling**: the bounded fixed-interval condition waiter
//! - **Game API**: the trait seam the orchestrator drives games through

pub mod api;
pub mod credentials;
pub mod error;
pub mod poll;
pub mod types;

pub use api::GameApi;
pub use error::{HarnessError, Result};
pub use types::{
    Credentials, GameSnapshot, GameStatus, MatchMode, MatchTicket, ModeType, MoveIntent,
    PlayerId, Position, RoomHandle, RoomId, Session, Settlement, StoneColor, TicketStatus,
};
