//! Trait seam between the game orchestrator and the remote service
//!
//! The orchestrator drives every in-room action through this trait so the
//! phase sequence can run against the HTTP client in production and a
//! scripted fake in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GameSnapshot, MoveIntent, RoomId, Session, Settlement};

/// In-room actions and observations for one match
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Mark a participant ready
    async fn ready(&self, room_id: &RoomId, session: &Session) -> Result<()>;

    /// Concede the game
    async fn surrender(&self, room_id: &RoomId, session: &Session) -> Result<()>;

    /// Submit one move for the participant whose turn it is
    async fn submit_move(
        &self,
        room_id: &RoomId,
        session: &Session,
        intent: &MoveIntent,
    ) -> Result<()>;

    /// Fetch a fresh state snapshot; None on any failure
    async fn fetch_state(&self, room_id: &RoomId, session: &Session) -> Option<GameSnapshot>;

    /// Report the final result of a completed match
    async fn settle(&self, settlement: &Settlement, session: &Session) -> Result<()>;

    /// Leave the room by its join code; failures are reported, not fatal
    async fn leave(&self, room_code: &str, session: &Session) -> bool;
}
