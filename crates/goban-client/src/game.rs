//! In-room game actions, state polling and settlement
//!
//! Implements [`GameApi`], the seam the orchestrator drives matches
//! through. Actions go through the generic in-room action endpoint with a
//! `type` discriminator; state comes back as a [`GameSnapshot`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use goban_core::api::GameApi;
use goban_core::error::Result;
use goban_core::types::{GameSnapshot, MoveIntent, RoomId, Session, Settlement};

use crate::http::{ApiClient, Auth};
use crate::room::RoomClient;

/// Client for the in-room game endpoints
#[derive(Clone, Debug)]
pub struct GameClient {
    api: Arc<ApiClient>,
    lobby: RoomClient,
}

impl GameClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let lobby = RoomClient::new(api.clone());
        Self { api, lobby }
    }

    async fn action(
        &self,
        room_id: &RoomId,
        session: &Session,
        payload: serde_json::Value,
    ) -> Result<()> {
        self.api
            .post(
                &format!("/api/gomoku/game/{}/action", room_id),
                &payload,
                Some(Auth::for_session(session)),
            )
            .await
            .into_result()
            .map(|_| ())
    }
}

#[async_trait]
impl GameApi for GameClient {
    async fn ready(&self, room_id: &RoomId, session: &Session) -> Result<()> {
        self.action(room_id, session, json!({ "type": "READY" })).await
    }

    async fn surrender(&self, room_id: &RoomId, session: &Session) -> Result<()> {
        self.action(room_id, session, json!({ "type": "SURRENDER" })).await
    }

    async fn submit_move(
        &self,
        room_id: &RoomId,
        session: &Session,
        intent: &MoveIntent,
    ) -> Result<()> {
        self.action(
            room_id,
            session,
            json!({
                "type": "MOVE",
                "position": { "x": intent.position.x, "y": intent.position.y },
            }),
        )
        .await
    }

    async fn fetch_state(&self, room_id: &RoomId, session: &Session) -> Option<GameSnapshot> {
        let data = self
            .api
            .get(
                &format!("/api/gomoku/game/{}/state", room_id),
                Some(Auth::for_session(session)),
            )
            .await
            .into_result()
            .ok()
            .flatten()?;

        match serde_json::from_value(data) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(%room_id, error = %e, "unparseable game state");
                None
            }
        }
    }

    async fn settle(&self, settlement: &Settlement, session: &Session) -> Result<()> {
        let payload = serde_json::to_value(settlement)
            .map_err(|e| goban_core::HarnessError::Internal(e.to_string()))?;

        self.api
            .post("/api/ranking/settle", &payload, Some(Auth::for_session(session)))
            .await
            .into_result()
            .map(|_| ())
    }

    async fn leave(&self, room_code: &str, session: &Session) -> bool {
        self.lobby.leave_room(room_code, session).await
    }
}
