//! Matchmaking queue operations

use std::sync::Arc;

use serde_json::{json, Value};

use goban_core::error::{HarnessError, Result};
use goban_core::types::{MatchMode, MatchTicket, RoomId, Session};

use crate::http::{ApiClient, Auth};

/// Client for the matchmaking endpoints
#[derive(Clone, Debug)]
pub struct MatchClient {
    api: Arc<ApiClient>,
}

impl MatchClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Enter the matchmaking queue
    ///
    /// The ticket distinguishes an immediate match (room populated) from a
    /// queued entry; callers resolve the waiting case by polling
    /// [`player_status`](Self::player_status).
    pub async fn start_match(&self, mode: MatchMode, session: &Session) -> Result<MatchTicket> {
        let data = self
            .api
            .post(
                "/api/gomoku/match",
                &json!({ "mode": mode.as_str() }),
                Some(Auth::for_session(session)),
            )
            .await
            .into_result()?
            .ok_or_else(|| {
                HarnessError::MalformedResponse("match response missing data".to_string())
            })?;

        serde_json::from_value(data)
            .map_err(|e| HarnessError::MalformedResponse(format!("match ticket: {}", e)))
    }

    /// Leave the matchmaking queue
    pub async fn cancel_match(&self, session: &Session) -> bool {
        self.api
            .post(
                "/api/gomoku/match/cancel",
                &json!({}),
                Some(Auth::for_session(session)),
            )
            .await
            .success
    }

    /// Fetch the raw player status object; None on any failure
    pub async fn player_status(&self, session: &Session) -> Option<Value> {
        self.api
            .get("/api/gomoku/player/status", Some(Auth::for_session(session)))
            .await
            .into_result()
            .ok()
            .flatten()
    }

    /// Extract a room id from a player status payload
    ///
    /// The field name differs between service versions.
    pub fn room_id_from_status(status: &Value) -> Option<RoomId> {
        status
            .get("roomId")
            .or_else(|| status.get("currentRoomId"))
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
