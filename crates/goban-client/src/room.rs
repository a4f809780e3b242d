//! Private room lifecycle

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use goban_core::error::{HarnessError, Result};
use goban_core::types::{RoomHandle, RoomId, Session};

use crate::http::{ApiClient, Auth};

/// Client for the private-room lobby endpoints
#[derive(Clone, Debug)]
pub struct RoomClient {
    api: Arc<ApiClient>,
}

impl RoomClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Create a private room, returning its id and shareable join code
    pub async fn create_private_room(&self, session: &Session) -> Result<RoomHandle> {
        let data = self
            .api
            .post(
                "/api/gomoku/lobby/create-room",
                &json!({}),
                Some(Auth::token_only(&session.token)),
            )
            .await
            .into_result()?
            .ok_or_else(|| {
                HarnessError::MalformedResponse("create-room response missing data".to_string())
            })?;

        serde_json::from_value(data)
            .map_err(|e| HarnessError::MalformedResponse(format!("room handle: {}", e)))
    }

    /// Join a room by its code
    ///
    /// The returned id is authoritative for subsequent game actions; the
    /// service assigns it post-join and its representation may differ from
    /// the creator's.
    pub async fn join_private_room(&self, room_code: &str, session: &Session) -> Result<RoomId> {
        let data = self
            .api
            .post(
                "/api/gomoku/lobby/join-room",
                &json!({ "roomCode": room_code }),
                Some(Auth::token_only(&session.token)),
            )
            .await
            .into_result()?
            .ok_or_else(|| {
                HarnessError::MalformedResponse("join-room response missing data".to_string())
            })?;

        data.get("roomId")
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .ok_or_else(|| {
                HarnessError::MalformedResponse("join-room response missing roomId".to_string())
            })
    }

    /// Leave a room by its code; failures are logged, never fatal
    pub async fn leave_room(&self, room_code: &str, session: &Session) -> bool {
        let response = self
            .api
            .post(
                "/api/gomoku/lobby/leave",
                &json!({ "roomCode": room_code }),
                Some(Auth::token_only(&session.token)),
            )
            .await;

        if !response.success {
            warn!(room_code, user_id = session.user_id, error = %response.to_error(), "leave failed");
        }
        response.success
    }
}
