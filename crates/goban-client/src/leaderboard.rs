//! Public leaderboard queries

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::http::ApiClient;

/// Top-player boards over the three ranking windows
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub daily: Vec<Value>,
    #[serde(default)]
    pub weekly: Vec<Value>,
    #[serde(default)]
    pub monthly: Vec<Value>,
}

/// Client for the public ranking endpoint, no auth required
#[derive(Clone, Debug)]
pub struct LeaderboardClient {
    api: Arc<ApiClient>,
}

impl LeaderboardClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetch the current leaderboard; None on any failure
    pub async fn fetch(&self) -> Option<Leaderboard> {
        let data = self
            .api
            .get("/api/ranking/leaderboard", None)
            .await
            .into_result()
            .ok()
            .flatten()?;

        match serde_json::from_value(data) {
            Ok(leaderboard) => Some(leaderboard),
            Err(e) => {
                debug!(error = %e, "unparseable leaderboard");
                None
            }
        }
    }
}
