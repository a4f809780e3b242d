//! Leaderboard query flow

use async_trait::async_trait;
use tracing::debug;

use goban_core::error::{HarnessError, Result};

use crate::scenario::{Scenario, ScenarioContext};

/// Pure read pressure on the public leaderboard endpoint
pub struct LeaderboardScenario;

#[async_trait]
impl Scenario for LeaderboardScenario {
    fn name(&self) -> &str {
        "leaderboard"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let leaderboard = ctx.leaderboard.fetch().await.ok_or_else(|| {
            HarnessError::Transport("leaderboard fetch failed".to_string())
        })?;

        debug!(
            daily = leaderboard.daily.len(),
            weekly = leaderboard.weekly.len(),
            monthly = leaderboard.monthly.len(),
            "leaderboard fetched"
        );
        Ok(())
    }
}
