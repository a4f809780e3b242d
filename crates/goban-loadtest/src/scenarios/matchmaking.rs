//! Ranked matchmaking flow: two fresh players match against each other,
//! black concedes, the winner settles

use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use goban_client::MatchClient;
use goban_core::error::Result;
use goban_core::poll::await_condition;
use goban_core::types::{MatchMode, ModeType, RoomId, Session, TicketStatus};
use goban_orchestrator::GameOrchestrator;

use crate::scenario::{Scenario, ScenarioContext};

/// Interval between player-status polls while both tickets are queued
const MATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Poll budget for resolving a queued match
const MATCH_POLL_ATTEMPTS: u32 = 10;

/// Matches two fresh accounts in the ranking queue and plays out an
/// immediate surrender
pub struct MatchmakingScenario;

impl MatchmakingScenario {
    /// Resolve the shared room: from either ticket when the service paired
    /// the players immediately, otherwise by polling the first player's
    /// status until the room appears
    async fn resolve_room(
        ctx: &ScenarioContext,
        first: &Session,
        second: &Session,
    ) -> Result<RoomId> {
        let ticket_first = ctx
            .matching
            .start_match(MatchMode::Ranking, first)
            .await?;
        let ticket_second = ctx
            .matching
            .start_match(MatchMode::Ranking, second)
            .await?;

        let immediate = [ticket_first, ticket_second]
            .into_iter()
            .filter(|t| t.status == TicketStatus::Matched)
            .find_map(|t| t.room_id);

        if let Some(room_id) = immediate {
            return Ok(room_id);
        }

        let matching = &ctx.matching;
        let polled = await_condition(
            move || async move {
                let status = matching.player_status(first).await?;
                MatchClient::room_id_from_status(&status)
            },
            MATCH_POLL_INTERVAL,
            MATCH_POLL_ATTEMPTS,
        )
        .await;

        match polled {
            Ok(room_id) => Ok(room_id),
            Err(err) => {
                // abandon the queue so the stale entries cannot pair with
                // later actors
                warn!(error = %err, "match did not resolve, canceling both entries");
                for session in [first, second] {
                    if ctx.matching.cancel_match(session).await {
                        ctx.stats.match_canceled.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Scenario for MatchmakingScenario {
    fn name(&self) -> &str {
        "matchmaking"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let first = ctx.fresh_session().await?;
        let second = ctx.fresh_session().await?;

        let room_id = Self::resolve_room(ctx, &first, &second).await?;
        ctx.stats.matched_count.fetch_add(1, Ordering::Relaxed);
        debug!(%room_id, "players matched");

        let orchestrator =
            GameOrchestrator::with_config(ctx.games.clone(), ctx.orchestration.clone());
        let report = orchestrator
            .run_surrender_game(&room_id, &first, &second, ModeType::Ranked)
            .await?;

        ctx.stats.surrendered_count.fetch_add(1, Ordering::Relaxed);
        if report.settled {
            ctx.stats.reported_count.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }
}
