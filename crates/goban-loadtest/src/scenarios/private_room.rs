//! Private-room flow: create, join, play a full deterministic game

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tracing::debug;

use goban_core::error::Result;
use goban_core::types::{GameStatus, ModeType, RoomHandle};
use goban_orchestrator::GameOrchestrator;

use crate::scenario::{Scenario, ScenarioContext};

/// Plays one complete game in a freshly created private room
pub struct PrivateRoomScenario;

#[async_trait]
impl Scenario for PrivateRoomScenario {
    fn name(&self) -> &str {
        "private_room"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let first = ctx.fresh_session().await?;
        let second = ctx.fresh_session().await?;

        let created = ctx.rooms.create_private_room(&first).await?;
        ctx.stats.rooms_created.fetch_add(1, Ordering::Relaxed);
        debug!(room_code = %created.room_code, room_id = %created.room_id, "room created");

        // the creator enters their own room, then the opponent joins by
        // code; the id from the completing join is the authoritative one
        ctx.rooms
            .join_private_room(&created.room_code, &first)
            .await?;
        let room_id = ctx
            .rooms
            .join_private_room(&created.room_code, &second)
            .await?;

        let room = RoomHandle {
            room_id,
            room_code: created.room_code,
        };

        let orchestrator =
            GameOrchestrator::with_config(ctx.games.clone(), ctx.orchestration.clone());
        let report = orchestrator
            .run_full_game(&room, &first, &second, ModeType::Private)
            .await?;

        ctx.stats.games_finished.fetch_add(1, Ordering::Relaxed);
        ctx.stats
            .total_moves
            .fetch_add(u64::from(report.moves), Ordering::Relaxed);
        if report.status == GameStatus::BlackWin {
            ctx.stats.black_wins.fetch_add(1, Ordering::Relaxed);
        }
        if report.settled {
            ctx.stats.reported_count.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }
}
