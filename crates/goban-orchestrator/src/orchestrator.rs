//! The per-room orchestration state machine

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use goban_core::api::GameApi;
use goban_core::error::{HarnessError, Result};
use goban_core::poll::await_condition;
use goban_core::types::{
    GameSnapshot, GameStatus, ModeType, MoveIntent, RoomHandle, RoomId, Session, Settlement,
    StoneColor,
};

use crate::roles::{bind_roles, RoleBindings};
use crate::strategy::{ColumnStrategy, MoveStrategy};

/// Pacing and budget knobs for one orchestrated match
///
/// The windows are hard cutoffs, not backoff schedules: the service starts a
/// game near-instantly once both players are ready, so a start that has not
/// happened after the budget is a failure, not a slow success.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Interval between start-wait polls
    pub start_poll_interval: Duration,

    /// Start-wait poll budget
    pub start_poll_attempts: u32,

    /// Move-loop round budget
    pub max_rounds: u32,

    /// Pause between move rounds
    pub move_pause: Duration,

    /// Pause before settlement and room exit
    pub settle_pause: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            start_poll_interval: Duration::from_secs(1),
            start_poll_attempts: 10,
            max_rounds: 10,
            move_pause: Duration::from_millis(300),
            settle_pause: Duration::from_millis(500),
        }
    }
}

/// Outcome of one orchestrated match
#[derive(Clone, Copy, Debug)]
pub struct MatchReport {
    /// Terminal status observed (or implied by a surrender)
    pub status: GameStatus,

    /// Moves submitted by this orchestrator
    pub moves: u32,

    /// Whether this orchestrator submitted the settlement report
    pub settled: bool,
}

/// Drives one room through the full phase sequence
///
/// Construct one instance per room; the settlement guard is per instance.
pub struct GameOrchestrator<G> {
    game: G,
    config: OrchestratorConfig,
    settled: AtomicBool,
}

impl<G: GameApi> GameOrchestrator<G> {
    pub fn new(game: G) -> Self {
        Self::with_config(game, OrchestratorConfig::default())
    }

    pub fn with_config(game: G, config: OrchestratorConfig) -> Self {
        Self {
            game,
            config,
            settled: AtomicBool::new(false),
        }
    }

    /// Ready phase: submit READY for each participant
    ///
    /// Order does not matter; individual failures are logged and the
    /// start-wait phase decides whether the room is viable.
    pub async fn ready_up(&self, room_id: &RoomId, participants: [&Session; 2]) {
        for session in participants {
            if let Err(err) = self.game.ready(room_id, session).await {
                warn!(%room_id, user_id = session.user_id, error = %err, "ready failed");
            }
        }
    }

    /// Start-wait phase: poll until the room reports PLAYING
    pub async fn wait_for_start(&self, room_id: &RoomId, viewer: &Session) -> Result<GameSnapshot> {
        let game = &self.game;
        let snapshot = await_condition(
            move || async move {
                game.fetch_state(room_id, viewer)
                    .await
                    .filter(|s| s.status == GameStatus::Playing)
            },
            self.config.start_poll_interval,
            self.config.start_poll_attempts,
        )
        .await?;

        Ok(snapshot)
    }

    /// Move loop: submit one move per observed turn until a terminal status
    /// or the round budget runs out
    ///
    /// Every round re-fetches the state; the move intent's color mirrors the
    /// turn marker observed in that same round, which keeps exactly one
    /// intent in flight and never submits against a stale turn. A rejected
    /// move signals desynchronized state and aborts without retry.
    pub async fn drive_moves(
        &self,
        room_id: &RoomId,
        roles: &RoleBindings<'_>,
        black_strategy: &mut dyn MoveStrategy,
        white_strategy: &mut dyn MoveStrategy,
    ) -> Result<(GameStatus, u32)> {
        let mut moves = 0u32;

        for _ in 0..self.config.max_rounds {
            let snapshot = self
                .game
                .fetch_state(room_id, roles.black)
                .await
                .ok_or_else(|| HarnessError::Transport("game state unavailable".to_string()))?;

            if snapshot.status.is_terminal() {
                return Ok((snapshot.status, moves));
            }

            let turn = snapshot.current_turn().ok_or_else(|| {
                HarnessError::MalformedResponse("state missing turn marker".to_string())
            })?;

            let (session, strategy): (&Session, &mut dyn MoveStrategy) = match turn {
                StoneColor::Black => (roles.black, &mut *black_strategy),
                StoneColor::White => (roles.white, &mut *white_strategy),
            };

            let intent = MoveIntent {
                position: strategy.next_position(),
                color: turn,
            };
            self.game.submit_move(room_id, session, &intent).await?;
            moves += 1;
            debug!(%room_id, user_id = session.user_id, x = intent.position.x, y = intent.position.y, "move submitted");

            sleep(self.config.move_pause).await;
        }

        Err(HarnessError::RoundLimit {
            rounds: self.config.max_rounds,
        })
    }

    /// Settlement phase: submit the final report, at most once per room
    ///
    /// Returns `Ok(true)` when this call submitted the report and
    /// `Ok(false)` when a settlement was already attempted. A rejected
    /// attempt still consumes the guard; there is no retry.
    pub async fn settle_once(&self, settlement: &Settlement, reporter: &Session) -> Result<bool> {
        if self.settled.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        self.game.settle(settlement, reporter).await?;
        Ok(true)
    }

    /// Exit phase: both participants leave; failures are non-fatal
    pub async fn leave_all(&self, room_code: &str, roles: &RoleBindings<'_>) {
        for session in [roles.black, roles.white] {
            self.game.leave(room_code, session).await;
        }
    }

    /// Full flow for a private room: play until a terminal status, settle,
    /// then leave
    pub async fn run_full_game(
        &self,
        room: &RoomHandle,
        first: &Session,
        second: &Session,
        mode: ModeType,
    ) -> Result<MatchReport> {
        self.ready_up(&room.room_id, [first, second]).await;

        let snapshot = self.wait_for_start(&room.room_id, first).await?;
        let roles = bind_roles(&snapshot, first, second)?;
        info!(
            room_id = %room.room_id,
            black = roles.black.user_id,
            white = roles.white.user_id,
            "game started"
        );

        let mut black_strategy = ColumnStrategy::new(0);
        let mut white_strategy = ColumnStrategy::new(1);
        let (status, moves) = self
            .drive_moves(&room.room_id, &roles, &mut black_strategy, &mut white_strategy)
            .await?;

        let settled = match status.winner() {
            Some(color) => {
                let (winner, loser) = roles.by_outcome(color);
                sleep(self.config.settle_pause).await;
                let settlement = Settlement::for_room(&room.room_id, winner, loser, mode)?;
                match self.settle_once(&settlement, winner).await {
                    Ok(submitted) => submitted,
                    Err(err) => {
                        warn!(room_id = %room.room_id, error = %err, "settlement rejected");
                        false
                    }
                }
            }
            None => false,
        };

        sleep(self.config.settle_pause).await;
        self.leave_all(&room.room_code, &roles).await;

        Ok(MatchReport {
            status,
            moves,
            settled,
        })
    }

    /// Flow for a matchmade room: black concedes immediately and the winner
    /// settles
    ///
    /// Matchmade rooms have no join code, so there is no exit phase. A
    /// rejected surrender aborts before settlement; settling a game that
    /// never ended would report a winner the service disagrees with.
    pub async fn run_surrender_game(
        &self,
        room_id: &RoomId,
        first: &Session,
        second: &Session,
        mode: ModeType,
    ) -> Result<MatchReport> {
        self.ready_up(room_id, [first, second]).await;

        let snapshot = self.wait_for_start(room_id, first).await?;
        let roles = bind_roles(&snapshot, first, second)?;

        sleep(self.config.settle_pause).await;
        self.game.surrender(room_id, roles.black).await?;
        info!(%room_id, loser = roles.black.user_id, "black surrendered");

        let (winner, loser) = roles.by_outcome(StoneColor::White);
        sleep(self.config.settle_pause).await;
        let settlement = Settlement::for_room(room_id, winner, loser, mode)?;
        let settled = match self.settle_once(&settlement, winner).await {
            Ok(submitted) => submitted,
            Err(err) => {
                warn!(%room_id, error = %err, "settlement rejected");
                false
            }
        };

        Ok(MatchReport {
            status: GameStatus::WhiteWin,
            moves: 0,
            settled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use goban_core::types::{PlayerId, Position, TurnState};

    const BLACK_ID: i64 = 101;
    const WHITE_ID: i64 = 102;

    fn session(user_id: i64) -> Session {
        Session {
            user_id,
            nickname: format!("Player_{}", user_id),
            email: format!("loadtest_{}@test.com", user_id),
            token: format!("token-{}", user_id),
        }
    }

    fn room() -> RoomHandle {
        RoomHandle {
            room_id: RoomId::new("77"),
            room_code: "CODE77".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeState {
        status: Option<GameStatus>,
        turn: Option<StoneColor>,
        polls_until_start: u32,
        win_after_moves: Option<usize>,
        reject_moves: bool,
        ready_calls: Vec<i64>,
        moves: Vec<(i64, Position)>,
        surrender_calls: Vec<i64>,
        settlements: Vec<Settlement>,
        leave_calls: Vec<i64>,
    }

    struct FakeGame {
        state: Mutex<FakeState>,
    }

    impl FakeGame {
        fn starting_after(polls: u32) -> Self {
            Self {
                state: Mutex::new(FakeState {
                    status: Some(GameStatus::Waiting),
                    turn: Some(StoneColor::Black),
                    polls_until_start: polls,
                    ..FakeState::default()
                }),
            }
        }

        fn winning_after(polls: u32, moves: usize) -> Self {
            let fake = Self::starting_after(polls);
            fake.state.lock().win_after_moves = Some(moves);
            fake
        }
    }

    #[async_trait]
    impl GameApi for FakeGame {
        async fn ready(&self, _room_id: &RoomId, session: &Session) -> Result<()> {
            self.state.lock().ready_calls.push(session.user_id);
            Ok(())
        }

        async fn surrender(&self, _room_id: &RoomId, session: &Session) -> Result<()> {
            let mut state = self.state.lock();
            state.surrender_calls.push(session.user_id);
            state.status = Some(GameStatus::WhiteWin);
            Ok(())
        }

        async fn submit_move(
            &self,
            _room_id: &RoomId,
            session: &Session,
            intent: &MoveIntent,
        ) -> Result<()> {
            let mut state = self.state.lock();
            if state.reject_moves {
                return Err(HarnessError::Rejected {
                    code: Some(5001),
                    message: "not your turn".to_string(),
                });
            }
            assert_eq!(Some(intent.color), state.turn, "move against a stale turn");

            state.moves.push((session.user_id, intent.position));
            state.turn = state.turn.map(|t| t.opponent());
            if state.win_after_moves == Some(state.moves.len()) {
                state.status = Some(GameStatus::BlackWin);
            }
            Ok(())
        }

        async fn fetch_state(&self, _room_id: &RoomId, _session: &Session) -> Option<GameSnapshot> {
            let mut state = self.state.lock();
            if state.status == Some(GameStatus::Waiting) {
                if state.polls_until_start == 0 {
                    state.status = Some(GameStatus::Playing);
                } else {
                    state.polls_until_start -= 1;
                }
            }

            Some(GameSnapshot {
                status: state.status?,
                black_player_id: Some(PlayerId::from(BLACK_ID)),
                white_player_id: Some(PlayerId::from(WHITE_ID)),
                current_state: Some(TurnState {
                    current_turn: state.turn,
                }),
            })
        }

        async fn settle(&self, settlement: &Settlement, _session: &Session) -> Result<()> {
            self.state.lock().settlements.push(settlement.clone());
            Ok(())
        }

        async fn leave(&self, _room_code: &str, session: &Session) -> bool {
            self.state.lock().leave_calls.push(session.user_id);
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_game_black_wins() {
        // black's fifth stone lands on move 9 (B W B W B W B W B)
        let orchestrator = GameOrchestrator::new(FakeGame::winning_after(2, 9));
        let (first, second) = (session(BLACK_ID), session(WHITE_ID));

        let report = orchestrator
            .run_full_game(&room(), &first, &second, ModeType::Private)
            .await
            .unwrap();

        assert_eq!(report.status, GameStatus::BlackWin);
        assert_eq!(report.moves, 9);
        assert!(report.settled);

        let state = orchestrator.game.state.lock();
        assert_eq!(state.ready_calls, vec![BLACK_ID, WHITE_ID]);
        assert_eq!(state.moves[0], (BLACK_ID, Position { x: 0, y: 0 }));
        assert_eq!(state.moves[1], (WHITE_ID, Position { x: 1, y: 0 }));
        assert_eq!(state.moves[2], (BLACK_ID, Position { x: 0, y: 1 }));

        assert_eq!(state.settlements.len(), 1);
        assert_eq!(state.settlements[0].winner_id, BLACK_ID);
        assert_eq!(state.settlements[0].loser_id, WHITE_ID);
        assert_eq!(state.settlements[0].match_id, 77);

        assert_eq!(state.leave_calls, vec![BLACK_ID, WHITE_ID]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_loop_stops_at_round_budget() {
        let orchestrator = GameOrchestrator::new(FakeGame::starting_after(0));
        let (first, second) = (session(BLACK_ID), session(WHITE_ID));

        let err = orchestrator
            .run_full_game(&room(), &first, &second, ModeType::Private)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::RoundLimit { rounds: 10 }));
        let state = orchestrator.game.state.lock();
        assert_eq!(state.moves.len(), 10);
        assert!(state.settlements.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_wait_gives_up() {
        let orchestrator = GameOrchestrator::new(FakeGame::starting_after(100));
        let (first, second) = (session(BLACK_ID), session(WHITE_ID));

        let err = orchestrator
            .run_full_game(&room(), &first, &second, ModeType::Private)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::PollTimeout { attempts: 10 }));
        assert!(orchestrator.game.state.lock().moves.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_role_resolution_failure_is_fatal() {
        let orchestrator = GameOrchestrator::new(FakeGame::starting_after(0));
        // neither session matches the ids the fake reports
        let (first, second) = (session(900), session(901));

        let err = orchestrator
            .run_full_game(&room(), &first, &second, ModeType::Private)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::RoleResolution { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_move_aborts_without_retry() {
        let fake = FakeGame::starting_after(0);
        fake.state.lock().reject_moves = true;
        let orchestrator = GameOrchestrator::new(fake);
        let (first, second) = (session(BLACK_ID), session(WHITE_ID));

        let err = orchestrator
            .run_full_game(&room(), &first, &second, ModeType::Private)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "rejected");
        assert!(orchestrator.game.state.lock().moves.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settlement_happens_at_most_once() {
        let orchestrator = GameOrchestrator::new(FakeGame::starting_after(0));
        let winner = session(WHITE_ID);
        let loser = session(BLACK_ID);
        let settlement =
            Settlement::for_room(&RoomId::new("77"), &winner, &loser, ModeType::Ranked).unwrap();

        assert!(orchestrator.settle_once(&settlement, &winner).await.unwrap());
        assert!(!orchestrator.settle_once(&settlement, &winner).await.unwrap());
        assert_eq!(orchestrator.game.state.lock().settlements.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_surrender_flow() {
        let orchestrator = GameOrchestrator::new(FakeGame::starting_after(1));
        let (first, second) = (session(WHITE_ID), session(BLACK_ID));

        let report = orchestrator
            .run_surrender_game(&RoomId::new("77"), &first, &second, ModeType::Ranked)
            .await
            .unwrap();

        assert_eq!(report.status, GameStatus::WhiteWin);
        assert!(report.settled);

        let state = orchestrator.game.state.lock();
        assert_eq!(state.surrender_calls, vec![BLACK_ID]);
        assert_eq!(state.settlements.len(), 1);
        assert_eq!(state.settlements[0].winner_id, WHITE_ID);
        assert_eq!(state.settlements[0].loser_id, BLACK_ID);
        assert_eq!(state.settlements[0].mode_type, ModeType::Ranked);
        // matchmade rooms have no code, nothing to leave
        assert!(state.leave_calls.is_empty());
    }
}
