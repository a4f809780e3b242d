//! # Goban Load Testing Harness
//!
//! Drives a remote Goban game service through its end-to-end flows with
//! many concurrent simulated actors.
//!
//! ## Scenarios
//!
//! - **account_flow**: register, login, verify token, reset password,
//!   re-login, store the account
//! - **matchmaking**: two fresh players enter the ranking queue, match
//!   against each other, black concedes and the winner settles
//! - **private_room**: create and join a private room, play a full
//!   deterministic game to a black win, settle and leave
//! - **leaderboard**: public leaderboard read pressure
//!
//! ## Usage
//!
//! ```bash
//! # Run every scenario once with 10 virtual users
//! cargo run --package goban-loadtest -- --target https://api.goban.gg all
//!
//! # Matchmaking only, heavier
//! cargo run --package goban-loadtest -- --target https://api.goban.gg \
//!     --users 50 --iterations 20 matchmaking
//! ```

pub mod config;
pub mod pool;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod stats;

pub use config::LoadTestConfig;
pub use pool::{SessionPool, StoredAccount};
pub use runner::HarnessRunner;
pub use scenario::{Scenario, ScenarioContext};
pub use scenarios::{
    AccountFlowScenario, LeaderboardScenario, MatchmakingScenario, PrivateRoomScenario,
};
pub use stats::{HarnessStats, StatsSummary};
