//! Built-in end-to-end flows

mod account;
mod leaderboard;
mod matchmaking;
mod private_room;

pub use account::AccountFlowScenario;
pub use leaderboard::LeaderboardScenario;
pub use matchmaking::MatchmakingScenario;
pub use private_room::PrivateRoomScenario;
