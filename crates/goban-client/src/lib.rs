//! # Goban Service Clients
//!
//! Thin request/response wrappers over the remote game service's HTTP API:
//!
//! - **http**: the success-envelope client every wrapper goes through
//! - **crypto**: RSA password encryption against the service's public key
//! - **account**: registration, login, token verification, password reset
//! - **matching**: matchmaking queue operations
//! - **room**: private room lifecycle
//! - **game**: in-room actions, state polling and settlement
//! - **leaderboard**: public ranking queries
//!
//! None of these wrappers retry; the only resilience in the harness is the
//! bounded polling in the orchestration layer.

pub mod account;
pub mod crypto;
pub mod game;
pub mod http;
pub mod leaderboard;
pub mod matching;
pub mod room;

pub use account::AccountClient;
pub use game::GameClient;
pub use http::{ApiClient, ApiResponse, Auth};
pub use leaderboard::LeaderboardClient;
pub use matching::MatchClient;
pub use room::RoomClient;
