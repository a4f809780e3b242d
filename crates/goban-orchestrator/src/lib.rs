//! # Goban Game Orchestrator
//!
//! Client-side choreography for driving a two-player turn-based match from
//! ready-up through move-by-move play to settlement. The phase sequence per
//! room is:
//!
//! 1. **Ready**: both participants submit READY
//! 2. **Start-wait**: poll until the observed status is PLAYING
//! 3. **Role binding**: map observed black/white ids to local participants
//! 4. **Move loop**: one move per observed turn, bounded round budget
//! 5. **Settlement**: the winner reports the result, at most once per room
//! 6. **Exit**: both participants leave the room
//!
//! The orchestrator only observes remote state via polling; it never owns a
//! room's lifecycle. Each instance drives exactly one room.

pub mod orchestrator;
pub mod roles;
pub mod strategy;

pub use orchestrator::{GameOrchestrator, MatchReport, OrchestratorConfig};
pub use roles::{bind_roles, RoleBindings};
pub use strategy::{ColumnStrategy, MoveStrategy};
