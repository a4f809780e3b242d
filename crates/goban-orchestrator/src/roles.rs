//! Binding observed colors to local participants

use goban_core::error::{HarnessError, Result};
use goban_core::types::{GameSnapshot, Session, StoneColor};

/// Local participants bound to the colors the service assigned them
#[derive(Clone, Copy, Debug)]
pub struct RoleBindings<'a> {
    pub black: &'a Session,
    pub white: &'a Session,
}

impl<'a> RoleBindings<'a> {
    pub fn session_for(&self, color: StoneColor) -> &'a Session {
        match color {
            StoneColor::Black => self.black,
            StoneColor::White => self.white,
        }
    }

    /// (winner, loser) for the given winning color
    pub fn by_outcome(&self, winner: StoneColor) -> (&'a Session, &'a Session) {
        (
            self.session_for(winner),
            self.session_for(winner.opponent()),
        )
    }
}

/// Bind the snapshot's black/white assignment to the two participants
///
/// When neither observed id matches either participant, the caller handed
/// over the wrong sessions or the service assigned strangers to the room;
/// both are logic errors that must not be ignored.
pub fn bind_roles<'a>(
    snapshot: &GameSnapshot,
    first: &'a Session,
    second: &'a Session,
) -> Result<RoleBindings<'a>> {
    let black_id = snapshot.black_player_id.as_ref();

    if black_id == Some(&first.player_id()) {
        Ok(RoleBindings {
            black: first,
            white: second,
        })
    } else if black_id == Some(&second.player_id()) {
        Ok(RoleBindings {
            black: second,
            white: first,
        })
    } else {
        Err(HarnessError::RoleResolution {
            black: snapshot.black_player_id.as_ref().map(|id| id.to_string()),
            white: snapshot.white_player_id.as_ref().map(|id| id.to_string()),
        })
    }
}
