//! Domain types observed on the wire of the remote game service
//!
//! Everything here is either sent verbatim to the service or parsed from its
//! success envelope. Snapshots are read-only observations; the harness never
//! owns or mutates remote state.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{HarnessError, Result};

/// Immutable test identity, unique per generation sequence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

/// Authenticated identity plus bearer token for one simulated actor
///
/// A fresh Session supersedes the old one after a password reset; the
/// service revokes the previous token as a side effect of the reset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub nickname: String,
    pub email: String,
    pub token: String,
}

impl Session {
    /// Normalized id used for comparisons against polled snapshots
    pub fn player_id(&self) -> PlayerId {
        PlayerId::from(self.user_id)
    }
}

// The service is inconsistent about id representation between endpoints:
// some return JSON numbers, some strings. Both normalize to a string.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(i64),
        Text(String),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Num(n) => n.to_string(),
        Repr::Text(s) => s,
    })
}

/// String-normalized player identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(#[serde(deserialize_with = "string_or_number")] String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for PlayerId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable room identifier used for all in-room game actions
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(#[serde(deserialize_with = "string_or_number")] String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form required by the settlement endpoint
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pairing of the shareable join code and the stable room id
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomHandle {
    pub room_id: RoomId,
    pub room_code: String,
}

/// Matchmaking queue state reported by the service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Waiting,
    Matched,
}

/// Transient matchmaking result; resolves to a room or is abandoned
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTicket {
    pub status: TicketStatus,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Queue selected when starting a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Ranking,
    Casual,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ranking => "ranking",
            Self::Casual => "casual",
        }
    }
}

/// Mode carried in the settlement report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModeType {
    Ranked,
    Casual,
    Private,
}

/// Remote game lifecycle as observed via polling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Waiting,
    Playing,
    BlackWin,
    WhiteWin,
    Draw,
    Finished,
}

impl GameStatus {
    /// True once the game can no longer progress
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::BlackWin | Self::WhiteWin | Self::Draw | Self::Finished
        )
    }

    /// Winning color, if this status names one
    pub fn winner(&self) -> Option<StoneColor> {
        match self {
            Self::BlackWin => Some(StoneColor::Black),
            Self::WhiteWin => Some(StoneColor::White),
            _ => None,
        }
    }
}

/// Stone color, also the turn marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoneColor {
    Black,
    White,
}

impl StoneColor {
    pub fn opponent(&self) -> StoneColor {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Board coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// One move, submitted at most once
///
/// The color mirrors the turn marker observed immediately before
/// submission; at most one intent is in flight per room.
#[derive(Clone, Copy, Debug)]
pub struct MoveIntent {
    pub position: Position,
    pub color: StoneColor,
}

/// Turn detail nested inside the state payload
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    #[serde(default)]
    pub current_turn: Option<StoneColor>,
}

/// Polled snapshot of an in-progress match; re-fetched on every poll,
/// never cached across polls
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub status: GameStatus,
    #[serde(default)]
    pub black_player_id: Option<PlayerId>,
    #[serde(default)]
    pub white_player_id: Option<PlayerId>,
    #[serde(default)]
    pub current_state: Option<TurnState>,
}

impl GameSnapshot {
    pub fn current_turn(&self) -> Option<StoneColor> {
        self.current_state.as_ref().and_then(|s| s.current_turn)
    }
}

/// Final result report closing out a completed match
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub match_id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub mode_type: ModeType,
}

impl Settlement {
    /// Build the report for a finished room
    ///
    /// The settlement endpoint takes numeric ids, so a non-numeric room id
    /// is an input error.
    pub fn for_room(
        room_id: &RoomId,
        winner: &Session,
        loser: &Session,
        mode_type: ModeType,
    ) -> Result<Self> {
        let match_id = room_id.as_i64().ok_or_else(|| {
            HarnessError::InvalidInput(format!("room id {} is not numeric", room_id))
        })?;

        Ok(Self {
            match_id,
            winner_id: winner.user_id,
            loser_id: loser.user_id,
            mode_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(user_id: i64) -> Session {
        Session {
            user_id,
            nickname: format!("Player_{}", user_id),
            email: format!("loadtest_{}@test.com", user_id),
            token: "token".to_string(),
        }
    }

    #[test]
    fn test_player_id_accepts_number_or_string() {
        let from_num: PlayerId = serde_json::from_value(json!(42)).unwrap();
        let from_str: PlayerId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num.as_str(), "42");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(GameStatus::BlackWin.is_terminal());
        assert!(GameStatus::WhiteWin.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
        assert!(GameStatus::Finished.is_terminal());
        assert!(!GameStatus::Waiting.is_terminal());
        assert!(!GameStatus::Playing.is_terminal());
    }

    #[test]
    fn test_status_winner() {
        assert_eq!(GameStatus::BlackWin.winner(), Some(StoneColor::Black));
        assert_eq!(GameStatus::WhiteWin.winner(), Some(StoneColor::White));
        assert_eq!(GameStatus::Draw.winner(), None);
        assert_eq!(GameStatus::Finished.winner(), None);
    }

    #[test]
    fn test_status_wire_names() {
        let status: GameStatus = serde_json::from_value(json!("BLACK_WIN")).unwrap();
        assert_eq!(status, GameStatus::BlackWin);

        let status: GameStatus = serde_json::from_value(json!("PLAYING")).unwrap();
        assert_eq!(status, GameStatus::Playing);
    }

    #[test]
    fn test_snapshot_parse() {
        let snapshot: GameSnapshot = serde_json::from_value(json!({
            "status": "PLAYING",
            "blackPlayerId": 101,
            "whitePlayerId": "102",
            "currentState": { "currentTurn": "BLACK" }
        }))
        .unwrap();

        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.black_player_id, Some(PlayerId::from(101)));
        assert_eq!(snapshot.white_player_id, Some(PlayerId::from("102")));
        assert_eq!(snapshot.current_turn(), Some(StoneColor::Black));
    }

    #[test]
    fn test_snapshot_parse_without_turn_detail() {
        let snapshot: GameSnapshot = serde_json::from_value(json!({
            "status": "WAITING"
        }))
        .unwrap();

        assert_eq!(snapshot.status, GameStatus::Waiting);
        assert!(snapshot.black_player_id.is_none());
        assert!(snapshot.current_turn().is_none());
    }

    #[test]
    fn test_match_ticket_parse() {
        let ticket: MatchTicket = serde_json::from_value(json!({
            "status": "matched",
            "roomId": 7,
            "message": "opponent found"
        }))
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::Matched);
        assert_eq!(ticket.room_id, Some(RoomId::new("7")));

        let ticket: MatchTicket = serde_json::from_value(json!({ "status": "waiting" })).unwrap();
        assert_eq!(ticket.status, TicketStatus::Waiting);
        assert!(ticket.room_id.is_none());
    }

    #[test]
    fn test_opponent() {
        assert_eq!(StoneColor::Black.opponent(), StoneColor::White);
        assert_eq!(StoneColor::White.opponent(), StoneColor::Black);
    }

    #[test]
    fn test_settlement_for_room() {
        let winner = session(2);
        let loser = session(1);
        let settlement =
            Settlement::for_room(&RoomId::new("55"), &winner, &loser, ModeType::Ranked).unwrap();
        assert_eq!(settlement.match_id, 55);
        assert_eq!(settlement.winner_id, 2);
        assert_eq!(settlement.loser_id, 1);

        let wire = serde_json::to_value(&settlement).unwrap();
        assert_eq!(wire["modeType"], "RANKED");
        assert_eq!(wire["matchId"], 55);
    }

    #[test]
    fn test_settlement_rejects_non_numeric_room() {
        let err = Settlement::for_room(
            &RoomId::new("room-abc"),
            &session(2),
            &session(1),
            ModeType::Private,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }
}
