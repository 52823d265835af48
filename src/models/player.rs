//! Player and the Entrant side of a game.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in games, groups and standings).
pub type PlayerId = Uuid;

/// A registered player in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with the given name and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// One side of a game: a real player, or a bye that always loses by walkover.
///
/// Byes only appear in playoff games. They are never stored as players.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "player_id", rename_all = "snake_case")]
pub enum Entrant {
    Player(PlayerId),
    Bye,
}

impl Entrant {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            Entrant::Player(id) => Some(*id),
            Entrant::Bye => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Entrant::Bye)
    }

    pub fn is_player(&self, id: PlayerId) -> bool {
        *self == Entrant::Player(id)
    }
}

impl From<PlayerId> for Entrant {
    fn from(id: PlayerId) -> Self {
        Entrant::Player(id)
    }
}
