//! Game, Fixture (a game before insertion) and their scheduling keys.

use crate::models::group::GroupId;
use crate::models::player::{Entrant, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game.
pub type GameId = Uuid;

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Finished,
}

/// Position of a fixture inside the batch that generated it: schedule round, then index
/// within that round. Ordering is lexicographic, so keys are strictly increasing in
/// generation order.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct ScheduleKey {
    pub round: u32,
    pub index: u32,
}

impl ScheduleKey {
    pub fn new(round: u32, index: u32) -> Self {
        Self { round, index }
    }
}

/// A game that has been generated but not inserted into a tournament yet.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub player_1: Entrant,
    pub player_2: Entrant,
    /// Group of a group-stage game; None for playoff games.
    pub group_id: Option<GroupId>,
    /// Bracket round for playoff games; always 1 for group-stage and round-robin games.
    pub round: u32,
    pub status: GameStatus,
    pub score_1: u32,
    pub score_2: u32,
    pub key: ScheduleKey,
}

impl Fixture {
    /// A scheduled 0:0 fixture between two real players.
    pub fn scheduled(
        player_1: PlayerId,
        player_2: PlayerId,
        group_id: Option<GroupId>,
        key: ScheduleKey,
    ) -> Self {
        Self {
            player_1: Entrant::Player(player_1),
            player_2: Entrant::Player(player_2),
            group_id,
            round: 1,
            status: GameStatus::Scheduled,
            score_1: 0,
            score_2: 0,
            key,
        }
    }

    /// A playoff fixture for the given bracket round.
    ///
    /// Two byes produce no game. One bye produces a finished 1:0 walkover for the real
    /// player. Two real players produce a scheduled game.
    pub fn bracket(
        player_1: Entrant,
        player_2: Entrant,
        round: u32,
        key: ScheduleKey,
    ) -> Option<Self> {
        let (status, score_1, score_2) = match (player_1, player_2) {
            (Entrant::Bye, Entrant::Bye) => return None,
            (Entrant::Player(_), Entrant::Bye) => (GameStatus::Finished, 1, 0),
            (Entrant::Bye, Entrant::Player(_)) => (GameStatus::Finished, 0, 1),
            (Entrant::Player(_), Entrant::Player(_)) => (GameStatus::Scheduled, 0, 0),
        };
        Some(Self {
            player_1,
            player_2,
            group_id: None,
            round,
            status,
            score_1,
            score_2,
            key,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }
}

/// A game inserted into a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Creation order, strictly increasing across every insert into the tournament.
    pub sequence: u64,
    pub player_1: Entrant,
    pub player_2: Entrant,
    pub group_id: Option<GroupId>,
    pub round: u32,
    pub status: GameStatus,
    pub score_1: u32,
    pub score_2: u32,
    pub venue: Option<u32>,
    pub key: ScheduleKey,
}

impl Game {
    pub fn from_fixture(fixture: Fixture, sequence: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            player_1: fixture.player_1,
            player_2: fixture.player_2,
            group_id: fixture.group_id,
            round: fixture.round,
            status: fixture.status,
            score_1: fixture.score_1,
            score_2: fixture.score_2,
            venue: None,
            key: fixture.key,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// In the groups format, playoff-bracket games are exactly the games without a group.
    /// Tournament-wide round-robin games have no group either.
    pub fn is_playoff(&self) -> bool {
        self.group_id.is_none()
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player_1.is_player(player_id) || self.player_2.is_player(player_id)
    }

    /// Player ids of the real players in this game.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        [self.player_1.player_id(), self.player_2.player_id()]
            .into_iter()
            .flatten()
    }

    /// (own score, opponent score) from the given player's point of view.
    pub fn scores_for(&self, player_id: PlayerId) -> Option<(u32, u32)> {
        if self.player_1.is_player(player_id) {
            Some((self.score_1, self.score_2))
        } else if self.player_2.is_player(player_id) {
            Some((self.score_2, self.score_1))
        } else {
            None
        }
    }

    /// Winner of a finished game. Equal scores go to player 1; playoff draws are rejected
    /// before they are recorded.
    pub fn winner(&self) -> Entrant {
        if self.score_1 >= self.score_2 {
            self.player_1
        } else {
            self.player_2
        }
    }

    pub fn loser(&self) -> Entrant {
        if self.score_1 >= self.score_2 {
            self.player_2
        } else {
            self.player_1
        }
    }
}
