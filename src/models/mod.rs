//! Data structures for tournaments: players, groups, games and tournament state.

mod game;
mod group;
mod player;
mod tournament;

pub use game::{Fixture, Game, GameId, GameStatus, ScheduleKey};
pub use group::{Group, GroupId};
pub use player::{Entrant, Player, PlayerId};
pub use tournament::{
    ErrorKind, ScoringRule, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
