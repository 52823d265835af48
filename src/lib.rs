//! Tournament scheduler: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_from_round, advance_round, assign_groups, assign_venue, compute_standings,
    generate_draw, generate_groups_and_fixtures, generate_round_robin, group_fixtures,
    nearest_power_of_two, on_game_finished, plan_playoff, rebuild_from_round, record_result,
    round_state, schedule_round_robin, seed_playoff, standings_for, tournament_standings,
    unassign_venue, FixtureBatch, GroupStandings, GroupTable, RoundState, Seed, StandingRow,
    Standings,
};
pub use models::{
    Entrant, ErrorKind, Fixture, Game, GameId, GameStatus, Group, GroupId, Player, PlayerId,
    ScheduleKey, ScoringRule, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
