//! Tournament business logic: scheduling, standings, playoff seeding and progression.

mod bracket;
mod draw;
mod groups;
mod playoff;
mod round_robin;
mod standings;
mod venues;

pub use bracket::{advance_from_round, advance_round, rebuild_from_round, round_state, RoundState};
pub use draw::{
    generate_draw, generate_groups_and_fixtures, generate_round_robin, on_game_finished,
    record_result, FixtureBatch,
};
pub use groups::{assign_groups, group_fixtures};
pub use playoff::{nearest_power_of_two, plan_playoff, seed_playoff, GroupStandings, Seed};
pub use round_robin::schedule_round_robin;
pub use standings::{
    compute_standings, standings_for, tournament_standings, GroupTable, StandingRow, Standings,
};
pub use venues::{assign_venue, unassign_venue};
