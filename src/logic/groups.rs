//! Group draw: split the player pool into groups and schedule each group.

use crate::logic::round_robin::{ensure_unique, schedule_round_robin};
use crate::models::{Fixture, Group, PlayerId, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle the players and deal them into `group_count` groups ("Group 1", "Group 2", ...).
/// Player `i` of the shuffled pool goes to group `i % group_count`, so group sizes differ
/// by at most one. There can be no more groups than players.
pub fn assign_groups<R: Rng + ?Sized>(
    players: &[PlayerId],
    group_count: u32,
    rng: &mut R,
) -> Result<Vec<Group>, TournamentError> {
    if group_count < 2 {
        return Err(TournamentError::NotEnoughGroups {
            requested: group_count,
        });
    }
    if group_count as usize > players.len() {
        return Err(TournamentError::TooManyGroups {
            requested: group_count,
            players: players.len(),
        });
    }
    ensure_unique(players)?;

    let mut pool = players.to_vec();
    pool.shuffle(rng);

    let mut groups: Vec<Group> = (1..=group_count)
        .map(|n| Group::new(format!("Group {}", n)))
        .collect();
    let count = groups.len();
    for (i, player_id) in pool.into_iter().enumerate() {
        groups[i % count].players.push(player_id);
    }
    Ok(groups)
}

/// Round-robin fixtures for every group, group by group, tagged with the group id.
///
/// A player may belong to one group only; repeats within or across groups are rejected.
pub fn group_fixtures(groups: &[Group]) -> Result<Vec<Fixture>, TournamentError> {
    let members: Vec<PlayerId> = groups.iter().flat_map(|g| g.players.iter().copied()).collect();
    ensure_unique(&members)?;

    let mut fixtures = Vec::new();
    for group in groups {
        fixtures.extend(schedule_round_robin(&group.players, Some(group.id))?);
    }
    Ok(fixtures)
}
