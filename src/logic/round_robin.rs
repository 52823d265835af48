//! Round-robin fixture generation (circle method).

use crate::models::{Fixture, GroupId, PlayerId, ScheduleKey, TournamentError};
use std::collections::HashSet;

/// Generate a single round-robin between the given players.
///
/// 1. Odd player counts get an empty slot appended; pairings against it produce no game.
/// 2. Slot 0 stays fixed, the rest form a ring.
/// 3. Each schedule round pairs slot `i` with slot `count - 1 - i`, then rotates the ring
///    by one (last ring slot moves to position 1).
///
/// Every pair meets exactly once and nobody plays twice in a schedule round. Fixture keys
/// are (schedule round, pairing index), 1-based rounds. Fewer than 2 players yield nothing.
/// A player listed twice is rejected with `DuplicatePlayer`.
pub fn schedule_round_robin(
    players: &[PlayerId],
    group_id: Option<GroupId>,
) -> Result<Vec<Fixture>, TournamentError> {
    ensure_unique(players)?;
    if players.len() < 2 {
        return Ok(Vec::new());
    }

    let mut slots: Vec<Option<PlayerId>> = players.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let count = slots.len();
    let total_rounds = count - 1;
    let matches_per_round = count / 2;
    let mut fixtures = Vec::with_capacity(total_rounds * matches_per_round);

    for round in 0..total_rounds {
        for i in 0..matches_per_round {
            if let (Some(a), Some(b)) = (slots[i], slots[count - 1 - i]) {
                let key = ScheduleKey::new(round as u32 + 1, i as u32);
                fixtures.push(Fixture::scheduled(a, b, group_id, key));
            }
        }
        slots[1..].rotate_right(1);
    }

    Ok(fixtures)
}

/// Reject player lists that name the same player twice.
pub fn ensure_unique(players: &[PlayerId]) -> Result<(), TournamentError> {
    let mut seen = HashSet::with_capacity(players.len());
    for &id in players {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicatePlayer(id));
        }
    }
    Ok(())
}
