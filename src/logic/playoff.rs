//! Playoff seeding: turn final group standings into the first bracket round.
//!
//! Groups are paired in creation order (1 vs 2, 3 vs 4, ...; an odd last group sits out).
//! Each pair contributes up to `min(size A, size B)` cross-group games. The total is then
//! nudged toward the nearest power of two one game at a time:
//!
//! - shrinking takes a game away from the pair whose last included seeds rank weakest,
//! - growing gives a game to the pair whose next seeds rank strongest, up to
//!   `max(size A, size B)`; the shorter group is padded with byes.
//!
//! Seed `i` of group A then meets seed `n - 1 - i` of group B.

use crate::logic::bracket::advance_from_round;
use crate::logic::standings::{standings_for, StandingRow};
use crate::models::{
    Entrant, Fixture, GameId, GroupId, ScheduleKey, Tournament, TournamentError,
};

/// Weight of points over score differential when ranking a pair of seeds.
const RANK_WEIGHT: i64 = 10_000;
/// Points assumed for a seed position a group cannot fill.
const MISSING_SEED_POINTS: i64 = -1;
/// Score differential assumed for a seed position a group cannot fill.
const MISSING_SEED_SCORE_DIFF: i64 = -100_000;

/// Final standings of one group, in group creation order.
#[derive(Clone, Debug)]
pub struct GroupStandings {
    pub group_id: GroupId,
    pub rows: Vec<StandingRow>,
}

/// A playoff qualifier: a ranked player or a bye filling an empty seed position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Seed {
    Real(StandingRow),
    Bye,
}

impl Seed {
    pub fn entrant(&self) -> Entrant {
        match self {
            Seed::Real(row) => Entrant::Player(row.player_id),
            Seed::Bye => Entrant::Bye,
        }
    }
}

/// Power of two closest to `value`. On a tie between the two neighbours the upper one
/// wins. Values of 0 and 1 give 1.
pub fn nearest_power_of_two(value: usize) -> usize {
    if value <= 1 {
        return 1;
    }
    let mut lower = 1;
    while lower * 2 <= value {
        lower *= 2;
    }
    let upper = lower * 2;
    log::debug!(
        "nearest_power_of_two bounds: value={} lower={} upper={}",
        value,
        lower,
        upper
    );
    if value - lower < upper - value {
        lower
    } else {
        upper
    }
}

/// Match allocation of one pair of groups.
struct PairAllocation<'a> {
    a: &'a GroupStandings,
    b: &'a GroupStandings,
    matches: usize,
}

impl PairAllocation<'_> {
    fn cap(&self) -> usize {
        self.a.rows.len().max(self.b.rows.len())
    }

    /// Rank of the weakest of the two seeds at the last included position.
    fn last_seed_rank(&self) -> i64 {
        let last = self.matches - 1;
        let (points_a, diff_a) = seed_rank(self.a.rows.get(last), 0, 0);
        let (points_b, diff_b) = seed_rank(self.b.rows.get(last), 0, 0);
        points_a.min(points_b) * RANK_WEIGHT + diff_a.min(diff_b)
    }

    /// Rank of the strongest of the two seeds at the next position, None if neither
    /// group has a player there.
    fn next_seed_rank(&self) -> Option<i64> {
        let next = self.matches;
        let row_a = self.a.rows.get(next);
        let row_b = self.b.rows.get(next);
        if row_a.is_none() && row_b.is_none() {
            return None;
        }
        let (points_a, diff_a) = seed_rank(row_a, MISSING_SEED_POINTS, MISSING_SEED_SCORE_DIFF);
        let (points_b, diff_b) = seed_rank(row_b, MISSING_SEED_POINTS, MISSING_SEED_SCORE_DIFF);
        Some(points_a.max(points_b) * RANK_WEIGHT + diff_a.max(diff_b))
    }
}

fn seed_rank(row: Option<&StandingRow>, missing_points: i64, missing_diff: i64) -> (i64, i64) {
    row.map_or((missing_points, missing_diff), |r| {
        (i64::from(r.points), r.score_diff)
    })
}

/// Take one game away from the weakest pair. False when no pair has a game left.
fn shrink_weakest(pairs: &mut [PairAllocation]) -> bool {
    let mut candidate: Option<(usize, i64)> = None;
    for (index, pair) in pairs.iter().enumerate() {
        if pair.matches == 0 {
            continue;
        }
        let rank = pair.last_seed_rank();
        if candidate.map_or(true, |(_, best)| rank < best) {
            candidate = Some((index, rank));
        }
    }
    match candidate {
        Some((index, rank)) => {
            log::debug!("Playoff: dropping a game from pair {} (rank {})", index, rank);
            pairs[index].matches -= 1;
            true
        }
        None => false,
    }
}

/// Give one game to the strongest pair below its cap. False when every pair is full.
fn grow_strongest(pairs: &mut [PairAllocation]) -> bool {
    let mut candidate: Option<(usize, i64)> = None;
    for (index, pair) in pairs.iter().enumerate() {
        if pair.matches >= pair.cap() {
            continue;
        }
        let Some(rank) = pair.next_seed_rank() else {
            continue;
        };
        if candidate.map_or(true, |(_, best)| rank > best) {
            candidate = Some((index, rank));
        }
    }
    match candidate {
        Some((index, rank)) => {
            log::debug!("Playoff: adding a game to pair {} (rank {})", index, rank);
            pairs[index].matches += 1;
            true
        }
        None => false,
    }
}

/// Top `required` rows of a group as seeds, padded with byes.
fn seeds(rows: &[StandingRow], required: usize) -> Vec<Seed> {
    let mut seeds: Vec<Seed> = rows.iter().take(required).cloned().map(Seed::Real).collect();
    seeds.resize(required, Seed::Bye);
    seeds
}

/// First-round playoff fixtures for the given group standings.
///
/// Returns no fixtures for fewer than two groups or when no pair can field a game.
/// A seed facing a bye gets a finished 1:0 walkover; two byes produce no game.
pub fn plan_playoff(groups: &[GroupStandings]) -> Vec<Fixture> {
    if groups.len() < 2 {
        return Vec::new();
    }

    let mut pairs: Vec<PairAllocation> = groups
        .chunks_exact(2)
        .map(|pair| PairAllocation {
            a: &pair[0],
            b: &pair[1],
            matches: pair[0].rows.len().min(pair[1].rows.len()),
        })
        .collect();

    let total_matches: usize = pairs.iter().map(|p| p.matches).sum();
    if total_matches == 0 {
        return Vec::new();
    }

    let target_matches = nearest_power_of_two(total_matches);
    log::debug!(
        "Playoff: {} cross-group games available, target {}",
        total_matches,
        target_matches
    );
    if target_matches < total_matches {
        for _ in 0..total_matches - target_matches {
            if !shrink_weakest(&mut pairs) {
                break;
            }
        }
    } else {
        for _ in 0..target_matches - total_matches {
            if !grow_strongest(&mut pairs) {
                break;
            }
        }
    }

    let mut fixtures = Vec::new();
    let mut index = 0;
    for pair in &pairs {
        let seeds_a = seeds(&pair.a.rows, pair.matches);
        let seeds_b = seeds(&pair.b.rows, pair.matches);
        let pair_limit = seeds_a.len().min(seeds_b.len());
        for i in 0..pair_limit {
            let entrant_a = seeds_a[i].entrant();
            let entrant_b = seeds_b[pair_limit - 1 - i].entrant();
            let key = ScheduleKey::new(1, index);
            if let Some(fixture) = Fixture::bracket(entrant_a, entrant_b, 1, key) {
                fixtures.push(fixture);
                index += 1;
            }
        }
    }
    fixtures
}

/// Seed the playoff from the tournament's group standings and insert round 1.
///
/// If round 1 is complete straight away (walkovers only), the bracket advances at once.
/// A player drawn into more than one group is rejected with `DuplicatePlayer`.
pub fn seed_playoff(tournament: &mut Tournament) -> Result<Vec<GameId>, TournamentError> {
    if tournament.groups.len() < 2 {
        log::debug!("Playoff: fewer than 2 groups, nothing to seed");
        return Ok(Vec::new());
    }
    tournament.check_groups()?;

    let group_standings = tournament
        .groups
        .iter()
        .map(|g| {
            Ok(GroupStandings {
                group_id: g.id,
                rows: standings_for(tournament, Some(g.id))?,
            })
        })
        .collect::<Result<Vec<_>, TournamentError>>()?;

    let fixtures = plan_playoff(&group_standings);
    if fixtures.is_empty() {
        return Ok(Vec::new());
    }

    let all_finished = fixtures.iter().all(Fixture::is_finished);
    let ids = tournament.insert_fixtures(fixtures);
    log::info!("Playoff: seeded round 1 with {} game(s)", ids.len());

    if all_finished {
        advance_from_round(tournament, 1);
    }
    Ok(ids)
}
