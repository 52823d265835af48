//! Bracket progression: generate the next playoff round once a round is complete.

use crate::models::{Entrant, Fixture, Game, GameId, ScheduleKey, Tournament};

/// Where a playoff round stands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundState {
    /// At least one game of the round is not finished.
    Incomplete,
    /// The next round already has games.
    Advanced,
    /// Nothing follows this round: it is empty, the final, or the final + third-place round.
    Terminal,
    /// Complete; these fixtures make up the next round.
    Ready(Vec<Fixture>),
}

/// Inspect `round` of the playoff games and decide what comes next.
///
/// `games` may contain any games of the tournament; only playoff games are considered.
/// Winners and losers are taken in creation order, which is also bracket order.
pub fn round_state(games: &[Game], round: u32) -> RoundState {
    let mut round_games: Vec<&Game> = playoff_games(games, round).collect();
    if round_games.is_empty() {
        return RoundState::Terminal;
    }
    if round_games.iter().any(|g| !g.is_finished()) {
        return RoundState::Incomplete;
    }
    if round_games.len() <= 1 {
        return RoundState::Terminal;
    }

    let next_round = round + 1;
    if playoff_games(games, next_round).next().is_some() {
        return RoundState::Advanced;
    }

    // Two games after two games: the semifinals already produced final + third place.
    let previous_count = playoff_games(games, round.saturating_sub(1)).count();
    if round_games.len() == 2 && previous_count == 2 {
        return RoundState::Terminal;
    }

    round_games.sort_by_key(|g| g.sequence);
    let winners: Vec<Entrant> = round_games.iter().map(|g| g.winner()).collect();

    let pairings: Vec<(Entrant, Entrant)> = if round_games.len() == 2 {
        let losers: Vec<Entrant> = round_games.iter().map(|g| g.loser()).collect();
        vec![(winners[0], winners[1]), (losers[0], losers[1])]
    } else {
        if winners.len() % 2 != 0 {
            log::warn!(
                "Bracket: round {} has {} winners, the last one gets no opponent",
                round,
                winners.len()
            );
        }
        winners.chunks_exact(2).map(|w| (w[0], w[1])).collect()
    };

    let fixtures = pairings
        .into_iter()
        .enumerate()
        .filter_map(|(i, (a, b))| {
            Fixture::bracket(a, b, next_round, ScheduleKey::new(next_round, i as u32))
        })
        .collect();
    RoundState::Ready(fixtures)
}

fn playoff_games(games: &[Game], round: u32) -> impl Iterator<Item = &Game> {
    games.iter().filter(move |g| g.is_playoff() && g.round == round)
}

/// Generate the round after `round` if it is ready. Returns the new game ids
/// (empty when nothing was generated). Calling it again for the same round is a no-op.
pub fn advance_round(tournament: &mut Tournament, round: u32) -> Vec<GameId> {
    match round_state(&tournament.games, round) {
        RoundState::Ready(fixtures) if !fixtures.is_empty() => {
            let ids = tournament.insert_fixtures(fixtures);
            log::info!(
                "Bracket: round {} complete, generated round {} with {} game(s)",
                round,
                round + 1,
                ids.len()
            );
            ids
        }
        state => {
            log::debug!("Bracket: round {} not advanced ({:?})", round, state);
            Vec::new()
        }
    }
}

/// Advance from `round` upward for as long as each step produces a new round.
/// Returns the ids of every generated game.
pub fn advance_from_round(tournament: &mut Tournament, round: u32) -> Vec<GameId> {
    let mut generated = Vec::new();
    let mut current = round;
    loop {
        let ids = advance_round(tournament, current);
        if ids.is_empty() {
            break;
        }
        generated.extend(ids);
        current += 1;
    }
    generated
}

/// Drop every playoff round after `round` and regenerate from `round` upward.
///
/// Used when a playoff result changes after later rounds were generated from it.
pub fn rebuild_from_round(tournament: &mut Tournament, round: u32) -> Vec<GameId> {
    let removed = tournament.delete_games_where(|g| g.is_playoff() && g.round > round);
    if removed > 0 {
        log::info!(
            "Bracket: removed {} game(s) after round {} for rebuild",
            removed,
            round
        );
    }
    advance_from_round(tournament, round)
}
