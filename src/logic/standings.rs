//! Standings: points and score differential from finished games.

use crate::models::{
    Game, GroupId, Player, PlayerId, ScoringRule, Tournament, TournamentError, TournamentFormat,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub player_id: PlayerId,
    pub name: String,
    pub matches_played: u32,
    pub points: u32,
    pub score_diff: i64,
}

/// Standings of one group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    pub group_id: GroupId,
    pub name: String,
    pub rows: Vec<StandingRow>,
}

/// Standings view of a whole tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tables", rename_all = "snake_case")]
pub enum Standings {
    Overall(Vec<StandingRow>),
    Groups(Vec<GroupTable>),
}

/// Compute one row per player from the finished games they played (only games of
/// `group_id` when given).
///
/// Sorted by points, then score differential, both descending. The sort is stable, so rows
/// tied on both keys stay in the order the players were given.
pub fn compute_standings(
    players: &[Player],
    games: &[Game],
    scoring: &ScoringRule,
    group_id: Option<GroupId>,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = players
        .iter()
        .map(|player| {
            let mut row = StandingRow {
                player_id: player.id,
                name: player.name.clone(),
                matches_played: 0,
                points: 0,
                score_diff: 0,
            };
            let played = games
                .iter()
                .filter(|g| group_id.map_or(true, |id| g.group_id == Some(id)))
                .filter(|g| g.is_finished());
            for game in played {
                let Some((own, opponent)) = game.scores_for(player.id) else {
                    continue;
                };
                row.matches_played += 1;
                row.score_diff += i64::from(own) - i64::from(opponent);
                row.points += match own.cmp(&opponent) {
                    Ordering::Greater => scoring.points_win,
                    Ordering::Equal => scoring.points_draw,
                    Ordering::Less => scoring.points_loss,
                };
            }
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.score_diff.cmp(&a.score_diff))
    });
    rows
}

/// Standings of a tournament: all players, or the members of one group over that group's games.
pub fn standings_for(
    tournament: &Tournament,
    group_id: Option<GroupId>,
) -> Result<Vec<StandingRow>, TournamentError> {
    match group_id {
        None => Ok(compute_standings(
            &tournament.players,
            &tournament.games,
            &tournament.scoring,
            None,
        )),
        Some(id) => {
            let group = tournament
                .group(id)
                .ok_or(TournamentError::GroupNotFound(id))?;
            let members = group
                .players
                .iter()
                .map(|&pid| {
                    tournament
                        .player(pid)
                        .cloned()
                        .ok_or(TournamentError::PlayerNotFound(pid))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(compute_standings(
                &members,
                &tournament.games,
                &tournament.scoring,
                Some(id),
            ))
        }
    }
}

/// Per-group tables for the groups format, one overall table otherwise.
pub fn tournament_standings(tournament: &Tournament) -> Result<Standings, TournamentError> {
    match tournament.format {
        TournamentFormat::RoundRobin => Ok(Standings::Overall(standings_for(tournament, None)?)),
        TournamentFormat::Groups => {
            let tables = tournament
                .groups
                .iter()
                .map(|g| {
                    Ok(GroupTable {
                        group_id: g.id,
                        name: g.name.clone(),
                        rows: standings_for(tournament, Some(g.id))?,
                    })
                })
                .collect::<Result<Vec<_>, TournamentError>>()?;
            Ok(Standings::Groups(tables))
        }
    }
}
