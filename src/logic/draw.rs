//! Draw generation and result entry: the operations a caller drives a tournament with.

use crate::logic::bracket::rebuild_from_round;
use crate::logic::groups::{assign_groups, group_fixtures};
use crate::logic::playoff::seed_playoff;
use crate::logic::round_robin::{ensure_unique, schedule_round_robin};
use crate::models::{
    GameId, GameStatus, GroupId, PlayerId, Tournament, TournamentError, TournamentFormat,
    TournamentStatus,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Groups and games created by one draw.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureBatch {
    pub groups: Vec<GroupId>,
    pub games: Vec<GameId>,
}

/// Generate a tournament-wide round-robin (round-robin format only).
///
/// Replaces any previous draw and moves the tournament to InProgress. With fewer than
/// 2 players nothing happens and an empty batch is returned.
pub fn generate_round_robin(tournament: &mut Tournament) -> Result<FixtureBatch, TournamentError> {
    if tournament.format != TournamentFormat::RoundRobin {
        return Err(TournamentError::InvalidState);
    }
    let player_ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    ensure_unique(&player_ids)?;
    if player_ids.len() < 2 {
        log::debug!("Round robin: fewer than 2 players, nothing to schedule");
        return Ok(FixtureBatch::default());
    }

    tournament.clear_draw();
    let fixtures = schedule_round_robin(&player_ids, None)?;
    let games = tournament.insert_fixtures(fixtures);
    tournament.status = TournamentStatus::InProgress;
    log::info!(
        "Round robin: scheduled {} game(s) for {} player(s)",
        games.len(),
        player_ids.len()
    );
    Ok(FixtureBatch {
        groups: Vec::new(),
        games,
    })
}

/// Draw `group_count` groups and schedule a round-robin inside each (groups format only).
///
/// Replaces any previous draw and moves the tournament to InProgress. The shuffle uses
/// the given random source.
pub fn generate_groups_and_fixtures<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    group_count: u32,
    rng: &mut R,
) -> Result<FixtureBatch, TournamentError> {
    if tournament.format != TournamentFormat::Groups {
        return Err(TournamentError::InvalidState);
    }
    let player_ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    let groups = assign_groups(&player_ids, group_count, rng)?;
    let fixtures = group_fixtures(&groups)?;

    tournament.clear_draw();
    tournament.number_of_groups = Some(group_count);
    let group_ids = groups.iter().map(|g| g.id).collect();
    tournament.groups = groups;
    let games = tournament.insert_fixtures(fixtures);
    tournament.status = TournamentStatus::InProgress;
    log::info!(
        "Groups: drew {} group(s), scheduled {} game(s)",
        group_count,
        games.len()
    );
    Ok(FixtureBatch {
        groups: group_ids,
        games,
    })
}

/// Generate the draw the tournament's format calls for.
pub fn generate_draw<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<FixtureBatch, TournamentError> {
    match tournament.format {
        TournamentFormat::RoundRobin => generate_round_robin(tournament),
        TournamentFormat::Groups => {
            let group_count = tournament
                .number_of_groups
                .ok_or(TournamentError::NotEnoughGroups { requested: 0 })?;
            generate_groups_and_fixtures(tournament, group_count, rng)
        }
    }
}

/// Record a final score for a game (also used to correct a finished game), then run
/// [`on_game_finished`].
///
/// Playoff games cannot end level, walkovers cannot be re-scored, and in the groups
/// format the group draw must be consistent (see [`Tournament::check_groups`]). All of
/// these are rejected before anything is written.
pub fn record_result(
    tournament: &mut Tournament,
    game_id: GameId,
    score_1: u32,
    score_2: u32,
) -> Result<(), TournamentError> {
    let game = tournament.game(game_id)?;
    if game.player_1.is_bye() || game.player_2.is_bye() {
        return Err(TournamentError::InvalidState);
    }
    let is_bracket_game = tournament.format == TournamentFormat::Groups && game.is_playoff();
    if is_bracket_game && score_1 == score_2 {
        return Err(TournamentError::DrawNotAllowed(game_id));
    }
    if tournament.format == TournamentFormat::Groups {
        tournament.check_groups()?;
    }

    let game = tournament.game_mut(game_id)?;
    game.score_1 = score_1;
    game.score_2 = score_2;
    game.status = GameStatus::Finished;

    on_game_finished(tournament, game_id)
}

/// React to a finished game.
///
/// - Groups format: once every group game is finished and no playoff exists, seed it.
/// - A playoff game: drop later rounds and rebuild the bracket from its round.
/// - When no game is left unfinished the tournament is Finished; a rebuild that adds
///   games puts it back InProgress.
pub fn on_game_finished(
    tournament: &mut Tournament,
    game_id: GameId,
) -> Result<(), TournamentError> {
    let game = tournament.game(game_id)?;
    let (is_playoff, round) = (game.is_playoff(), game.round);

    if tournament.format == TournamentFormat::Groups {
        if !tournament.has_unfinished_group_games() && !tournament.has_playoff_games() {
            seed_playoff(tournament)?;
        }
        if is_playoff {
            rebuild_from_round(tournament, round);
        }
    }

    if tournament.has_unfinished_games() {
        tournament.status = TournamentStatus::InProgress;
    } else {
        tournament.status = TournamentStatus::Finished;
        log::info!("Tournament '{}' finished", tournament.name);
    }
    Ok(())
}
