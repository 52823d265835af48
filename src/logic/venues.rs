//! Venue assignment: put a game on a venue (table, board, court) and take it off again.

use crate::models::{GameId, GameStatus, Tournament, TournamentError};

/// Start a game on a venue.
///
/// Rejected when the venue is out of range, when another game is in progress on it, or
/// when one of the players is in progress elsewhere. Nothing changes on rejection. The
/// exclusive borrow of the tournament makes the check and the write one step.
pub fn assign_venue(
    tournament: &mut Tournament,
    game_id: GameId,
    venue: u32,
) -> Result<(), TournamentError> {
    let game = tournament.game(game_id)?;
    if game.status == GameStatus::Finished {
        return Err(TournamentError::GameAlreadyFinished(game_id));
    }
    if venue == 0 || tournament.venues_count.is_some_and(|count| venue > count) {
        return Err(TournamentError::InvalidVenue(venue));
    }

    let in_progress = tournament
        .games
        .iter()
        .filter(|g| g.id != game_id && g.status == GameStatus::InProgress);
    for other in in_progress {
        if other.venue == Some(venue) {
            return Err(TournamentError::VenueOccupied { venue });
        }
        if let Some(busy) = game.player_ids().find(|&pid| other.involves(pid)) {
            return Err(TournamentError::PlayerBusy(busy));
        }
    }

    let game = tournament.game_mut(game_id)?;
    game.status = GameStatus::InProgress;
    game.venue = Some(venue);
    log::debug!("Venue {}: game {} started", venue, game_id);
    Ok(())
}

/// Take a game off its venue and put it back to Scheduled.
pub fn unassign_venue(tournament: &mut Tournament, game_id: GameId) -> Result<(), TournamentError> {
    let game = tournament.game_mut(game_id)?;
    if game.status == GameStatus::Finished {
        return Err(TournamentError::GameAlreadyFinished(game_id));
    }
    game.status = GameStatus::Scheduled;
    game.venue = None;
    Ok(())
}
