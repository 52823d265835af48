//! Integration tests for venue assignment.

use tournament_scheduler::{
    assign_venue, generate_round_robin, record_result, unassign_venue, ErrorKind, GameId,
    GameStatus, Player, PlayerId, ScoringRule, Tournament, TournamentError, TournamentFormat,
};

fn started(n: usize) -> Tournament {
    let players = (0..n).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players(
        "League",
        TournamentFormat::RoundRobin,
        ScoringRule::default(),
        players,
    );
    t.set_venues_count(2).unwrap();
    generate_round_robin(&mut t).unwrap();
    t
}

/// Two games with no player in common, and one that shares a player with the first.
fn games(t: &Tournament) -> (GameId, GameId, GameId) {
    let first = &t.games[0];
    let first_players: Vec<PlayerId> = first.player_ids().collect();
    let disjoint = t
        .games
        .iter()
        .find(|g| g.player_ids().all(|p| !first_players.contains(&p)))
        .unwrap();
    let overlapping = t
        .games
        .iter()
        .find(|g| g.id != first.id && g.player_ids().any(|p| first_players.contains(&p)))
        .unwrap();
    (first.id, disjoint.id, overlapping.id)
}

#[test]
fn assigning_starts_the_game() {
    let mut t = started(4);
    let (first, _, _) = games(&t);
    assign_venue(&mut t, first, 1).unwrap();
    let g = t.game(first).unwrap();
    assert_eq!(g.status, GameStatus::InProgress);
    assert_eq!(g.venue, Some(1));
}

#[test]
fn occupied_venue_is_rejected() {
    let mut t = started(4);
    let (first, disjoint, _) = games(&t);
    assign_venue(&mut t, first, 1).unwrap();

    let err = assign_venue(&mut t, disjoint, 1).unwrap_err();
    assert_eq!(err, TournamentError::VenueOccupied { venue: 1 });
    assert_eq!(err.kind(), ErrorKind::ResourceConflict);
    assert_eq!(t.game(disjoint).unwrap().status, GameStatus::Scheduled);

    assign_venue(&mut t, disjoint, 2).unwrap();
}

#[test]
fn busy_player_is_rejected() {
    let mut t = started(4);
    let (first, _, overlapping) = games(&t);
    assign_venue(&mut t, first, 1).unwrap();

    let err = assign_venue(&mut t, overlapping, 2).unwrap_err();
    assert!(matches!(err, TournamentError::PlayerBusy(_)));
    let g = t.game(overlapping).unwrap();
    assert_eq!((g.status, g.venue), (GameStatus::Scheduled, None));
}

#[test]
fn venue_must_exist() {
    let mut t = started(4);
    let (first, _, _) = games(&t);
    assert_eq!(assign_venue(&mut t, first, 0), Err(TournamentError::InvalidVenue(0)));
    assert_eq!(assign_venue(&mut t, first, 3), Err(TournamentError::InvalidVenue(3)));
}

#[test]
fn finished_games_cannot_be_assigned() {
    let mut t = started(4);
    let (first, _, _) = games(&t);
    record_result(&mut t, first, 2, 1).unwrap();
    assert_eq!(
        assign_venue(&mut t, first, 1),
        Err(TournamentError::GameAlreadyFinished(first))
    );
    assert_eq!(
        unassign_venue(&mut t, first),
        Err(TournamentError::GameAlreadyFinished(first))
    );
}

#[test]
fn unassigning_frees_the_venue() {
    let mut t = started(4);
    let (first, _, overlapping) = games(&t);
    assign_venue(&mut t, first, 1).unwrap();
    unassign_venue(&mut t, first).unwrap();

    let g = t.game(first).unwrap();
    assert_eq!((g.status, g.venue), (GameStatus::Scheduled, None));
    assign_venue(&mut t, overlapping, 1).unwrap();
}

#[test]
fn a_running_game_can_move_venue() {
    let mut t = started(4);
    let (first, _, _) = games(&t);
    assign_venue(&mut t, first, 1).unwrap();
    assign_venue(&mut t, first, 2).unwrap();
    assert_eq!(t.game(first).unwrap().venue, Some(2));
}

#[test]
fn unknown_game_is_not_found() {
    let mut t = started(2);
    let missing = uuid::Uuid::new_v4();
    let err = assign_venue(&mut t, missing, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
