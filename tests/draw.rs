//! End-to-end tests: draw generation, result entry and playoff progression.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tournament_scheduler::{
    generate_draw, generate_groups_and_fixtures, generate_round_robin, record_result,
    tournament_standings, Entrant, GameId, Player, PlayerId, ScoringRule, Standings, Tournament,
    TournamentError, TournamentFormat, TournamentStatus,
};

fn tournament(format: TournamentFormat, n: usize) -> Tournament {
    let players = (0..n).map(|i| Player::new(format!("P{i}"))).collect();
    Tournament::with_players("Open", format, ScoringRule::default(), players)
}

fn group_game_ids(t: &Tournament) -> Vec<GameId> {
    t.games.iter().filter(|g| g.group_id.is_some()).map(|g| g.id).collect()
}

fn playoff_ids(t: &Tournament, round: u32) -> Vec<GameId> {
    t.playoff_round(round).iter().map(|g| g.id).collect()
}

/// Five players in two groups (3 and 2) with every group game won 2:0 by player 1.
fn groups_finished() -> Tournament {
    let mut t = tournament(TournamentFormat::Groups, 5);
    generate_groups_and_fixtures(&mut t, 2, &mut StdRng::seed_from_u64(5)).unwrap();
    for id in group_game_ids(&t) {
        record_result(&mut t, id, 2, 0).unwrap();
    }
    t
}

#[test]
fn round_robin_draw_pairs_everyone_once() {
    let mut t = tournament(TournamentFormat::RoundRobin, 4);
    let batch = generate_round_robin(&mut t).unwrap();
    assert_eq!(batch.games.len(), 6);
    assert!(batch.groups.is_empty());
    assert_eq!(t.status, TournamentStatus::InProgress);

    let pairs: HashSet<(PlayerId, PlayerId)> = t
        .games
        .iter()
        .map(|g| {
            let (a, b) = (g.player_1.player_id().unwrap(), g.player_2.player_id().unwrap());
            if a < b { (a, b) } else { (b, a) }
        })
        .collect();
    assert_eq!(pairs.len(), 6);

    let sequences: Vec<u64> = t.games.iter().map(|g| g.sequence).collect();
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn round_robin_with_one_player_is_a_no_op() {
    let mut t = tournament(TournamentFormat::RoundRobin, 1);
    let batch = generate_round_robin(&mut t).unwrap();
    assert!(batch.games.is_empty());
    assert_eq!(t.status, TournamentStatus::Draft);
}

#[test]
fn draw_must_match_the_format() {
    let mut t = tournament(TournamentFormat::Groups, 4);
    assert_eq!(generate_round_robin(&mut t), Err(TournamentError::InvalidState));

    let mut t = tournament(TournamentFormat::RoundRobin, 4);
    assert_eq!(
        generate_groups_and_fixtures(&mut t, 2, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn too_few_groups_writes_nothing() {
    let mut t = tournament(TournamentFormat::Groups, 6);
    let err = generate_groups_and_fixtures(&mut t, 1, &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert_eq!(err, TournamentError::NotEnoughGroups { requested: 1 });
    assert!(t.games.is_empty());
    assert!(t.groups.is_empty());
    assert_eq!(t.status, TournamentStatus::Draft);

    assert_eq!(
        generate_draw(&mut t, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::NotEnoughGroups { requested: 0 })
    );
}

#[test]
fn more_groups_than_players_writes_nothing() {
    let mut t = tournament(TournamentFormat::Groups, 4);
    t.set_number_of_groups(u32::MAX).unwrap();
    assert_eq!(
        generate_draw(&mut t, &mut StdRng::seed_from_u64(1)),
        Err(TournamentError::TooManyGroups {
            requested: u32::MAX,
            players: 4
        })
    );
    assert!(t.games.is_empty());
    assert!(t.groups.is_empty());
    assert_eq!(t.status, TournamentStatus::Draft);
}

#[test]
fn generate_draw_follows_the_format_and_replaces_the_old_draw() {
    let mut t = tournament(TournamentFormat::Groups, 6);
    t.set_number_of_groups(2).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let first = generate_draw(&mut t, &mut rng).unwrap();
    assert_eq!(first.groups.len(), 2);
    assert_eq!(first.games.len(), 6);

    let second = generate_draw(&mut t, &mut rng).unwrap();
    assert_eq!(t.groups.len(), 2);
    assert_eq!(t.games.len(), 6);
    assert!(first.games.iter().all(|id| t.game(*id).is_err()));
    assert!(second.games.iter().all(|id| t.game(*id).is_ok()));
}

#[test]
fn finishing_the_group_stage_seeds_the_playoff() {
    let t = groups_finished();
    let sizes: Vec<usize> = t.groups.iter().map(|g| g.players.len()).collect();
    assert_eq!(sizes, vec![3, 2]);

    // min(3, 2) = 2 games, already a power of two: no byes.
    let round_1 = t.playoff_round(1);
    assert_eq!(round_1.len(), 2);
    for g in &round_1 {
        assert!(!g.player_1.is_bye() && !g.player_2.is_bye());
        let a = g.player_1.player_id().unwrap();
        let b = g.player_2.player_id().unwrap();
        assert!(t.groups[0].contains(a));
        assert!(t.groups[1].contains(b));
    }
    assert_eq!(t.status, TournamentStatus::InProgress);

    match tournament_standings(&t).unwrap() {
        Standings::Groups(tables) => {
            assert_eq!(tables.len(), 2);
            assert_eq!(tables[0].rows.len(), 3);
            let top = &tables[0].rows[0];
            assert_eq!(round_1[0].player_1, Entrant::Player(top.player_id));
        }
        Standings::Overall(_) => panic!("groups format has per-group tables"),
    }
}

#[test]
fn playoff_runs_to_a_finished_tournament() {
    let mut t = groups_finished();
    for id in playoff_ids(&t, 1) {
        record_result(&mut t, id, 3, 1).unwrap();
    }
    assert_eq!(t.playoff_round(2).len(), 2);

    for id in playoff_ids(&t, 2) {
        record_result(&mut t, id, 1, 0).unwrap();
    }
    assert!(t.playoff_round(3).is_empty());
    assert_eq!(t.status, TournamentStatus::Finished);
}

#[test]
fn playoff_draws_are_rejected() {
    let mut t = groups_finished();
    let id = playoff_ids(&t, 1)[0];
    assert_eq!(record_result(&mut t, id, 1, 1), Err(TournamentError::DrawNotAllowed(id)));
    assert!(!t.game(id).unwrap().is_finished());
}

#[test]
fn an_inconsistent_group_draw_leaves_the_result_unrecorded() {
    let mut t = tournament(TournamentFormat::Groups, 5);
    generate_groups_and_fixtures(&mut t, 2, &mut StdRng::seed_from_u64(5)).unwrap();
    let ids = group_game_ids(&t);
    let (last, rest) = ids.split_last().unwrap();
    for id in rest {
        record_result(&mut t, *id, 2, 0).unwrap();
    }

    let moved = t.groups[0].players[0];
    t.groups[1].players.push(moved);
    assert_eq!(
        record_result(&mut t, *last, 2, 0),
        Err(TournamentError::DuplicatePlayer(moved))
    );
    let game = t.game(*last).unwrap();
    assert!(!game.is_finished());
    assert_eq!((game.score_1, game.score_2), (0, 0));
    assert!(!t.has_playoff_games());

    t.groups[1].players.pop();
    record_result(&mut t, *last, 2, 0).unwrap();
    assert_eq!(t.playoff_round(1).len(), 2);
}

#[test]
fn correcting_a_playoff_result_rebuilds_later_rounds() {
    let mut t = groups_finished();
    let round_1 = playoff_ids(&t, 1);
    for id in &round_1 {
        record_result(&mut t, *id, 3, 1).unwrap();
    }
    let old_final = playoff_ids(&t, 2)[0];
    let first = t.game(round_1[0]).unwrap().clone();
    assert_eq!(t.game(old_final).unwrap().player_1, first.player_1);

    record_result(&mut t, round_1[0], 0, 2).unwrap();

    assert!(t.game(old_final).is_err());
    let round_2 = t.playoff_round(2);
    assert_eq!(round_2.len(), 2);
    assert_eq!(round_2[0].player_1, first.player_2);
    assert_eq!(round_2[1].player_1, first.player_1);
}

#[test]
fn finishing_a_round_robin_finishes_the_tournament() {
    let mut t = tournament(TournamentFormat::RoundRobin, 3);
    generate_round_robin(&mut t).unwrap();
    let ids: Vec<GameId> = t.games.iter().map(|g| g.id).collect();
    for id in &ids {
        record_result(&mut t, *id, 1, 1).unwrap();
    }
    assert_eq!(t.status, TournamentStatus::Finished);

    match tournament_standings(&t).unwrap() {
        Standings::Overall(rows) => assert!(rows.iter().all(|r| r.points == 2)),
        Standings::Groups(_) => panic!("round-robin format has one table"),
    }
}

#[test]
fn players_are_managed_in_draft_only() {
    let mut t = tournament(TournamentFormat::RoundRobin, 2);
    assert_eq!(t.add_player("p0"), Err(TournamentError::DuplicatePlayerName));
    assert_eq!(t.add_player("   "), Err(TournamentError::EmptyPlayerName));
    let id = t.add_player("  Zed ").unwrap();
    assert_eq!(t.player(id).unwrap().name, "Zed");
    assert_eq!(t.rename_player(id, "P1"), Err(TournamentError::DuplicatePlayerName));
    t.rename_player(id, "Zed Two").unwrap();

    generate_round_robin(&mut t).unwrap();
    assert_eq!(t.add_player("Late"), Err(TournamentError::InvalidState));
    assert_eq!(t.remove_player(id), Err(TournamentError::InvalidState));
}
