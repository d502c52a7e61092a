//! Tests for the player and game history stores.

use tempfile::NamedTempFile;

use tictactoe::{
    CompletedGame, Coord, Database, GameMode, GameRepository, Mark, MoveLog, MoveRecord,
    NewGameRecord, NewPlayer, PlayerRepository,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and both repositories.
fn setup_test_db() -> (NamedTempFile, PlayerRepository, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let db = Database::open(db_path, 5).expect("Failed to open database");
    (db_file, PlayerRepository::new(db.clone()), GameRepository::new(db))
}

fn sample_log() -> MoveLog {
    let at = |row, col| Coord::new(row, col).unwrap();
    MoveLog::from(vec![
        MoveRecord::Place { coord: at(0, 0), mark: Mark::X },
        MoveRecord::Place { coord: at(1, 1), mark: Mark::O },
        MoveRecord::Clear { coord: at(0, 0) },
    ])
}

#[test]
fn test_create_player_starts_at_zero() {
    let (_db, players, _) = setup_test_db();
    let player = players.create("Alice").expect("Create failed");
    assert_eq!(player.name(), "Alice");
    assert!(*player.id() > 0);
    assert_eq!(player.games_played(), 0);
}

#[test]
fn test_create_player_duplicate_name_fails() {
    let (_db, players, _) = setup_test_db();
    players.create("Bob").expect("First create failed");
    assert!(players.create("Bob").is_err(), "Duplicate name should fail");
}

#[test]
fn test_find_by_name() {
    let (_db, players, _) = setup_test_db();
    let carol = players.create("Carol").expect("Create failed");

    let found = players.find_by_name("Carol").expect("Query failed");
    assert_eq!(found, Some(carol.clone()));
    assert_eq!(players.find_by_name("carol").expect("Query failed"), None);
    assert_eq!(players.find_by_id(*carol.id()).expect("Query failed"), Some(carol));
}

#[test]
fn test_find_or_create_reuses_existing_player() {
    let (_db, players, _) = setup_test_db();
    let first = players.find_or_create("Dana").expect("Create failed");
    let second = players.find_or_create("Dana").expect("Lookup failed");
    assert_eq!(first.id(), second.id());
}

#[test]
fn test_save_inserts_then_updates_by_id() {
    let (_db, players, _) = setup_test_db();
    let eve = players
        .save(NewPlayer::new("Eve".to_string()))
        .expect("Insert failed");

    let eve = players
        .save(eve.with_outcome(tictactoe::GameOutcome::Win))
        .expect("Update failed");
    assert_eq!(*eve.wins(), 1);

    let reloaded = players.find_by_id(*eve.id()).expect("Query failed").unwrap();
    assert_eq!(*reloaded.wins(), 1);
    assert_eq!(*reloaded.losses(), 0);
}

#[test]
fn test_find_top_players_bounded_and_ordered() {
    let (_db, players, _) = setup_test_db();
    for (name, wins) in [("P1", 2), ("P2", 5), ("P3", 0), ("P4", 3), ("P5", 5)] {
        let mut player = players.create(name).expect("Create failed");
        for _ in 0..wins {
            player = player.with_outcome(tictactoe::GameOutcome::Win);
        }
        players.save(player).expect("Update failed");
    }

    let top = players.find_top_players(3).expect("Query failed");
    assert_eq!(top.len(), 3);
    assert!(top.windows(2).all(|w| w[0].wins() >= w[1].wins()));
    // Equal wins keep creation order.
    let names: Vec<&str> = top.iter().map(|p| p.name().as_str()).collect();
    assert_eq!(names, ["P2", "P5", "P4"]);

    assert!(players.find_top_players(0).expect("Query failed").is_empty());
}

#[test]
fn test_save_game_requires_known_players() {
    let (_db, players, games) = setup_test_db();
    let frank = players.create("Frank").expect("Create failed");

    let record = CompletedGame::drawn(*frank.id(), 9999, GameMode::Classic, sample_log())
        .to_record(chrono::Utc::now().naive_utc());
    assert!(games.save(record).is_err(), "Unknown player must violate the foreign key");
}

#[test]
fn test_save_game_round_trips_move_log() {
    let (_db, players, games) = setup_test_db();
    let grace = players.create("Grace").expect("Create failed");
    let hank = players.create("Hank").expect("Create failed");

    let record = NewGameRecord::new(
        *grace.id(),
        *hank.id(),
        None,
        true,
        GameMode::Endless.to_string(),
        sample_log().to_string(),
        chrono::Utc::now().naive_utc(),
    );
    let stored = games.save(record).expect("Save failed");
    assert!(*stored.id() > 0);
    assert_eq!(stored.mode().expect("Mode parse failed"), GameMode::Endless);
    assert_eq!(stored.move_log().expect("Log parse failed"), sample_log());
    assert_eq!(stored.moves(), "0,0,X;1,1,O;0,0,CLEAR");

    let fetched = games.find_by_id(*stored.id()).expect("Query failed");
    assert_eq!(fetched, Some(stored));
}

#[test]
fn test_settle_win_updates_both_players_and_appends_record() {
    let (_db, players, games) = setup_test_db();
    let ivy = players.create("Ivy").expect("Create failed");
    let jon = players.create("Jon").expect("Create failed");

    let completed =
        CompletedGame::won(*ivy.id(), *jon.id(), *jon.id(), GameMode::Classic, sample_log())
            .expect("Valid winner");
    let settled = games.settle(&completed).expect("Settle failed");

    assert_eq!(*settled.player1().losses(), 1);
    assert_eq!(*settled.player1().wins(), 0);
    assert_eq!(*settled.player2().wins(), 1);
    assert_eq!(*settled.player2().draws(), 0);
    assert_eq!(*settled.record().winner_id(), Some(*jon.id()));
    assert!(!settled.record().is_draw());

    let stored_jon = players.find_by_id(*jon.id()).expect("Query failed").unwrap();
    assert_eq!(*stored_jon.wins(), 1);
}

#[test]
fn test_settle_rolls_back_when_a_player_is_missing() {
    let (_db, players, games) = setup_test_db();
    let kim = players.create("Kim").expect("Create failed");

    let completed = CompletedGame::drawn(*kim.id(), 4242, GameMode::Classic, sample_log());
    assert!(games.settle(&completed).is_err());

    let kim = players.find_by_id(*kim.id()).expect("Query failed").unwrap();
    assert_eq!(*kim.draws(), 0, "Nothing may be committed on failure");
    assert!(games.find_recent_games(10).expect("Query failed").is_empty());
}

#[test]
fn test_won_rejects_outside_winner() {
    assert!(CompletedGame::won(1, 2, 3, GameMode::Classic, MoveLog::new()).is_err());
}

#[test]
fn test_recent_games_newest_first_with_names() {
    let (_db, players, games) = setup_test_db();
    let lea = players.create("Lea").expect("Create failed");
    let max = players.create("Max").expect("Create failed");
    let ned = players.create("Ned").expect("Create failed");

    let first = games
        .settle(&CompletedGame::drawn(*lea.id(), *max.id(), GameMode::Classic, sample_log()))
        .expect("Settle failed");
    let second = games
        .settle(
            &CompletedGame::won(*max.id(), *ned.id(), *ned.id(), GameMode::Endless, sample_log())
                .expect("Valid winner"),
        )
        .expect("Settle failed");

    let recent = games.find_recent_games(10).expect("Query failed");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].record().id(), second.record().id());
    assert_eq!(recent[0].winner_name().as_deref(), Some("Ned"));
    assert_eq!(recent[1].record().id(), first.record().id());
    assert_eq!(recent[1].player1_name(), "Lea");
    assert_eq!(recent[1].player2_name(), "Max");
    assert_eq!(*recent[1].winner_name(), None);
    assert_eq!(*recent[1].record().winner_id(), None);

    assert_eq!(games.find_recent_games(1).expect("Query failed").len(), 1);
}

#[test]
fn test_find_games_by_player_matches_either_seat() {
    let (_db, players, games) = setup_test_db();
    let ola = players.create("Ola").expect("Create failed");
    let pam = players.create("Pam").expect("Create failed");
    let quinn = players.create("Quinn").expect("Create failed");

    for (p1, p2) in [(&ola, &pam), (&pam, &quinn), (&quinn, &ola)] {
        games
            .settle(&CompletedGame::drawn(*p1.id(), *p2.id(), GameMode::Classic, sample_log()))
            .expect("Settle failed");
    }

    let ola_games = games.find_games_by_player(*ola.id()).expect("Query failed");
    assert_eq!(ola_games.len(), 2);
    assert!(ola_games[0].record().id() > ola_games[1].record().id());
    assert!(
        ola_games
            .iter()
            .all(|g| g.player1_name() == "Ola" || g.player2_name() == "Ola")
    );
    assert!(games.find_games_by_player(9999).expect("Query failed").is_empty());
}
