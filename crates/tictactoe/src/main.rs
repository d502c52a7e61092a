//! Tictactoe - terminal front-end
//!
//! Plays games against the session service and prints the leaderboard and
//! game history from the store.

#![warn(missing_docs)]

mod cli;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tictactoe::{
    AppConfig, Database, GameMode, GameRepository, GameSession, MoveOutcome, PlayerRepository,
};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load(Some(cli.config.as_path()))?;
    if let Some(url) = cli.database_url {
        config = config.with_database_url(url);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let db = Database::open(config.database_url().clone(), *config.pool_size())?;

    match cli.command {
        Command::Play {
            player1,
            player2,
            mode,
        } => run_play(&config, db, &player1, &player2, mode),
        Command::Leaderboard { limit } => run_leaderboard(db, limit),
        Command::History { limit, player } => run_history(db, limit, player),
    }
}

/// Play games on stdin/stdout until "quit" or end of input.
#[instrument(skip(config, db))]
fn run_play(
    config: &AppConfig,
    db: Database,
    player1: &str,
    player2: &str,
    mode: GameMode,
) -> Result<()> {
    let mut session = GameSession::new(db);
    session.start_new_game(player1, player2, mode)?;
    info!("Game started");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    print_board(&mut out, &session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let (row, col) = match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("quit" | "q"), _) => break,
            (Some("reset"), _) => {
                session.reset_game();
                print_board(&mut out, &session)?;
                continue;
            }
            (Some("retry"), _) => {
                match session.retry_pending_outcome() {
                    Ok(()) => writeln!(out, "Result saved.")?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
                continue;
            }
            (Some(row), Some(col)) => match (row.parse::<usize>(), col.parse::<usize>()) {
                (Ok(row), Ok(col)) => (row, col),
                _ => {
                    writeln!(out, "Enter a move as \"row col\" with values 0-2.")?;
                    continue;
                }
            },
            (Some(_), None) => {
                writeln!(out, "Enter a move as \"row col\", \"reset\" or \"quit\".")?;
                continue;
            }
        };

        let outcome = match session.make_move(row, col) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Move could not be completed");
                writeln!(out, "Error: {}. Type \"retry\" to save the result again.", e)?;
                continue;
            }
        };

        match outcome {
            MoveOutcome::Rejected(Some(reason)) => writeln!(out, "Invalid move: {}", reason)?,
            MoveOutcome::Rejected(None) => writeln!(out, "No game in progress.")?,
            MoveOutcome::Continue => {}
            MoveOutcome::BoardFull => {
                let cleared =
                    session.clear_random_tiles(*config.endless_clear_count(), &mut rand::rng());
                let cleared: Vec<String> = cleared.iter().map(ToString::to_string).collect();
                writeln!(out, "Board full! Cleared {}.", cleared.join(", "))?;
            }
            MoveOutcome::Won(_) | MoveOutcome::Draw => {
                print_board(&mut out, &session)?;
                print_result(&mut out, &session)?;
                continue;
            }
        }
        print_board(&mut out, &session)?;
    }

    Ok(())
}

fn print_board(out: &mut impl Write, session: &GameSession) -> io::Result<()> {
    writeln!(out, "\n{}\n", session.game().board().display())?;
    if let Some(player) = session.current_player()
        && !session.state().is_terminal()
    {
        writeln!(out, "{}'s turn ({})", player.name(), session.current_mark())?;
    }
    Ok(())
}

fn print_result(out: &mut impl Write, session: &GameSession) -> io::Result<()> {
    let Some((player1, player2)) = session.players() else {
        return Ok(());
    };
    match session.game_result() {
        "DRAW" => writeln!(out, "It's a draw!")?,
        "X" => writeln!(out, "{} wins!", player1.name())?,
        "O" => writeln!(out, "{} wins!", player2.name())?,
        _ => return Ok(()),
    }
    for player in [player1, player2] {
        writeln!(
            out,
            "{}  W: {} L: {} D: {}",
            player.name(),
            player.wins(),
            player.losses(),
            player.draws()
        )?;
    }
    writeln!(out, "Type \"reset\" to play again or \"quit\" to leave.")
}

/// Print the top players by wins.
#[instrument(skip(db))]
fn run_leaderboard(db: Database, limit: i64) -> Result<()> {
    let players = PlayerRepository::new(db).find_top_players(limit)?;
    let mut out = io::stdout().lock();

    writeln!(
        out,
        "{:<4} {:<20} {:>5} {:>6} {:>5} {:>7}",
        "#", "Player", "Wins", "Losses", "Draws", "Win %"
    )?;
    for (rank, player) in players.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:<20} {:>5} {:>6} {:>5} {:>6.1}%",
            rank + 1,
            player.name(),
            player.wins(),
            player.losses(),
            player.draws(),
            player.win_rate()
        )?;
    }
    Ok(())
}

/// Print recent games, optionally only those of one player.
#[instrument(skip(db))]
fn run_history(db: Database, limit: i64, player: Option<String>) -> Result<()> {
    let games = GameRepository::new(db.clone());
    let summaries = match player {
        Some(name) => {
            let Some(player) = PlayerRepository::new(db).find_by_name(&name)? else {
                println!("No player named '{}'.", name);
                return Ok(());
            };
            let mut all = games.find_games_by_player(*player.id())?;
            all.truncate(usize::try_from(limit).unwrap_or(0));
            all
        }
        None => games.find_recent_games(limit)?,
    };

    let mut out = io::stdout().lock();
    for summary in &summaries {
        let record = summary.record();
        let result = match summary.winner_name() {
            Some(winner) => format!("{} won", winner),
            None => "draw".to_string(),
        };
        writeln!(
            out,
            "{}  {} vs {}  {:<8} {:<10} {}",
            record.played_at().format("%Y-%m-%d %H:%M"),
            summary.player1_name(),
            summary.player2_name(),
            record.game_mode(),
            result,
            record.moves()
        )?;
    }
    Ok(())
}
